//! JSON record codec.
//!
//! Every stored value is one serialized JSON object. Bulk decoding frames the
//! raw fragments as a JSON array (`[f1,f2,...]`) and parses them in a single
//! pass, so a search pays the parser setup cost once instead of per record.
//!
//! Framing only works if every fragment is exactly one JSON value: an empty
//! fragment would vanish from the array and a fragment like `{..},{..}` would
//! split into two records. `decode_bulk` checks each fragment's boundaries
//! before framing, and a malformed fragment fails the whole bulk decode, so
//! callers never see a partially decoded collection.

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

const ARRAY_OPEN: u8 = b'[';
const ARRAY_CLOSE: u8 = b']';
const FRAGMENT_SEPARATOR: u8 = b',';

/// Serialize one record.
pub fn encode<T: Serialize + ?Sized>(record: &T) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(record)?)
}

/// Deserialize one record.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Join raw fragments into a single JSON array.
#[must_use]
pub fn frame_fragments(fragments: &[Vec<u8>]) -> Vec<u8> {
    let body: usize = fragments.iter().map(Vec::len).sum();
    let mut framed = Vec::with_capacity(body + fragments.len() + 2);
    framed.push(ARRAY_OPEN);
    for (i, fragment) in fragments.iter().enumerate() {
        if i > 0 {
            framed.push(FRAGMENT_SEPARATOR);
        }
        framed.extend_from_slice(fragment);
    }
    framed.push(ARRAY_CLOSE);
    framed
}

/// Check that `fragment` holds exactly one JSON value and nothing else.
///
/// # Errors
///
/// Returns an error for empty input, malformed JSON, or trailing data after
/// the first value.
pub fn check_fragment(fragment: &[u8]) -> Result<(), CodecError> {
    let mut de = serde_json::Deserializer::from_slice(fragment);
    IgnoredAny::deserialize(&mut de)?;
    de.end()?;
    Ok(())
}

/// Deserialize many fragments with one typed parse.
///
/// # Errors
///
/// Returns an error naming the first fragment that is not exactly one JSON
/// value, or the parse error of the framed array.
pub fn decode_bulk<T: DeserializeOwned>(fragments: &[Vec<u8>]) -> Result<Vec<T>, CodecError> {
    for (index, fragment) in fragments.iter().enumerate() {
        check_fragment(fragment).map_err(|e| e.at_fragment(index))?;
    }
    let decoded: Vec<T> = decode(&frame_fragments(fragments))?;
    if decoded.len() != fragments.len() {
        return Err(CodecError::CountMismatch {
            expected: fragments.len(),
            found: decoded.len(),
        });
    }
    Ok(decoded)
}

/// Error returned when a record cannot be encoded or decoded.
#[derive(Debug)]
pub enum CodecError {
    /// The JSON text was malformed or did not match the record type.
    Json {
        source: serde_json::Error,
        fragment: Option<usize>,
    },
    /// A bulk decode produced a different number of records than it was given.
    CountMismatch { expected: usize, found: usize },
}

impl CodecError {
    /// Line and column in the parsed input where decoding failed.
    #[must_use]
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Self::Json { source, .. } => Some((source.line(), source.column())),
            Self::CountMismatch { .. } => None,
        }
    }

    /// Index of the offending fragment in a bulk decode, when known.
    #[must_use]
    pub const fn fragment(&self) -> Option<usize> {
        match self {
            Self::Json { fragment, .. } => *fragment,
            Self::CountMismatch { .. } => None,
        }
    }

    fn at_fragment(self, index: usize) -> Self {
        match self {
            Self::Json { source, .. } => Self::Json {
                source,
                fragment: Some(index),
            },
            other => other,
        }
    }
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json {
                source,
                fragment: Some(index),
            } => write!(f, "malformed record at position {index}: {source}"),
            Self::Json {
                source,
                fragment: None,
            } => write!(f, "malformed record: {source}"),
            Self::CountMismatch { expected, found } => write!(
                f,
                "malformed records: {expected} values decoded into {found} records"
            ),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json { source, .. } => Some(source),
            Self::CountMismatch { .. } => None,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json {
            source,
            fragment: None,
        }
    }
}
