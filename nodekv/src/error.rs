//! Errors returned by the query layer.
//!
//! Each error is built per call and carries the key or range it concerns.
//! An empty search result is not an error; see `SearchOutcome`.

use crate::codec::CodecError;
use crate::keys::NodeNameError;
use crate::storage::{KeyRange, StoreError};

/// Errors that can occur while reading or writing through the query layer.
#[derive(Debug)]
pub enum QueryError {
    /// A point lookup found no value.
    NotFound { key: Vec<u8> },
    /// The cursor reported an error part way through a scan.
    Iterator { range: KeyRange, source: StoreError },
    /// A point read or write failed in the store.
    Store(StoreError),
    /// A stored record or bulk result is not well-formed.
    Decode(CodecError),
    /// A node name failed validation.
    InvalidNode(NodeNameError),
    /// A streaming read was started outside a tokio runtime.
    NoRuntime,
}

impl QueryError {
    /// Check if this is a `NotFound` error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { key } => {
                write!(f, "key '{}' not found", String::from_utf8_lossy(key))
            }
            Self::Iterator { range, source } => {
                write!(f, "scan over {range} failed: {source}")
            }
            Self::Store(e) => write!(f, "store error: {e}"),
            Self::Decode(e) => write!(f, "decode error: {e}"),
            Self::InvalidNode(e) => write!(f, "invalid node: {e}"),
            Self::NoRuntime => write!(f, "streaming reads require a tokio runtime"),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Iterator { source, .. } => Some(source),
            Self::Store(e) => Some(e),
            Self::Decode(e) => Some(e),
            Self::InvalidNode(e) => Some(e),
            Self::NotFound { .. } | Self::NoRuntime => None,
        }
    }
}

impl From<StoreError> for QueryError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<CodecError> for QueryError {
    fn from(e: CodecError) -> Self {
        Self::Decode(e)
    }
}

impl From<NodeNameError> for QueryError {
    fn from(e: NodeNameError) -> Self {
        Self::InvalidNode(e)
    }
}
