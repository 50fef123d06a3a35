//! Bulk search: scan, collect, decode once.

use serde::de::DeserializeOwned;

use crate::codec;
use crate::error::QueryError;
use crate::query::CompiledQuery;
use crate::scan::Scanner;
use crate::storage::{KeyRange, StoreCursor};

/// Result of a successful bulk search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// No record matched. The output collection was left untouched.
    NoResults,
    /// The output collection was replaced with this many decoded records.
    Decoded(usize),
}

impl SearchOutcome {
    /// Number of records written to the output collection.
    #[must_use]
    pub const fn count(self) -> usize {
        match self {
            Self::NoResults => 0,
            Self::Decoded(n) => n,
        }
    }
}

/// Scan `range` with `cursor` and decode every accepted value into `out`.
///
/// The scan finishes and its cursor is released before anything is decoded.
/// `out` is replaced only when at least one record matched and every matched
/// value decoded; on any error it is left as it was.
pub fn search<C, T>(
    cursor: C,
    range: &KeyRange,
    out: &mut Vec<T>,
    query: Option<CompiledQuery>,
) -> Result<SearchOutcome, QueryError>
where
    C: StoreCursor,
    T: DeserializeOwned,
{
    let mut fragments = Vec::new();
    let stop = {
        let mut scanner = Scanner::new(cursor, query);
        loop {
            match scanner.next_match() {
                Ok(Some(value)) => fragments.push(value),
                Ok(None) => break,
                Err(source) => {
                    tracing::warn!(
                        "search over {range} failed after {} records: {source}",
                        fragments.len()
                    );
                    return Err(QueryError::Iterator {
                        range: range.clone(),
                        source,
                    });
                }
            }
        }
        scanner.stop_reason()
    };

    if fragments.is_empty() {
        tracing::debug!("search over {range} matched no records ({stop:?})");
        return Ok(SearchOutcome::NoResults);
    }

    let decoded: Vec<T> = codec::decode_bulk(&fragments).map_err(|e| {
        tracing::warn!("decoding {} records from {range} failed: {e}", fragments.len());
        QueryError::Decode(e)
    })?;

    tracing::debug!(
        "search over {range} matched {} records ({stop:?})",
        fragments.len()
    );
    let count = decoded.len();
    *out = decoded;
    Ok(SearchOutcome::Decoded(count))
}
