//! Reverse key listing by suffix.

use crate::error::QueryError;
use crate::storage::{KeyRange, ScopedCursor, StoreCursor};

/// List the keys in `range` that end with `suffix`, highest key first.
///
/// The last key of the range is read with `seek_last` before the loop
/// steps backwards with `prev`. An empty suffix matches every key.
///
/// # Errors
///
/// Returns `QueryError::Iterator` if the cursor fails; keys collected before
/// the failure are discarded.
pub fn keys_by_suffix<C: StoreCursor>(
    cursor: C,
    range: &KeyRange,
    suffix: &[u8],
) -> Result<Vec<Vec<u8>>, QueryError> {
    let mut cursor = ScopedCursor::new(cursor);
    let mut keys = Vec::new();

    if cursor.seek_last() {
        if cursor.key().ends_with(suffix) {
            keys.push(cursor.key().to_vec());
        }
        while cursor.prev() {
            if cursor.key().ends_with(suffix) {
                keys.push(cursor.key().to_vec());
            }
        }
    }

    if let Err(source) = cursor.status() {
        tracing::warn!("suffix listing over {range} failed after {} keys: {source}", keys.len());
        return Err(QueryError::Iterator {
            range: range.clone(),
            source,
        });
    }

    tracing::debug!("suffix listing over {range} found {} keys", keys.len());
    Ok(keys)
}
