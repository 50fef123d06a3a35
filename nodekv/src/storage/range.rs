//! Key ranges accepted by store cursors.
//!
//! A scan covers exactly one of:
//! - the whole key space
//! - every key starting with a prefix
//! - an explicit `[start, end)` interval
//!
//! # Invariants
//!
//! - Bounds are byte-lexicographic, matching the order of the store.
//! - `upper_bound()` is always exclusive (or unbounded).

use std::fmt;
use std::ops::Bound;

/// The key range a single scan walks over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRange {
    /// Every key in the store.
    All,
    /// Every key that starts with the given bytes.
    Prefix(Vec<u8>),
    /// Keys in `[start, end)`. An empty `end` leaves the range open above.
    Interval { start: Vec<u8>, end: Vec<u8> },
}

impl KeyRange {
    /// Range over every key starting with `prefix`.
    ///
    /// An empty prefix covers the whole store.
    #[must_use]
    pub fn prefix(prefix: impl Into<Vec<u8>>) -> Self {
        let prefix = prefix.into();
        if prefix.is_empty() {
            Self::All
        } else {
            Self::Prefix(prefix)
        }
    }

    /// Range over `[start, end)`.
    #[must_use]
    pub fn interval(start: impl Into<Vec<u8>>, end: impl Into<Vec<u8>>) -> Self {
        Self::Interval {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Inclusive lower bound of the range.
    #[must_use]
    pub fn lower_bound(&self) -> Bound<Vec<u8>> {
        match self {
            Self::All => Bound::Unbounded,
            Self::Prefix(prefix) => Bound::Included(prefix.clone()),
            Self::Interval { start, .. } => Bound::Included(start.clone()),
        }
    }

    /// Exclusive upper bound of the range.
    #[must_use]
    pub fn upper_bound(&self) -> Bound<Vec<u8>> {
        match self {
            Self::All => Bound::Unbounded,
            Self::Prefix(prefix) => {
                prefix_successor(prefix).map_or(Bound::Unbounded, Bound::Excluded)
            }
            Self::Interval { end, .. } if end.is_empty() => Bound::Unbounded,
            Self::Interval { end, .. } => Bound::Excluded(end.clone()),
        }
    }

    /// Check whether `key` falls inside the range.
    #[must_use]
    pub fn contains(&self, key: &[u8]) -> bool {
        match self {
            Self::All => true,
            Self::Prefix(prefix) => key.starts_with(prefix),
            Self::Interval { start, end } => {
                key >= start.as_slice() && (end.is_empty() || key < end.as_slice())
            }
        }
    }
}

impl fmt::Display for KeyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all keys"),
            Self::Prefix(prefix) => write!(f, "prefix '{}'", String::from_utf8_lossy(prefix)),
            Self::Interval { start, end } => write!(
                f,
                "interval ['{}', '{}')",
                String::from_utf8_lossy(start),
                String::from_utf8_lossy(end)
            ),
        }
    }
}

/// Smallest key greater than every key starting with `prefix`.
///
/// Returns `None` when no such key exists (the prefix is empty or all `0xFF`).
#[must_use]
pub fn prefix_successor(prefix: &[u8]) -> Option<Vec<u8>> {
    let last = prefix.iter().rposition(|&b| b != 0xFF)?;
    let mut successor = prefix[..=last].to_vec();
    successor[last] += 1;
    Some(successor)
}
