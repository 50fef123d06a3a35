//! Per-record scan predicate.
//!
//! Each enumerated `(key, value)` pair goes through three checks in order:
//!
//! 1. key filter: the key must contain the key substring, if one is set
//! 2. value filter: the value must match the compiled value filter
//! 3. page window: a counter over records that passed 1-2 selects `[start, end)`
//!
//! Records rejected by 1-2 do not count toward the page window, so pages are
//! pages of the filtered sequence. Reaching `end` stops the scan outright.
//! The checks do not depend on scan direction.

use serde_json::Value;

use crate::query::descriptor::FieldFilter;

/// What a scan does with the current record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Hand the record to the caller.
    Accept,
    /// Move on to the next record.
    Skip,
    /// End the scan.
    Stop,
}

/// Value side of the predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueFilter {
    /// Every value matches.
    None,
    /// The value must contain these bytes.
    Substring(Vec<u8>),
    /// The value must parse as a JSON object whose field equals the filter value.
    Exact(FieldFilter),
}

impl ValueFilter {
    /// Check whether `value` passes the filter.
    #[must_use]
    pub fn matches(&self, value: &[u8]) -> bool {
        match self {
            Self::None => true,
            Self::Substring(pattern) => contains(value, pattern),
            Self::Exact(filter) => serde_json::from_slice::<Value>(value)
                .ok()
                .and_then(|record| record.get(&filter.field).map(|v| *v == filter.value))
                .unwrap_or(false),
        }
    }
}

/// Selected slice of the filtered record sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageWindow {
    /// No pagination.
    All,
    /// Records with zero-based filtered index in `[start, end)`.
    Range { start: usize, end: usize },
}

/// Stateful predicate for a single scan.
#[derive(Debug, Clone)]
pub struct ScanPredicate {
    key_contains: Vec<u8>,
    value_filter: ValueFilter,
    window: PageWindow,
    /// Filtered records seen so far.
    counter: usize,
}

impl ScanPredicate {
    /// Create a predicate with a fresh counter.
    #[must_use]
    pub const fn new(key_contains: Vec<u8>, value_filter: ValueFilter, window: PageWindow) -> Self {
        Self {
            key_contains,
            value_filter,
            window,
            counter: 0,
        }
    }

    /// A predicate that accepts every record.
    #[must_use]
    pub const fn accept_all() -> Self {
        Self::new(Vec::new(), ValueFilter::None, PageWindow::All)
    }

    /// The page window this predicate selects.
    #[must_use]
    pub const fn window(&self) -> PageWindow {
        self.window
    }

    /// Decide what to do with one record.
    pub fn evaluate(&mut self, key: &[u8], value: &[u8]) -> Decision {
        if !contains(key, &self.key_contains) {
            return Decision::Skip;
        }
        if !self.value_filter.matches(value) {
            return Decision::Skip;
        }
        match self.window {
            PageWindow::All => Decision::Accept,
            PageWindow::Range { start, end } => {
                if self.counter < start {
                    self.counter += 1;
                    return Decision::Skip;
                }
                if self.counter >= end {
                    return Decision::Stop;
                }
                self.counter += 1;
                Decision::Accept
            }
        }
    }
}

/// Check whether `needle` occurs contiguously in `haystack`.
///
/// An empty needle is contained in everything.
#[must_use]
pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|window| window == needle)
}
