//! Query descriptors.
//!
//! A `Query` records what the caller wants: a page, an optional key
//! substring, an optional field filter and a direction. It is compiled into a
//! `CompiledQuery` right before a scan starts. Compilation reads the
//! descriptor and never mutates it, so one descriptor can back any number of
//! scans, one after another or at the same time.

use serde_json::Value;

use crate::config::{QueryConfig, ValueFilterMode};
use crate::query::predicate::{PageWindow, ScanPredicate, ValueFilter};
use crate::storage::Direction;

/// Page number and page size that together mean "no pagination".
pub const SELECT_ALL: i64 = -1;

/// A field equality filter, as recorded by `Query::set_filter`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

/// Filter and pagination intent for one scan.
///
/// `page` is zero-based. A `page` below zero counts as page 0, and a
/// `per_page` of zero or less falls back to the configured default, unless
/// both are `SELECT_ALL`, which disables pagination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Zero-based page index.
    pub page: i64,
    /// Records per page.
    pub per_page: i64,
    /// Only keys containing these bytes are considered. Empty means any key.
    pub key_contains: Vec<u8>,
    /// Walk the range from its highest key down.
    pub reverse: bool,
    filter: Option<FieldFilter>,
    filter_mode: Option<ValueFilterMode>,
}

impl Query {
    /// An unfiltered query for the first page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An unfiltered query for `page` with `per_page` records.
    #[must_use]
    pub fn paged(page: i64, per_page: i64) -> Self {
        Self {
            page,
            per_page,
            ..Self::default()
        }
    }

    /// An unfiltered, unpaginated query.
    #[must_use]
    pub fn all() -> Self {
        Self::paged(SELECT_ALL, SELECT_ALL)
    }

    /// Only keep records whose `field` equals `value`.
    ///
    /// Takes effect when the query is compiled. A later call replaces the
    /// earlier filter.
    pub fn set_filter(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.filter = Some(FieldFilter {
            field: field.into(),
            value: value.into(),
        });
    }

    /// Disable pagination.
    pub const fn select_all(&mut self) {
        self.page = SELECT_ALL;
        self.per_page = SELECT_ALL;
    }

    /// Check if pagination is disabled.
    #[must_use]
    pub const fn is_select_all(&self) -> bool {
        self.page == SELECT_ALL && self.per_page == SELECT_ALL
    }

    /// Override the configured filter mode for this query.
    pub const fn set_filter_mode(&mut self, mode: ValueFilterMode) {
        self.filter_mode = Some(mode);
    }

    /// The recorded field filter, if any.
    #[must_use]
    pub const fn filter(&self) -> Option<&FieldFilter> {
        self.filter.as_ref()
    }

    /// Direction the scan walks in.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        if self.reverse {
            Direction::Reverse
        } else {
            Direction::Forward
        }
    }

    /// Build the value filter for this query.
    ///
    /// Without a field filter every record matches. In `Substring` mode the
    /// pattern is `"field":` followed by the value's JSON text; string values
    /// drop their closing quote, so they match any value with that prefix.
    #[must_use]
    pub fn compile_value_filter(&self, default_mode: ValueFilterMode) -> ValueFilter {
        let Some(filter) = &self.filter else {
            return ValueFilter::None;
        };
        match self.filter_mode.unwrap_or(default_mode) {
            ValueFilterMode::Substring => ValueFilter::Substring(substring_pattern(filter)),
            ValueFilterMode::Exact => ValueFilter::Exact(filter.clone()),
        }
    }

    /// Build the `[start, end)` record window for this query.
    #[must_use]
    pub fn compile_page_window(&self, default_page_size: usize) -> PageWindow {
        if self.is_select_all() {
            return PageWindow::All;
        }
        let page = usize::try_from(self.page.max(0)).unwrap_or(usize::MAX);
        let per_page = match usize::try_from(self.per_page) {
            Ok(n) if n > 0 => n,
            _ => default_page_size.max(1),
        };
        let start = page.saturating_mul(per_page);
        PageWindow::Range {
            start,
            end: start.saturating_add(per_page),
        }
    }

    /// Compile the query into the predicate a single scan runs with.
    #[must_use]
    pub fn compile(&self, config: &QueryConfig) -> CompiledQuery {
        CompiledQuery {
            predicate: ScanPredicate::new(
                self.key_contains.clone(),
                self.compile_value_filter(config.value_filter_mode),
                self.compile_page_window(config.default_page_size),
            ),
            direction: self.direction(),
        }
    }
}

/// Render the `"field":value` byte pattern for a substring filter.
fn substring_pattern(filter: &FieldFilter) -> Vec<u8> {
    let mut pattern = Value::String(filter.field.clone()).to_string().into_bytes();
    pattern.push(b':');
    let rendered = filter.value.to_string();
    match filter.value {
        Value::String(_) => {
            // Keep the opening quote only.
            pattern.extend_from_slice(&rendered.as_bytes()[..rendered.len() - 1]);
        }
        _ => pattern.extend_from_slice(rendered.as_bytes()),
    }
    pattern
}

/// A query compiled for exactly one scan.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    pub predicate: ScanPredicate,
    pub direction: Direction,
}

impl CompiledQuery {
    /// Forward scan that accepts every record.
    #[must_use]
    pub fn accept_all() -> Self {
        Self {
            predicate: ScanPredicate::accept_all(),
            direction: Direction::Forward,
        }
    }
}
