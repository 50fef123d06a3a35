//! Query descriptors and the predicate they compile to.
//!
//! # Example
//!
//! ```
//! use nodekv::config::QueryConfig;
//! use nodekv::query::{PageWindow, Query};
//!
//! let mut query = Query::paged(1, 10);
//! query.set_filter("status", "active");
//! query.key_contains = b"2024".to_vec();
//!
//! let compiled = query.compile(&QueryConfig::default());
//! assert_eq!(compiled.predicate.window(), PageWindow::Range { start: 10, end: 20 });
//! ```

mod descriptor;
mod predicate;

pub use descriptor::{CompiledQuery, FieldFilter, Query, SELECT_ALL};
pub use predicate::{Decision, PageWindow, ScanPredicate, ValueFilter, contains};
