// Life of a search:
// 1. Caller names a node, prefix or key interval
//     - Node names become a `node_` key prefix
// 2. The query (if any) is compiled into a scan predicate
// 3. A cursor walks the range, forward or reverse
//     - key filter, value filter, page window, in that order
// 4. Accepted values are either
//     - collected and decoded once as a JSON array (bulk search), or
//     - sent one at a time from a background task (streaming read)
//
// System components:
//  - Ordered store + cursors
//  - Key namespacer
//  - Query descriptor / predicate
//  - Scan engines

pub mod codec;
pub mod config;
mod db;
mod error;
pub mod keys;
pub mod query;
pub mod scan;
pub mod storage;

#[cfg(test)]
mod e2e_tests;
#[cfg(test)]
mod testing;

pub use config::{ConfigError, QueryConfig, ValueFilterMode};
pub use db::NodeDb;
pub use error::QueryError;
pub use keys::{NodeName, NodeNameError};
pub use query::Query;
pub use scan::{RecordStream, SearchOutcome, StreamEvent};
pub use storage::{KeyRange, MemoryStore, OrderedStore, StoreError};
