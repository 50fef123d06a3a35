//! Ordered key-value store abstraction.
//!
//! The query layer only needs point reads and writes plus positioned cursors
//! over a key range. `OrderedStore` captures that contract so the scan
//! engines run unchanged against any byte-ordered store.
//!
//! # Contract
//!
//! Implementations must ensure:
//! - cursors visit keys in ascending byte-lexicographic order (or descending
//!   when stepped backwards)
//! - concurrent readers are safe alongside a single writer
//! - each cursor is owned by exactly one scan and is `Send`, so a scan can run
//!   on a background task

mod cursor;
mod memory;
mod range;

pub use cursor::{Direction, ScopedCursor, StoreCursor};
pub use memory::{FaultConfig, MemoryCursor, MemoryStore};
pub use range::{KeyRange, prefix_successor};

/// Errors reported by a store or one of its cursors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store's lock was poisoned by a panicking writer.
    LockPoisoned,
    /// Injected fault for testing.
    InjectedFault(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LockPoisoned => write!(f, "store lock poisoned"),
            Self::InjectedFault(msg) => write!(f, "injected fault: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// A byte-ordered key-value store.
pub trait OrderedStore: Send + Sync + 'static {
    /// Cursor type handed out by `cursor`.
    type Cursor: StoreCursor + Send + 'static;

    /// Look up a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Insert or overwrite a value.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Remove a key. Removing an absent key is not an error.
    fn delete(&self, key: &[u8]) -> Result<(), StoreError>;

    /// Open an unpositioned cursor over `range`.
    fn cursor(&self, range: &KeyRange) -> Result<Self::Cursor, StoreError>;
}
