use std::sync::Once;

use serde::{Deserialize, Serialize};

use crate::db::NodeDb;
use crate::storage::{FaultConfig, MemoryStore};

static TRACING: Once = Once::new();

/// Install a fmt subscriber once per test binary.
///
/// Honors `RUST_LOG`, defaulting to `nodekv=debug`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "nodekv=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Record shape used across tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub a: String,
    pub sku: String,
    pub n: u32,
}

impl Item {
    #[must_use]
    pub fn new(node: &str, n: u32) -> Self {
        Self {
            a: format!("VALUE OF NODE {node} - {n}"),
            sku: format!("SKU-{n:04}"),
            n,
        }
    }
}

/// Create a fresh database over an empty in-memory store.
#[must_use]
pub fn new_test_db() -> NodeDb<MemoryStore> {
    init_tracing();
    NodeDb::new(MemoryStore::new())
}

/// Create a database whose cursors fail according to `faults`.
#[must_use]
pub fn new_faulty_db(faults: FaultConfig) -> NodeDb<MemoryStore> {
    init_tracing();
    NodeDb::new(MemoryStore::with_faults(faults))
}

/// Save `Item::new(node, id)` under identifiers `ids` of `node`.
pub fn seed_node(db: &NodeDb<MemoryStore>, node: &str, ids: impl IntoIterator<Item = u32>) {
    for id in ids {
        #[allow(clippy::expect_used)]
        db.save_record_in_node(node, id.to_string(), &Item::new(node, id))
            .expect("seed record");
    }
}
