//! Caller-facing database handle.
//!
//! `NodeDb` wraps an `OrderedStore` with node-scoped keys, point reads and
//! writes, bulk searches, streaming reads and reverse suffix listings.
//!
//! # Thread Safety
//!
//! `NodeDb` is `Send + Sync` when the store is. Every scan opens its own
//! cursor and compiles its own copy of the query, so any number of scans can
//! run at once, including several built from the same `Query`.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::codec;
use crate::config::{ConfigError, QueryConfig};
use crate::error::QueryError;
use crate::keys::{NodeName, node_key, node_prefix};
use crate::query::Query;
use crate::scan::{RecordStream, SearchOutcome, bulk, reverse, stream};
use crate::storage::{KeyRange, OrderedStore};

/// A node-aware query layer over an ordered store.
pub struct NodeDb<S: OrderedStore> {
    store: Arc<S>,
    config: QueryConfig,
}

impl<S: OrderedStore> Clone for NodeDb<S> {
    #[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: OrderedStore> NodeDb<S> {
    /// Wrap `store` with the default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, QueryConfig::default())
    }

    /// Wrap `store` with `config`.
    pub fn with_config(store: S, config: QueryConfig) -> Self {
        Self {
            store: Arc::new(store),
            config,
        }
    }

    /// Wrap `store` with configuration read from `NODEKV_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but not valid.
    pub fn from_env(store: S) -> Result<Self, ConfigError> {
        let config = QueryConfig::from_env()?;
        tracing::info!(
            "query layer configured: page size {}, stream capacity {}, filter mode {:?}",
            config.default_page_size,
            config.stream_capacity,
            config.value_filter_mode
        );
        Ok(Self::with_config(store, config))
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &QueryConfig {
        &self.config
    }

    // ========== Writes ==========

    /// Store raw bytes under `key`.
    pub fn save(&self, key: impl AsRef<[u8]>, value: &[u8]) -> Result<(), QueryError> {
        Ok(self.store.put(key.as_ref(), value)?)
    }

    /// Store raw bytes as record `id` of `node`.
    ///
    /// The bytes must be one serialized record for searches over the node
    /// to decode.
    pub fn save_in_node(
        &self,
        node: &str,
        id: impl AsRef<[u8]>,
        value: &[u8],
    ) -> Result<(), QueryError> {
        let node = NodeName::new(node)?;
        self.save(node_key(&node, id), value)
    }

    /// Serialize `record` and store it as record `id` of `node`.
    pub fn save_record_in_node<T: Serialize + ?Sized>(
        &self,
        node: &str,
        id: impl AsRef<[u8]>,
        record: &T,
    ) -> Result<(), QueryError> {
        let bytes = codec::encode(record)?;
        self.save_in_node(node, id, &bytes)
    }

    /// Remove `key`. Removing an absent key succeeds.
    pub fn delete(&self, key: impl AsRef<[u8]>) -> Result<(), QueryError> {
        Ok(self.store.delete(key.as_ref())?)
    }

    /// Remove record `id` of `node`.
    pub fn delete_in_node(&self, node: &str, id: impl AsRef<[u8]>) -> Result<(), QueryError> {
        let node = NodeName::new(node)?;
        self.delete(node_key(&node, id))
    }

    // ========== Point reads ==========

    /// Read the bytes stored under `key`, exactly as written.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::NotFound` if the key is absent.
    pub fn get_raw(&self, key: impl AsRef<[u8]>) -> Result<Vec<u8>, QueryError> {
        let key = key.as_ref();
        self.store.get(key)?.ok_or_else(|| QueryError::NotFound { key: key.to_vec() })
    }

    /// Read and decode the record stored under `key`.
    pub fn get_parsed<T: DeserializeOwned>(&self, key: impl AsRef<[u8]>) -> Result<T, QueryError> {
        let bytes = self.get_raw(key)?;
        Ok(codec::decode(&bytes)?)
    }

    /// Read the bytes of record `id` in `node`.
    pub fn get_raw_in_node(&self, node: &str, id: impl AsRef<[u8]>) -> Result<Vec<u8>, QueryError> {
        let node = NodeName::new(node)?;
        self.get_raw(node_key(&node, id))
    }

    /// Read and decode record `id` in `node`.
    pub fn get_parsed_in_node<T: DeserializeOwned>(
        &self,
        node: &str,
        id: impl AsRef<[u8]>,
    ) -> Result<T, QueryError> {
        let bytes = self.get_raw_in_node(node, id)?;
        Ok(codec::decode(&bytes)?)
    }

    // ========== Bulk search ==========

    /// Search the records of `node`, or the whole store when `node` is `None`.
    ///
    /// On `SearchOutcome::Decoded` `out` holds the matched records in scan
    /// order. On `SearchOutcome::NoResults` or any error `out` is untouched.
    pub fn search_in_node<T: DeserializeOwned>(
        &self,
        node: Option<&str>,
        out: &mut Vec<T>,
        query: Option<&Query>,
    ) -> Result<SearchOutcome, QueryError> {
        let range = self.node_range(node)?;
        self.search_range(&range, out, query)
    }

    /// Search every key starting with `prefix`. An empty prefix searches everything.
    pub fn search<T: DeserializeOwned>(
        &self,
        prefix: impl AsRef<[u8]>,
        out: &mut Vec<T>,
        query: Option<&Query>,
    ) -> Result<SearchOutcome, QueryError> {
        self.search_range(&KeyRange::prefix(prefix.as_ref()), out, query)
    }

    /// Search keys in `[start, end)`. An empty `end` leaves the range open above.
    pub fn range<T: DeserializeOwned>(
        &self,
        start: impl AsRef<[u8]>,
        end: impl AsRef<[u8]>,
        out: &mut Vec<T>,
        query: Option<&Query>,
    ) -> Result<SearchOutcome, QueryError> {
        self.search_range(&KeyRange::interval(start.as_ref(), end.as_ref()), out, query)
    }

    /// Search an explicit key range.
    pub fn search_range<T: DeserializeOwned>(
        &self,
        range: &KeyRange,
        out: &mut Vec<T>,
        query: Option<&Query>,
    ) -> Result<SearchOutcome, QueryError> {
        let compiled = query.map(|q| q.compile(&self.config));
        let cursor = self.store.cursor(range)?;
        bulk::search(cursor, range, out, compiled)
    }

    // ========== Streaming ==========

    /// Stream the records of `node`, or of the whole store when `node` is `None`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn read(
        &self,
        node: Option<&str>,
        query: Option<&Query>,
    ) -> Result<RecordStream, QueryError> {
        let range = self.node_range(node)?;
        self.read_range(range, query)
    }

    /// Stream the records in an explicit key range.
    pub fn read_range(
        &self,
        range: KeyRange,
        query: Option<&Query>,
    ) -> Result<RecordStream, QueryError> {
        let compiled = query.map(|q| q.compile(&self.config));
        let cursor = self.store.cursor(&range)?;
        stream::spawn_stream(cursor, range, compiled, self.config.stream_capacity)
    }

    // ========== Key listing ==========

    /// List keys starting with `prefix` and ending with `suffix`, highest first.
    pub fn list_keys_by_suffix(
        &self,
        prefix: impl AsRef<[u8]>,
        suffix: impl AsRef<[u8]>,
    ) -> Result<Vec<Vec<u8>>, QueryError> {
        let range = KeyRange::prefix(prefix.as_ref());
        let cursor = self.store.cursor(&range)?;
        reverse::keys_by_suffix(cursor, &range, suffix.as_ref())
    }

    fn node_range(&self, node: Option<&str>) -> Result<KeyRange, QueryError> {
        match node {
            Some(node) => Ok(KeyRange::Prefix(node_prefix(&NodeName::new(node)?))),
            None => Ok(KeyRange::All),
        }
    }
}
