//! In-memory cache substrate backed by DashMap.
//!
//! The default store for a single-process deployment. DashMap shards its
//! locks internally, so concurrent readers and writers from async tasks do
//! not contend on a single mutex and never block the runtime for long.
//!
//! Expiry is not handled here: the store keeps whatever bytes it is given
//! until removed. TTL enforcement belongs to [`crate::cache::CacheLayer`].

use dashmap::DashMap;

use super::traits::{BoxFuture, Store, StoreError};

/// In-memory key-value store.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, StoreError>> {
        let value = self.entries.get(key).map(|entry| entry.value().clone());
        Box::pin(async move { Ok(value) })
    }

    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), StoreError>> {
        self.entries.insert(key.to_string(), value);
        Box::pin(async move { Ok(()) })
    }

    fn remove(&self, key: &str) -> BoxFuture<'_, Result<bool, StoreError>> {
        let existed = self.entries.remove(key).is_some();
        Box::pin(async move { Ok(existed) })
    }

    fn remove_prefix(&self, prefix: &str) -> BoxFuture<'_, Result<usize, StoreError>> {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - self.entries.len();
        Box::pin(async move { Ok(removed) })
    }

    fn entry_count(&self) -> usize {
        self.entries.len()
    }
}
