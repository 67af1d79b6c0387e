//! TTL cache layer over a key-value substrate.
//!
//! `CacheLayer` owns the expiry model: every value is wrapped in a
//! [`CacheEntry`] carrying creation and expiry timestamps, and an entry is
//! valid only while the current time is strictly before its expiry.
//! Expired entries are evicted as a side effect of the read that finds
//! them, so the substrate never accumulates more stale data than was
//! written since the last read.
//!
//! # Failure policy
//!
//! Substrate and codec errors never reach the caller. A failed read is a
//! miss, a failed write is a no-op; both are logged at warn level. The
//! worst outcome of a broken substrate is redundant network traffic.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::traits::Store;

/// Default time-to-live for cache entries: 24 hours.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// A stored value with its validity window.
///
/// Owned exclusively by the cache layer; payloads are decoded out of the
/// entry on read and never shared by reference.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    payload: T,
    created_at_ms: u64,
    expires_at_ms: u64,
}

/// TTL-based get/set/evict over a pluggable key-value substrate.
#[derive(Clone)]
pub struct CacheLayer {
    store: Arc<dyn Store>,
}

impl CacheLayer {
    /// Creates a cache layer over the given substrate.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Reads a value, treating absent, expired and unreadable entries as
    /// misses.
    ///
    /// An expired entry is removed from the substrate before returning
    /// `None`. An entry that fails to decode is removed as well, since it
    /// can never become readable again.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = match self.store.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "cache read failed, treating as miss");
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key, error = %e, "cache entry undecodable, evicting");
                self.evict(key).await;
                return None;
            }
        };

        if now_ms() >= entry.expires_at_ms {
            debug!(key, "cache entry expired, evicting");
            self.evict(key).await;
            return None;
        }

        Some(entry.payload)
    }

    /// Writes a value with the given time-to-live, unconditionally
    /// overwriting any existing entry under the key.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let created_at_ms = now_ms();
        let entry = CacheEntry {
            payload: value,
            created_at_ms,
            expires_at_ms: created_at_ms.saturating_add(ttl.as_millis() as u64),
        };

        let bytes = match serde_json::to_vec(&entry) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key, error = %e, "cache entry serialization failed, skipping write");
                return;
            }
        };

        if let Err(e) = self.store.set(key, bytes).await {
            warn!(key, error = %e, "cache write failed, skipping");
        }
    }

    /// Removes a single entry. Substrate errors are logged and swallowed.
    pub async fn evict(&self, key: &str) {
        if let Err(e) = self.store.remove(key).await {
            warn!(key, error = %e, "cache eviction failed");
        }
    }

    /// Removes every entry whose key starts with the given prefix.
    ///
    /// Returns the number of entries removed, or 0 if the substrate
    /// failed. Scoping by prefix keeps unrelated data in a shared store
    /// intact.
    pub async fn clear_prefix(&self, prefix: &str) -> usize {
        match self.store.remove_prefix(prefix).await {
            Ok(removed) => removed,
            Err(e) => {
                warn!(prefix, error = %e, "cache clear failed");
                0
            }
        }
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::memory::MemoryStore;
    use crate::cache::traits::{BoxFuture, StoreError};

    fn layer() -> (CacheLayer, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (CacheLayer::new(store.clone() as Arc<dyn Store>), store)
    }

    #[tokio::test]
    async fn test_set_then_get_within_ttl() {
        let (cache, _) = layer();
        cache.set("key", &vec![1, 2, 3], DEFAULT_TTL).await;

        let value: Option<Vec<i32>> = cache.get("key").await;
        assert_eq!(value, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_get_missing_key_is_miss() {
        let (cache, _) = layer();
        let value: Option<String> = cache.get("absent").await;
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_zero_ttl_entry_is_expired_and_evicted() {
        let (cache, store) = layer();
        cache.set("key", &"value", Duration::ZERO).await;
        assert_eq!(store.entry_count(), 1);

        // Validity requires now strictly before expiry, so a zero TTL
        // entry is never returned
        let value: Option<String> = cache.get("key").await;
        assert_eq!(value, None);

        // The expired entry was removed as a side effect of the read
        assert_eq!(store.entry_count(), 0);
    }

    #[tokio::test]
    async fn test_set_overwrites_existing_entry() {
        let (cache, _) = layer();
        cache.set("key", &"old", DEFAULT_TTL).await;
        cache.set("key", &"new", DEFAULT_TTL).await;

        let value: Option<String> = cache.get("key").await;
        assert_eq!(value.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_evicted() {
        let (cache, store) = layer();
        store.set("key", b"not json".to_vec()).await.unwrap();

        let value: Option<String> = cache.get("key").await;
        assert_eq!(value, None);
        assert_eq!(store.entry_count(), 0);
    }

    #[tokio::test]
    async fn test_evict_removes_entry() {
        let (cache, _) = layer();
        cache.set("key", &1, DEFAULT_TTL).await;
        cache.evict("key").await;

        let value: Option<i32> = cache.get("key").await;
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_clear_prefix_leaves_other_entries() {
        let (cache, _) = layer();
        cache.set("geopoio-pois-a", &1, DEFAULT_TTL).await;
        cache.set("geopoio-pois-b", &2, DEFAULT_TTL).await;
        cache.set("other-c", &3, DEFAULT_TTL).await;

        let removed = cache.clear_prefix("geopoio-").await;
        assert_eq!(removed, 2);

        let survivor: Option<i32> = cache.get("other-c").await;
        assert_eq!(survivor, Some(3));
    }

    /// Substrate that fails every operation.
    struct BrokenStore;

    impl Store for BrokenStore {
        fn get(&self, _key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, StoreError>> {
            Box::pin(async { Err(StoreError::Backend("broken".to_string())) })
        }

        fn set(&self, _key: &str, _value: Vec<u8>) -> BoxFuture<'_, Result<(), StoreError>> {
            Box::pin(async { Err(StoreError::Capacity("full".to_string())) })
        }

        fn remove(&self, _key: &str) -> BoxFuture<'_, Result<bool, StoreError>> {
            Box::pin(async { Err(StoreError::Backend("broken".to_string())) })
        }

        fn remove_prefix(&self, _prefix: &str) -> BoxFuture<'_, Result<usize, StoreError>> {
            Box::pin(async { Err(StoreError::Backend("broken".to_string())) })
        }

        fn entry_count(&self) -> usize {
            0
        }
    }

    #[tokio::test]
    async fn test_broken_substrate_degrades_to_no_cache() {
        let cache = CacheLayer::new(Arc::new(BrokenStore));

        // Write is a silent no-op, read is a miss, clear reports zero
        cache.set("key", &1, DEFAULT_TTL).await;
        let value: Option<i32> = cache.get("key").await;
        assert_eq!(value, None);
        assert_eq!(cache.clear_prefix("geopoio-").await, 0);
    }
}
