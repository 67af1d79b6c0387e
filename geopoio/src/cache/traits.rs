//! Core trait for the key-value cache substrate.
//!
//! The `Store` trait is the persistence boundary of the cache: a minimal,
//! domain-agnostic key-value interface with string keys and raw byte
//! values. TTL semantics live one layer up in [`crate::cache::CacheLayer`];
//! a store only persists and enumerates.
//!
//! # Dyn Compatibility
//!
//! Async methods return `Pin<Box<dyn Future>>` so the trait can be used
//! behind `Arc<dyn Store>`, letting the cache layer wrap any backend
//! polymorphically.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Errors that can occur in a cache substrate.
///
/// Callers of the cache layer never see these: the layer degrades to
/// miss-on-read and no-op-on-write, logging the error instead.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error in a persistent backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend rejected the write, e.g. over quota.
    #[error("Capacity exceeded: {0}")]
    Capacity(String),

    /// Backend-specific error.
    #[error("Store error: {0}")]
    Backend(String),
}

/// Generic key-value storage interface.
///
/// Keys are strings (human-readable in logs, consistent across backends),
/// values are raw bytes with no serialization opinions imposed. All
/// implementations must be `Send + Sync` for use across async tasks.
pub trait Store: Send + Sync {
    /// Retrieve a value by key.
    ///
    /// Returns `Ok(None)` if the key is not present.
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, StoreError>>;

    /// Store a value, replacing any existing value under the same key.
    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), StoreError>>;

    /// Delete a value by key.
    ///
    /// Returns `Ok(true)` if the key existed.
    fn remove(&self, key: &str) -> BoxFuture<'_, Result<bool, StoreError>>;

    /// Delete every key starting with the given prefix.
    ///
    /// Returns the number of keys removed. Prefix scoping keeps a clear
    /// from touching unrelated data sharing the same store.
    fn remove_prefix(&self, prefix: &str) -> BoxFuture<'_, Result<usize, StoreError>>;

    /// Current number of entries in the store.
    fn entry_count(&self) -> usize;
}

impl fmt::Debug for dyn Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Store(entries: {})", self.entry_count())
    }
}
