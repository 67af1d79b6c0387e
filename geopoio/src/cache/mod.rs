//! Content-addressed TTL caching.
//!
//! Three pieces compose the caching stack:
//!
//! - [`Store`] — the key-value substrate (bytes in, bytes out). The
//!   in-process default is [`MemoryStore`]; a persistent backend can be
//!   swapped in behind the same trait.
//! - [`cache_key`] — deterministic key derivation from request
//!   parameters.
//! - [`CacheLayer`] — TTL semantics, entry encoding, and the
//!   degrade-to-miss failure policy on top of any store.

mod key;
mod layer;
mod memory;
mod traits;

pub use key::{cache_key, KEY_NAMESPACE};
pub use layer::{CacheLayer, DEFAULT_TTL};
pub use memory::MemoryStore;
pub use traits::{BoxFuture, Store, StoreError};
