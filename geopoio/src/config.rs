//! Retrieval configuration.

use std::time::Duration;

use crate::cache::DEFAULT_TTL;
use crate::overpass::DEFAULT_ENDPOINT;

/// Configuration for a [`crate::retrieval::RetrievalCoordinator`].
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Overpass API endpoint URL.
    pub endpoint: String,

    /// Time-to-live for cached POI result sets.
    pub cache_ttl: Duration,

    /// Client-side timeout for a single Overpass request.
    ///
    /// This bounds the transport; the query itself additionally carries a
    /// server-side timeout. Cancellation by supersession remains the only
    /// cutoff callers control directly.
    pub request_timeout: Duration,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            cache_ttl: DEFAULT_TTL,
            request_timeout: Duration::from_secs(30),
        }
    }
}
