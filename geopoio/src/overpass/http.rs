//! HTTP transport abstraction for the Overpass API.
//!
//! The trait mirrors the request shape Overpass expects: a POST with the
//! query text as the body. Keeping it behind a trait allows the retrieval
//! coordinator to be exercised with a mock service in tests.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Errors surfaced by the transport layer.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The request could not be issued or the connection failed.
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Trait for issuing Overpass queries.
///
/// Implementations must be `Send + Sync` so a coordinator can hold the
/// transport behind an `Arc<dyn OverpassTransport>`.
pub trait OverpassTransport: Send + Sync {
    /// POSTs the query body to the given endpoint and returns the raw
    /// response bytes.
    ///
    /// A non-success status is an error; cancellation is handled by the
    /// caller dropping this future.
    fn post<'a>(&'a self, url: &'a str, body: String) -> BoxFuture<'a, Result<Vec<u8>, TransportError>>;
}

/// Real transport implementation using the async reqwest client.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with the given request timeout.
    pub fn new(timeout: std::time::Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl OverpassTransport for ReqwestTransport {
    fn post<'a>(&'a self, url: &'a str, body: String) -> BoxFuture<'a, Result<Vec<u8>, TransportError>> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .header(reqwest::header::CONTENT_TYPE, "text/plain")
                .body(body)
                .send()
                .await
                .map_err(|e| TransportError::Request(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(TransportError::Status {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }

            response
                .bytes()
                .await
                .map(|b| b.to_vec())
                .map_err(|e| TransportError::Body(e.to_string()))
        })
    }
}
