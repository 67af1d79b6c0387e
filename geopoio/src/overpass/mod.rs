//! Overpass API integration.
//!
//! This module covers everything between the pipeline and the external
//! geodata service: building the Overpass QL payload for a set of POI
//! categories and a bounding box, the serde model of the JSON response,
//! normalization of raw elements into [`crate::poi::Poi`] records, and the
//! HTTP transport abstraction.
//!
//! The transport is a trait so the retrieval coordinator can be exercised
//! in tests with a mock service; the real implementation uses reqwest.

mod element;
mod http;
mod normalize;
mod query;

pub use element::{OverpassResponse, RawElement};
pub use http::{BoxFuture, OverpassTransport, ReqwestTransport, TransportError};
pub use normalize::{classify, normalize};
pub use query::build_query;

/// Default public Overpass API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";
