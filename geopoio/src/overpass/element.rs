//! Serde model of the Overpass JSON response body.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level Overpass response.
///
/// Only the `elements` list is of interest; metadata fields like
/// `generator` and `osm3s` are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverpassResponse {
    /// Raw elements matching the query, in server order.
    #[serde(default)]
    pub elements: Vec<RawElement>,
}

/// A single raw element from the response.
///
/// Coordinates are optional: way and relation elements may lack a direct
/// `lat`/`lon` pair, and such elements are skipped by normalization rather
/// than failing the whole body.
#[derive(Debug, Clone, Deserialize)]
pub struct RawElement {
    /// Source element identifier.
    pub id: u64,
    /// Latitude in degrees, if the element carries one.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude in degrees, if the element carries one.
    #[serde(default)]
    pub lon: Option<f64>,
    /// Tag mapping; absent on untagged elements.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}
