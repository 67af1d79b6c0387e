//! Geographic primitive types.

use serde::{Deserialize, Serialize};

/// Approximate meters per degree of latitude/longitude.
///
/// Used to scale planar degree distances to meters. This is a deliberate
/// short-range approximation: over the distances this library filters at
/// (up to tens of kilometers) the error is acceptable, and it avoids the
/// cost of a full geodesic formula. It is not accurate near the poles.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// A geographic coordinate in degrees.
///
/// Longitude comes first, matching the `[lon, lat]` ordering used by GPX
/// and GeoJSON tooling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Longitude in degrees (-180.0 to 180.0).
    pub lon: f64,
    /// Latitude in degrees (-90.0 to 90.0).
    pub lat: f64,
}

impl Coordinate {
    /// Creates a coordinate from longitude and latitude in degrees.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<(f64, f64)> for Coordinate {
    /// Converts from a `(lon, lat)` pair.
    fn from((lon, lat): (f64, f64)) -> Self {
        Self { lon, lat }
    }
}

/// A rectangular latitude/longitude region.
///
/// Derived from a route plus a buffer by [`crate::geo::bounding_box`];
/// used only to scope the external query before exact distance filtering.
/// Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Northern edge latitude in degrees.
    pub north: f64,
    /// Southern edge latitude in degrees.
    pub south: f64,
    /// Eastern edge longitude in degrees.
    pub east: f64,
    /// Western edge longitude in degrees.
    pub west: f64,
}

impl BoundingBox {
    /// Returns true if the coordinate lies within the box (inclusive edges).
    pub fn contains(&self, coord: &Coordinate) -> bool {
        coord.lat >= self.south
            && coord.lat <= self.north
            && coord.lon >= self.west
            && coord.lon <= self.east
    }
}
