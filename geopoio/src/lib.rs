//! GeoPOIO - Point-of-interest retrieval along routes
//!
//! This library implements the core retrieval pipeline for finding points
//! of interest (drinking water, restaurants, fuel, supermarkets, hospitals)
//! near a GPS route or a single location. It queries the Overpass API for
//! candidate elements inside a bounding box, filters them by true geometric
//! distance to the route, and caches results with a TTL to avoid redundant
//! network calls.
//!
//! # Pipeline
//!
//! ```text
//! route ──► cache lookup ──hit──► cached POIs
//!              │miss
//!              ▼
//!        bounding box ──► Overpass query ──► normalize ──► distance filter
//!                                                              │
//!                                            cache fill ◄──────┘
//! ```
//!
//! The entry point is [`retrieval::RetrievalCoordinator`]. Overlapping
//! calls on one coordinator are resolved by cancellation-based
//! single-flight: a newer call always supersedes an older in-flight one.

pub mod cache;
pub mod config;
pub mod geo;
pub mod overpass;
pub mod poi;
pub mod retrieval;

pub use config::RetrievalConfig;
pub use geo::{BoundingBox, Coordinate};
pub use poi::{Poi, PoiCategory};
pub use retrieval::{RetrievalCoordinator, RetrievalError, RetrievalOutcome};
