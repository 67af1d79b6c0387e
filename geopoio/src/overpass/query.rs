//! Overpass QL query construction.
//!
//! Translates a set of requested POI categories and a bounding box into a
//! single Overpass QL payload. Each category expands to one or more node
//! filters over amenity/shop/man_made tags; the clauses are combined in a
//! union so one round trip covers every category.
//!
//! The builder is pure and stateless: identical inputs always produce the
//! identical payload text.

use crate::geo::BoundingBox;
use crate::poi::PoiCategory;

/// Server-side timeout requested from Overpass, in seconds.
const QUERY_TIMEOUT_SECS: u32 = 25;

/// Tag predicates per category, as `(tag key, tag value)` node filters.
///
/// These are the same predicates the normalizer classifies against; the
/// two sides must stay in sync so every returned element is classifiable.
fn predicates(category: PoiCategory) -> &'static [(&'static str, &'static str)] {
    match category {
        PoiCategory::DrinkingWater => &[("amenity", "drinking_water"), ("man_made", "water_tap")],
        PoiCategory::Restaurant => &[
            ("amenity", "restaurant"),
            ("amenity", "cafe"),
            ("amenity", "fast_food"),
        ],
        PoiCategory::Fuel => &[("amenity", "fuel")],
        PoiCategory::Supermarket => &[
            ("shop", "supermarket"),
            ("shop", "convenience"),
            ("shop", "general"),
        ],
        PoiCategory::Hospital => &[("amenity", "hospital"), ("amenity", "clinic")],
    }
}

/// Builds the Overpass QL payload for the given categories and box.
///
/// The payload requests JSON output, full geometry, and a fixed
/// server-side timeout. Duplicate categories contribute their clauses
/// only once.
pub fn build_query(categories: &[PoiCategory], bbox: &BoundingBox) -> String {
    let bounds = format!("({},{},{},{})", bbox.south, bbox.west, bbox.north, bbox.east);

    let mut clauses = String::new();
    for category in PoiCategory::all() {
        if !categories.contains(category) {
            continue;
        }
        for (key, value) in predicates(*category) {
            clauses.push_str(&format!("node[\"{}\"=\"{}\"]{};\n", key, value, bounds));
        }
    }

    format!(
        "[out:json][timeout:{}];\n(\n{});\nout geom;",
        QUERY_TIMEOUT_SECS, clauses
    )
}
