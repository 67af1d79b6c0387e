//! Response normalization: raw Overpass elements to POI records.

use tracing::debug;

use crate::geo::Coordinate;
use crate::poi::{Poi, PoiCategory};

use super::element::RawElement;

/// Classifies a tag set into exactly one POI category.
///
/// Categories are tried in the fixed priority order of
/// [`PoiCategory::all`]; the first matching predicate wins, so an element
/// tagged both as a cafe and a convenience store classifies as
/// `Restaurant`. Returns `None` when no predicate matches.
pub fn classify(tags: &std::collections::BTreeMap<String, String>) -> Option<PoiCategory> {
    let amenity = tags.get("amenity").map(String::as_str);
    let shop = tags.get("shop").map(String::as_str);
    let man_made = tags.get("man_made").map(String::as_str);

    if amenity == Some("drinking_water") || man_made == Some("water_tap") {
        Some(PoiCategory::DrinkingWater)
    } else if matches!(amenity, Some("restaurant") | Some("cafe") | Some("fast_food")) {
        Some(PoiCategory::Restaurant)
    } else if amenity == Some("fuel") {
        Some(PoiCategory::Fuel)
    } else if matches!(shop, Some("supermarket") | Some("convenience") | Some("general")) {
        Some(PoiCategory::Supermarket)
    } else if matches!(amenity, Some("hospital") | Some("clinic")) {
        Some(PoiCategory::Hospital)
    } else {
        None
    }
}

/// Normalizes raw elements into POI records.
///
/// Elements missing a coordinate are skipped, as are elements that
/// classify into no category or into one outside `requested`, even though
/// the query already restricts what the server returns. Output order
/// follows input order; no sorting is performed.
pub fn normalize(elements: Vec<RawElement>, requested: &[PoiCategory]) -> Vec<Poi> {
    let mut pois = Vec::with_capacity(elements.len());

    for element in elements {
        let (lat, lon) = match (element.lat, element.lon) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                debug!(id = element.id, "skipping element without coordinates");
                continue;
            }
        };

        let category = match classify(&element.tags) {
            Some(category) if requested.contains(&category) => category,
            _ => {
                debug!(id = element.id, "skipping element with unrequested tags");
                continue;
            }
        };

        pois.push(Poi {
            id: format!("poi-{}", element.id),
            coordinate: Coordinate::new(lon, lat),
            category,
            name: element.tags.get("name").cloned(),
            tags: element.tags,
        });
    }

    pois
}
