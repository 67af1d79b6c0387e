//! Point-of-interest data model.
//!
//! Defines the POI categories the pipeline knows about and the immutable
//! [`Poi`] record produced by response normalization. The category set is
//! closed: the query builder and normalizer share its tag predicates, so a
//! POI can only ever carry a category the pipeline asked for.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// A point-of-interest category.
///
/// The variant order is significant: it is the classification priority
/// used by the response normalizer (first matching predicate wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiCategory {
    /// Drinking water points and public water taps.
    DrinkingWater,
    /// Restaurants, cafes and fast food.
    Restaurant,
    /// Fuel stations.
    Fuel,
    /// Supermarkets, convenience and general stores.
    Supermarket,
    /// Hospitals and clinics.
    Hospital,
}

impl PoiCategory {
    /// All known categories, in classification priority order.
    pub fn all() -> &'static [PoiCategory] {
        &[
            PoiCategory::DrinkingWater,
            PoiCategory::Restaurant,
            PoiCategory::Fuel,
            PoiCategory::Supermarket,
            PoiCategory::Hospital,
        ]
    }

    /// Stable lowercase name, matching the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            PoiCategory::DrinkingWater => "drinking_water",
            PoiCategory::Restaurant => "restaurant",
            PoiCategory::Fuel => "fuel",
            PoiCategory::Supermarket => "supermarket",
            PoiCategory::Hospital => "hospital",
        }
    }

    /// Parses a category from its stable name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "drinking_water" | "water" => Some(PoiCategory::DrinkingWater),
            "restaurant" | "food" => Some(PoiCategory::Restaurant),
            "fuel" => Some(PoiCategory::Fuel),
            "supermarket" | "shop" => Some(PoiCategory::Supermarket),
            "hospital" | "medical" => Some(PoiCategory::Hospital),
            _ => None,
        }
    }
}

impl std::fmt::Display for PoiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified point of interest.
///
/// Immutable once constructed. Identity is the id assigned from the source
/// element's identifier, namespaced with a `poi-` prefix; ids are unique
/// within a single retrieval result set because the source assigns unique
/// element ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    /// Namespaced identifier, e.g. `poi-240109189`.
    pub id: String,
    /// Location of the POI.
    pub coordinate: Coordinate,
    /// The single category this POI was classified into.
    pub category: PoiCategory,
    /// Display name from the source tags, if present.
    pub name: Option<String>,
    /// Raw tag set from the source element.
    pub tags: BTreeMap<String, String>,
}
