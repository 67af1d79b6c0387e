//! Geometric distance and bounding-box primitives.
//!
//! Provides the pure geometry used by the retrieval pipeline: point-to-point
//! and point-to-segment distances, minimum distance to a route, and
//! bounding-box construction with the buffer-degree policy.
//!
//! All distances are planar Euclidean distances in degrees scaled by
//! [`METERS_PER_DEGREE`]. See the constant's documentation for why this
//! approximation is acceptable here.

mod types;

pub use types::{BoundingBox, Coordinate, METERS_PER_DEGREE};

/// Fixed buffer in degrees applied around multi-point routes.
///
/// A route already constrains the search area tightly, and the exact
/// distance filter runs afterwards; the box only needs to cover candidates
/// near any segment.
const ROUTE_BUFFER_DEGREES: f64 = 0.01;

/// Minimum buffer in degrees for single-point searches.
///
/// A lone point ("near me") needs a generous box to guarantee candidates
/// exist, so the buffer never shrinks below this even for small radii.
const MIN_POINT_BUFFER_DEGREES: f64 = 0.05;

/// Approximate distance between two coordinates in meters.
#[inline]
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let dx = a.lon - b.lon;
    let dy = a.lat - b.lat;
    (dx * dx + dy * dy).sqrt() * METERS_PER_DEGREE
}

/// Approximate distance from a point to a line segment in meters.
///
/// Projects `point` onto the infinite line through `seg_start`/`seg_end`,
/// clamps the projection parameter to `[0, 1]` so the closest point stays
/// on the segment, and measures the planar distance to it. A degenerate
/// segment (`seg_start == seg_end`) falls back to point-to-point distance.
#[inline]
pub fn distance_to_segment(point: Coordinate, seg_start: Coordinate, seg_end: Coordinate) -> f64 {
    let seg_dx = seg_end.lon - seg_start.lon;
    let seg_dy = seg_end.lat - seg_start.lat;
    let len_sq = seg_dx * seg_dx + seg_dy * seg_dy;

    if len_sq == 0.0 {
        return distance(point, seg_start);
    }

    let dot = (point.lon - seg_start.lon) * seg_dx + (point.lat - seg_start.lat) * seg_dy;
    let param = (dot / len_sq).clamp(0.0, 1.0);

    let closest = Coordinate::new(
        seg_start.lon + param * seg_dx,
        seg_start.lat + param * seg_dy,
    );
    distance(point, closest)
}

/// Minimum distance from a point to a route in meters.
///
/// Takes the minimum of [`distance_to_segment`] over every consecutive
/// coordinate pair. Returns `f64::INFINITY` for routes with fewer than
/// two points; callers must handle single-point routes with [`distance`]
/// directly.
pub fn min_distance_to_route(point: Coordinate, route: &[Coordinate]) -> f64 {
    route
        .windows(2)
        .map(|pair| distance_to_segment(point, pair[0], pair[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Computes the bounding box around a route, expanded by a buffer.
///
/// Returns `None` for an empty route. The buffer applied to the box is in
/// degrees and depends on the route shape:
///
/// - Single coordinate: `max(0.05, buffer_distance_m / 111000)`. A
///   "near me" search needs a usable minimum radius regardless of how
///   small the requested buffer is.
/// - Two or more coordinates: fixed at `0.01`, independent of
///   `buffer_distance_m`. The true cutoff is applied later by exact
///   distance filtering, not by the box.
pub fn bounding_box(route: &[Coordinate], buffer_distance_m: f64) -> Option<BoundingBox> {
    let first = route.first()?;

    let mut south = first.lat;
    let mut north = first.lat;
    let mut west = first.lon;
    let mut east = first.lon;
    for coord in &route[1..] {
        south = south.min(coord.lat);
        north = north.max(coord.lat);
        west = west.min(coord.lon);
        east = east.max(coord.lon);
    }

    let buffer_degrees = if route.len() == 1 {
        (buffer_distance_m / METERS_PER_DEGREE).max(MIN_POINT_BUFFER_DEGREES)
    } else {
        ROUTE_BUFFER_DEGREES
    };

    Some(BoundingBox {
        north: north + buffer_degrees,
        south: south - buffer_degrees,
        east: east + buffer_degrees,
        west: west - buffer_degrees,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE_M: f64 = 1e-6;

    #[test]
    fn test_distance_zero_for_same_point() {
        let p = Coordinate::new(13.4, 52.5);
        assert_eq!(distance(p, p), 0.0);
    }

    #[test]
    fn test_distance_one_degree_of_longitude() {
        let a = Coordinate::new(13.0, 52.0);
        let b = Coordinate::new(14.0, 52.0);
        assert!((distance(a, b) - METERS_PER_DEGREE).abs() < TOLERANCE_M);
    }

    #[test]
    fn test_degenerate_segment_equals_point_distance() {
        let p = Coordinate::new(13.5, 52.5);
        let s = Coordinate::new(13.0, 52.0);
        assert_eq!(distance_to_segment(p, s, s), distance(p, s));
    }

    #[test]
    fn test_point_on_segment_has_zero_distance() {
        let s = Coordinate::new(13.0, 52.0);
        let e = Coordinate::new(14.0, 53.0);
        // Midpoint of the segment
        let p = Coordinate::new(13.5, 52.5);
        assert!(distance_to_segment(p, s, e) < TOLERANCE_M);
    }

    #[test]
    fn test_projection_clamps_before_segment_start() {
        let s = Coordinate::new(13.0, 52.0);
        let e = Coordinate::new(14.0, 52.0);
        // Point behind the start: closest segment point is the start itself
        let p = Coordinate::new(12.0, 52.0);
        assert!((distance_to_segment(p, s, e) - distance(p, s)).abs() < TOLERANCE_M);
    }

    #[test]
    fn test_projection_clamps_after_segment_end() {
        let s = Coordinate::new(13.0, 52.0);
        let e = Coordinate::new(14.0, 52.0);
        let p = Coordinate::new(15.5, 52.0);
        assert!((distance_to_segment(p, s, e) - distance(p, e)).abs() < TOLERANCE_M);
    }

    #[test]
    fn test_perpendicular_distance_to_horizontal_segment() {
        let s = Coordinate::new(13.0, 52.0);
        let e = Coordinate::new(14.0, 52.0);
        // 0.01 degrees directly above the segment interior
        let p = Coordinate::new(13.5, 52.01);
        let expected = 0.01 * METERS_PER_DEGREE;
        assert!((distance_to_segment(p, s, e) - expected).abs() < 1e-3);
    }

    #[test]
    fn test_min_distance_decomposes_over_segments() {
        let a = Coordinate::new(13.0, 52.0);
        let b = Coordinate::new(13.5, 52.5);
        let c = Coordinate::new(14.0, 52.0);
        let p = Coordinate::new(13.8, 52.3);

        let route = [a, b, c];
        let expected = distance_to_segment(p, a, b).min(distance_to_segment(p, b, c));
        assert_eq!(min_distance_to_route(p, &route), expected);
    }

    #[test]
    fn test_min_distance_infinite_for_short_routes() {
        let p = Coordinate::new(13.0, 52.0);
        assert_eq!(min_distance_to_route(p, &[]), f64::INFINITY);
        assert_eq!(min_distance_to_route(p, &[p]), f64::INFINITY);
    }

    #[test]
    fn test_bounding_box_empty_route() {
        assert!(bounding_box(&[], 500.0).is_none());
    }

    #[test]
    fn test_bounding_box_single_point_uses_minimum_buffer() {
        // 2000m / 111000 ≈ 0.018, below the 0.05 floor
        let bbox = bounding_box(&[Coordinate::new(13.0, 52.0)], 2000.0).unwrap();
        assert!((bbox.north - 52.05).abs() < 1e-9);
        assert!((bbox.south - 51.95).abs() < 1e-9);
        assert!((bbox.east - 13.05).abs() < 1e-9);
        assert!((bbox.west - 12.95).abs() < 1e-9);
    }

    #[test]
    fn test_bounding_box_single_point_large_buffer_converts_to_degrees() {
        // 11100m / 111000 = 0.1, above the floor
        let bbox = bounding_box(&[Coordinate::new(13.0, 52.0)], 11_100.0).unwrap();
        assert!((bbox.north - 52.1).abs() < 1e-9);
        assert!((bbox.west - 12.9).abs() < 1e-9);
    }

    #[test]
    fn test_bounding_box_route_uses_fixed_buffer() {
        let route = [
            Coordinate::new(13.0, 52.0),
            Coordinate::new(13.5, 52.3),
            Coordinate::new(14.0, 52.1),
        ];
        // Any buffer distance: the box buffer is fixed at 0.01 degrees
        for buffer_m in [1.0, 500.0, 100_000.0] {
            let bbox = bounding_box(&route, buffer_m).unwrap();
            assert!((bbox.north - 52.31).abs() < 1e-9);
            assert!((bbox.south - 51.99).abs() < 1e-9);
            assert!((bbox.east - 14.01).abs() < 1e-9);
            assert!((bbox.west - 12.99).abs() < 1e-9);
        }
    }

    #[test]
    fn test_bounding_box_covers_all_route_points() {
        let route = [
            Coordinate::new(13.7, 52.4),
            Coordinate::new(13.1, 52.9),
            Coordinate::new(13.9, 52.2),
        ];
        let bbox = bounding_box(&route, 500.0).unwrap();
        for coord in &route {
            assert!(bbox.contains(coord));
        }
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn coord_strategy() -> impl Strategy<Value = Coordinate> {
            (-180.0..180.0_f64, -85.0..85.0_f64).prop_map(|(lon, lat)| Coordinate::new(lon, lat))
        }

        proptest! {
            #[test]
            fn test_distance_symmetric(a in coord_strategy(), b in coord_strategy()) {
                prop_assert!((distance(a, b) - distance(b, a)).abs() < 1e-9);
            }

            #[test]
            fn test_distance_non_negative(a in coord_strategy(), b in coord_strategy()) {
                prop_assert!(distance(a, b) >= 0.0);
            }

            #[test]
            fn test_segment_distance_bounded_by_endpoints(
                p in coord_strategy(),
                s in coord_strategy(),
                e in coord_strategy()
            ) {
                // The clamped projection can never be farther than the
                // nearer endpoint
                let seg = distance_to_segment(p, s, e);
                let nearest_endpoint = distance(p, s).min(distance(p, e));
                prop_assert!(seg <= nearest_endpoint + 1e-9);
            }

            #[test]
            fn test_segment_endpoints_have_zero_distance(
                s in coord_strategy(),
                e in coord_strategy()
            ) {
                prop_assert!(distance_to_segment(s, s, e) < 1e-9);
                prop_assert!(distance_to_segment(e, s, e) < 1e-9);
            }

            #[test]
            fn test_route_minimum_bounded_by_each_segment(
                p in coord_strategy(),
                route in proptest::collection::vec(coord_strategy(), 2..8)
            ) {
                let min = min_distance_to_route(p, &route);
                for pair in route.windows(2) {
                    prop_assert!(min <= distance_to_segment(p, pair[0], pair[1]) + 1e-9);
                }
            }

            #[test]
            fn test_bounding_box_contains_route(
                route in proptest::collection::vec(coord_strategy(), 1..8),
                buffer in 0.0..10_000.0_f64
            ) {
                let bbox = bounding_box(&route, buffer).unwrap();
                for coord in &route {
                    prop_assert!(bbox.contains(coord));
                }
            }

            #[test]
            fn test_bounding_box_single_point_floor(
                point in coord_strategy(),
                buffer in 0.0..5_500.0_f64
            ) {
                // Below 5550m the degree conversion stays under the 0.05 floor
                let bbox = bounding_box(&[point], buffer).unwrap();
                prop_assert!((bbox.north - point.lat - 0.05).abs() < 1e-9);
            }
        }
    }
}
