//! GPX route extraction.
//!
//! Pulls the ordered track points out of a GPX file. Only `<trkpt>`
//! latitude/longitude attributes are read; elevation, timestamps and
//! waypoints are ignored since the retrieval pipeline needs nothing but
//! the route geometry.

use std::path::Path;

use regex::Regex;

use geopoio::Coordinate;

use crate::error::CliError;

/// Reads the route coordinates from a GPX file, in track order.
pub fn route_from_file(path: &Path) -> Result<Vec<Coordinate>, CliError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::Gpx(format!("{}: {}", path.display(), e)))?;
    let route = route_from_str(&content)?;
    if route.is_empty() {
        return Err(CliError::Gpx(format!(
            "{}: no track points found",
            path.display()
        )));
    }
    Ok(route)
}

/// Extracts `<trkpt>` coordinates from GPX text.
///
/// Attribute order within the tag is not guaranteed by GPX writers, so
/// lat and lon are matched independently.
fn route_from_str(content: &str) -> Result<Vec<Coordinate>, CliError> {
    // Attribute syntax is regular even though XML as a whole is not
    let trkpt = Regex::new(r"<trkpt\b([^>]*)>").expect("trkpt pattern is valid");
    let lat_attr = Regex::new(r#"lat="([^"]+)""#).expect("lat pattern is valid");
    let lon_attr = Regex::new(r#"lon="([^"]+)""#).expect("lon pattern is valid");

    let mut route = Vec::new();
    for tag in trkpt.captures_iter(content) {
        let attrs = &tag[1];
        let lat = lat_attr
            .captures(attrs)
            .ok_or_else(|| CliError::Gpx("track point without lat attribute".to_string()))?;
        let lon = lon_attr
            .captures(attrs)
            .ok_or_else(|| CliError::Gpx("track point without lon attribute".to_string()))?;

        let lat: f64 = lat[1]
            .parse()
            .map_err(|_| CliError::Gpx(format!("invalid latitude: {}", &lat[1])))?;
        let lon: f64 = lon[1]
            .parse()
            .map_err(|_| CliError::Gpx(format!("invalid longitude: {}", &lon[1])))?;

        route.push(Coordinate::new(lon, lat));
    }

    Ok(route)
}
