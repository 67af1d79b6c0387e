//! The `fetch` command: retrieve POIs near a route or location.

use std::path::PathBuf;

use clap::Args;
use tracing::debug;

use geopoio::{Coordinate, PoiCategory, RetrievalConfig, RetrievalCoordinator, RetrievalOutcome};

use crate::error::CliError;
use crate::gpx;

/// Arguments for the fetch command.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Route point as lon,lat (repeat for a multi-point route)
    #[arg(long = "point", value_name = "LON,LAT")]
    pub points: Vec<String>,

    /// GPX file to read the route from (alternative to --point)
    #[arg(long, value_name = "FILE", conflicts_with = "points")]
    pub gpx: Option<PathBuf>,

    /// Maximum distance from the route in meters
    #[arg(long, default_value_t = 500.0)]
    pub buffer: f64,

    /// Categories to fetch (drinking_water, restaurant, fuel, supermarket,
    /// hospital); all when omitted
    #[arg(long = "category", value_name = "NAME")]
    pub categories: Vec<String>,

    /// Overpass API endpoint
    #[arg(long)]
    pub endpoint: Option<String>,
}

/// Runs the fetch command.
pub async fn run(args: FetchArgs) -> Result<(), CliError> {
    let route = resolve_route(&args)?;
    let categories = resolve_categories(&args.categories)?;
    debug!(points = route.len(), categories = categories.len(), "route resolved");

    let mut config = RetrievalConfig::default();
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }

    let coordinator = RetrievalCoordinator::try_new(config)
        .map_err(|e| CliError::Retrieval(e.to_string()))?;

    let outcome = coordinator
        .fetch_pois_along_route(&route, args.buffer, &categories)
        .await;

    match outcome {
        RetrievalOutcome::Complete(pois) => {
            if pois.is_empty() {
                println!("No POIs found within {}m of the route.", args.buffer);
            } else {
                println!("{} POIs within {}m:", pois.len(), args.buffer);
                for poi in &pois {
                    println!(
                        "  {:<16} {:>10.6},{:>10.6}  {}  ({})",
                        poi.category,
                        poi.coordinate.lon,
                        poi.coordinate.lat,
                        poi.name.as_deref().unwrap_or("-"),
                        poi.id
                    );
                }
            }
            Ok(())
        }
        RetrievalOutcome::Cancelled => {
            // Cannot happen in single-shot CLI use, but report it anyway
            Err(CliError::Retrieval("request was cancelled".to_string()))
        }
        RetrievalOutcome::Failed(e) => Err(CliError::Retrieval(e.to_string())),
    }
}

/// Builds the route from --point arguments or a GPX file.
fn resolve_route(args: &FetchArgs) -> Result<Vec<Coordinate>, CliError> {
    if let Some(path) = &args.gpx {
        return gpx::route_from_file(path);
    }
    if args.points.is_empty() {
        return Err(CliError::Input(
            "provide at least one --point or a --gpx file".to_string(),
        ));
    }
    args.points.iter().map(|p| parse_point(p)).collect()
}

/// Parses a `lon,lat` pair.
fn parse_point(s: &str) -> Result<Coordinate, CliError> {
    let (lon, lat) = s
        .split_once(',')
        .ok_or_else(|| CliError::Input(format!("expected lon,lat, got '{}'", s)))?;

    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| CliError::Input(format!("invalid longitude: {}", lon)))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| CliError::Input(format!("invalid latitude: {}", lat)))?;

    Ok(Coordinate::new(lon, lat))
}

/// Parses category names, defaulting to all categories.
fn resolve_categories(names: &[String]) -> Result<Vec<PoiCategory>, CliError> {
    if names.is_empty() {
        return Ok(PoiCategory::all().to_vec());
    }
    names
        .iter()
        .map(|name| {
            PoiCategory::parse(name)
                .ok_or_else(|| CliError::Input(format!("unknown category: {}", name)))
        })
        .collect()
}
