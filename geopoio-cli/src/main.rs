//! GeoPOIO CLI - Command-line interface
//!
//! Fetches points of interest near a route or a single location from the
//! command line, using the geopoio retrieval pipeline.

mod commands;
mod error;
mod gpx;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "geopoio", version, about = "Find points of interest along a route")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch POIs near a route or location
    Fetch(commands::fetch::FetchArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Fetch(args) => commands::fetch::run(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
