use clap::{Parser, Subcommand};
use hrpoint_core::models::LonLat;
use hrpoint_core::Locale;
use std::path::PathBuf;

/// hrpoint - Geofenced high-risk point store
#[derive(Parser, Debug)]
#[command(name = "hrpoint")]
#[command(about = "Store high-risk zones and query them by location", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./hrpoint.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Data file holding the risk point collection
    #[arg(long, global = true, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Language of validation messages (en or pt-BR)
    #[arg(long, global = true)]
    pub locale: Option<Locale>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the risk point collection and its spatial index
    Init,

    /// Insert a batch of risk points from a JSON file
    Add(AddArgs),

    /// Delete every stored risk point
    Truncate,

    /// Find the risk zone containing a location
    Near(NearArgs),

    /// List risk points around a gravity point
    Nearby(NearbyArgs),

    /// Export stored risk points as a GeoJSON FeatureCollection
    Export(ExportArgs),

    /// Show the effective configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct AddArgs {
    /// JSON array of {title, locpoint, radius, risk} records
    pub path: PathBuf,

    /// Replace the stored points instead of appending to them
    #[arg(long)]
    pub replace: bool,
}

#[derive(Parser, Debug)]
pub struct NearArgs {
    /// Location to check, as LON,LAT
    #[arg(long, value_parser = parse_lonlat, allow_hyphen_values = true)]
    pub at: LonLat,
}

#[derive(Parser, Debug)]
pub struct NearbyArgs {
    /// Search center, as LON,LAT
    #[arg(long, value_parser = parse_lonlat, allow_hyphen_values = true)]
    pub grv: LonLat,

    /// Search radius in degrees
    #[arg(long)]
    pub delta: f64,

    /// Report each result's distance from this LON,LAT
    #[arg(long, value_parser = parse_lonlat, allow_hyphen_values = true)]
    pub loc: Option<LonLat>,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Write to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Parse "LON,LAT" into a coordinate pair
pub fn parse_lonlat(value: &str) -> Result<LonLat, String> {
    let (lon, lat) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LON,LAT but got '{}'", value))?;

    let parse = |part: &str, name: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|_| format!("invalid {} '{}'", name, part.trim()))
    };

    Ok([parse(lon, "longitude")?, parse(lat, "latitude")?])
}
