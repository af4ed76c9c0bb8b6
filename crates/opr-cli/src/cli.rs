use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// OPR Route Builder - edit public-transport routes for a city
#[derive(Parser, Debug)]
#[command(name = "opr")]
#[command(about = "Build OPR route datasets for a city", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Workspace directory (defaults to the nearest directory containing .opr)
    #[arg(long, global = true, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Mapbox access token for this invocation
    #[arg(long, global = true, value_name = "TOKEN")]
    pub access_token: Option<String>,

    /// Waypoint limit per route for this invocation
    #[arg(long, global = true, value_name = "N", value_parser = parse_max_waypoints)]
    pub max_waypoints: Option<usize>,

    /// Show debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new workspace with the default dataset
    Init(InitArgs),

    /// Show workspace status
    Status,

    /// Show or edit the city
    #[command(subcommand)]
    City(CityCommand),

    /// List, add and edit routes
    #[command(subcommand)]
    Route(RouteCommand),

    /// List, add and edit waypoints of the selected route
    #[command(subcommand)]
    Waypoint(WaypointCommand),

    /// Import a dataset document, geocoding waypoints without coordinates
    Import(ImportArgs),

    /// Export the dataset as JSON
    Export(ExportArgs),

    /// Search for a street or landmark
    Search(SearchArgs),

    /// Export the map scene of the selected route as GeoJSON
    Map(MapArgs),

    /// Inspect configuration and manage the access token
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Workspace directory path (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Force overwrite if workspace already exists
    #[arg(long)]
    pub force: bool,

    /// Interactive mode - prompt for the city
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(Subcommand, Debug)]
pub enum CityCommand {
    /// Show all city fields
    Show,

    /// Set one city field (island_group, region, region_code, province,
    /// province_code, city, city_type, postal_code, latitude, longitude)
    Set { field: String, value: String },

    /// Move the city to a coordinate
    Move {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lng: f64,
    },

    /// Drop the city marker at a coordinate, as when picking it on the map
    Pick {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lng: f64,
    },
}

#[derive(Subcommand, Debug)]
pub enum RouteCommand {
    /// List routes
    List,

    /// Add a route and select it
    Add,

    /// Delete route N (1-based)
    Delete { number: usize },

    /// Set a field (route_code, name) of route N
    Set { number: usize, field: String, value: String },

    /// Select route N
    Select { number: usize },

    /// Clear the route selection
    Deselect,
}

#[derive(Subcommand, Debug)]
pub enum WaypointCommand {
    /// List waypoints of the selected route
    List,

    /// Add a waypoint at the map centre (or the given coordinate) and select it
    Add {
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
    },

    /// Delete waypoint N (1-based)
    Delete { number: usize },

    /// Set a field (sequence, sub_locality, sub_locality_type, street,
    /// destination, latitude, longitude) of waypoint N
    Set { number: usize, field: String, value: String },

    /// Move waypoint N, as when dragging its marker
    Move {
        number: usize,
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lng: f64,
    },

    /// Select waypoint N
    Select { number: usize },

    /// Clear the waypoint selection
    Deselect,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Document to import, or '-' for stdin
    pub file: PathBuf,

    /// Parse and geocode but do not replace the dataset
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Write to this file instead of stdout
    #[arg(long, short = 'o', conflicts_with = "download")]
    pub output: Option<PathBuf>,

    /// Write to opr-<city>-<timestamp>.json in the current directory
    #[arg(long)]
    pub download: bool,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Street or landmark
    pub query: String,

    /// Centre the map on result N (1-based)
    #[arg(long, value_name = "N")]
    pub choose: Option<usize>,
}

#[derive(Args, Debug)]
pub struct MapArgs {
    /// Write to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show every setting and where it came from
    Show,

    /// Store the Mapbox access token in the workspace
    SetToken { token: String },

    /// Remove the stored access token
    ClearToken,
}

fn parse_max_waypoints(s: &str) -> Result<usize, String> {
    opr_core::config::parse_max_waypoints(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_coordinates() {
        let cli = Cli::try_parse_from(["opr", "waypoint", "move", "2", "-10.5", "-122.25"]).unwrap();
        match cli.command {
            Commands::Waypoint(WaypointCommand::Move { number, lat, lng }) => {
                assert_eq!(number, 2);
                assert_eq!(lat, -10.5);
                assert_eq!(lng, -122.25);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_max_waypoints_must_be_positive() {
        assert!(Cli::try_parse_from(["opr", "--max-waypoints", "0", "status"]).is_err());
        let cli = Cli::try_parse_from(["opr", "--max-waypoints", "12", "status"]).unwrap();
        assert_eq!(cli.max_waypoints, Some(12));
    }

    #[test]
    fn test_export_flags_conflict() {
        assert!(Cli::try_parse_from(["opr", "export", "--download", "-o", "x.json"]).is_err());
    }
}
