use opr_core::models::{Route, Waypoint};
use serde::Serialize;
use tabled::Tabled;

/// Output for init command
#[derive(Debug, Serialize)]
pub struct InitOutput {
    pub workspace_path: String,
    pub city: String,
}

/// Output for status command
#[derive(Debug, Serialize)]
pub struct StatusOutput {
    pub workspace_path: String,
    pub city: String,
    pub island_group: String,
    pub routes: usize,
    pub waypoints: usize,
    /// 1-based
    pub selected_route: Option<usize>,
    /// 1-based
    pub selected_waypoint: Option<usize>,
    pub access_token: bool,
}

/// One line of `opr route list`
#[derive(Debug, Serialize, Tabled)]
pub struct RouteRow {
    #[tabled(rename = "#")]
    pub number: usize,
    #[tabled(rename = "Code")]
    pub route_code: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Waypoints")]
    pub waypoints: usize,
    #[tabled(rename = "Length (km)")]
    pub length_km: String,
    #[tabled(rename = "Selected")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub selected: String,
}

impl RouteRow {
    pub fn new(index: usize, route: &Route, selected: bool) -> Self {
        Self {
            number: index + 1,
            route_code: route.route_code.clone(),
            name: route.name.clone(),
            waypoints: route.waypoints.len(),
            length_km: format!("{:.2}", route.length_meters() / 1000.0),
            selected: if selected { "●".to_string() } else { String::new() },
        }
    }
}

/// One line of `opr waypoint list`
#[derive(Debug, Serialize, Tabled)]
pub struct WaypointRow {
    #[tabled(rename = "#")]
    pub number: usize,
    #[tabled(rename = "Seq")]
    pub sequence: u32,
    #[tabled(rename = "Sub-locality")]
    pub sub_locality: String,
    #[tabled(rename = "Type")]
    pub sub_locality_type: String,
    #[tabled(rename = "Street")]
    pub street: String,
    #[tabled(rename = "Destination")]
    pub destination: String,
    #[tabled(rename = "Latitude")]
    pub latitude: f64,
    #[tabled(rename = "Longitude")]
    pub longitude: f64,
    #[tabled(rename = "Selected")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub selected: String,
}

impl WaypointRow {
    pub fn new(index: usize, waypoint: &Waypoint, selected: bool) -> Self {
        Self {
            number: index + 1,
            sequence: waypoint.sequence,
            sub_locality: waypoint.sub_locality.clone(),
            sub_locality_type: waypoint.sub_locality_type.as_str().to_string(),
            street: waypoint.street.clone(),
            destination: waypoint.destination.clone(),
            latitude: waypoint.latitude,
            longitude: waypoint.longitude,
            selected: if selected { "●".to_string() } else { String::new() },
        }
    }
}

/// One line of `opr search`
#[derive(Debug, Serialize, Tabled)]
pub struct SearchRow {
    #[tabled(rename = "#")]
    pub number: usize,
    #[tabled(rename = "Place")]
    pub short_label: String,
    #[tabled(rename = "Full name")]
    pub display_name: String,
    #[tabled(rename = "Latitude")]
    pub latitude: f64,
    #[tabled(rename = "Longitude")]
    pub longitude: f64,
}

/// One line of `opr config show`
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

/// Output for import command
#[derive(Debug, Serialize)]
pub struct ImportOutput {
    pub message: String,
    pub routes: usize,
    pub waypoints: usize,
    pub lookups: usize,
    pub enriched: usize,
    pub dry_run: bool,
}

/// Output for export command when writing a file
#[derive(Debug, Serialize)]
pub struct ExportOutput {
    pub path: String,
    pub bytes: usize,
}

/// Output for `opr search --choose`
#[derive(Debug, Serialize)]
pub struct CameraOutput {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
}
