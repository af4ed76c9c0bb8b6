use serde::{Deserialize, Serialize};

use super::{Coordinate, Waypoint};

/// A transit route: a user-assigned code, a name and its ordered waypoints.
///
/// Routes have no surrogate id. A route is identified by its position in
/// [`Dataset::routes`](super::Dataset) for the length of an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub route_code: String,
    pub name: String,
    pub waypoints: Vec<Waypoint>,
}

impl Route {
    /// Create an empty route suggested for the given 1-based position
    pub fn suggested(position: usize) -> Self {
        Self {
            route_code: format!("{:02}", position),
            name: format!("Route {}", position),
            waypoints: Vec::new(),
        }
    }

    /// Waypoint coordinates in display order
    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.waypoints.iter().map(Waypoint::coordinate).collect()
    }

    /// Straight-line length through all waypoints, in meters
    pub fn length_meters(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|pair| pair[0].coordinate().distance_to(pair[1].coordinate()))
            .sum()
    }
}
