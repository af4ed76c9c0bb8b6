//! Pure dataset mutators.
//!
//! Every function takes the current snapshot by reference and returns a new
//! one; the input is never modified. Index arguments must name an existing
//! element; an out-of-range index returns an error and produces no snapshot.
//!
//! Waypoint `sequence` values are kept equal to `1..=N` in list order by
//! renumbering after every insertion and deletion. Field edits never
//! renumber, including a direct edit of `sequence`.

use crate::error::{OprError, Result};
use crate::models::{CityField, Coordinate, Dataset, Route, RouteField, Waypoint, WaypointField};

/// Append a route suggested for the next position.
///
/// Returns the new snapshot and the index of the new route, which callers
/// select.
pub fn add_route(dataset: &Dataset) -> (Dataset, usize) {
    let index = dataset.routes.len();
    let mut next = dataset.clone();
    next.routes.push(Route::suggested(index + 1));
    tracing::debug!(index, "added route");
    (next, index)
}

/// Remove the route at `index`. Later routes shift down by one position.
pub fn delete_route(dataset: &Dataset, index: usize) -> Result<Dataset> {
    check_route(dataset, index)?;
    let mut next = dataset.clone();
    next.routes.remove(index);
    tracing::debug!(index, "deleted route");
    Ok(next)
}

/// Replace one field of the route at `index`
pub fn update_route_field(dataset: &Dataset, index: usize, field: RouteField) -> Result<Dataset> {
    check_route(dataset, index)?;
    let mut next = dataset.clone();
    field.apply(&mut next.routes[index]);
    Ok(next)
}

/// Replace the whole waypoint list of the route at `index`
pub fn replace_waypoints(
    dataset: &Dataset,
    index: usize,
    waypoints: Vec<Waypoint>,
) -> Result<Dataset> {
    check_route(dataset, index)?;
    let mut next = dataset.clone();
    next.routes[index].waypoints = waypoints;
    Ok(next)
}

/// Replace one field of the city
pub fn update_city_field(dataset: &Dataset, field: CityField) -> Dataset {
    let mut next = dataset.clone();
    field.apply(&mut next.city);
    next
}

/// Set the city position, as a marker drag does
pub fn move_city(dataset: &Dataset, to: Coordinate) -> Dataset {
    let mut next = dataset.clone();
    next.city.latitude = to.latitude;
    next.city.longitude = to.longitude;
    next
}

/// Append a waypoint with form defaults at `center`.
///
/// There is no ceiling here; the waypoint cap is enforced by the caller.
pub fn add_waypoint(waypoints: &[Waypoint], center: Coordinate) -> Vec<Waypoint> {
    let mut next = waypoints.to_vec();
    next.push(Waypoint::new(0, center));
    renumber(&mut next);
    next
}

/// Remove the waypoint at `index` and renumber the rest
pub fn delete_waypoint(waypoints: &[Waypoint], index: usize) -> Result<Vec<Waypoint>> {
    check_waypoint(waypoints, index)?;
    let mut next = waypoints.to_vec();
    next.remove(index);
    renumber(&mut next);
    Ok(next)
}

/// Replace one field of the waypoint at `index`
pub fn update_waypoint_field(
    waypoints: &[Waypoint],
    index: usize,
    field: WaypointField,
) -> Result<Vec<Waypoint>> {
    check_waypoint(waypoints, index)?;
    let mut next = waypoints.to_vec();
    field.apply(&mut next[index]);
    Ok(next)
}

/// Set only the position of the waypoint at `index`
pub fn move_waypoint(waypoints: &[Waypoint], index: usize, to: Coordinate) -> Result<Vec<Waypoint>> {
    check_waypoint(waypoints, index)?;
    let mut next = waypoints.to_vec();
    next[index].latitude = to.latitude;
    next[index].longitude = to.longitude;
    Ok(next)
}

/// Set every waypoint's sequence to its 1-based list position
pub fn renumber(waypoints: &mut [Waypoint]) {
    for (position, waypoint) in waypoints.iter_mut().enumerate() {
        waypoint.sequence = position as u32 + 1;
    }
}

/// Whether sequences equal `1..=N` in list order
pub fn is_densely_numbered(waypoints: &[Waypoint]) -> bool {
    waypoints.iter().enumerate().all(|(i, wp)| wp.sequence as usize == i + 1)
}

fn check_route(dataset: &Dataset, index: usize) -> Result<()> {
    if index < dataset.routes.len() {
        Ok(())
    } else {
        Err(OprError::RouteNotFound { index, len: dataset.routes.len() })
    }
}

fn check_waypoint(waypoints: &[Waypoint], index: usize) -> Result<()> {
    if index < waypoints.len() {
        Ok(())
    } else {
        Err(OprError::WaypointNotFound { index, len: waypoints.len() })
    }
}
