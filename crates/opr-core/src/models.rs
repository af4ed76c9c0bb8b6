pub mod city;
pub mod dataset;
pub mod edit;
pub mod geometry;
pub mod route;
pub mod selection;
pub mod waypoint;

pub use city::{City, CityType, IslandGroup};
pub use dataset::Dataset;
pub use edit::{CityField, RouteField, WaypointField};
pub use geometry::Coordinate;
pub use route::Route;
pub use selection::Selection;
pub use waypoint::{SubLocalityType, Waypoint};
