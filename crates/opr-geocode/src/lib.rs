//! OPR Geocode - Place search and directions ports
//!
//! This crate defines the ports for free-text place search and driving
//! directions, along with the Mapbox adapter.

pub mod mapbox;
pub mod models;
pub mod ports;

// Re-export main types
pub use mapbox::MapboxClient;
pub use models::GeocodeResult;
pub use ports::{DirectionsProvider, Geocoder};
