//! OPR Core - Domain models, mutators, and configuration
//!
//! This crate contains the canonical route dataset (city, routes, ordered
//! waypoints), the pure functions that edit it, the route/waypoint selection
//! state, and the JSON exchange format.

pub mod config;
pub mod error;
pub mod exchange;
pub mod models;
pub mod mutations;

pub use error::{OprError, Result};
