//! Error types for OPR Route Builder

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OprError {
    // Import errors
    #[error("Invalid JSON format: {reason}")]
    InvalidFormat { reason: String },

    // Index errors
    #[error("Route {index} does not exist (dataset has {len} routes)")]
    RouteNotFound { index: usize, len: usize },

    #[error("Waypoint {index} does not exist (route has {len} waypoints)")]
    WaypointNotFound { index: usize, len: usize },

    // Selection errors
    #[error("No route selected. Select a route before editing waypoints")]
    NoRouteSelected,

    // Field edit errors
    #[error("Unknown field '{field}'. Expected one of: {expected}")]
    UnknownField { field: String, expected: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Persistence errors
    #[error("Storage error for key '{key}': {reason}")]
    Storage { key: String, reason: String },

    // Network errors (adapters convert these to empty results at the port boundary)
    #[error("{service} request failed: {reason}")]
    Network { service: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for OprError {
    fn from(err: serde_json::Error) -> Self {
        OprError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OprError>;
