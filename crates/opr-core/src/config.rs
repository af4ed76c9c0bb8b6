use crate::error::{OprError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_GEOCODING_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";
pub const DEFAULT_DIRECTIONS_URL: &str = "https://api.mapbox.com/directions/v5/mapbox";
pub const DEFAULT_DIRECTIONS_PROFILE: &str = "driving";
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_MAX_WAYPOINTS: usize = 50;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from the workspace (config file or stored credential)
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for the route editor
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub access_token: ConfigValue<Option<String>>,
    pub geocoding_url: ConfigValue<String>,
    pub directions_url: ConfigValue<String>,
    pub directions_profile: ConfigValue<String>,
    pub search_debounce_ms: ConfigValue<u64>,
    pub max_waypoints: ConfigValue<usize>,
    /// 0 disables the timeout
    pub request_timeout_secs: ConfigValue<u64>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            access_token: ConfigValue::new(None, ConfigSource::Default),
            geocoding_url: ConfigValue::new(DEFAULT_GEOCODING_URL.to_string(), ConfigSource::Default),
            directions_url: ConfigValue::new(
                DEFAULT_DIRECTIONS_URL.to_string(),
                ConfigSource::Default,
            ),
            directions_profile: ConfigValue::new(
                DEFAULT_DIRECTIONS_PROFILE.to_string(),
                ConfigSource::Default,
            ),
            search_debounce_ms: ConfigValue::new(DEFAULT_SEARCH_DEBOUNCE_MS, ConfigSource::Default),
            max_waypoints: ConfigValue::new(DEFAULT_MAX_WAYPOINTS, ConfigSource::Default),
            request_timeout_secs: ConfigValue::new(
                DEFAULT_REQUEST_TIMEOUT_SECS,
                ConfigSource::Default,
            ),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| OprError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| OprError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(token) = file_config.access_token {
            self.access_token.update(non_empty(token), ConfigSource::File);
        }

        if let Some(url) = file_config.geocoding_url {
            self.geocoding_url.update(url, ConfigSource::File);
        }

        if let Some(url) = file_config.directions_url {
            self.directions_url.update(url, ConfigSource::File);
        }

        if let Some(profile) = file_config.directions_profile {
            self.directions_profile.update(profile, ConfigSource::File);
        }

        if let Some(ms) = file_config.search_debounce_ms {
            self.search_debounce_ms.update(ms, ConfigSource::File);
        }

        if let Some(max) = file_config.max_waypoints {
            if max == 0 {
                return Err(OprError::ConfigInvalid {
                    key: "max_waypoints".to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
            self.max_waypoints.update(max, ConfigSource::File);
        }

        if let Some(secs) = file_config.request_timeout_secs {
            self.request_timeout_secs.update(secs, ConfigSource::File);
        }

        Ok(self)
    }

    /// Apply the credential persisted alongside the dataset
    pub fn with_stored_token(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.and_then(non_empty) {
            self.access_token.update(Some(token), ConfigSource::File);
        }
        self
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // OPR_ACCESS_TOKEN
        if let Ok(token) = env::var("OPR_ACCESS_TOKEN") {
            if let Some(token) = non_empty(token) {
                self.access_token.update(Some(token), ConfigSource::Environment);
            }
        }

        // OPR_GEOCODING_URL
        if let Ok(url) = env::var("OPR_GEOCODING_URL") {
            self.geocoding_url.update(url, ConfigSource::Environment);
        }

        // OPR_DIRECTIONS_URL
        if let Ok(url) = env::var("OPR_DIRECTIONS_URL") {
            self.directions_url.update(url, ConfigSource::Environment);
        }

        // OPR_DIRECTIONS_PROFILE
        if let Ok(profile) = env::var("OPR_DIRECTIONS_PROFILE") {
            self.directions_profile.update(profile, ConfigSource::Environment);
        }

        // OPR_SEARCH_DEBOUNCE_MS
        if let Ok(ms_str) = env::var("OPR_SEARCH_DEBOUNCE_MS") {
            match ms_str.parse::<u64>() {
                Ok(ms) => self.search_debounce_ms.update(ms, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid OPR_SEARCH_DEBOUNCE_MS value '{}': expected milliseconds",
                    ms_str
                ),
            }
        }

        // OPR_MAX_WAYPOINTS
        if let Ok(max_str) = env::var("OPR_MAX_WAYPOINTS") {
            match parse_max_waypoints(&max_str) {
                Ok(max) => self.max_waypoints.update(max, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid OPR_MAX_WAYPOINTS value '{}': expected a positive integer",
                    max_str
                ),
            }
        }

        // OPR_REQUEST_TIMEOUT_SECS
        if let Ok(secs_str) = env::var("OPR_REQUEST_TIMEOUT_SECS") {
            match secs_str.parse::<u64>() {
                Ok(secs) => self.request_timeout_secs.update(secs, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid OPR_REQUEST_TIMEOUT_SECS value '{}': expected seconds",
                    secs_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(token) = overrides.access_token.and_then(non_empty) {
            self.access_token.update(Some(token), ConfigSource::Cli);
        }

        if let Some(max) = overrides.max_waypoints {
            self.max_waypoints.update(max, ConfigSource::Cli);
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.value.as_deref()
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms.value)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_secs.value {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Get all configuration values as a map for inspection.
    ///
    /// The access token is masked.
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "access_token".to_string(),
            (
                self.access_token().map(mask_token).unwrap_or_else(|| "(not set)".to_string()),
                self.access_token.source,
            ),
        );

        map.insert(
            "geocoding_url".to_string(),
            (self.geocoding_url.value.clone(), self.geocoding_url.source),
        );

        map.insert(
            "directions_url".to_string(),
            (self.directions_url.value.clone(), self.directions_url.source),
        );

        map.insert(
            "directions_profile".to_string(),
            (self.directions_profile.value.clone(), self.directions_profile.source),
        );

        map.insert(
            "search_debounce_ms".to_string(),
            (self.search_debounce_ms.value.to_string(), self.search_debounce_ms.source),
        );

        map.insert(
            "max_waypoints".to_string(),
            (self.max_waypoints.value.to_string(), self.max_waypoints.source),
        );

        map.insert(
            "request_timeout_secs".to_string(),
            (self.request_timeout_secs.value.to_string(), self.request_timeout_secs.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FileConfig {
    pub access_token: Option<String>,
    pub geocoding_url: Option<String>,
    pub directions_url: Option<String>,
    pub directions_profile: Option<String>,
    pub search_debounce_ms: Option<u64>,
    pub max_waypoints: Option<usize>,
    pub request_timeout_secs: Option<u64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub access_token: Option<String>,
    pub max_waypoints: Option<usize>,
}

/// Parse the waypoint cap from string
pub fn parse_max_waypoints(s: &str) -> Result<usize> {
    match s.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(OprError::ConfigInvalid {
            key: "max_waypoints".to_string(),
            reason: format!("Invalid waypoint limit: {}. Use a positive integer", s),
        }),
    }
}

/// Show only the first and last four characters of a credential
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
