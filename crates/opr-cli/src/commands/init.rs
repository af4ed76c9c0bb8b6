//! Init command implementation

use crate::cli::InitArgs;
use crate::config_loader::Workspace;
use crate::errors;
use crate::interactive::interactive_city;
use crate::output::OutputWriter;
use crate::output_types::InitOutput;
use anyhow::{Context, Result};
use opr_core::config::{
    DEFAULT_DIRECTIONS_PROFILE, DEFAULT_MAX_WAYPOINTS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SEARCH_DEBOUNCE_MS,
};
use opr_core::models::Dataset;
use opr_store::state::{ACCESS_TOKEN_KEY, SELECTED_ROUTE_KEY, SELECTED_WAYPOINT_KEY};
use opr_store::{KeyValueStore, StateStore};
use std::fs;

pub fn execute(args: InitArgs, output: &OutputWriter) -> Result<()> {
    let workspace = Workspace::at(&args.path);
    if workspace.exists() && !args.force {
        return Err(errors::workspace_exists(&args.path).into());
    }

    let mut dataset = Dataset::default();
    if args.interactive {
        dataset.city = interactive_city(&dataset.city)?;
    }

    fs::create_dir_all(workspace.opr_dir()).context("Failed to create .opr directory")?;
    fs::write(workspace.config_path(), config_template()).context("Failed to write config.toml")?;

    let store = workspace.open_store()?;
    // --force starts over; the stored token is kept
    for key in [SELECTED_ROUTE_KEY, SELECTED_WAYPOINT_KEY] {
        store.remove(key)?;
    }
    let state = StateStore::new(store);
    state.save_dataset(&dataset).context("Failed to write initial dataset")?;

    if output.is_json() {
        output.result(InitOutput {
            workspace_path: args.path.display().to_string(),
            city: dataset.city.name.clone(),
        })?;
    } else {
        output.success(format!("Initialized OPR workspace at {}", args.path.display()));
        output.section("City");
        output.kv("Name", &dataset.city.name);
        output.kv("Province", &dataset.city.province);
        output.kv("Location", dataset.city.coordinate());
        if state.inner().get(ACCESS_TOKEN_KEY)?.is_none() {
            output.info("Set a Mapbox token to enable search: opr config set-token <TOKEN>");
        }
    }

    Ok(())
}

fn config_template() -> String {
    format!(
        r#"# OPR Route Builder workspace configuration
#
# Every setting can also be given as an OPR_* environment variable
# (for example OPR_ACCESS_TOKEN), which takes precedence over this file.

# Mapbox access token. Prefer `opr config set-token`, which keeps it out
# of this file.
# access_token = "pk.…"

# Directions profile used for the route line
directions_profile = "{}"

# Quiet period before a search is sent, in milliseconds
search_debounce_ms = {}

# Waypoints allowed per route
max_waypoints = {}

# Per-request timeout for Mapbox calls, in seconds (0 disables it)
request_timeout_secs = {}
"#,
        DEFAULT_DIRECTIONS_PROFILE,
        DEFAULT_SEARCH_DEBOUNCE_MS,
        DEFAULT_MAX_WAYPOINTS,
        DEFAULT_REQUEST_TIMEOUT_SECS
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use opr_core::config::LayeredConfig;
    use tempfile::TempDir;

    #[test]
    fn test_template_parses_as_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, config_template()).unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(&path).unwrap();
        assert_eq!(config.max_waypoints.value, DEFAULT_MAX_WAYPOINTS);
        assert_eq!(config.access_token(), None);
    }
}
