//! Workspace discovery and configuration loading

use anyhow::{Context, Result};
use opr_core::config::{CliConfigOverrides, LayeredConfig};
use opr_store::{FileKeyValueStore, StateStore};
use std::path::{Path, PathBuf};

use crate::errors;

/// Name of the directory that marks a workspace root
pub const WORKSPACE_DIR: &str = ".opr";

/// A directory holding `.opr/config.toml` and `.opr/state/`
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Workspace rooted at `root`, whether or not it exists yet
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Use `explicit` if given, otherwise search upwards from the current
    /// directory
    pub fn locate(explicit: Option<&Path>) -> Result<Self> {
        let root = match explicit {
            Some(dir) => {
                let workspace = Self::at(dir);
                if !workspace.exists() {
                    return Err(errors::workspace_not_found(dir).into());
                }
                return Ok(workspace);
            }
            None => std::env::current_dir()?,
        };

        find_workspace_root(&root)
            .map(Self::at)
            .ok_or_else(|| errors::workspace_not_found(&root).into())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn opr_dir(&self) -> PathBuf {
        self.root.join(WORKSPACE_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.opr_dir().join("config.toml")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.opr_dir().join("state")
    }

    pub fn exists(&self) -> bool {
        self.opr_dir().is_dir()
    }

    pub fn open_store(&self) -> Result<FileKeyValueStore> {
        FileKeyValueStore::open(self.state_dir()).context("Failed to open workspace state")
    }

    /// Defaults, then `config.toml`, then the stored token, then `OPR_*`
    /// variables, then command-line flags
    pub fn load_config(
        &self,
        state: &StateStore<FileKeyValueStore>,
        overrides: CliConfigOverrides,
    ) -> Result<LayeredConfig> {
        let mut config = LayeredConfig::with_defaults();

        let config_path = self.config_path();
        if config_path.exists() {
            config = config
                .load_from_file(&config_path)
                .context("Failed to load configuration file")?;
        }

        let stored_token = state.load_access_token().context("Failed to read stored token")?;
        let mut config = config.with_stored_token(stored_token).load_from_env();
        config.update_from_cli(overrides);
        Ok(config)
    }
}

/// Find the nearest ancestor of `start` (inclusive) containing `.opr`
pub fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(WORKSPACE_DIR).is_dir() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}
