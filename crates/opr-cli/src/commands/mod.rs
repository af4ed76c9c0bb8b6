//! Command implementations

mod city;
mod config;
mod export;
mod import;
mod init;
mod map;
mod route;
mod search;
mod status;
mod waypoint;

use crate::cli::{Cli, Commands};
use crate::config_loader::Workspace;
use crate::errors;
use crate::output::OutputWriter;
use anyhow::Result;
use opr_core::config::{CliConfigOverrides, LayeredConfig};
use opr_editor::EditorSession;
use opr_geocode::MapboxClient;
use opr_store::{FileKeyValueStore, StateStore};

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let overrides = CliConfigOverrides {
        access_token: cli.access_token,
        max_waypoints: cli.max_waypoints,
    };

    match cli.command {
        Commands::Init(args) => init::execute(args, &output),
        command => {
            let mut ctx = Context::open(cli.workspace.as_deref(), overrides)?;
            run(command, &mut ctx, &output).await
        }
    }
}

async fn run(command: Commands, ctx: &mut Context, output: &OutputWriter) -> Result<()> {
    match command {
        Commands::Init(args) => init::execute(args, output),
        Commands::Status => status::execute(ctx, output),
        Commands::City(command) => city::execute(command, ctx, output),
        Commands::Route(command) => route::execute(command, ctx, output),
        Commands::Waypoint(command) => waypoint::execute(command, ctx, output),
        Commands::Import(args) => import::execute(args, ctx, output).await,
        Commands::Export(args) => export::execute(args, ctx, output),
        Commands::Search(args) => search::execute(args, ctx, output).await,
        Commands::Map(args) => map::execute(args, ctx, output).await,
        Commands::Config(command) => config::execute(command, ctx, output),
    }
}

/// An opened workspace: its resolved configuration and editing session
pub struct Context {
    pub workspace: Workspace,
    pub config: LayeredConfig,
    pub session: EditorSession<FileKeyValueStore>,
}

impl Context {
    pub fn open(
        explicit_workspace: Option<&std::path::Path>,
        overrides: CliConfigOverrides,
    ) -> Result<Self> {
        let workspace = Workspace::locate(explicit_workspace)?;
        let store = workspace.open_store()?;
        let config = workspace.load_config(&StateStore::new(store.clone()), overrides)?;
        let session = EditorSession::open(store, config.max_waypoints.value)?;

        tracing::debug!(root = %workspace.root().display(), "opened workspace");
        Ok(Self { workspace, config, session })
    }

    /// Mapbox client if a token is configured
    pub fn mapbox(&self) -> Result<Option<MapboxClient>> {
        if self.config.access_token().is_none() {
            return Ok(None);
        }
        Ok(Some(MapboxClient::new(&self.config)?))
    }

    /// Mapbox client, failing with guidance when no token is configured
    pub fn require_mapbox(&self) -> Result<MapboxClient> {
        self.mapbox()?.ok_or_else(|| errors::missing_access_token().into())
    }
}

/// Convert a 1-based number from the command line into an index
pub fn index_from_number(number: usize) -> Result<usize> {
    number.checked_sub(1).ok_or_else(|| {
        errors::CliError::new("Numbers start at 1")
            .with_suggestion("Use the # column of the list commands")
            .into()
    })
}
