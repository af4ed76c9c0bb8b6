use console::style;
use opr_core::OprError;
use std::fmt;
use std::path::Path;

/// Error with suggestions for the person at the terminal
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn workspace_not_found(searched_from: &Path) -> CliError {
    CliError::new("Not in an OPR workspace")
        .with_context(format!(
            "No .opr directory was found.\n\nSearched from: {}",
            searched_from.display()
        ))
        .with_suggestion("Initialize a workspace: opr init")
        .with_suggestion("Or point at one: opr --workspace <dir> ...")
        .with_help("Run: opr init --help")
}

pub fn workspace_exists(path: &Path) -> CliError {
    CliError::new("Workspace already exists")
        .with_context(format!("Path: {}", path.display()))
        .with_suggestion("Use --force to reset it to the default dataset")
        .with_help("Run: opr init --help")
}

pub fn no_route_selected() -> CliError {
    CliError::new("No route selected")
        .with_context("Waypoints belong to the selected route.")
        .with_suggestion("List routes: opr route list")
        .with_suggestion("Select one: opr route select <N>")
        .with_suggestion("Or create one: opr route add")
}

pub fn missing_access_token() -> CliError {
    CliError::new("Mapbox access token not configured")
        .with_context("Search and directions need a Mapbox access token.")
        .with_suggestion("Store one in the workspace: opr config set-token <TOKEN>")
        .with_suggestion("Or export OPR_ACCESS_TOKEN=<TOKEN>")
        .with_help("Run: opr config show")
}

pub fn invalid_import(reason: &str) -> CliError {
    CliError::new("Invalid JSON format")
        .with_context(format!("The document could not be imported. Nothing was changed.\n\nError: {}", reason))
        .with_suggestion("Check the document against an export: opr export")
        .with_help("Run: opr import --help")
}

pub fn not_found(what: &str, number: usize, count: usize, list_command: &str) -> CliError {
    CliError::new(format!("{} {} does not exist", what, number))
        .with_context(format!("There are {} {}s. Numbers start at 1.", count, what.to_lowercase()))
        .with_suggestion(format!("List them: {}", list_command))
}

/// Convert a domain error into guidance
pub fn from_opr(error: &OprError) -> CliError {
    match error {
        OprError::NoRouteSelected => no_route_selected(),
        OprError::InvalidFormat { reason } => invalid_import(reason),
        OprError::ConfigMissing { key } if key == "access_token" => missing_access_token(),
        OprError::RouteNotFound { index, len } => not_found("Route", index + 1, *len, "opr route list"),
        OprError::WaypointNotFound { index, len } => {
            not_found("Waypoint", index + 1, *len, "opr waypoint list")
        }
        OprError::UnknownField { .. } | OprError::InvalidValue { .. } => {
            CliError::new(error.to_string()).with_help("Run: opr <command> set --help")
        }
        OprError::ConfigInvalid { .. } => CliError::new(error.to_string())
            .with_suggestion("Check .opr/config.toml for syntax errors")
            .with_help("Run: opr config show"),
        other => CliError::new(other.to_string()),
    }
}

/// Print an error returned by a command
pub fn report(error: anyhow::Error) {
    if let Some(cli_error) = error.downcast_ref::<CliError>() {
        cli_error.display();
    } else if let Some(opr_error) = error.downcast_ref::<OprError>() {
        let mut cli_error = from_opr(opr_error);
        if cli_error.context.is_none() && error.chain().count() > 1 {
            cli_error.context = Some(format!("{:#}", error));
        }
        cli_error.display();
    } else {
        CliError::new(format!("{:#}", error)).display();
    }
}
