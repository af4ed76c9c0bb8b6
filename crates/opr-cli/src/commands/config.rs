//! Config command implementation

use super::Context;
use crate::cli::ConfigCommand;
use crate::output::OutputWriter;
use crate::output_types::ConfigRow;
use anyhow::Result;

pub fn execute(command: ConfigCommand, ctx: &mut Context, output: &OutputWriter) -> Result<()> {
    match command {
        ConfigCommand::Show => show(ctx, output),
        ConfigCommand::SetToken { token } => {
            ctx.session.state().save_access_token(Some(token.trim()))?;
            output.success("Access token stored in the workspace");
            Ok(())
        }
        ConfigCommand::ClearToken => {
            ctx.session.state().save_access_token(None)?;
            output.success("Stored access token removed");
            if std::env::var("OPR_ACCESS_TOKEN").is_ok() && !output.is_json() {
                output.info("OPR_ACCESS_TOKEN is still set in the environment");
            }
            Ok(())
        }
    }
}

fn show(ctx: &Context, output: &OutputWriter) -> Result<()> {
    let mut rows: Vec<ConfigRow> = ctx
        .config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigRow { key, value, source: format!("{:?}", source) })
        .collect();
    rows.sort_by(|a, b| a.key.cmp(&b.key));

    if !output.is_json() {
        output.section("Configuration");
        output.kv("Config file", ctx.workspace.config_path().display());
    }
    output.table(rows)
}
