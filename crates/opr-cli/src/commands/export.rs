//! Export command implementation

use super::Context;
use crate::cli::ExportArgs;
use crate::output::OutputWriter;
use crate::output_types::ExportOutput;
use anyhow::{Context as _, Result};
use opr_core::exchange;
use std::path::PathBuf;

pub fn execute(args: ExportArgs, ctx: &Context, output: &OutputWriter) -> Result<()> {
    let json = ctx.session.export_json()?;

    let path = match (args.output, args.download) {
        (Some(path), _) => path,
        (None, true) => {
            PathBuf::from(exchange::export_file_name(ctx.session.dataset(), chrono::Utc::now()))
        }
        (None, false) => {
            println!("{}", json);
            return Ok(());
        }
    };

    std::fs::write(&path, &json)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = json.len(), "exported dataset");

    if output.is_json() {
        output.result(ExportOutput { path: path.display().to_string(), bytes: json.len() })?;
    } else {
        output.success(format!("Exported dataset to {}", path.display()));
    }
    Ok(())
}
