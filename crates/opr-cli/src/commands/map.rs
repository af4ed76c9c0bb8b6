//! Map command implementation

use super::Context;
use crate::cli::MapArgs;
use crate::output::OutputWriter;
use anyhow::{Context as _, Result};
use opr_editor::{MapBridge, RecordingView};

pub async fn execute(args: MapArgs, ctx: &Context, output: &OutputWriter) -> Result<()> {
    let client = ctx.mapbox()?;
    if client.is_none() && ctx.session.selected_route().is_some() {
        output.warning("No access token configured; the route line is omitted");
    }

    let mut bridge = MapBridge::new(client);
    let mut view = RecordingView::default();
    bridge.sync(&ctx.session, &mut view).await;

    let scene = bridge.scene(ctx.session.dataset(), ctx.session.selection());
    match args.output {
        Some(path) => {
            let json = serde_json::to_string_pretty(&scene)?;
            std::fs::write(&path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            output.success(format!(
                "Wrote {} marker(s){} to {}",
                view.markers.len(),
                if view.line.is_some() { " and the route line" } else { "" },
                path.display()
            ));
        }
        None => output.data(&scene)?,
    }
    Ok(())
}
