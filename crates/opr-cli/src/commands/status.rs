//! Status command implementation

use super::Context;
use crate::output::OutputWriter;
use crate::output_types::StatusOutput;
use anyhow::Result;

pub fn execute(ctx: &Context, output: &OutputWriter) -> Result<()> {
    let dataset = ctx.session.dataset();
    let selection = ctx.session.selection();

    if output.is_json() {
        output.result(StatusOutput {
            workspace_path: ctx.workspace.root().display().to_string(),
            city: dataset.city.name.clone(),
            island_group: dataset.city.island_group.to_string(),
            routes: dataset.routes.len(),
            waypoints: dataset.waypoint_count(),
            selected_route: selection.route().map(|i| i + 1),
            selected_waypoint: selection.waypoint().map(|i| i + 1),
            access_token: ctx.config.access_token().is_some(),
        })?;
        return Ok(());
    }

    output.section("Workspace Status");
    output.kv("Location", ctx.workspace.root().display());
    output.kv("City", format!("{}, {}", dataset.city.name, dataset.city.province));
    output.kv("Island Group", dataset.city.island_group);
    output.kv("Routes", dataset.routes.len());
    output.kv("Waypoints", dataset.waypoint_count());

    output.section("Selection");
    match ctx.session.selected_route() {
        Some(route) => {
            let number = selection.route().map_or(0, |i| i + 1);
            output.kv("Route", format!("{} ({} \"{}\")", number, route.route_code, route.name));
            match selection.waypoint() {
                Some(w) => output.kv("Waypoint", w + 1),
                None => output.kv("Waypoint", "none"),
            }
        }
        None => {
            output.kv("Route", "none");
            output.info("Select a route to edit its waypoints: opr route select <N>");
        }
    }

    output.section("Geocoding");
    match ctx.config.access_token() {
        Some(_) => output.kv("Access Token", format!("configured ({:?})", ctx.config.access_token.source)),
        None => {
            output.kv("Access Token", "not set");
            output.info("Search, directions and import geocoding are disabled");
        }
    }

    Ok(())
}
