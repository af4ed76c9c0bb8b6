//! Waypoint command implementation

use super::{index_from_number, Context};
use crate::cli::WaypointCommand;
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::WaypointRow;
use anyhow::Result;
use opr_core::models::{Coordinate, WaypointField};
use opr_editor::{MapBridge, MapEvent, MarkerId};
use opr_geocode::MapboxClient;

pub fn execute(command: WaypointCommand, ctx: &mut Context, output: &OutputWriter) -> Result<()> {
    if ctx.session.selected_route().is_none() {
        return Err(errors::no_route_selected().into());
    }

    match command {
        WaypointCommand::List => return list(ctx, output),
        WaypointCommand::Add { lat, lng } => {
            if let (Some(lat), Some(lng)) = (lat, lng) {
                let mut bridge = MapBridge::<MapboxClient>::new(None);
                bridge.handle_event(MapEvent::CameraPanned(Coordinate::new(lat, lng)), &mut ctx.session)?;
            }
            match ctx.session.add_waypoint()? {
                Some(index) => {
                    let waypoint = &ctx.session.current_waypoints()[index];
                    output.success(format!(
                        "Added waypoint {} at {} (selected)",
                        waypoint.sequence,
                        waypoint.coordinate()
                    ));
                }
                None => output.warning(format!(
                    "Route already holds {} waypoints; nothing added",
                    ctx.session.max_waypoints()
                )),
            }
        }
        WaypointCommand::Delete { number } => {
            let index = index_from_number(number)?;
            let was_selected = ctx.session.selection().waypoint() == Some(index);
            ctx.session.delete_waypoint(index)?;
            output.success(format!(
                "Deleted waypoint #{}; {} remaining, renumbered 1..{}",
                number,
                ctx.session.current_waypoints().len(),
                ctx.session.current_waypoints().len()
            ));
            if was_selected && !output.is_json() {
                output.info("Waypoint selection cleared");
            }
        }
        WaypointCommand::Set { number, field, value } => {
            let index = index_from_number(number)?;
            ctx.session.update_waypoint(index, WaypointField::parse(&field, &value)?)?;
            output.success(format!("Set {} of waypoint #{}", field, number));
        }
        WaypointCommand::Move { number, lat, lng } => {
            let index = index_from_number(number)?;
            // Same path as a marker drag
            let mut bridge = MapBridge::<MapboxClient>::new(None);
            let event = MapEvent::DragEnd {
                marker: MarkerId::Waypoint(index),
                coordinate: Coordinate::new(lat, lng),
            };
            bridge.handle_event(event, &mut ctx.session)?;
            output.success(format!("Moved waypoint #{} to {}", number, Coordinate::new(lat, lng)));
        }
        WaypointCommand::Select { number } => {
            let index = index_from_number(number)?;
            ctx.session.select_waypoint(index)?;
            output.success(format!("Selected waypoint #{}", number));
        }
        WaypointCommand::Deselect => {
            ctx.session.clear_waypoint_selection()?;
            output.success("Waypoint selection cleared");
        }
    }
    Ok(())
}

fn list(ctx: &Context, output: &OutputWriter) -> Result<()> {
    let selected = ctx.session.selection().waypoint();
    let rows: Vec<WaypointRow> = ctx
        .session
        .current_waypoints()
        .iter()
        .enumerate()
        .map(|(i, waypoint)| WaypointRow::new(i, waypoint, selected == Some(i)))
        .collect();

    if let Some(route) = ctx.session.selected_route() {
        if !output.is_json() {
            output.section(format!("Waypoints of {} \"{}\"", route.route_code, route.name));
        }
    }
    output.table(rows)
}
