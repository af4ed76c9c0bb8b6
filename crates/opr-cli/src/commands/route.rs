//! Route command implementation

use super::{index_from_number, Context};
use crate::cli::RouteCommand;
use crate::output::OutputWriter;
use crate::output_types::RouteRow;
use anyhow::Result;
use opr_core::models::RouteField;

pub fn execute(command: RouteCommand, ctx: &mut Context, output: &OutputWriter) -> Result<()> {
    match command {
        RouteCommand::List => return list(ctx, output),
        RouteCommand::Add => {
            let index = ctx.session.add_route()?;
            let route = &ctx.session.dataset().routes[index];
            output.success(format!(
                "Added route {} \"{}\" as #{} (selected)",
                route.route_code,
                route.name,
                index + 1
            ));
        }
        RouteCommand::Delete { number } => {
            let index = index_from_number(number)?;
            let was_selected = ctx.session.selection().route() == Some(index);
            ctx.session.delete_route(index)?;
            output.success(format!("Deleted route #{}", number));
            if was_selected && !output.is_json() {
                output.info("Route selection cleared");
            }
        }
        RouteCommand::Set { number, field, value } => {
            let index = index_from_number(number)?;
            ctx.session.update_route(index, RouteField::parse(&field, &value)?)?;
            output.success(format!("Set {} of route #{}", field, number));
        }
        RouteCommand::Select { number } => {
            let index = index_from_number(number)?;
            ctx.session.select_route(index)?;
            output.success(format!("Selected route #{}", number));
        }
        RouteCommand::Deselect => {
            ctx.session.clear_route_selection()?;
            output.success("Route selection cleared");
        }
    }
    Ok(())
}

fn list(ctx: &Context, output: &OutputWriter) -> Result<()> {
    let selected = ctx.session.selection().route();
    let rows: Vec<RouteRow> = ctx
        .session
        .dataset()
        .routes
        .iter()
        .enumerate()
        .map(|(i, route)| RouteRow::new(i, route, selected == Some(i)))
        .collect();

    if !output.is_json() {
        output.section(format!("Routes of {}", ctx.session.dataset().city.name));
    }
    output.table(rows)
}
