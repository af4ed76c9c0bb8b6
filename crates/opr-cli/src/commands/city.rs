//! City command implementation

use super::Context;
use crate::cli::CityCommand;
use crate::output::OutputWriter;
use anyhow::Result;
use opr_core::models::{CityField, Coordinate};
use opr_editor::{MapBridge, MapEvent, MarkerId};
use opr_geocode::MapboxClient;

pub fn execute(command: CityCommand, ctx: &mut Context, output: &OutputWriter) -> Result<()> {
    match command {
        CityCommand::Show => {}
        CityCommand::Set { field, value } => {
            let edit = CityField::parse(&field, &value)?;
            let moves = edit.moves_city();
            ctx.session.update_city(edit)?;
            if !output.is_json() {
                output.success(format!("Set {} of {}", field, ctx.session.dataset().city.name));
                if moves {
                    output.info(format!("Map recentred on {}", ctx.session.dataset().city.coordinate()));
                }
            }
        }
        CityCommand::Move { lat, lng } => {
            ctx.session.move_city(Coordinate::new(lat, lng))?;
            if !output.is_json() {
                output.success(format!("Moved city to {}", ctx.session.dataset().city.coordinate()));
            }
        }
        CityCommand::Pick { lat, lng } => {
            // Same path as dragging the city marker in pick mode
            let mut bridge = MapBridge::<MapboxClient>::new(None);
            bridge.set_city_mode(true);
            let event = MapEvent::DragEnd { marker: MarkerId::City, coordinate: Coordinate::new(lat, lng) };
            bridge.handle_event(event, &mut ctx.session)?;
            if !output.is_json() {
                output.success(format!(
                    "Picked city location {}",
                    ctx.session.dataset().city.coordinate()
                ));
            }
        }
    }

    show(ctx, output)
}

fn show(ctx: &Context, output: &OutputWriter) -> Result<()> {
    let city = &ctx.session.dataset().city;
    if output.is_json() {
        return output.result(city);
    }

    output.section("City");
    output.kv("island_group", city.island_group);
    output.kv("region", &city.region);
    output.kv("region_code", &city.region_code);
    output.kv("province", &city.province);
    output.kv("province_code", &city.province_code);
    output.kv("city", &city.name);
    output.kv("city_type", city.city_type.label());
    output.kv("postal_code", &city.postal_code);
    output.kv("latitude", city.latitude);
    output.kv("longitude", city.longitude);
    Ok(())
}
