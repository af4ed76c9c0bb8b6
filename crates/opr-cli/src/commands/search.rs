//! Search command implementation

use super::{index_from_number, Context};
use crate::cli::SearchArgs;
use crate::errors::CliError;
use crate::output::OutputWriter;
use crate::output_types::{CameraOutput, SearchRow};
use crate::progress;
use anyhow::Result;
use opr_editor::{SearchBox, SearchOutcome};

pub async fn execute(args: SearchArgs, ctx: &Context, output: &OutputWriter) -> Result<()> {
    let client = ctx.require_mapbox()?;
    let search = SearchBox::new(Some(client), ctx.config.search_debounce());
    let proximity = ctx.session.dataset().city.coordinate();

    let spinner = (!output.is_json()).then(|| progress::create_spinner("Searching..."));
    let outcome = search.search(args.query.as_str(), Some(proximity)).await;
    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }

    if outcome == SearchOutcome::Cleared {
        return Err(CliError::new(format!("\"{}\" is too short to search", args.query))
            .with_suggestion(format!(
                "Type at least {} characters",
                opr_editor::search::MIN_QUERY_CHARS
            ))
            .into());
    }

    let results = search.results();
    if let Some(number) = args.choose {
        let index = index_from_number(number)?;
        let Some(camera) = search.choose(index) else {
            return Err(CliError::new(format!("Result {} does not exist", number))
                .with_context(format!("The search returned {} result(s).", results.len()))
                .into());
        };
        let chosen = &results[index];
        if output.is_json() {
            output.result(CameraOutput {
                latitude: camera.center.latitude,
                longitude: camera.center.longitude,
                zoom: camera.zoom,
            })?;
        } else {
            output.success(format!("Map centred on {}", chosen.display_name));
            output.kv("Center", camera.center);
            output.kv("Zoom", camera.zoom);
        }
        return Ok(());
    }

    let rows: Vec<SearchRow> = results
        .iter()
        .enumerate()
        .map(|(i, result)| SearchRow {
            number: i + 1,
            short_label: result.short_label.clone(),
            display_name: result.display_name.clone(),
            latitude: result.coordinate.latitude,
            longitude: result.coordinate.longitude,
        })
        .collect();
    output.table(rows)
}
