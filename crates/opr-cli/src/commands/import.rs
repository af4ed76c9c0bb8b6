//! Import command implementation

use super::Context;
use crate::cli::ImportArgs;
use crate::output::OutputWriter;
use crate::output_types::ImportOutput;
use crate::progress::ImportProgress;
use anyhow::{Context as _, Result};
use opr_editor::ImportPipeline;
use std::io::Read;
use std::path::Path;

pub async fn execute(args: ImportArgs, ctx: &mut Context, output: &OutputWriter) -> Result<()> {
    let text = read_document(&args.file)?;

    let geocoder = ctx.mapbox()?;
    if geocoder.is_none() && !output.is_json() {
        output.info("No access token configured; waypoints without coordinates stay unlocated");
    }
    let pipeline = ImportPipeline::new(geocoder);

    let mut progress = ImportProgress::new(output.is_json());
    let result = if args.dry_run {
        pipeline.prepare_with(&text, |event| progress.observe(event)).await
    } else {
        pipeline.import_with(&text, &mut ctx.session, |event| progress.observe(event)).await
    };

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            progress.fail("Import failed");
            return Err(e.into());
        }
    };

    let message = report.summary();
    progress.finish(&message);

    let routes = report.dataset.routes.len();
    let waypoints = report.dataset.waypoint_count();

    if output.is_json() {
        output.result(ImportOutput {
            message,
            routes,
            waypoints,
            lookups: report.lookups,
            enriched: report.enriched,
            dry_run: args.dry_run,
        })?;
    } else {
        if args.dry_run {
            output.info(format!("Dry run: {}", message));
        } else {
            output.success(&message);
        }
        output.kv("City", &report.dataset.city.name);
        output.kv("Routes", routes);
        output.kv("Waypoints", waypoints);
        if report.lookups > report.enriched {
            output.warning(format!(
                "{} waypoint(s) could not be located",
                report.lookups - report.enriched
            ));
        }
    }

    Ok(())
}

fn read_document(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read document from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read document: {}", path.display()))
}
