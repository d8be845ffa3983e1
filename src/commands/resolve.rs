use anyhow::{Context as _, Result};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::cli::OutputFormat;
use crate::commands::Context;
use cdx_license_resolver::output::format_table_output;
use cdx_license_resolver::report::{create_report, resolve_components};
use cdx_license_resolver::sbom::{Component, SbomParser};

pub fn handle_resolve(
    ctx: &Context,
    sbom: PathBuf,
    format: Option<OutputFormat>,
    output: Option<PathBuf>,
    fail_on_errors: bool,
) -> Result<()> {
    let config = ctx.load_config()?;

    // CLI arguments override config values
    let fail_on_errors = fail_on_errors || config.fail_on_errors.unwrap_or(false);

    let bom = SbomParser::parse_sbom(&sbom)?;
    let components: Vec<&Component> = SbomParser::extract_components(&bom)
        .into_iter()
        .filter(|component| {
            let ignored = config.is_ignored(&component.name);
            if ignored {
                debug!(component = %component.name, "ignored by configuration");
            }
            !ignored
        })
        .collect();

    // Load once up front so a bad catalog fails the run instead of every component
    let handle = config.catalog_handle();
    let catalog = handle
        .ensure_loaded()
        .with_context(|| format!("Failed to load license catalog from {}", handle.source_description()))?;
    // An empty catalog is never cached, so every component would fetch it again
    if catalog.is_empty() {
        anyhow::bail!("License catalog from {} contains no entries", handle.source_description());
    }
    info!(components = components.len(), "resolving component licenses");

    let mappings = resolve_components(&handle, &components);
    let report = create_report(&catalog, mappings);

    let format = format.unwrap_or_else(|| match config.format.as_deref() {
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Table,
    });

    let output_content = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Table => format_table_output(&report, ctx.verbose),
    };

    match output {
        Some(path) => fs::write(&path, output_content)
            .with_context(|| format!("Failed to write report to {}", path.display()))?,
        None => {
            if !ctx.quiet {
                println!("{}", output_content);
            }
        }
    }

    if fail_on_errors && report.summary.failed > 0 {
        eprintln!("{} component(s) failed to resolve", report.summary.failed);
        std::process::exit(1);
    }

    Ok(())
}
