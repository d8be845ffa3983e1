use anyhow::{Context as _, Result};

use crate::commands::Context;

pub fn handle_catalog(ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;
    let handle = config.catalog_handle();
    let catalog = handle
        .ensure_loaded()
        .with_context(|| format!("Failed to load license catalog from {}", handle.source_description()))?;

    if ctx.quiet {
        return Ok(());
    }

    let stats = catalog.stats();
    println!("📚 SPDX License List {}", stats.version);
    println!("   Source:       {}", handle.source_description());
    if let Some(date) = &stats.release_date {
        println!("   Released:     {}", date);
    }
    println!("   Licenses:     {}", stats.total);
    println!("   Deprecated:   {}", stats.deprecated);
    println!("   OSI approved: {}", stats.osi_approved);

    Ok(())
}
