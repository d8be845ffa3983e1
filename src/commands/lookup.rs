use anyhow::{Context as _, Result};

use crate::cli::LookupArgs;
use crate::commands::Context;
use cdx_license_resolver::catalog::Catalog;
use cdx_license_resolver::expression::{ExpressionParser, SpdxExpressionParser};

pub fn handle_lookup(ctx: &Context, args: LookupArgs) -> Result<()> {
    // Expressions are parsed without consulting the catalog
    if let Some(expression) = &args.expression {
        let terms = SpdxExpressionParser.extract_identifiers(expression)?;
        if !ctx.quiet {
            for term in terms {
                println!("{}", term);
            }
        }
        return Ok(());
    }

    let config = ctx.load_config()?;
    let handle = config.catalog_handle();
    let catalog = handle
        .ensure_loaded()
        .with_context(|| format!("Failed to load license catalog from {}", handle.source_description()))?;

    let found = lookup(&catalog, &args);
    match found {
        Some(line) => {
            if !ctx.quiet {
                println!("{}", line);
            }
            Ok(())
        }
        None => {
            if !ctx.quiet {
                eprintln!("❌ No matching license in SPDX list {}", catalog.format_version);
            }
            std::process::exit(1);
        }
    }
}

fn lookup(catalog: &Catalog, args: &LookupArgs) -> Option<String> {
    if let Some(id) = &args.id {
        return catalog.find_by_id(id).then(|| format!("✅ {}", id));
    }
    if let Some(name) = &args.name {
        return catalog.find_by_name(name).map(|m| {
            format!("✅ {} ({}) similarity {:.3}", m.license.identifier, m.license.display_name, m.score)
        });
    }
    if let Some(url) = &args.url {
        return catalog
            .find_by_url(url)
            .map(|l| format!("✅ {} ({})", l.identifier, l.display_name));
    }
    None
}
