use anyhow::Result;

use crate::commands::Context;

pub fn handle_config(ctx: &Context, show: bool, validate: bool) -> Result<()> {
    if !show && !validate {
        if !ctx.quiet {
            eprintln!("Use --show or --validate");
        }
        std::process::exit(1);
    }

    let config = match ctx.load_config() {
        Ok(config) => config,
        Err(e) => {
            if !ctx.quiet {
                if validate {
                    eprintln!("❌ Configuration validation failed: {:#}", e);
                } else {
                    eprintln!("Error loading configuration: {:#}", e);
                }
            }
            std::process::exit(1);
        }
    };

    if show && !ctx.quiet {
        println!("{}", toml::to_string_pretty(&config)?);
    }

    if validate && !ctx.quiet {
        println!("✅ Configuration is valid");
    }

    Ok(())
}
