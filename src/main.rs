use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{handle_catalog, handle_config, handle_init, handle_lookup, handle_resolve, Context};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let ctx = Context {
        config_path: cli.config,
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Resolve {
            sbom,
            format,
            output,
            fail_on_errors,
        } => handle_resolve(&ctx, sbom, format, output, fail_on_errors),
        Commands::Lookup(args) => handle_lookup(&ctx, args),
        Commands::Catalog => handle_catalog(&ctx),
        Commands::Init => handle_init(&ctx),
        Commands::Config { show, validate } => handle_config(&ctx, show, validate),
    }
}

// RUST_LOG wins over the flags when set
fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
