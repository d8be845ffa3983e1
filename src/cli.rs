use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cdx-license-resolver")]
#[command(about = "Resolve CycloneDX license declarations to SPDX identifiers")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (default: ./cdx-license-resolver.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the licenses of every component in a CycloneDX SBOM
    Resolve {
        /// Path to a CycloneDX JSON document
        sbom: PathBuf,

        /// Output format
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Exit with code 1 if any component fails to resolve
        #[arg(long)]
        fail_on_errors: bool,
    },
    /// Look up a single license declaration in the catalog
    Lookup(LookupArgs),
    /// Show information about the license catalog
    Catalog,
    /// Write a default configuration file
    Init,
    /// Show or validate configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct LookupArgs {
    /// Check an exact SPDX identifier
    #[arg(long)]
    pub id: Option<String>,

    /// Find the license with the most similar name
    #[arg(long)]
    pub name: Option<String>,

    /// Find the license referencing a URL
    #[arg(long)]
    pub url: Option<String>,

    /// List the license terms of an SPDX expression
    #[arg(long)]
    pub expression: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
