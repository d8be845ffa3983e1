use anyhow::Result;
use std::path::PathBuf;

use cdx_license_resolver::config::{load_config, load_config_from, Config, CONFIG_FILE_NAME};

pub mod catalog;
pub mod config;
pub mod init;
pub mod lookup;
pub mod resolve;

pub use catalog::handle_catalog;
pub use config::handle_config;
pub use init::handle_init;
pub use lookup::handle_lookup;
pub use resolve::handle_resolve;

/// Global options shared by every command.
pub struct Context {
    pub config_path: Option<PathBuf>,
    pub verbose: bool,
    pub quiet: bool,
}

impl Context {
    pub fn load_config(&self) -> Result<Config> {
        match &self.config_path {
            Some(path) => load_config_from(path),
            None => load_config(),
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }
}
