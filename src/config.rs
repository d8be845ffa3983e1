use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Context, Result};
use glob::Pattern;

use crate::catalog::{CatalogHandle, FileCatalogSource, HttpCatalogSource, LICENSE_LIST_SOURCE_URL};

pub const CONFIG_FILE_NAME: &str = "cdx-license-resolver.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where to download the SPDX license list from
    pub catalog_url: Option<String>,

    /// Local license list; takes precedence over `catalog_url`
    pub catalog_file: Option<PathBuf>,

    /// HTTP timeout for the catalog download, in seconds
    pub timeout_secs: Option<u64>,

    /// Output format (table, json)
    pub format: Option<String>,

    /// Glob patterns of component names to leave out
    pub ignore_components: Option<Vec<String>>,

    /// Exit non-zero if any component fails to resolve
    pub fail_on_errors: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_url: Some(LICENSE_LIST_SOURCE_URL.to_string()),
            catalog_file: None,
            timeout_secs: Some(30),
            format: Some("table".to_string()),
            ignore_components: Some(Vec::new()),
            fail_on_errors: Some(false),
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(30))
    }

    /// Build the catalog handle this configuration points at.
    pub fn catalog_handle(&self) -> CatalogHandle {
        match &self.catalog_file {
            Some(path) => CatalogHandle::new(FileCatalogSource::new(path)),
            None => {
                let url = self.catalog_url.as_deref().unwrap_or(LICENSE_LIST_SOURCE_URL);
                CatalogHandle::new(HttpCatalogSource::new(url, self.timeout()))
            }
        }
    }

    pub fn is_ignored(&self, component_name: &str) -> bool {
        self.ignore_components
            .iter()
            .flatten()
            .filter_map(|p| Pattern::new(p).ok())
            .any(|pattern| pattern.matches(component_name))
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == Some(0) {
            anyhow::bail!("timeout_secs must be greater than zero");
        }

        match self.format.as_deref() {
            None | Some("table") | Some("json") => {}
            Some(other) => anyhow::bail!("Unknown output format '{}', expected 'table' or 'json'", other),
        }

        for pattern in self.ignore_components.iter().flatten() {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid ignore_components pattern: {}", pattern))?;
        }

        Ok(())
    }
}

/// Load configuration from the current directory
pub fn load_config() -> Result<Config> {
    let config_path = std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(CONFIG_FILE_NAME);

    load_config_from(&config_path)
}

/// Load configuration from `path`, falling back to defaults if it does not exist
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;

    let parsed: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;

    let mut config = parsed.with_defaults();
    // A relative catalog_file is relative to the config file
    if let Some(dir) = path.parent() {
        config.catalog_file = config.catalog_file
            .map(|file| if file.is_relative() { dir.join(file) } else { file });
    }
    config.validate()
        .with_context(|| format!("Invalid config: {}", path.display()))?;

    Ok(config)
}

impl Config {
    // Unset keys fall back to the defaults
    fn with_defaults(self) -> Self {
        let defaults = Config::default();
        Self {
            catalog_url: self.catalog_url.or(defaults.catalog_url),
            catalog_file: self.catalog_file,
            timeout_secs: self.timeout_secs.or(defaults.timeout_secs),
            format: self.format.or(defaults.format),
            ignore_components: self.ignore_components.or(defaults.ignore_components),
            fail_on_errors: self.fail_on_errors.or(defaults.fail_on_errors),
        }
    }
}
