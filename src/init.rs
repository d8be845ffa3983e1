use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::Config;

const HEADER: &str = "\
# cdx-license-resolver configuration
#
# catalog_file takes precedence over catalog_url when set; relative paths
# are resolved against this file's directory.
";

/// Write the default configuration to `path`.
///
/// An existing file is merged: keys it already has are left untouched and
/// only missing ones are added. Returns the keys that were added.
pub fn generate_config_at_path<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let config_path = path.as_ref();

    let (mut doc, header) = if config_path.exists() {
        let existing_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let doc = existing_content.parse::<toml_edit::DocumentMut>()
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        (doc, String::new())
    } else {
        (toml_edit::DocumentMut::new(), format!("{}\n", HEADER))
    };

    let defaults = toml::Value::try_from(Config::default())
        .context("Failed to serialize default configuration")?;
    let defaults = defaults.as_table()
        .ok_or_else(|| anyhow::anyhow!("Invalid default configuration format"))?;

    let mut added = Vec::new();
    for (key, value) in defaults {
        if doc.contains_key(key) {
            continue;
        }
        doc[key.as_str()] = toml_value_to_edit_item(value)?;
        added.push(key.clone());
    }

    fs::write(config_path, format!("{}{}", header, doc))
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    Ok(added)
}

fn toml_value_to_edit_item(value: &toml::Value) -> Result<toml_edit::Item> {
    match value {
        toml::Value::String(s) => Ok(toml_edit::value(s.as_str())),
        toml::Value::Integer(i) => Ok(toml_edit::value(*i)),
        toml::Value::Float(f) => Ok(toml_edit::value(*f)),
        toml::Value::Boolean(b) => Ok(toml_edit::value(*b)),
        toml::Value::Array(arr) => {
            let mut edit_arr = toml_edit::Array::new();
            for item in arr {
                match item {
                    toml::Value::String(s) => edit_arr.push(s.as_str()),
                    other => return Err(anyhow::anyhow!("Unsupported array value in configuration: {}", other)),
                }
            }
            Ok(toml_edit::value(edit_arr))
        }
        other => Err(anyhow::anyhow!("Unsupported configuration value: {}", other)),
    }
}
