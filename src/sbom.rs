use serde::Deserialize;
use std::path::Path;
use anyhow::{Result, Context};
use tracing::warn;

use crate::mapping::LicenseChoice;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Bom {
    #[serde(rename = "bomFormat")]
    pub bom_format: Option<String>,
    #[serde(rename = "specVersion")]
    pub spec_version: Option<String>,
    pub metadata: Option<BomMetadata>,
    #[serde(default)]
    pub components: Vec<Component>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BomMetadata {
    pub component: Option<Component>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Component {
    #[serde(default)]
    pub name: String,
    pub version: Option<String>,
    #[serde(rename = "bom-ref")]
    pub bom_ref: Option<String>,
    pub purl: Option<String>,
    #[serde(default)]
    pub licenses: Vec<LicenseChoice>,
    #[serde(default)]
    pub components: Vec<Component>,
}

pub struct SbomParser;

impl SbomParser {
    /// Parse a CycloneDX JSON document. Structure is not validated beyond
    /// what is needed to reach component licenses.
    pub fn parse_sbom<P: AsRef<Path>>(path: P) -> Result<Bom> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(anyhow::anyhow!("SBOM file not found: {}", path_ref.display()));
        }

        let content = std::fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read SBOM file: {}", path_ref.display()))?;

        if content.trim().is_empty() {
            return Err(anyhow::anyhow!("SBOM file is empty: {}", path_ref.display()));
        }

        Self::parse_str(&content)
            .with_context(|| format!("Failed to parse SBOM file as CycloneDX JSON: {}", path_ref.display()))
    }

    pub fn parse_str(content: &str) -> Result<Bom> {
        let bom: Bom = serde_json::from_str(content)?;

        match bom.bom_format.as_deref() {
            Some("CycloneDX") => {}
            Some(other) => warn!(format = other, "document does not declare itself as CycloneDX"),
            None => warn!("document has no bomFormat, assuming CycloneDX"),
        }

        Ok(bom)
    }

    /// All components, depth first, starting with the metadata component.
    pub fn extract_components(bom: &Bom) -> Vec<&Component> {
        fn walk<'a>(component: &'a Component, out: &mut Vec<&'a Component>) {
            out.push(component);
            for child in &component.components {
                walk(child, out);
            }
        }

        let mut components = Vec::new();
        if let Some(root) = bom.metadata.as_ref().and_then(|m| m.component.as_ref()) {
            walk(root, &mut components);
        }
        for component in &bom.components {
            walk(component, &mut components);
        }
        components
    }
}
