use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::catalog::{Catalog, CatalogHandle};
use crate::mapping::MappingGenerator;
use crate::sbom::Component;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentMapping {
    pub name: String,
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bom_ref: Option<String>,
    pub licenses: Vec<String>,
    /// Set when the component's license declarations could not be resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct LicenseTypes {
    pub osi_approved: IndexMap<String, usize>,
    pub non_osi: IndexMap<String, usize>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ResolutionSummary {
    pub total_components: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub failed: usize,
    pub license_types: LicenseTypes,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub generated_at: DateTime<Utc>,
    pub catalog_version: String,
    pub components: Vec<ComponentMapping>,
    pub summary: ResolutionSummary,
}

/// Resolve each component's declarations as its own batch.
///
/// Batches run in parallel; within a batch declarations stay in order. A
/// failing batch is recorded on its component instead of stopping the run.
pub fn resolve_components(handle: &CatalogHandle, components: &[&Component]) -> Vec<ComponentMapping> {
    let generator = MappingGenerator::new(handle);

    components
        .par_iter()
        .map(|component| {
            let (licenses, error) = match generator.generate(&component.licenses) {
                Ok(licenses) => (licenses, None),
                Err(e) => {
                    warn!(component = %component.name, error = %e, "failed to resolve licenses");
                    (Vec::new(), Some(e.to_string()))
                }
            };
            ComponentMapping {
                name: component.name.clone(),
                version: component.version.clone(),
                bom_ref: component.bom_ref.clone(),
                licenses,
                error,
            }
        })
        .collect()
}

pub fn create_report(catalog: &Catalog, components: Vec<ComponentMapping>) -> ResolutionReport {
    let total_components = components.len();
    let failed = components.iter().filter(|c| c.error.is_some()).count();
    let resolved = components.iter().filter(|c| !c.licenses.is_empty()).count();
    let unresolved = total_components - failed - resolved;

    let mut osi_counts = HashMap::new();
    let mut non_osi_counts = HashMap::new();

    for component in &components {
        for id in &component.licenses {
            if is_osi_approved(catalog, id) {
                *osi_counts.entry(id.clone()).or_insert(0) += 1;
            } else {
                *non_osi_counts.entry(id.clone()).or_insert(0) += 1;
            }
        }
    }

    ResolutionReport {
        generated_at: Utc::now(),
        catalog_version: catalog.format_version.clone(),
        components,
        summary: ResolutionSummary {
            total_components,
            resolved,
            unresolved,
            failed,
            license_types: LicenseTypes {
                osi_approved: sorted_by_count(osi_counts),
                non_osi: sorted_by_count(non_osi_counts),
            },
        },
    }
}

// Highest count first, ties by name so output is stable.
fn sorted_by_count(counts: HashMap<String, usize>) -> IndexMap<String, usize> {
    let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.into_iter().collect()
}

/// `GPL-2.0+ WITH Classpath-exception-2.0` is judged by `GPL-2.0`.
fn is_osi_approved(catalog: &Catalog, term: &str) -> bool {
    let base = term.split(" WITH ").next().unwrap_or(term);
    let base = base.strip_suffix('+').unwrap_or(base);
    catalog.get(base).map_or(false, |l| l.is_approved)
}
