use serde::{Deserialize, Serialize};

pub mod exceptions;
pub mod loader;
pub mod matcher;

// Re-export main types
pub use exceptions::canonical_exception;
pub use loader::{CatalogHandle, CatalogSource, FileCatalogSource, HttpCatalogSource, LICENSE_LIST_SOURCE_URL};
pub use matcher::{NameMatch, SIMILARITY_THRESHOLD};

/// One entry of the SPDX license list.
///
/// Every field tolerates absence in the source document: strings default to
/// empty, the URL list to empty, flags to `false`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct License {
    #[serde(rename = "licenseId")]
    pub identifier: String,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "reference")]
    pub reference_url: String,
    #[serde(rename = "detailsUrl")]
    pub details_url: String,
    #[serde(rename = "seeAlso")]
    pub additional_urls: Vec<String>,
    #[serde(rename = "isDeprecatedLicenseId")]
    pub is_deprecated: bool,
    #[serde(rename = "isOsiApproved")]
    pub is_approved: bool,
    #[serde(rename = "referenceNumber")]
    pub sequence_number: i64,
}

/// The license vocabulary, in the order it was loaded.
///
/// Identifiers are expected to be unique but this is not enforced; lookups
/// return the first entry in load order when the source repeats one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    #[serde(rename = "licenseListVersion")]
    pub format_version: String,
    #[serde(rename = "releaseDate", skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(rename = "licenses")]
    pub entries: Vec<License>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogStats {
    pub version: String,
    pub release_date: Option<String>,
    pub total: usize,
    pub deprecated: usize,
    pub osi_approved: usize,
}

impl Catalog {
    /// Decode a catalog from the SPDX `licenses.json` document shape.
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entry with exactly this identifier, first in load order.
    pub fn get(&self, id: &str) -> Option<&License> {
        self.entries.iter().find(|l| l.identifier == id)
    }

    /// Catalog spelling of `id`, ignoring ASCII case; first in load order.
    pub fn canonical_id(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|l| l.identifier.eq_ignore_ascii_case(id))
            .map(|l| l.identifier.as_str())
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            version: self.format_version.clone(),
            release_date: self.release_date.clone(),
            total: self.entries.len(),
            deprecated: self.entries.iter().filter(|l| l.is_deprecated).count(),
            osi_approved: self.entries.iter().filter(|l| l.is_approved).count(),
        }
    }
}
