use serde::{Deserialize, Serialize};

pub mod generator;

// Re-export main types
pub use generator::{generate_mapping, MappingGenerator};

/// One entry of a CycloneDX `licenses` array, as written by SBOM producers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseChoice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<LicenseReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<AttachedText>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttachedText {
    #[serde(default)]
    pub content: String,
    #[serde(rename = "contentType", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

/// What a license entry asks the resolver to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Expression(String),
    Identifier(String),
    DisplayName(String),
    Url(String),
    /// A license object carrying nothing structured, e.g. only attached text.
    Unusable,
    /// Neither a license object nor an expression.
    Invalid,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl LicenseChoice {
    pub fn expression(expression: impl Into<String>) -> Self {
        Self { license: None, expression: Some(expression.into()) }
    }

    pub fn id(id: impl Into<String>) -> Self {
        Self::with_reference(LicenseReference { id: Some(id.into()), ..Default::default() })
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self::with_reference(LicenseReference { name: Some(name.into()), ..Default::default() })
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self::with_reference(LicenseReference { url: Some(url.into()), ..Default::default() })
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::with_reference(LicenseReference {
            text: Some(AttachedText { content: content.into(), ..Default::default() }),
            ..Default::default()
        })
    }

    fn with_reference(license: LicenseReference) -> Self {
        Self { license: Some(license), expression: None }
    }

    /// Classify the entry. A license object takes precedence over an
    /// expression, and within it `id` beats `name` beats `url`.
    pub fn classify(&self) -> Declaration {
        match (&self.license, non_empty(&self.expression)) {
            (Some(license), _) => {
                if let Some(id) = non_empty(&license.id) {
                    Declaration::Identifier(id.to_string())
                } else if let Some(name) = non_empty(&license.name) {
                    Declaration::DisplayName(name.to_string())
                } else if let Some(url) = non_empty(&license.url) {
                    Declaration::Url(url.to_string())
                } else {
                    Declaration::Unusable
                }
            }
            (None, Some(expression)) => Declaration::Expression(expression.to_string()),
            (None, None) => Declaration::Invalid,
        }
    }
}

impl From<&LicenseChoice> for Declaration {
    fn from(choice: &LicenseChoice) -> Self {
        choice.classify()
    }
}
