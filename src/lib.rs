pub mod catalog;
pub mod config;
pub mod error;
pub mod expression;
pub mod init;
pub mod mapping;
pub mod output;
pub mod report;
pub mod sbom;

// Re-export main types for easy access
pub use catalog::{Catalog, CatalogHandle, CatalogSource, License};
pub use error::{CatalogError, ParseError, ResolveError, ResolveResult};
pub use expression::{ExpressionParser, SpdxExpressionParser};
pub use mapping::{generate_mapping, Declaration, LicenseChoice, MappingGenerator};
pub use report::{ComponentMapping, ResolutionReport, ResolutionSummary};
