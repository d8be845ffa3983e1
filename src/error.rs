//! Error types for license resolution.
//!
//! Structural problems (unreachable catalog, malformed expression, empty
//! declaration) are errors. A well-formed declaration that simply matches
//! nothing in the catalog is not, and never surfaces here.

use std::sync::Arc;

use thiserror::Error;

/// Failures of a catalog source while fetching or decoding the vocabulary.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to fetch license catalog from {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("license catalog request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read license catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode license catalog from {origin}: {source}")]
    Decode {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog fetch aborted before completing")]
    Aborted,
}

/// Grammar violations in a license expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("license expression is empty")]
    Empty,

    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("'+' at offset {offset} must directly follow a license identifier and end it")]
    MisplacedPlus { offset: usize },

    #[error("expected {expected} at offset {offset}, found '{found}'")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        offset: usize,
    },

    #[error("expected {expected} but the expression ended")]
    UnexpectedEnd { expected: &'static str },

    #[error("unbalanced parenthesis at offset {offset}")]
    UnbalancedParen { offset: usize },
}

/// Errors returned by a mapping batch. No partial result accompanies them.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("license catalog unavailable: {0}")]
    CatalogUnavailable(#[source] Arc<CatalogError>),

    #[error("invalid license expression: {0}")]
    Parse(#[from] ParseError),

    #[error("license declaration #{index} carries no expression, id, name or url")]
    InvalidDeclaration { index: usize },
}

pub type ResolveResult<T> = Result<T, ResolveError>;
