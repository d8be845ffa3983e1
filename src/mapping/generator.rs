use indexmap::IndexSet;
use std::collections::BTreeSet;
use tracing::debug;

use super::{Declaration, LicenseChoice};
use crate::catalog::{canonical_exception, Catalog, CatalogHandle};
use crate::error::{ResolveError, ResolveResult};
use crate::expression::{ExpressionParser, SpdxExpressionParser};

/// Turns license declarations into canonical SPDX identifiers.
pub struct MappingGenerator<'a> {
    catalog: &'a CatalogHandle,
    parser: Box<dyn ExpressionParser + 'a>,
}

impl<'a> MappingGenerator<'a> {
    pub fn new(catalog: &'a CatalogHandle) -> Self {
        Self::with_parser(catalog, SpdxExpressionParser)
    }

    pub fn with_parser(catalog: &'a CatalogHandle, parser: impl ExpressionParser + 'a) -> Self {
        Self { catalog, parser: Box::new(parser) }
    }

    /// Resolve a batch of declarations, in order.
    ///
    /// * an expression contributes every license term it mentions, spelled as
    ///   in the catalog
    /// * an ID is kept only if the catalog knows it
    /// * a name maps to the best display-name match (at least 90% similar)
    /// * a URL maps to the license referencing it
    ///
    /// Identifiers are deduplicated, first occurrence wins. Entries that match
    /// nothing contribute nothing; a malformed expression or an entry with no
    /// usable shape fails the whole batch.
    pub fn generate(&self, choices: &[LicenseChoice]) -> ResolveResult<Vec<String>> {
        let catalog = self.catalog.ensure_loaded()?;
        let mut resolved = IndexSet::new();

        for (index, choice) in choices.iter().enumerate() {
            match choice.classify() {
                Declaration::Expression(expression) => {
                    let extracted: BTreeSet<String> = self
                        .parser
                        .extract_identifiers(&expression)?
                        .iter()
                        .map(|term| canonical_term(&catalog, term))
                        .collect();
                    debug!(%expression, ?extracted, "expanded license expression");
                    resolved.extend(extracted);
                }
                Declaration::Invalid => return Err(ResolveError::InvalidDeclaration { index }),
                declaration => {
                    if let Some(id) = resolve_reference(&catalog, &declaration) {
                        resolved.insert(id);
                    }
                }
            }
        }

        Ok(resolved.into_iter().collect())
    }
}

/// Respell `license[+] [WITH exception]` in SPDX case. Identifiers unknown to
/// the catalog, such as `LicenseRef-` references, are kept as written.
fn canonical_term(catalog: &Catalog, term: &str) -> String {
    let (license, exception) = match term.split_once(" WITH ") {
        Some((license, exception)) => (license, Some(exception)),
        None => (term, None),
    };
    let (base, plus) = match license.strip_suffix('+') {
        Some(base) => (base, "+"),
        None => (license, ""),
    };

    let base = catalog.canonical_id(base).unwrap_or(base);
    match exception {
        Some(exception) => {
            let exception = canonical_exception(exception).unwrap_or(exception);
            format!("{}{} WITH {}", base, plus, exception)
        }
        None => format!("{}{}", base, plus),
    }
}

fn resolve_reference(catalog: &Catalog, declaration: &Declaration) -> Option<String> {
    match declaration {
        Declaration::Identifier(id) => {
            let known = catalog.find_by_id(id);
            debug!(%id, known, "checked license id");
            known.then(|| id.clone())
        }
        Declaration::DisplayName(name) => {
            let found = catalog.find_by_name(name);
            match &found {
                Some(m) => debug!(%name, id = %m.license.identifier, score = m.score, "matched license name"),
                None => debug!(%name, "no license name within threshold"),
            }
            found.map(|m| m.license.identifier.clone())
        }
        Declaration::Url(url) => {
            let found = catalog.find_by_url(url);
            debug!(%url, id = ?found.map(|l| &l.identifier), "looked up license url");
            found.map(|l| l.identifier.clone())
        }
        Declaration::Unusable => {
            debug!("license entry carries no id, name or url");
            None
        }
        Declaration::Expression(_) | Declaration::Invalid => None,
    }
}

/// Resolve `choices` against `catalog` with the default expression parser.
pub fn generate_mapping(catalog: &CatalogHandle, choices: &[LicenseChoice]) -> ResolveResult<Vec<String>> {
    MappingGenerator::new(catalog).generate(choices)
}
