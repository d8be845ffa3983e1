use super::{Catalog, License};

/// Names must reach at least 90% Jaro-Winkler similarity to count as a match.
pub const SIMILARITY_THRESHOLD: f64 = 0.9;

/// Best display-name match and its similarity score in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NameMatch<'a> {
    pub license: &'a License,
    pub score: f64,
}

impl Catalog {
    /// Exact, case-sensitive identifier check.
    pub fn find_by_id(&self, id: &str) -> bool {
        self.entries.iter().any(|l| l.identifier == id)
    }

    /// Find the license whose display name is most similar to `name`.
    ///
    /// A name equal to some entry's identifier short-circuits with score 1.0,
    /// since SBOM producers regularly put the ID into the name field. Otherwise
    /// the highest-scoring entry at or above [`SIMILARITY_THRESHOLD`] wins, and
    /// on equal scores the entry loaded last wins.
    pub fn find_by_name(&self, name: &str) -> Option<NameMatch<'_>> {
        let mut best: Option<NameMatch<'_>> = None;

        for license in &self.entries {
            if name == license.identifier {
                return Some(NameMatch { license, score: 1.0 });
            }

            let score = strsim::jaro_winkler(name, &license.display_name);
            if score < SIMILARITY_THRESHOLD {
                continue;
            }
            if best.map_or(true, |b| score >= b.score) {
                best = Some(NameMatch { license, score });
            }
        }

        best
    }

    /// Find the first license, in catalog order, referencing `url`.
    ///
    /// An entry qualifies when `url` equals its reference or details URL, or
    /// when one of its additional URLs starts with `url`, so a query stripped
    /// of its anchor or query string still resolves. A query longer than the
    /// catalog value does not match.
    pub fn find_by_url(&self, url: &str) -> Option<&License> {
        self.entries.iter().find(|l| {
            url == l.reference_url
                || url == l.details_url
                || l.additional_urls.iter().any(|link| link.starts_with(url))
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::tests::{license, sample_catalog};

    fn assert_score(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "score {} != {}", actual, expected);
    }

    #[test]
    fn test_find_by_id() {
        let catalog = sample_catalog();

        assert!(!catalog.find_by_id("Apache"));
        assert!(!catalog.find_by_id("Apache-1"));
        assert!(catalog.find_by_id("Apache-1.1"));
        assert!(!catalog.find_by_id("apache-1.1"));
        assert!(!catalog.find_by_id(""));
    }

    #[test]
    fn test_find_by_name_exact_display_name() {
        let catalog = sample_catalog();

        let found = catalog.find_by_name("MIT License").unwrap();
        assert_eq!(found.license.identifier, "MIT");
        assert_score(found.score, 1.0);
    }

    #[test]
    fn test_find_by_name_near_variants() {
        let catalog = sample_catalog();

        let plural = catalog.find_by_name("MIT Licenses").unwrap();
        assert_eq!(plural.license.identifier, "MIT");
        assert_score(plural.score, 0.9833333333333333);

        let short = catalog.find_by_name("MIT Lic.").unwrap();
        assert_eq!(short.license.identifier, "MIT");
        assert_score(short.score, 0.9022727272727272);
    }

    #[test]
    fn test_find_by_name_tie_prefers_later_entry() {
        let catalog = sample_catalog();

        // Ties across Apache-1.0, 1.1 and 2.0.
        let generic = catalog.find_by_name("Apache License").unwrap();
        assert_eq!(generic.license.identifier, "Apache-2.0");
        assert_score(generic.score, 0.9555555555555556);

        // Ties across 1.0 and 1.1 only.
        let v1 = catalog.find_by_name("Apache License 1").unwrap();
        assert_eq!(v1.license.identifier, "Apache-1.1");
        assert_score(v1.score, 0.9777777777777777);

        // Ties across 1.0 and 2.0.
        let too_new = catalog.find_by_name("Apache License 3.0").unwrap();
        assert_eq!(too_new.license.identifier, "Apache-2.0");
        assert_score(too_new.score, 0.9777777777777777);
    }

    #[test]
    fn test_find_by_name_identifier_shortcut() {
        let catalog = sample_catalog();

        let found = catalog.find_by_name("Apache-1.0").unwrap();
        assert_eq!(found.license.identifier, "Apache-1.0");
        assert_score(found.score, 1.0);
    }

    #[test]
    fn test_find_by_name_below_threshold() {
        let catalog = sample_catalog();

        assert!(catalog.find_by_name("Proprietary and confidential").is_none());
        assert!(catalog.find_by_name("").is_none());
    }

    #[test]
    fn test_find_by_name_empty_catalog() {
        let catalog = crate::catalog::Catalog::default();
        assert!(catalog.find_by_name("MIT License").is_none());
    }

    #[test]
    fn test_find_by_url() {
        let catalog = sample_catalog();

        let cases = [
            ("https://spdx.org/licenses/CC-BY-SA-4.0.html", "CC-BY-SA-4.0"),
            ("https://spdx.org/licenses/BSD-4.3TAHOE.json", "BSD-4.3TAHOE"),
            (
                "https://github.com/microsoft/Computational-Use-of-Data-Agreement/blob/master/C-UDA-1.0.md",
                "C-UDA-1.0",
            ),
            // Truncated form of a see-also link carrying a query and anchor.
            ("https://git.savannah.gnu.org/cgit/indent.git/tree/doc/indent.texi", "BSD-4.3TAHOE"),
        ];
        for (url, expected) in cases {
            let found = catalog.find_by_url(url);
            assert_eq!(found.map(|l| l.identifier.as_str()), Some(expected), "url {}", url);
        }
    }

    #[test]
    fn test_find_by_url_no_match() {
        let catalog = sample_catalog();

        assert!(catalog
            .find_by_url("https://git.savannah.gnu.org/cgit/indent.git/tree/doc/extent.texi")
            .is_none());
        // Longer than the catalog value: prefix only holds the other way round.
        assert!(catalog.find_by_url("https://opensource.org/license/mit/extra").is_none());
    }

    #[test]
    fn test_find_by_url_first_entry_in_catalog_order_wins() {
        let mut catalog = sample_catalog();
        // An earlier entry whose see-also starts with MIT's reference URL.
        catalog.entries.insert(
            0,
            license("Early", "Early Bird", &["https://spdx.org/licenses/MIT.html#mirror"]),
        );

        let found = catalog.find_by_url("https://spdx.org/licenses/MIT.html").unwrap();
        assert_eq!(found.identifier, "Early");

        // Without the earlier entry the exact reference match is found.
        let fresh = sample_catalog();
        let found = fresh.find_by_url("https://spdx.org/licenses/MIT.html").unwrap();
        assert_eq!(found.identifier, "MIT");

        let found = catalog.find_by_url("https://spdx.org/licenses/MIT.html#mir").unwrap();
        assert_eq!(found.identifier, "Early");
    }
}
