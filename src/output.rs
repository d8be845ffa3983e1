use crate::report::{ComponentMapping, ResolutionReport};

pub fn format_table_output(report: &ResolutionReport, verbose: bool) -> String {
    let mut output = String::new();

    // Summary header
    let summary = &report.summary;
    output.push_str(&format!(
        "📦 License Resolution ({} components, SPDX list {})\n",
        summary.total_components, report.catalog_version
    ));
    output.push_str(&format!(
        "✅ {} resolved  ⚠️ {} unresolved  🚫 {} failed\n\n",
        summary.resolved, summary.unresolved, summary.failed
    ));

    if verbose {
        output.push_str("📦 All Components:\n");
        output.push_str(&format_component_table(&report.components));
    } else {
        let issues: Vec<ComponentMapping> = report
            .components
            .iter()
            .filter(|c| c.error.is_some() || c.licenses.is_empty())
            .cloned()
            .collect();
        if !issues.is_empty() {
            output.push_str("⚠️  Issues Found:\n");
            output.push_str(&format_component_table(&issues));
        } else {
            output.push_str("✅ Every component resolved to an SPDX identifier\n");
        }

        if report.components.len() > issues.len() {
            output.push_str(&format!(
                "\n💡 Run with --verbose to see all {} components\n",
                report.components.len()
            ));
        }
    }

    let types = &summary.license_types;
    if verbose && !(types.osi_approved.is_empty() && types.non_osi.is_empty()) {
        output.push_str("\n📊 Licenses:\n");
        for (id, count) in &types.osi_approved {
            output.push_str(&format!("  {:<40} {:>4}  OSI approved\n", truncate(id, 40), count));
        }
        for (id, count) in &types.non_osi {
            output.push_str(&format!("  {:<40} {:>4}\n", truncate(id, 40), count));
        }
    }

    output
}

fn format_component_table(components: &[ComponentMapping]) -> String {
    if components.is_empty() {
        return "No components found.\n".to_string();
    }

    let mut output = String::new();

    // Table header
    output.push_str("┌──────────────────────┬──────────┬──────────────────────────────┬─────────────┐\n");
    output.push_str("│ Component            │ Version  │ Licenses                     │ Status      │\n");
    output.push_str("├──────────────────────┼──────────┼──────────────────────────────┼─────────────┤\n");

    // Table rows
    for component in components {
        let name = truncate(&component.name, 20);
        let version = truncate(component.version.as_deref().unwrap_or("unknown"), 8);
        let licenses = if component.licenses.is_empty() {
            "(none)".to_string()
        } else {
            component.licenses.join(", ")
        };
        let licenses = truncate(&licenses, 28);
        let status = match (&component.error, component.licenses.is_empty()) {
            (Some(_), _) => "🚫 Failed",
            (None, true) => "⚠️ Unmapped",
            (None, false) => "✅ OK",
        };

        output.push_str(&format!(
            "│ {:<20} │ {:<8} │ {:<28} │ {:<11} │\n",
            name, version, licenses, status
        ));
    }

    // Table footer
    output.push_str("└──────────────────────┴──────────┴──────────────────────────────┴─────────────┘\n");

    // Failure reasons do not fit in a cell
    for component in components {
        if let Some(error) = &component.error {
            output.push_str(&format!("  {}: {}\n", component.name, error));
        }
    }

    output
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 1).collect();
        format!("{}…", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample_catalog;
    use crate::report::create_report;

    fn mapping(name: &str, licenses: &[&str], error: Option<&str>) -> ComponentMapping {
        ComponentMapping {
            name: name.to_string(),
            version: Some("1.0.0".to_string()),
            bom_ref: None,
            licenses: licenses.iter().map(|s| s.to_string()).collect(),
            error: error.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_table_shows_only_issues_by_default() {
        let report = create_report(
            &sample_catalog(),
            vec![
                mapping("good", &["MIT"], None),
                mapping("unmapped", &[], None),
                mapping("broken", &[], Some("invalid license expression")),
            ],
        );

        let output = format_table_output(&report, false);
        assert!(output.contains("License Resolution (3 components, SPDX list 3.21)"));
        assert!(output.contains("unmapped"));
        assert!(output.contains("broken: invalid license expression"));
        assert!(!output.contains("│ good"));
        assert!(output.contains("--verbose to see all 3 components"));
    }

    #[test]
    fn test_verbose_table_lists_everything() {
        let report = create_report(&sample_catalog(), vec![mapping("good", &["MIT", "Ruby"], None)]);

        let output = format_table_output(&report, true);
        assert!(output.contains("│ good"));
        assert!(output.contains("MIT, Ruby"));
        assert!(output.contains("OSI approved"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a-very-long-component-name", 10), "a-very-lo…");
        assert_eq!(truncate("ünïcödé-ünïcödé", 8), "ünïcödé…");
    }
}
