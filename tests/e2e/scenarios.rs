use super::helpers::{fixture, stderr, stdout, TestProject};
use serde_json::Value;
use std::fs;

fn licenses_of<'a>(report: &'a Value, component: &str) -> Vec<&'a str> {
    report["components"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == component)
        .unwrap_or_else(|| panic!("component {} missing from report", component))["licenses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l.as_str().unwrap())
        .collect()
}

#[test]
fn test_resolve_json_report() {
    let test_env = TestProject::new();
    let bom = fixture("bom.json");

    let output = test_env.run(&["resolve", bom.to_str().unwrap(), "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["catalog_version"], "3.21");

    assert_eq!(licenses_of(&report, "acme-app"), vec!["Apache-2.0", "MIT"]);
    assert_eq!(licenses_of(&report, "left-pad"), vec!["MIT"]);
    assert_eq!(licenses_of(&report, "old-http"), vec!["Apache-1.1", "BSD-4-Clause"]);
    assert_eq!(licenses_of(&report, "ecos-hal"), vec!["RHeCos-1.1", "MIT-Wu"]);
    assert_eq!(
        licenses_of(&report, "ecos-vendored"),
        vec!["LGPL-2.0-only WITH FLTK-exception", "Ruby", "SAX-PD"]
    );
    assert!(licenses_of(&report, "mystery").is_empty());
    assert!(licenses_of(&report, "broken-expr").is_empty());

    let summary = &report["summary"];
    assert_eq!(summary["total_components"], 8);
    assert_eq!(summary["resolved"], 6);
    assert_eq!(summary["unresolved"], 1);
    assert_eq!(summary["failed"], 1);
    assert_eq!(summary["license_types"]["osi_approved"]["MIT"], 3);
}

#[test]
fn test_resolve_table_output() {
    let test_env = TestProject::new();
    let bom = fixture("bom.json");

    let output = test_env.run(&["resolve", bom.to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = stdout(&output);
    assert!(stdout.contains("License Resolution (8 components, SPDX list 3.21)"));
    assert!(stdout.contains("mystery"));
    assert!(stdout.contains("broken-expr: invalid license expression"));
    assert!(!stdout.contains("│ left-pad"));

    let verbose = test_env.run(&["resolve", bom.to_str().unwrap(), "--verbose"]);
    assert!(String::from_utf8_lossy(&verbose.stdout).contains("│ left-pad"));
}

#[test]
fn test_ignored_components_and_output_file() {
    let test_env = TestProject::new();
    test_env.append_config("ignore_components = [\"internal-*\", \"broken-*\"]\nformat = \"json\"\n");
    let bom = fixture("bom.json");
    let report_path = test_env.path().join("report.json");

    let output = test_env.run(&["resolve", bom.to_str().unwrap(), "--output", report_path.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty());

    let report: Value = serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["summary"]["total_components"], 6);
    assert_eq!(report["summary"]["failed"], 0);
}

#[test]
fn test_fail_on_errors_exit_code() {
    let test_env = TestProject::new();
    let bom = fixture("bom.json");

    let output = test_env.run(&["resolve", bom.to_str().unwrap(), "--fail-on-errors", "--quiet"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("1 component(s) failed to resolve"));

    test_env.append_config("fail_on_errors = true\n");
    let output = test_env.run(&["resolve", bom.to_str().unwrap(), "--quiet"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_unreachable_catalog_fails_run() {
    let test_env = TestProject::new();
    test_env.write_config("catalog_file = \"does-not-exist.json\"\n");
    let bom = fixture("bom.json");

    let output = test_env.run(&["resolve", bom.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to load license catalog"));
}

#[test]
fn test_empty_catalog_fails_run() {
    let test_env = TestProject::new();
    fs::write(test_env.path().join("empty.json"), r#"{ "licenseListVersion": "3.21", "licenses": [] }"#).unwrap();
    test_env.write_config("catalog_file = \"empty.json\"\n");
    let bom = fixture("bom.json");

    let output = test_env.run(&["resolve", bom.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("contains no entries"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_lookup_strategies() {
    let test_env = TestProject::new();

    let by_id = test_env.run(&["lookup", "--id", "MIT"]);
    assert!(by_id.status.success());
    assert!(stdout(&by_id).contains("MIT"));

    let unknown_id = test_env.run(&["lookup", "--id", "mit"]);
    assert_eq!(unknown_id.status.code(), Some(1));

    let by_name = test_env.run(&["lookup", "--name", "MIT Licenses"]);
    assert!(stdout(&by_name).contains("MIT (MIT License) similarity 0.983"));

    let by_url = test_env.run(&["lookup", "--url", "https://opensource.org/licenses/Apache-2.0"]);
    assert!(stdout(&by_url).contains("Apache-2.0"));

    let expression = test_env.run(&["lookup", "--expression", "MIT OR (Apache-2.0 AND MIT)"]);
    assert_eq!(stdout(&expression), "Apache-2.0\nMIT\n");

    let bad_expression = test_env.run(&["lookup", "--expression", "MIT or"]);
    assert!(!bad_expression.status.success());

    let two_strategies = test_env.run(&["lookup", "--id", "MIT", "--name", "MIT License"]);
    assert!(!two_strategies.status.success());
}

#[test]
fn test_catalog_command() {
    let test_env = TestProject::new();

    let output = test_env.run(&["catalog"]);
    assert!(output.status.success());

    let stdout = stdout(&output);
    assert!(stdout.contains("SPDX License List 3.21"));
    assert!(stdout.contains("2023-06-18"));
    assert!(stdout.contains("Licenses:     14"));
    assert!(stdout.contains("Deprecated:   1"));
    assert!(stdout.contains("OSI approved: 4"));
}

#[test]
fn test_init_and_config_commands() {
    let test_env = TestProject::new();
    let config_path = test_env.path().join("custom.toml");

    let init = test_env.run(&["init", "--config", config_path.to_str().unwrap()]);
    assert!(init.status.success());
    assert!(fs::read_to_string(&config_path).unwrap().contains("timeout_secs = 30"));

    let validate = test_env.run(&["config", "--validate", "--config", config_path.to_str().unwrap()]);
    assert!(validate.status.success());
    assert!(stdout(&validate).contains("Configuration is valid"));

    let show = test_env.run(&["config", "--show"]);
    assert!(stdout(&show).contains("licenses.json"));

    fs::write(&config_path, "format = \"xml\"\n").unwrap();
    let invalid = test_env.run(&["config", "--validate", "--config", config_path.to_str().unwrap()]);
    assert_eq!(invalid.status.code(), Some(1));
    assert!(stderr(&invalid).contains("Configuration validation failed"));

    let neither = test_env.run(&["config"]);
    assert_eq!(neither.status.code(), Some(1));
}
