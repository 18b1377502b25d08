use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::TempDir;

use pii_analyzer::FailurePolicy;
use pii_cli::config::ScanConfig;
use pii_cli::pipeline::{build_analyzer, run_scan};
use pii_model::FieldValue;
use pii_report::{ProfileReport, ResultStyle, read_analysis_report};

const PEOPLE_CSV: &str = "name; email; age\n\
                          Jane Doe; jane@example.com; 34\n\
                          max; max@example.org; 51\n";

fn write_input(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("people.csv");
    fs::write(&path, contents).expect("write input");
    path
}

fn config_in(dir: &Path) -> ScanConfig {
    let mut config = ScanConfig::default();
    config.output.dir = dir.join("output");
    config
}

#[test]
fn scan_writes_profile_and_analysis_reports() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_input(dir.path(), PEOPLE_CSV);
    let config = config_in(dir.path());

    let result = run_scan(&input, &config).expect("scan");

    assert_eq!(result.rows, 2);
    assert_eq!(result.failure_policy, FailurePolicy::FailFast);
    assert_eq!(result.total_findings(), 3);
    assert_eq!(result.flagged_columns(), 2);
    let names: Vec<&str> = result.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["name", "email", "age"]);

    let profile_path = result.profile_report.clone().expect("profile written");
    assert_eq!(profile_path, dir.path().join("output/profile_report.json"));
    let profile: ProfileReport =
        serde_json::from_str(&fs::read_to_string(&profile_path).expect("read profile"))
            .expect("parse profile");
    assert_eq!(profile.table.rows, 2);
    assert_eq!(profile.title, "people.csv");

    assert_eq!(
        result.analysis_report,
        dir.path().join("output/analysed_report.json")
    );
    let rows = read_analysis_report(&result.analysis_report).expect("read report");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].key, "name");
    assert_eq!(rows[0].value, FieldValue::list(["Jane Doe", "max"]));
    assert_eq!(
        rows[0].recognizer_results,
        json!([["type: PERSON, start: 0, end: 8, score: 0.85"], []])
    );
    assert_eq!(
        rows[1].recognizer_results,
        json!([
            ["type: EMAIL_ADDRESS, start: 0, end: 16, score: 1.0"],
            ["type: EMAIL_ADDRESS, start: 0, end: 15, score: 1.0"]
        ])
    );
    assert_eq!(rows[2].key, "age");
    assert_eq!(rows[2].recognizer_results, json!([[], []]));
}

#[test]
fn disabled_profile_is_not_written() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_input(dir.path(), PEOPLE_CSV);
    let mut config = config_in(dir.path());
    config.output.profile = false;
    config.output.result_style = ResultStyle::Structured;

    let result = run_scan(&input, &config).expect("scan");

    assert!(result.profile_report.is_none());
    assert!(!dir.path().join("output/profile_report.json").exists());
    let rows = read_analysis_report(&result.analysis_report).expect("read report");
    assert_eq!(rows[1].recognizer_results[0][0]["entity_type"], "EMAIL_ADDRESS");
}

#[test]
fn fail_fast_aborts_before_the_report() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_input(dir.path(), PEOPLE_CSV);
    let mut config = config_in(dir.path());
    config.analysis.language = "de".to_string();

    assert!(run_scan(&input, &config).is_err());
    assert!(!config.output.report_path().exists());
}

#[test]
fn isolate_records_empty_results_for_failed_values() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_input(dir.path(), PEOPLE_CSV);
    let mut config = config_in(dir.path());
    config.analysis.language = "de".to_string();
    config.analysis.failure_policy = FailurePolicy::Isolate;

    let result = run_scan(&input, &config).expect("scan");

    assert_eq!(result.total_findings(), 0);
    let rows = read_analysis_report(&result.analysis_report).expect("read report");
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| row.recognizer_results == json!([[], []])));
}

#[test]
fn custom_recognizers_from_config_are_applied() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_input(dir.path(), "badge; note\nEMP-00042; ok\nnone; EMP-00007\n");
    let mut config = ScanConfig::from_toml_str(
        "[analysis]\nentities = [\"EMPLOYEE_ID\"]\n\n\
         [[recognizers]]\nname = \"employee_id\"\nentity = \"EMPLOYEE_ID\"\n\
         patterns = ['\\bEMP-\\d{5}\\b']\nscore = 0.9\n",
    )
    .expect("config");
    config.output.dir = dir.path().join("output");

    let analyzer = build_analyzer(&config).expect("analyzer");
    assert!(analyzer.recognizers().any(|r| r.name() == "employee_id"));

    let result = run_scan(&input, &config).expect("scan");
    assert_eq!(result.total_findings(), 2);
    assert_eq!(
        result.columns[0].entities.get("EMPLOYEE_ID").copied(),
        Some(1)
    );
}

#[test]
fn invalid_custom_pattern_is_reported() {
    let config = ScanConfig::from_toml_str(
        "[[recognizers]]\nname = \"broken\"\nentity = \"BROKEN\"\npatterns = ['(']\n",
    )
    .expect("config");
    let error = build_analyzer(&config).expect_err("invalid regex");
    assert!(format!("{error:#}").contains("broken"));
}

#[test]
fn missing_input_leaves_no_output() {
    let dir = TempDir::new().expect("tempdir");
    let config = config_in(dir.path());
    let error = run_scan(&dir.path().join("absent.csv"), &config).expect_err("missing");
    assert!(format!("{error:#}").contains("absent.csv"));
    assert!(!dir.path().join("output").exists());
}
