use pii_model::{AnalysisOutcome, AnalyzedRecord, CellValue, DetectionResult, FieldValue};
use pii_report::{
    ReportOptions, ResultStyle, read_analysis_report, render_analysis_report,
    write_analysis_report,
};

fn sample_records() -> Vec<AnalyzedRecord> {
    vec![
        AnalyzedRecord::new(
            "name",
            FieldValue::list(["John Smith", ""]),
            AnalysisOutcome::Nested(vec![
                vec![DetectionResult::new("PERSON", 0, 10, 0.85, "person")],
                vec![],
            ]),
        ),
        AnalyzedRecord::new(
            "age",
            FieldValue::list([34_i64, 29]),
            AnalysisOutcome::Nested(vec![vec![], vec![]]),
        ),
    ]
}

#[test]
fn rendered_report_shape() {
    let json = render_analysis_report(&sample_records(), &ReportOptions::default())
        .expect("render report");
    insta::assert_snapshot!(json, @r#"
    [
      {
        "key": "name",
        "value": [
          "John Smith",
          ""
        ],
        "recognizer_results": [
          [
            "type: PERSON, start: 0, end: 10, score: 0.85"
          ],
          []
        ]
      },
      {
        "key": "age",
        "value": [
          34,
          29
        ],
        "recognizer_results": [
          [],
          []
        ]
      }
    ]
    "#);
}

#[test]
fn structured_report_keeps_fields() {
    let options = ReportOptions {
        result_style: ResultStyle::Structured,
        pretty: false,
    };
    let json = render_analysis_report(&sample_records(), &options).expect("render report");
    let value: serde_json::Value = serde_json::from_str(&json).expect("parse report");
    let person = &value[0]["recognizer_results"][0][0];
    assert_eq!(person["entity_type"], "PERSON");
    assert_eq!(person["start"], 0);
    assert_eq!(person["end"], 10);
    assert_eq!(person["recognizer"], "person");
}

#[test]
fn round_trip_preserves_keys_and_values() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("nested").join("analysed_report.json");
    let mut records = sample_records();
    records.push(AnalyzedRecord::skipped(
        "mixed",
        FieldValue::list([
            CellValue::Float(1.5),
            CellValue::Boolean(true),
            CellValue::Null,
            CellValue::from("x"),
        ]),
    ));
    records.push(AnalyzedRecord::skipped("flag", FieldValue::scalar(false)));

    write_analysis_report(&records, &path, &ReportOptions::default()).expect("write report");
    let rows = read_analysis_report(&path).expect("read report");

    let written: Vec<(&str, &FieldValue)> = records
        .iter()
        .map(|record| (record.key.as_str(), &record.value))
        .collect();
    let read: Vec<(&str, &FieldValue)> = rows
        .iter()
        .map(|row| (row.key.as_str(), &row.value))
        .collect();
    assert_eq!(read, written);
    assert_eq!(rows[3].recognizer_results, serde_json::json!([]));
}

#[test]
fn non_finite_floats_become_null() {
    let records = vec![AnalyzedRecord::skipped(
        "ratio",
        FieldValue::list([f64::NAN, 2.5]),
    )];
    let options = ReportOptions {
        pretty: false,
        ..ReportOptions::default()
    };
    let json = render_analysis_report(&records, &options).expect("render report");
    assert_eq!(
        json,
        r#"[{"key":"ratio","value":[null,2.5],"recognizer_results":[]}]"#
    );
}

#[test]
fn missing_report_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = read_analysis_report(&dir.path().join("absent.json")).unwrap_err();
    assert!(err.to_string().starts_with("read "));
}
