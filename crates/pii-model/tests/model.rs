//! Tests for pii-model types.

use pii_model::{
    AnalysisOutcome, AnalyzedRecord, CellValue, ColumnMapping, DetectionResult, FieldValue,
};

#[test]
fn record_serializes_with_report_field_names() {
    let record = AnalyzedRecord::new(
        "email",
        FieldValue::list(["jane@example.com"]),
        AnalysisOutcome::Nested(vec![vec![DetectionResult::new(
            "EMAIL_ADDRESS",
            0,
            16,
            1.0,
            "email",
        )]]),
    );
    let json = serde_json::to_value(&record).expect("serialize record");
    assert_eq!(json["key"], "email");
    assert_eq!(json["value"][0], "jane@example.com");
    assert_eq!(
        json["recognizer_results"][0][0]["entity_type"],
        "EMAIL_ADDRESS"
    );
    assert_eq!(json["recognizer_results"][0][0]["end"], 16);
}

#[test]
fn record_round_trips() {
    let record = AnalyzedRecord::new(
        "note",
        FieldValue::scalar("call John Smith"),
        AnalysisOutcome::Flat(vec![DetectionResult::new("PERSON", 5, 15, 0.85, "person")]),
    );
    let json = serde_json::to_string(&record).expect("serialize");
    let round: AnalyzedRecord = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(round, record);
}

#[test]
fn skipped_record_has_empty_outcome() {
    let record = AnalyzedRecord::skipped("age", FieldValue::scalar(0));
    assert!(record.recognizer_results.is_empty());
    assert_eq!(record.value, FieldValue::Scalar(CellValue::Integer(0)));
    assert_eq!(record.text_value_count(), 0);
}

#[test]
fn mapping_consumes_in_order() {
    let mapping = ColumnMapping::from_entries([
        ("b", FieldValue::list([1_i64, 2])),
        ("a", FieldValue::list(["x"])),
    ])
    .expect("mapping");
    assert_eq!(mapping.len(), 2);
    assert!(mapping.contains_key("a"));
    let keys: Vec<String> = mapping.into_iter().map(|(key, _)| key).collect();
    assert_eq!(keys, vec!["b".to_string(), "a".to_string()]);
}

#[test]
fn field_value_cells_cover_scalars_and_lists() {
    let scalar = FieldValue::scalar("x");
    assert_eq!(scalar.cells().count(), 1);
    let list = FieldValue::list([CellValue::Null, CellValue::from("y")]);
    assert_eq!(list.cells().filter(|cell| cell.is_text()).count(), 1);
    assert_eq!(list.len(), 2);
}
