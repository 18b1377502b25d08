use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pii_analyzer::{
    AnalyzeOptions, Analyzer, AnalyzerError, BatchAnalyzer, BatchError, FailurePolicy,
    PatternAnalyzer,
};
use pii_model::{AnalysisOutcome, CellValue, ColumnMapping, DetectionResult, FieldValue};
use proptest::prelude::*;

/// Flags every text as one `TOKEN` spanning the whole value; fails on
/// `"boom!"`.
#[derive(Default)]
struct TokenAnalyzer {
    calls: AtomicUsize,
}

impl TokenAnalyzer {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Analyzer for TokenAnalyzer {
    fn analyze(
        &self,
        text: &str,
        _language: &str,
        _options: &AnalyzeOptions,
    ) -> Result<Vec<DetectionResult>, AnalyzerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text == "boom!" {
            return Err(AnalyzerError::Recognizer {
                recognizer: "token".to_string(),
                message: "exploded".to_string(),
            });
        }
        if text.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![DetectionResult::new(
            "TOKEN",
            0,
            text.chars().count(),
            0.5,
            "token",
        )])
    }

    fn supported_entities(&self) -> Vec<String> {
        vec!["TOKEN".to_string()]
    }
}

fn token(text: &str) -> Vec<DetectionResult> {
    TokenAnalyzer::default()
        .analyze(text, "en", &AnalyzeOptions::default())
        .expect("token analysis")
}

fn keys(records: &[pii_model::AnalyzedRecord]) -> Vec<&str> {
    records.iter().map(|record| record.key.as_str()).collect()
}

#[test]
fn list_mixes_text_and_other_values() {
    let batch = BatchAnalyzer::new(TokenAnalyzer::default());
    let items = vec![
        CellValue::from("ab"),
        CellValue::Integer(7),
        CellValue::Null,
        CellValue::from(""),
        CellValue::from("xyz"),
    ];
    let results = batch
        .analyze_list(&items, "en", &AnalyzeOptions::default())
        .expect("analyze list");
    assert_eq!(
        results,
        vec![token("ab"), vec![], vec![], vec![], token("xyz")]
    );
    // Empty strings still reach the analyzer; non-text items never do.
    assert_eq!(batch.analyzer().calls(), 3);
}

#[test]
fn empty_list_gives_empty_result() {
    let batch = BatchAnalyzer::new(TokenAnalyzer::default());
    let results = batch
        .analyze_list(&[], "en", &AnalyzeOptions::default())
        .expect("analyze list");
    assert!(results.is_empty());
    assert_eq!(batch.analyzer().calls(), 0);
}

#[test]
fn falsy_values_are_skipped() {
    let batch = BatchAnalyzer::new(TokenAnalyzer::default());
    let input = vec![
        ("empty".to_string(), FieldValue::scalar("")),
        ("list".to_string(), FieldValue::List(Vec::new())),
        ("null".to_string(), FieldValue::scalar(CellValue::Null)),
        ("zero".to_string(), FieldValue::scalar(0_i64)),
        ("zero_float".to_string(), FieldValue::scalar(-0.0_f64)),
        ("false".to_string(), FieldValue::scalar(false)),
        ("nan".to_string(), FieldValue::scalar(f64::NAN)),
        ("number".to_string(), FieldValue::scalar(42_i64)),
    ];
    let records = batch
        .analyze_dict(input, "en", &AnalyzeOptions::default())
        .collect_records()
        .expect("analyze dict");
    assert_eq!(records.len(), 8);
    for record in &records {
        assert_eq!(record.recognizer_results, AnalysisOutcome::empty(), "{}", record.key);
    }
    assert_eq!(records[3].value, FieldValue::scalar(0_i64));
    assert_eq!(batch.analyzer().calls(), 0);
}

#[test]
fn text_scalar_matches_direct_call() {
    let batch = BatchAnalyzer::new(TokenAnalyzer::default());
    let records = batch
        .analyze_dict(
            [("note".to_string(), FieldValue::scalar("hello"))],
            "en",
            &AnalyzeOptions::default(),
        )
        .collect_records()
        .expect("analyze dict");
    assert_eq!(records[0].recognizer_results, AnalysisOutcome::Flat(token("hello")));
    assert_eq!(records[0].value, FieldValue::scalar("hello"));
}

#[test]
fn reference_scenario() {
    let analyzer = PatternAnalyzer::new().expect("builtins");
    let batch = BatchAnalyzer::new(&analyzer);
    let mut mapping = ColumnMapping::new();
    mapping
        .insert("name", FieldValue::list(["John Smith", ""]))
        .expect("insert name");
    mapping
        .insert("age", FieldValue::list([34_i64, 29]))
        .expect("insert age");

    let records = batch
        .analyze_dict(mapping, "en", &AnalyzeOptions::default())
        .collect_records()
        .expect("analyze dict");

    assert_eq!(keys(&records), vec!["name", "age"]);
    assert_eq!(
        records[0].recognizer_results,
        AnalysisOutcome::Nested(vec![
            vec![DetectionResult::new("PERSON", 0, 10, 0.85, "person")],
            vec![],
        ])
    );
    assert_eq!(
        records[1].recognizer_results,
        AnalysisOutcome::Nested(vec![vec![], vec![]])
    );
    assert_eq!(records[1].value, FieldValue::list([34_i64, 29]));
}

#[test]
fn fail_fast_yields_one_error_then_stops() {
    let batch = BatchAnalyzer::new(TokenAnalyzer::default());
    let input = vec![
        ("a".to_string(), FieldValue::scalar("fine")),
        ("b".to_string(), FieldValue::list(["ok", "boom!"])),
        ("c".to_string(), FieldValue::scalar("never")),
    ];
    let mut analysis = batch.analyze_dict(input, "en", &AnalyzeOptions::default());

    assert!(analysis.next().expect("first").is_ok());
    let err = analysis.next().expect("second").unwrap_err();
    assert!(matches!(
        &err,
        BatchError::ListItem { key, index: 1, .. } if key == "b"
    ));
    assert!(analysis.next().is_none());
    assert!(analysis.next().is_none());
    assert_eq!(batch.analyzer().calls(), 3);
}

#[test]
fn fail_fast_on_scalar_names_the_key() {
    let batch = BatchAnalyzer::new(TokenAnalyzer::default());
    let err = batch
        .analyze_dict(
            [("x".to_string(), FieldValue::scalar("boom!"))],
            "en",
            &AnalyzeOptions::default(),
        )
        .collect_records()
        .unwrap_err();
    assert_eq!(err.to_string(), "key 'x': recognizer 'token' failed: exploded");
}

#[test]
fn isolation_substitutes_empty_results() {
    let batch =
        BatchAnalyzer::new(TokenAnalyzer::default()).with_failure_policy(FailurePolicy::Isolate);
    let input = vec![
        ("a".to_string(), FieldValue::scalar("boom!")),
        ("b".to_string(), FieldValue::list(["ok", "boom!", "fine"])),
    ];
    let records = batch
        .analyze_dict(input, "en", &AnalyzeOptions::default())
        .collect_records()
        .expect("isolated failures never surface");
    assert_eq!(records[0].recognizer_results, AnalysisOutcome::Flat(vec![]));
    assert_eq!(
        records[1].recognizer_results,
        AnalysisOutcome::Nested(vec![token("ok"), vec![], token("fine")])
    );
}

#[test]
fn unsupported_language_fails_fast() {
    let analyzer = PatternAnalyzer::new().expect("builtins");
    let batch = BatchAnalyzer::new(&analyzer);
    let err = batch
        .analyze_list(&[CellValue::from("John Smith")], "de", &AnalyzeOptions::default())
        .unwrap_err();
    assert!(matches!(
        err.analyzer_error(),
        Some(AnalyzerError::UnsupportedLanguage { .. })
    ));
}

#[test]
fn duplicate_keys_are_rejected() {
    let batch = BatchAnalyzer::new(TokenAnalyzer::default());
    let input = vec![
        ("k".to_string(), FieldValue::scalar("one")),
        ("k".to_string(), FieldValue::scalar("two")),
    ];
    let mut analysis = batch.analyze_dict(input, "en", &AnalyzeOptions::default());
    assert!(analysis.next().expect("first").is_ok());
    assert_eq!(
        analysis.next().expect("second").unwrap_err(),
        BatchError::DuplicateKey("k".to_string())
    );
    assert!(analysis.next().is_none());
}

#[test]
fn emission_is_lazy() {
    let batch = BatchAnalyzer::new(TokenAnalyzer::default());
    let input = vec![
        ("a".to_string(), FieldValue::scalar("one")),
        ("b".to_string(), FieldValue::scalar("two")),
    ];
    let mut analysis = batch.analyze_dict(input, "en", &AnalyzeOptions::default());
    assert_eq!(batch.analyzer().calls(), 0);
    let _ = analysis.next();
    assert_eq!(batch.analyzer().calls(), 1);
}

#[test]
fn shared_analyzer_through_arc() {
    let analyzer = Arc::new(TokenAnalyzer::default());
    let batch = BatchAnalyzer::new(Arc::clone(&analyzer));
    batch
        .analyze_list(&[CellValue::from("a")], "en", &AnalyzeOptions::default())
        .expect("analyze");
    assert_eq!(analyzer.calls(), 1);
}

fn cell_strategy() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        "[a-zA-Z ]{0,12}".prop_map(CellValue::Text),
        any::<i64>().prop_map(CellValue::Integer),
        any::<bool>().prop_map(CellValue::Boolean),
        Just(CellValue::Null),
    ]
}

proptest! {
    #[test]
    fn list_output_is_index_aligned(items in prop::collection::vec(cell_strategy(), 0..32)) {
        let batch = BatchAnalyzer::new(TokenAnalyzer::default());
        let results = batch
            .analyze_list(&items, "en", &AnalyzeOptions::default())
            .expect("analyze list");
        prop_assert_eq!(results.len(), items.len());
        for (item, result) in items.iter().zip(&results) {
            match item.as_text() {
                Some(text) => prop_assert_eq!(result, &token(text)),
                None => prop_assert!(result.is_empty()),
            }
        }
    }

    #[test]
    fn parallel_matches_sequential(items in prop::collection::vec(cell_strategy(), 0..64)) {
        let options = AnalyzeOptions::default();
        let sequential = BatchAnalyzer::new(TokenAnalyzer::default())
            .analyze_list(&items, "en", &options)
            .expect("sequential");
        let parallel = BatchAnalyzer::new(TokenAnalyzer::default())
            .with_parallel(true)
            .analyze_list(&items, "en", &options)
            .expect("parallel");
        prop_assert_eq!(sequential, parallel);
    }

    #[test]
    fn dict_preserves_key_order(
        keys in prop::collection::hash_set("[a-z]{1,8}", 0..16),
        text in "[a-z]{0,6}",
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let input: Vec<(String, FieldValue)> = keys
            .iter()
            .map(|key| (key.clone(), FieldValue::scalar(text.as_str())))
            .collect();
        let batch = BatchAnalyzer::new(TokenAnalyzer::default());
        let records = batch
            .analyze_dict(input, "en", &AnalyzeOptions::default())
            .collect_records()
            .expect("analyze dict");
        let out: Vec<String> = records.into_iter().map(|record| record.key).collect();
        prop_assert_eq!(out, keys);
    }
}

#[test]
fn parallel_fail_fast_reports_first_failing_index() {
    let batch = BatchAnalyzer::new(TokenAnalyzer::default()).with_parallel(true);
    let items: Vec<CellValue> = (0..100)
        .map(|idx| {
            if idx == 40 || idx == 80 {
                CellValue::from("boom!")
            } else {
                CellValue::from(format!("v{idx}"))
            }
        })
        .collect();
    let err = batch
        .analyze_list(&items, "en", &AnalyzeOptions::default())
        .unwrap_err();
    assert!(matches!(err, BatchError::Item { index: 40, .. }));
}
