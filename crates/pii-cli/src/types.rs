use std::collections::BTreeMap;
use std::path::PathBuf;

use pii_analyzer::FailurePolicy;
use pii_ingest::SourceFile;
use pii_model::AnalyzedRecord;

#[derive(Debug)]
pub struct ScanResult {
    pub source: SourceFile,
    pub rows: usize,
    pub language: String,
    pub failure_policy: FailurePolicy,
    pub columns: Vec<ColumnSummary>,
    pub profile_report: Option<PathBuf>,
    pub analysis_report: PathBuf,
}

impl ScanResult {
    pub fn total_findings(&self) -> usize {
        self.columns.iter().map(|column| column.findings).sum()
    }

    /// Columns with at least one detection.
    pub fn flagged_columns(&self) -> usize {
        self.columns
            .iter()
            .filter(|column| column.findings > 0)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSummary {
    pub name: String,
    pub values: usize,
    pub text_values: usize,
    pub values_with_findings: usize,
    pub findings: usize,
    pub entities: BTreeMap<String, usize>,
}

impl ColumnSummary {
    pub fn from_record(record: &AnalyzedRecord) -> Self {
        Self {
            name: record.key.clone(),
            values: record.value.len(),
            text_values: record.text_value_count(),
            values_with_findings: record.recognizer_results.values_with_detections(),
            findings: record.recognizer_results.detection_count(),
            entities: record.recognizer_results.entity_counts(),
        }
    }
}
