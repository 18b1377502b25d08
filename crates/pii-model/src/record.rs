use serde::{Deserialize, Serialize};

use crate::cell::FieldValue;
use crate::detection::AnalysisOutcome;

/// Analysis result for one column-mapping entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedRecord {
    pub key: String,
    /// The original value, unchanged.
    pub value: FieldValue,
    pub recognizer_results: AnalysisOutcome,
}

impl AnalyzedRecord {
    pub fn new(key: impl Into<String>, value: FieldValue, recognizer_results: AnalysisOutcome) -> Self {
        Self {
            key: key.into(),
            value,
            recognizer_results,
        }
    }

    /// Record for a value that was not sent to the analyzer.
    pub fn skipped(key: impl Into<String>, value: FieldValue) -> Self {
        Self::new(key, value, AnalysisOutcome::empty())
    }

    /// Count of text cells in the value.
    pub fn text_value_count(&self) -> usize {
        self.value.cells().filter(|cell| cell.is_text()).count()
    }
}
