//! Row-oriented PII analysis report.
//!
//! One JSON row per analyzed column:
//! `{"key": ..., "value": [...], "recognizer_results": [...]}`.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use pii_model::{AnalysisOutcome, AnalyzedRecord, DetectionResult, FieldValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// How detection results are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStyle {
    /// Each detection as its display string,
    /// e.g. `"type: PERSON, start: 0, end: 10, score: 0.85"`.
    #[default]
    Rendered,
    /// Each detection as a JSON object.
    Structured,
}

impl ResultStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rendered => "rendered",
            Self::Structured => "structured",
        }
    }
}

impl fmt::Display for ResultStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultStyle {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rendered" | "string" => Ok(Self::Rendered),
            "structured" | "object" => Ok(Self::Structured),
            other => Err(format!("unknown result style '{other}'")),
        }
    }
}

/// Options for the analysis report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub result_style: ResultStyle,
    /// Indent the JSON document.
    pub pretty: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            result_style: ResultStyle::default(),
            pretty: true,
        }
    }
}

/// A report row read back from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub key: String,
    pub value: FieldValue,
    /// Detections as written; shape depends on the [`ResultStyle`] used.
    pub recognizer_results: Value,
}

#[derive(Serialize)]
struct RowRef<'a> {
    key: &'a str,
    value: &'a FieldValue,
    recognizer_results: Value,
}

fn render_detections(results: &[DetectionResult], style: ResultStyle) -> Result<Value> {
    let values = match style {
        ResultStyle::Rendered => results
            .iter()
            .map(|result| Value::String(result.to_string()))
            .collect(),
        ResultStyle::Structured => results
            .iter()
            .map(serde_json::to_value)
            .collect::<serde_json::Result<Vec<_>>>()
            .context("serialize detection result")?,
    };
    Ok(Value::Array(values))
}

fn render_outcome(outcome: &AnalysisOutcome, style: ResultStyle) -> Result<Value> {
    match outcome {
        AnalysisOutcome::Flat(results) => render_detections(results, style),
        AnalysisOutcome::Nested(items) => Ok(Value::Array(
            items
                .iter()
                .map(|results| render_detections(results, style))
                .collect::<Result<Vec<_>>>()?,
        )),
    }
}

/// Renders records into the report document.
pub fn render_analysis_report(
    records: &[AnalyzedRecord],
    options: &ReportOptions,
) -> Result<String> {
    let rows = records
        .iter()
        .map(|record| {
            let recognizer_results =
                render_outcome(&record.recognizer_results, options.result_style)
                    .with_context(|| format!("render results for key {}", record.key))?;
            Ok(RowRef {
                key: &record.key,
                value: &record.value,
                recognizer_results,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let json = if options.pretty {
        serde_json::to_string_pretty(&rows)
    } else {
        serde_json::to_string(&rows)
    };
    json.context("serialize analysis report")
}

/// Writes the report to `path`, creating parent directories.
pub fn write_analysis_report(
    records: &[AnalyzedRecord],
    path: &Path,
    options: &ReportOptions,
) -> Result<()> {
    let document = render_analysis_report(records, options)?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, document).with_context(|| format!("write {}", path.display()))?;
    info!(
        path = %path.display(),
        rows = records.len(),
        style = %options.result_style,
        "analysis report written"
    );
    Ok(())
}

/// Reads a report written by [`write_analysis_report`].
pub fn read_analysis_report(path: &Path) -> Result<Vec<ReportRow>> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))
}
