//! Exploratory profile of a loaded table.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use polars::prelude::{AnyValue, Column, DataFrame, DataType};
use serde::{Deserialize, Serialize};
use tracing::info;

use pii_ingest::{SourceFile, any_to_f64, any_to_string};

/// Table-level statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableStats {
    pub rows: usize,
    pub columns: usize,
    pub missing_cells: usize,
    /// Share of missing cells in `[0, 1]`.
    pub missing_ratio: f64,
    pub duplicate_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Sample standard deviation; absent with fewer than two values.
    pub std: Option<f64>,
}

/// Character-length statistics of a text column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStats {
    pub min_length: usize,
    pub max_length: usize,
    pub mean_length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub dtype: String,
    /// Present (non-null) cells.
    pub count: usize,
    pub missing: usize,
    pub distinct: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextStats>,
}

/// Profile of one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileReport {
    pub title: String,
    /// RFC 3339 timestamp.
    pub generated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceFile>,
    pub table: TableStats,
    pub columns: Vec<ColumnProfile>,
}

impl ProfileReport {
    /// Profiles every column of `df`.
    pub fn profile(df: &DataFrame, title: impl Into<String>) -> Self {
        let columns: Vec<ColumnProfile> = df.get_columns().iter().map(profile_column).collect();
        let missing_cells: usize = columns.iter().map(|column| column.missing).sum();
        let total_cells = df.height() * df.width();
        let missing_ratio = if total_cells == 0 {
            0.0
        } else {
            missing_cells as f64 / total_cells as f64
        };
        Self {
            title: title.into(),
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            source: None,
            table: TableStats {
                rows: df.height(),
                columns: df.width(),
                missing_cells,
                missing_ratio,
                duplicate_rows: duplicate_rows(df),
            },
            columns,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: SourceFile) -> Self {
        self.source = Some(source);
        self
    }

    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serialize profile report")
    }

    /// Writes the JSON profile to `path`, creating parent directories.
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
        info!(
            path = %path.display(),
            columns = self.columns.len(),
            "profile report written"
        );
        Ok(())
    }
}

fn cell(column: &Column, idx: usize) -> AnyValue<'_> {
    column.get(idx).unwrap_or(AnyValue::Null)
}

fn profile_column(column: &Column) -> ColumnProfile {
    let height = column.len();
    let missing = column.null_count();
    let mut distinct = HashSet::new();
    for idx in 0..height {
        let value = cell(column, idx);
        if !matches!(value, AnyValue::Null) {
            distinct.insert(any_to_string(value));
        }
    }
    let dtype = column.dtype();
    let numeric = if dtype.is_primitive_numeric() {
        numeric_stats(column)
    } else {
        None
    };
    let text = if matches!(dtype, DataType::String) {
        text_stats(column)
    } else {
        None
    };
    ColumnProfile {
        name: column.name().to_string(),
        dtype: dtype.to_string(),
        count: height - missing,
        missing,
        distinct: distinct.len(),
        numeric,
        text,
    }
}

fn numeric_stats(column: &Column) -> Option<NumericStats> {
    let values: Vec<f64> = (0..column.len())
        .filter_map(|idx| any_to_f64(cell(column, idx)))
        .filter(|value| value.is_finite())
        .collect();
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / n;
    let std = (values.len() > 1).then(|| {
        let variance = values
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>()
            / (n - 1.0);
        variance.sqrt()
    });
    Some(NumericStats {
        min,
        max,
        mean,
        std,
    })
}

fn text_stats(column: &Column) -> Option<TextStats> {
    let lengths: Vec<usize> = (0..column.len())
        .filter_map(|idx| match cell(column, idx) {
            AnyValue::Null => None,
            value => Some(any_to_string(value).chars().count()),
        })
        .collect();
    let min_length = *lengths.iter().min()?;
    let max_length = *lengths.iter().max()?;
    Some(TextStats {
        min_length,
        max_length,
        mean_length: lengths.iter().sum::<usize>() as f64 / lengths.len() as f64,
    })
}

fn duplicate_rows(df: &DataFrame) -> usize {
    let columns = df.get_columns();
    let mut seen = HashSet::with_capacity(df.height());
    let mut duplicates = 0;
    for idx in 0..df.height() {
        let key: Vec<Option<String>> = columns
            .iter()
            .map(|column| match cell(column, idx) {
                AnyValue::Null => None,
                value => Some(any_to_string(value)),
            })
            .collect();
        if !seen.insert(key) {
            duplicates += 1;
        }
    }
    duplicates
}
