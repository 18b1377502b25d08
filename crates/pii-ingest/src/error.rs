//! Error types for table ingestion.

use std::path::PathBuf;

use pii_model::ModelError;
use thiserror::Error;

/// Errors that can occur while loading a delimited text file.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Source file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Decoding Errors ===
    /// Bytes are not valid in the configured encoding.
    #[error("failed to decode {path} as {encoding}: {reason}")]
    Decode {
        path: PathBuf,
        encoding: &'static str,
        reason: String,
    },

    /// Encoding name not recognized.
    #[error("unsupported encoding '{0}' (expected utf-8, latin-1 or unicode-escape)")]
    UnknownEncoding(String),

    /// A parsing option is not a single ASCII character.
    #[error("{option} must be an ASCII character, got '{value}'")]
    InvalidOption { option: &'static str, value: char },

    // === CSV Parsing Errors ===
    /// The CSV reader rejected the input.
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// No header row could be read.
    #[error("no columns to parse from {path}")]
    EmptyCsv { path: PathBuf },

    /// A data row has more fields than the header.
    #[error("{path}: expected {expected} fields in line {line}, saw {found}")]
    RowLength {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    /// The column mapping could not be built.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/data/users.csv"),
        };
        assert_eq!(err.to_string(), "file not found: /data/users.csv");
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }
}
