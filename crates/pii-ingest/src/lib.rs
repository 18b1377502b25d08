//! Delimited text ingestion for PII scanning.
//!
//! Reads a file with configurable separator, quoting, whitespace and
//! encoding handling, types it into a Polars `DataFrame`, and exposes the
//! column-oriented [`pii_model::ColumnMapping`] the batch analyzer consumes.

pub mod csv_table;
pub mod decode;
pub mod error;
pub mod frame;
pub mod options;
pub mod polars_utils;

pub use csv_table::{
    CsvTable, LoadedTable, SourceFile, build_frame, load_table, read_csv_table,
};
pub use decode::{decode_bytes, unescape};
pub use error::{IngestError, Result};
pub use frame::frame_to_column_mapping;
pub use options::{CsvOptions, DEFAULT_NA_VALUES, TextEncoding};
pub use polars_utils::{any_to_cell, any_to_f64, any_to_string, format_numeric};
