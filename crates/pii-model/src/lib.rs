//! Data model shared by the PII scan crates.
//!
//! The types here describe the three shapes the batch analyzer works with:
//!
//! - **Input**: [`ColumnMapping`], an ordered mapping from column name to a
//!   [`FieldValue`] (a single [`CellValue`] or a list of them).
//! - **Detections**: [`DetectionResult`], one recognized entity occurrence,
//!   grouped per value into an [`AnalysisOutcome`].
//! - **Output**: [`AnalyzedRecord`], one per mapping entry, carrying the
//!   original value next to its outcome.

pub mod cell;
pub mod detection;
pub mod error;
pub mod mapping;
pub mod record;

pub use cell::{CellValue, FieldValue};
pub use detection::{AnalysisOutcome, DetectionResult};
pub use error::{ModelError, Result};
pub use mapping::ColumnMapping;
pub use record::AnalyzedRecord;
