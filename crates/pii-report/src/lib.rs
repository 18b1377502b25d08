//! Report generation for PII scans.
//!
//! - **Analysis report**: row-oriented JSON of per-column detections
//! - **Profile report**: table and column statistics of the scanned file

mod analysis;
mod profile;

pub use analysis::{
    ReportOptions, ReportRow, ResultStyle, read_analysis_report, render_analysis_report,
    write_analysis_report,
};
pub use profile::{ColumnProfile, NumericStats, ProfileReport, TableStats, TextStats};
