//! PII recognizers and the batch analyzer.
//!
//! - [`Analyzer`]: single-text analysis capability.
//! - [`PatternAnalyzer`]: built-in regex recognizers for common entities.
//! - [`BatchAnalyzer`]: applies an analyzer to lists and column mappings.

pub mod analyzer;
pub mod batch;
pub mod builtin;
pub mod engine;
pub mod error;
pub mod options;
pub mod recognizer;
pub mod validators;

pub use analyzer::Analyzer;
pub use batch::{BatchAnalyzer, DictAnalysis, ValueShape};
pub use builtin::{BUILTIN_ENTITIES, builtin_recognizers};
pub use engine::PatternAnalyzer;
pub use error::{AnalyzerError, BatchError};
pub use options::{AnalyzeOptions, FailurePolicy};
pub use recognizer::{Pattern, PatternDefinition, PatternRecognizer, Recognizer};
