//! CLI library components for the PII scanner.
//!
//! The `pii-scan` binary parses arguments and prints summaries; the scan
//! itself lives here so it can be driven from tests.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod types;
