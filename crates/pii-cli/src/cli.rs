//! CLI argument definitions for the PII scanner.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "pii-scan",
    version,
    about = "PII scanner - Detect personal data in delimited files",
    long_about = "Detect personal data in the columns of a delimited text file.\n\n\
                  Writes a profile report of the table and an analysis report with\n\
                  the detected entities of every value, column by column."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values in log output.
    ///
    /// Values are replaced with a placeholder by default since they may
    /// contain the very data the scan is looking for.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan a delimited file and write the profile and analysis reports.
    Scan(ScanArgs),

    /// List the recognizers a scan would run.
    Recognizers(RecognizersArgs),
}

#[derive(Parser)]
pub struct RecognizersArgs {
    /// Also list the custom recognizers defined in this configuration file.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ScanArgs {
    /// Path to the delimited input file.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// TOML configuration file; flags given here take precedence.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output directory for the reports (default: output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Profile report path (default: <DIR>/profile_report.json).
    #[arg(long = "profile-path", value_name = "PATH")]
    pub profile_path: Option<PathBuf>,

    /// Analysis report path (default: <DIR>/analysed_report.json).
    #[arg(long = "report-path", value_name = "PATH")]
    pub report_path: Option<PathBuf>,

    /// Language passed to the analyzer.
    #[arg(long = "language", value_name = "CODE")]
    pub language: Option<String>,

    /// Only report these entity types (comma separated).
    #[arg(long = "entities", value_name = "ENTITY", value_delimiter = ',')]
    pub entities: Option<Vec<String>>,

    /// Drop detections scoring below this value.
    #[arg(long = "score-threshold", value_name = "SCORE")]
    pub score_threshold: Option<f32>,

    /// Matched text that is never reported (repeatable).
    #[arg(long = "allow", value_name = "TEXT")]
    pub allow: Vec<String>,

    /// Field separator.
    #[arg(long = "delimiter", value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Quote character.
    #[arg(long = "quote", value_name = "CHAR")]
    pub quote: Option<char>,

    /// Text encoding of the input file.
    #[arg(long = "encoding", value_enum)]
    pub encoding: Option<EncodingArg>,

    /// Keep spaces that follow a separator.
    #[arg(long = "no-skip-initial-space")]
    pub no_skip_initial_space: bool,

    /// How detections are written to the analysis report.
    #[arg(long = "result-style", value_enum)]
    pub result_style: Option<ResultStyleArg>,

    /// What happens when analysis of a single value fails.
    ///
    /// `fail-fast` aborts the scan with the first error. `isolate` logs the
    /// error and records an empty result for that value.
    #[arg(long = "failure-policy", value_enum)]
    pub failure_policy: Option<FailurePolicyArg>,

    /// Analyze the values of a list column in parallel.
    #[arg(long = "parallel")]
    pub parallel: bool,

    /// Skip the profile report.
    #[arg(long = "no-profile")]
    pub no_profile: bool,

    /// Write the analysis report without indentation.
    #[arg(long = "compact")]
    pub compact: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum EncodingArg {
    #[value(name = "utf-8", alias = "utf8")]
    Utf8,
    #[value(name = "latin-1", alias = "latin1")]
    Latin1,
    UnicodeEscape,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ResultStyleArg {
    Rendered,
    Structured,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FailurePolicyArg {
    FailFast,
    Isolate,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
