use anyhow::{Context, Result};
use comfy_table::Table;

use pii_analyzer::FailurePolicy;
use pii_cli::config::ScanConfig;
use pii_cli::pipeline::{self, build_analyzer};
use pii_cli::types::ScanResult;
use pii_ingest::TextEncoding;
use pii_report::ResultStyle;

use crate::cli::{EncodingArg, FailurePolicyArg, RecognizersArgs, ResultStyleArg, ScanArgs};
use crate::summary::{apply_table_style, header_cell};

pub fn run_recognizers(args: &RecognizersArgs) -> Result<()> {
    let config = ScanConfig::load_or_default(args.config.as_deref())?;
    let analyzer = build_analyzer(&config)?;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Recognizer"),
        header_cell("Entity"),
        header_cell("Language"),
    ]);
    apply_table_style(&mut table);
    for recognizer in analyzer.recognizers() {
        table.add_row(vec![
            recognizer.name(),
            recognizer.entity(),
            recognizer.supported_language(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_scan(args: &ScanArgs) -> Result<ScanResult> {
    let config = build_config(args)?;
    pipeline::run_scan(&args.input, &config)
        .with_context(|| format!("scan {}", args.input.display()))
}

/// Defaults, then the configuration file, then command-line flags.
pub fn build_config(args: &ScanArgs) -> Result<ScanConfig> {
    let mut config = ScanConfig::load_or_default(args.config.as_deref())?;

    let csv = &mut config.csv;
    if let Some(delimiter) = args.delimiter {
        csv.delimiter = delimiter;
    }
    if let Some(quote) = args.quote {
        csv.quote = quote;
    }
    if let Some(encoding) = args.encoding {
        csv.encoding = match encoding {
            EncodingArg::Utf8 => TextEncoding::Utf8,
            EncodingArg::Latin1 => TextEncoding::Latin1,
            EncodingArg::UnicodeEscape => TextEncoding::UnicodeEscape,
        };
    }
    if args.no_skip_initial_space {
        csv.skip_initial_space = false;
    }

    let analysis = &mut config.analysis;
    if let Some(language) = &args.language {
        analysis.language.clone_from(language);
    }
    if let Some(entities) = &args.entities {
        analysis.entities = Some(entities.clone());
    }
    if let Some(threshold) = args.score_threshold {
        analysis.score_threshold = threshold;
    }
    analysis.allow_list.extend(args.allow.iter().cloned());
    if let Some(policy) = args.failure_policy {
        analysis.failure_policy = match policy {
            FailurePolicyArg::FailFast => FailurePolicy::FailFast,
            FailurePolicyArg::Isolate => FailurePolicy::Isolate,
        };
    }
    if args.parallel {
        analysis.parallel = true;
    }

    let output = &mut config.output;
    if let Some(dir) = &args.output_dir {
        output.dir.clone_from(dir);
    }
    if let Some(path) = &args.profile_path {
        output.profile_path = Some(path.clone());
    }
    if let Some(path) = &args.report_path {
        output.report_path = Some(path.clone());
    }
    if let Some(style) = args.result_style {
        output.result_style = match style {
            ResultStyleArg::Rendered => ResultStyle::Rendered,
            ResultStyleArg::Structured => ResultStyle::Structured,
        };
    }
    if args.no_profile {
        output.profile = false;
    }
    if args.compact {
        output.pretty = false;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use clap::Parser;
    use tempfile::TempDir;

    use super::*;
    use crate::cli::{Cli, Command};

    fn scan_args(argv: &[&str]) -> ScanArgs {
        let mut full = vec!["pii-scan", "scan"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).expect("parse").command {
            Command::Scan(args) => args,
            Command::Recognizers(_) => panic!("expected scan"),
        }
    }

    #[test]
    fn flags_without_config_override_defaults() {
        let args = scan_args(&[
            "data.csv",
            "--delimiter",
            ",",
            "--encoding",
            "utf-8",
            "--entities",
            "PERSON,EMAIL_ADDRESS",
            "--failure-policy",
            "isolate",
            "--no-profile",
            "--compact",
        ]);
        let config = build_config(&args).expect("config");
        assert_eq!(config.csv.delimiter, ',');
        assert_eq!(config.csv.encoding, TextEncoding::Utf8);
        assert_eq!(
            config.analysis.entities,
            Some(vec!["PERSON".to_string(), "EMAIL_ADDRESS".to_string()])
        );
        assert_eq!(config.analysis.failure_policy, FailurePolicy::Isolate);
        assert!(!config.output.profile);
        assert!(!config.output.pretty);
        assert_eq!(config.csv.quote, '"');
    }

    #[test]
    fn flags_take_precedence_over_config_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("scan.toml");
        fs::write(
            &path,
            "[csv]\ndelimiter = \"|\"\n\n[analysis]\nlanguage = \"en\"\nscore_threshold = 0.5\n\
             allow_list = [\"ACME\"]\n\n[output]\ndir = \"reports\"\n",
        )
        .expect("write config");
        let args = scan_args(&[
            "data.csv",
            "--config",
            path.to_str().expect("utf-8 path"),
            "--score-threshold",
            "0.8",
            "--allow",
            "Jane",
        ]);
        let config = build_config(&args).expect("config");
        assert_eq!(config.csv.delimiter, '|');
        assert_eq!(config.analysis.score_threshold, 0.8);
        assert_eq!(config.analysis.allow_list, vec!["ACME", "Jane"]);
        assert_eq!(
            config.output.report_path(),
            PathBuf::from("reports/analysed_report.json")
        );
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = scan_args(&["data.csv", "--config", "/nonexistent/scan.toml"]);
        let error = build_config(&args).expect_err("missing file");
        assert!(error.to_string().contains("read config"));
    }
}
