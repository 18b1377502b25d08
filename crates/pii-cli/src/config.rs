//! Scan configuration file.
//!
//! A TOML file with `[csv]`, `[analysis]` and `[output]` tables plus any
//! number of `[[recognizers]]` entries. Every field is optional; command-line
//! flags override what the file sets.
//!
//! ```toml
//! [csv]
//! delimiter = ","
//! encoding = "utf-8"
//!
//! [analysis]
//! entities = ["EMAIL_ADDRESS", "PERSON"]
//! failure_policy = "isolate"
//!
//! [[recognizers]]
//! name = "employee_id"
//! entity = "EMPLOYEE_ID"
//! patterns = ['\bEMP-\d{5}\b']
//! score = 0.9
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use pii_analyzer::{AnalyzeOptions, FailurePolicy, PatternDefinition};
use pii_ingest::CsvOptions;
use pii_report::{ReportOptions, ResultStyle};

/// Default profile report file name inside the output directory.
pub const PROFILE_REPORT_FILE: &str = "profile_report.json";

/// Default analysis report file name inside the output directory.
pub const ANALYSIS_REPORT_FILE: &str = "analysed_report.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    pub csv: CsvOptions,
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
    /// Custom recognizers registered next to the built-in ones.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recognizers: Vec<PatternDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub language: String,
    pub entities: Option<Vec<String>>,
    pub score_threshold: f32,
    pub allow_list: Vec<String>,
    pub failure_policy: FailurePolicy,
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            entities: None,
            score_threshold: 0.0,
            allow_list: Vec::new(),
            failure_policy: FailurePolicy::default(),
            parallel: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub dir: PathBuf,
    /// Overrides `<dir>/profile_report.json`.
    pub profile_path: Option<PathBuf>,
    /// Overrides `<dir>/analysed_report.json`.
    pub report_path: Option<PathBuf>,
    pub result_style: ResultStyle,
    pub pretty: bool,
    /// Write the profile report.
    pub profile: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            profile_path: None,
            report_path: None,
            result_style: ResultStyle::default(),
            pretty: true,
            profile: true,
        }
    }
}

impl OutputConfig {
    pub fn profile_path(&self) -> PathBuf {
        self.profile_path
            .clone()
            .unwrap_or_else(|| self.dir.join(PROFILE_REPORT_FILE))
    }

    pub fn report_path(&self) -> PathBuf {
        self.report_path
            .clone()
            .unwrap_or_else(|| self.dir.join(ANALYSIS_REPORT_FILE))
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            result_style: self.result_style,
            pretty: self.pretty,
        }
    }
}

impl ScanConfig {
    /// Reads a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Loads `path` when given, otherwise returns defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn analyze_options(&self) -> AnalyzeOptions {
        AnalyzeOptions {
            entities: self.analysis.entities.clone(),
            score_threshold: self.analysis.score_threshold,
            allow_list: self.analysis.allow_list.clone(),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths() {
        let config = ScanConfig::default();
        assert_eq!(
            config.output.profile_path(),
            PathBuf::from("output/profile_report.json")
        );
        assert_eq!(
            config.output.report_path(),
            PathBuf::from("output/analysed_report.json")
        );
    }

    #[test]
    fn default_config_round_trips() {
        let config = ScanConfig::default();
        let text = config.to_toml().expect("serialize");
        assert_eq!(ScanConfig::from_toml_str(&text).expect("parse"), config);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(ScanConfig::from_toml_str("[analysis]\nlanguge = \"en\"\n").is_err());
        assert!(ScanConfig::from_toml_str("[csv]\ndelimeter = \",\"\n").is_err());
        assert!(
            ScanConfig::from_toml_str(
                "[[recognizers]]\nname = \"badge\"\nentity = \"BADGE\"\n\
                 patterns = ['B-\\d+']\nscroe = 0.9\n"
            )
            .is_err()
        );
    }

    #[test]
    fn csv_and_recognizer_tables_are_read() {
        let config = ScanConfig::from_toml_str(
            "[csv]\ndelimiter = \",\"\n\n[[recognizers]]\nname = \"badge\"\n\
             entity = \"BADGE\"\npatterns = ['B-\\d+']\nscore = 0.9\n",
        )
        .expect("parse");
        assert_eq!(config.csv.delimiter, ',');
        assert_eq!(config.recognizers.len(), 1);
        assert_eq!(config.recognizers[0].score, 0.9);
    }
}
