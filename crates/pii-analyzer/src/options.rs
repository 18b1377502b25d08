//! Analysis request options and batch policies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Per-request options passed through to the single-text analyzer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeOptions {
    /// Restrict detection to these entity types. `None` means all.
    pub entities: Option<Vec<String>>,
    /// Drop detections scoring below this value.
    pub score_threshold: f32,
    /// Matched texts that are never reported.
    pub allow_list: Vec<String>,
}

impl AnalyzeOptions {
    #[must_use]
    pub fn with_entities<I, S>(mut self, entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entities = Some(entities.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_allow_list<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_list = values.into_iter().map(Into::into).collect();
        self
    }
}

/// What the batch analyzer does when the analyzer fails on one value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Abort the batch on the first failure.
    #[default]
    FailFast,
    /// Log the failure and record an empty result for that value.
    Isolate,
}

impl FailurePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FailFast => "fail-fast",
            Self::Isolate => "isolate",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fail-fast" | "fail_fast" | "failfast" => Ok(Self::FailFast),
            "isolate" => Ok(Self::Isolate),
            other => Err(format!("unknown failure policy '{other}'")),
        }
    }
}
