//! Recognizer trait and the regex-backed pattern recognizer.
//!
//! A [`Recognizer`] finds one entity type in a text. The
//! [`crate::PatternAnalyzer`] holds a registry of recognizers and merges
//! their output.

use std::collections::BTreeMap;

use pii_model::DetectionResult;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::AnalyzerError;
use crate::validators::{Trimmer, Validator};

/// Finds occurrences of a single entity type.
pub trait Recognizer: Send + Sync {
    /// Unique recognizer name, reported on every detection.
    fn name(&self) -> &str;

    /// Entity type produced by this recognizer.
    fn entity(&self) -> &str;

    /// Language this recognizer serves.
    fn supported_language(&self) -> &str {
        "en"
    }

    /// Returns detections with character offsets into `text`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Recognizer`] when the recognizer cannot
    /// process the text.
    fn analyze(&self, text: &str) -> Result<Vec<DetectionResult>, AnalyzerError>;
}

/// One compiled regex with its score.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub name: String,
    pub regex: Regex,
    pub score: f32,
}

impl Pattern {
    /// Compiles `expression` into a pattern owned by `recognizer`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::InvalidPattern`] when the expression does not
    /// compile.
    pub fn new(
        recognizer: &str,
        name: impl Into<String>,
        expression: &str,
        score: f32,
    ) -> Result<Self, AnalyzerError> {
        let regex = Regex::new(expression).map_err(|error| AnalyzerError::InvalidPattern {
            recognizer: recognizer.to_string(),
            message: error.to_string(),
        })?;
        Ok(Self {
            name: name.into(),
            regex,
            score,
        })
    }
}

/// Regex recognizer with an optional match validator.
#[derive(Debug, Clone)]
pub struct PatternRecognizer {
    name: String,
    entity: String,
    language: String,
    patterns: Vec<Pattern>,
    validator: Option<Validator>,
    trimmer: Option<Trimmer>,
}

impl PatternRecognizer {
    pub fn new(
        name: impl Into<String>,
        entity: impl Into<String>,
        patterns: Vec<Pattern>,
    ) -> Self {
        Self {
            name: name.into(),
            entity: entity.into(),
            language: "en".to_string(),
            patterns,
            validator: None,
            trimmer: None,
        }
    }

    #[must_use]
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Narrow each match before it is reported.
    #[must_use]
    pub fn with_trimmer(mut self, trimmer: Trimmer) -> Self {
        self.trimmer = Some(trimmer);
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }
}

impl Recognizer for PatternRecognizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn entity(&self) -> &str {
        &self.entity
    }

    fn supported_language(&self) -> &str {
        &self.language
    }

    fn analyze(&self, text: &str) -> Result<Vec<DetectionResult>, AnalyzerError> {
        // (start, end) -> best score; identical spans from several patterns
        // collapse into one detection.
        let mut spans: BTreeMap<(usize, usize), f32> = BTreeMap::new();
        for pattern in &self.patterns {
            for found in pattern.regex.find_iter(text) {
                if found.as_str().is_empty() {
                    continue;
                }
                if let Some(validator) = self.validator
                    && !validator(found.as_str())
                {
                    continue;
                }
                let (from, to) = match self.trimmer {
                    Some(trimmer) => match trimmer(found.as_str()) {
                        Some((from, to)) => (found.start() + from, found.start() + to),
                        None => continue,
                    },
                    None => (found.start(), found.end()),
                };
                let start = char_offset(text, from);
                let end = start + text[from..to].chars().count();
                let best = spans.entry((start, end)).or_insert(pattern.score);
                if pattern.score > *best {
                    *best = pattern.score;
                }
            }
        }
        Ok(spans
            .into_iter()
            .map(|((start, end), score)| {
                DetectionResult::new(self.entity.as_str(), start, end, score, self.name.as_str())
            })
            .collect())
    }
}

fn char_offset(text: &str, byte: usize) -> usize {
    if text.is_ascii() {
        return byte;
    }
    text.get(..byte)
        .map_or(byte, |prefix| prefix.chars().count())
}

/// User-supplied recognizer definition, typically read from configuration.
///
/// At least one of `patterns` or `deny_list` must be non-empty. Deny-list
/// terms match whole words, case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternDefinition {
    pub name: String,
    pub entity: String,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub deny_list: Vec<String>,
    #[serde(default = "default_definition_score")]
    pub score: f32,
    #[serde(default = "default_definition_language")]
    pub language: String,
}

fn default_definition_score() -> f32 {
    0.5
}

fn default_definition_language() -> String {
    "en".to_string()
}

impl PatternDefinition {
    /// Compiles the definition into a recognizer.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::InvalidRecognizer`] for an empty definition
    /// or an out-of-range score, and [`AnalyzerError::InvalidPattern`] when a
    /// pattern does not compile.
    pub fn build(&self) -> Result<PatternRecognizer, AnalyzerError> {
        let invalid = |reason: &str| AnalyzerError::InvalidRecognizer {
            recognizer: self.name.clone(),
            reason: reason.to_string(),
        };
        if self.name.trim().is_empty() {
            return Err(invalid("name is empty"));
        }
        if self.entity.trim().is_empty() {
            return Err(invalid("entity is empty"));
        }
        if self.patterns.is_empty() && self.deny_list.is_empty() {
            return Err(invalid("needs at least one pattern or deny-list term"));
        }
        if !(0.0..=1.0).contains(&self.score) {
            return Err(invalid("score must be within 0 and 1"));
        }

        let mut patterns = self
            .patterns
            .iter()
            .enumerate()
            .map(|(idx, expression)| {
                Pattern::new(&self.name, format!("{}_{idx}", self.name), expression, self.score)
            })
            .collect::<Result<Vec<_>, _>>()?;

        if !self.deny_list.is_empty() {
            let alternation = self
                .deny_list
                .iter()
                .map(|term| regex::escape(term.trim()))
                .collect::<Vec<_>>()
                .join("|");
            let regex = RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
                .case_insensitive(true)
                .build()
                .map_err(|error| AnalyzerError::InvalidPattern {
                    recognizer: self.name.clone(),
                    message: error.to_string(),
                })?;
            patterns.push(Pattern {
                name: format!("{}_deny_list", self.name),
                regex,
                score: self.score,
            });
        }

        Ok(
            PatternRecognizer::new(self.name.trim(), self.entity.trim(), patterns)
                .with_language(self.language.trim()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recognizer(expression: &str) -> PatternRecognizer {
        let pattern = Pattern::new("test", "test", expression, 0.5).expect("pattern");
        PatternRecognizer::new("test", "TEST", vec![pattern])
    }

    #[test]
    fn offsets_are_characters() {
        let found = recognizer(r"\d+").analyze("Zoë 42").expect("analyze");
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].start, found[0].end), (4, 6));
    }

    #[test]
    fn validator_discards_matches() {
        let found = recognizer(r"\d+")
            .with_validator(|text| text != "13")
            .analyze("12 13 14")
            .expect("analyze");
        let starts: Vec<usize> = found.iter().map(|result| result.start).collect();
        assert_eq!(starts, vec![0, 6]);
    }

    #[test]
    fn identical_spans_keep_best_score() {
        let low = Pattern::new("test", "low", r"\d+", 0.3).expect("pattern");
        let high = Pattern::new("test", "high", r"\d{2}", 0.7).expect("pattern");
        let found = PatternRecognizer::new("test", "TEST", vec![low, high])
            .analyze("42")
            .expect("analyze");
        assert_eq!(found.len(), 1);
        assert!((found[0].score - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = Pattern::new("broken", "p", "(", 0.5).unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidPattern { .. }));
    }

    #[test]
    fn deny_list_matches_whole_words() {
        let definition = PatternDefinition {
            name: "titles".to_string(),
            entity: "TITLE".to_string(),
            patterns: Vec::new(),
            deny_list: vec!["Dr".to_string(), "Mrs".to_string()],
            score: 0.6,
            language: "en".to_string(),
        };
        let found = definition
            .build()
            .expect("build")
            .analyze("dr Who and Drew met MRS Hudson")
            .expect("analyze");
        let spans: Vec<(usize, usize)> = found.iter().map(|r| (r.start, r.end)).collect();
        assert_eq!(spans, vec![(0, 2), (20, 23)]);
    }

    #[test]
    fn empty_definition_is_rejected() {
        let definition = PatternDefinition {
            name: "empty".to_string(),
            entity: "X".to_string(),
            patterns: Vec::new(),
            deny_list: Vec::new(),
            score: 0.5,
            language: "en".to_string(),
        };
        assert!(matches!(
            definition.build(),
            Err(AnalyzerError::InvalidRecognizer { .. })
        ));
    }
}
