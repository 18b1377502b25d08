//! Detection results and per-value outcomes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One recognized entity occurrence in a single text.
///
/// Offsets are character offsets into the analyzed text, `end` exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Entity type tag (e.g. `EMAIL_ADDRESS`, `PERSON`).
    pub entity_type: String,
    pub start: usize,
    pub end: usize,
    /// Confidence in `[0, 1]`.
    pub score: f32,
    /// Name of the recognizer that produced the detection.
    pub recognizer: String,
}

impl DetectionResult {
    pub fn new(
        entity_type: impl Into<String>,
        start: usize,
        end: usize,
        score: f32,
        recognizer: impl Into<String>,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            start,
            end,
            score,
            recognizer: recognizer.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for DetectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type: {}, start: {}, end: {}, score: {:?}",
            self.entity_type, self.start, self.end, self.score
        )
    }
}

/// Detections for one mapping value.
///
/// A text scalar yields [`AnalysisOutcome::Flat`]; a list yields
/// [`AnalysisOutcome::Nested`] with one inner sequence per list item. Skipped
/// values carry an empty `Flat` outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Nested(Vec<Vec<DetectionResult>>),
    Flat(Vec<DetectionResult>),
}

impl AnalysisOutcome {
    pub fn empty() -> Self {
        Self::Flat(Vec::new())
    }

    /// True when the outcome holds no sequences at all.
    ///
    /// A `Nested` outcome of empty inner sequences is not empty; use
    /// [`Self::detection_count`] to check for findings.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Flat(results) => results.is_empty(),
            Self::Nested(results) => results.is_empty(),
        }
    }

    pub fn detection_count(&self) -> usize {
        self.detections().count()
    }

    /// Iterates over every detection, flattening nested sequences in order.
    pub fn detections(&self) -> Box<dyn Iterator<Item = &DetectionResult> + '_> {
        match self {
            Self::Flat(results) => Box::new(results.iter()),
            Self::Nested(results) => Box::new(results.iter().flatten()),
        }
    }

    /// Number of analyzed values that produced at least one detection.
    pub fn values_with_detections(&self) -> usize {
        match self {
            Self::Flat(results) => usize::from(!results.is_empty()),
            Self::Nested(results) => results.iter().filter(|inner| !inner.is_empty()).count(),
        }
    }

    /// Detection counts per entity type.
    pub fn entity_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for detection in self.detections() {
            *counts.entry(detection.entity_type.clone()).or_insert(0) += 1;
        }
        counts
    }
}

impl Default for AnalysisOutcome {
    fn default() -> Self {
        Self::empty()
    }
}
