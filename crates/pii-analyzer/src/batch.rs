//! Batch analysis over lists and column mappings.
//!
//! [`BatchAnalyzer`] wraps any single-text [`Analyzer`] and applies it to
//! every text value of a list ([`BatchAnalyzer::analyze_list`]) or of a
//! key/value mapping ([`BatchAnalyzer::analyze_dict`]). Non-text values are
//! never sent to the analyzer; they produce empty result sequences at their
//! position so outputs stay index-aligned with inputs.

use std::collections::HashSet;
use std::iter::{Fuse, FusedIterator};

use pii_model::{AnalysisOutcome, AnalyzedRecord, CellValue, DetectionResult, FieldValue};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::analyzer::Analyzer;
use crate::error::{AnalyzerError, BatchError, keyed};
use crate::options::{AnalyzeOptions, FailurePolicy};

/// How a mapping value is analyzed, decided once per value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueShape<'v> {
    /// Falsy value: skipped with an empty result.
    Empty,
    /// Non-empty text scalar: analyzed directly.
    Text(&'v str),
    /// Non-empty list: analyzed item by item.
    List(&'v [CellValue]),
    /// Any other scalar: passed through with an empty result.
    Other,
}

impl<'v> ValueShape<'v> {
    pub fn classify(value: &'v FieldValue) -> Self {
        if value.is_falsy() {
            return Self::Empty;
        }
        match value {
            FieldValue::Scalar(CellValue::Text(text)) => Self::Text(text),
            FieldValue::List(items) => Self::List(items),
            FieldValue::Scalar(_) => Self::Other,
        }
    }
}

/// Applies a single-text analyzer to lists and key/value mappings.
#[derive(Debug, Clone)]
pub struct BatchAnalyzer<A> {
    analyzer: A,
    failure_policy: FailurePolicy,
    parallel: bool,
}

impl<A: Analyzer> BatchAnalyzer<A> {
    /// Wraps `analyzer` with the fail-fast policy and sequential execution.
    pub fn new(analyzer: A) -> Self {
        Self {
            analyzer,
            failure_policy: FailurePolicy::default(),
            parallel: false,
        }
    }

    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Analyze list items on the rayon global pool. Output order is
    /// unchanged.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Analyzes every item of `items`, returning one sequence per item.
    ///
    /// Text items (including the empty string) go to the analyzer; every
    /// other item yields an empty sequence.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::FailFast`], returns the error of the first
    /// failing item by index. Under [`FailurePolicy::Isolate`] this never
    /// fails.
    pub fn analyze_list(
        &self,
        items: &[CellValue],
        language: &str,
        options: &AnalyzeOptions,
    ) -> Result<Vec<Vec<DetectionResult>>, BatchError> {
        let analyze_item = |(index, item): (usize, &CellValue)| {
            self.analyze_item(index, item, language, options)
        };
        if self.parallel {
            let results: Vec<_> = items.par_iter().enumerate().map(analyze_item).collect();
            results.into_iter().collect()
        } else {
            items.iter().enumerate().map(analyze_item).collect()
        }
    }

    fn analyze_item(
        &self,
        index: usize,
        item: &CellValue,
        language: &str,
        options: &AnalyzeOptions,
    ) -> Result<Vec<DetectionResult>, BatchError> {
        let Some(text) = item.as_text() else {
            return Ok(Vec::new());
        };
        match self.analyzer.analyze(text, language, options) {
            Ok(results) => Ok(results),
            Err(source) => self.on_failure(BatchError::Item { index, source }),
        }
    }

    fn on_failure<T: Default>(&self, error: BatchError) -> Result<T, BatchError> {
        match self.failure_policy {
            FailurePolicy::FailFast => Err(error),
            FailurePolicy::Isolate => {
                warn!(%error, "analysis failed; recording empty result");
                Ok(T::default())
            }
        }
    }

    /// Lazily analyzes each `(key, value)` pair in input order.
    ///
    /// Each call to `next()` analyzes one value and yields its
    /// [`AnalyzedRecord`]. The returned iterator consumes `input` and cannot
    /// be restarted.
    pub fn analyze_dict<I>(
        &self,
        input: I,
        language: &str,
        options: &AnalyzeOptions,
    ) -> DictAnalysis<'_, A, I::IntoIter>
    where
        I: IntoIterator<Item = (String, FieldValue)>,
    {
        DictAnalysis {
            batch: self,
            input: input.into_iter().fuse(),
            language: language.to_string(),
            options: options.clone(),
            seen: HashSet::new(),
            failed: false,
        }
    }

    fn analyze_value(
        &self,
        key: &str,
        value: &FieldValue,
        language: &str,
        options: &AnalyzeOptions,
    ) -> Result<AnalysisOutcome, BatchError> {
        match ValueShape::classify(value) {
            ValueShape::Empty | ValueShape::Other => Ok(AnalysisOutcome::empty()),
            ValueShape::Text(text) => match self.analyzer.analyze(text, language, options) {
                Ok(results) => Ok(AnalysisOutcome::Flat(results)),
                Err(source) => self
                    .on_failure(value_error(key, source))
                    .map(AnalysisOutcome::Flat),
            },
            ValueShape::List(items) => self
                .analyze_list(items, language, options)
                .map(AnalysisOutcome::Nested)
                .map_err(keyed(key)),
        }
    }
}

fn value_error(key: &str, source: AnalyzerError) -> BatchError {
    BatchError::Value {
        key: key.to_string(),
        source,
    }
}

/// Lazy, single-pass analysis of a key/value sequence.
///
/// Yields one `Result<AnalyzedRecord, BatchError>` per input pair. After an
/// error the iterator is exhausted.
pub struct DictAnalysis<'a, A, I> {
    batch: &'a BatchAnalyzer<A>,
    input: Fuse<I>,
    language: String,
    options: AnalyzeOptions,
    seen: HashSet<String>,
    failed: bool,
}

impl<A: Analyzer, I> DictAnalysis<'_, A, I>
where
    I: Iterator<Item = (String, FieldValue)>,
{
    /// Drains the iterator into records, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first [`BatchError`] yielded.
    pub fn collect_records(self) -> Result<Vec<AnalyzedRecord>, BatchError> {
        self.collect()
    }
}

impl<A: Analyzer, I> Iterator for DictAnalysis<'_, A, I>
where
    I: Iterator<Item = (String, FieldValue)>,
{
    type Item = Result<AnalyzedRecord, BatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let (key, value) = self.input.next()?;
        if !self.seen.insert(key.clone()) {
            self.failed = true;
            return Some(Err(BatchError::DuplicateKey(key)));
        }
        match self
            .batch
            .analyze_value(&key, &value, &self.language, &self.options)
        {
            Ok(outcome) => {
                debug!(
                    key = %key,
                    values = value.len(),
                    detections = outcome.detection_count(),
                    "value analyzed"
                );
                Some(Ok(AnalyzedRecord::new(key, value, outcome)))
            }
            Err(error) => {
                self.failed = true;
                Some(Err(error))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, self.input.size_hint().1)
        }
    }
}

impl<A: Analyzer, I> FusedIterator for DictAnalysis<'_, A, I> where
    I: Iterator<Item = (String, FieldValue)>
{
}
