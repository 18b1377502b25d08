//! Registry-backed single-text analyzer.

use std::collections::BTreeSet;

use pii_model::DetectionResult;
use tracing::trace;

use crate::analyzer::Analyzer;
use crate::builtin::builtin_recognizers;
use crate::error::AnalyzerError;
use crate::options::AnalyzeOptions;
use crate::recognizer::Recognizer;

/// Runs every registered recognizer over a text and merges the detections.
///
/// Detections are filtered by the requested entities, the score threshold
/// and the allow list, then sorted by `start`, `end` and entity type.
/// Overlapping detections from different recognizers are all kept.
pub struct PatternAnalyzer {
    recognizers: Vec<Box<dyn Recognizer>>,
}

impl std::fmt::Debug for PatternAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternAnalyzer")
            .field(
                "recognizers",
                &self.recognizers.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl PatternAnalyzer {
    /// Creates an analyzer with the built-in English recognizers.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in pattern fails to compile.
    pub fn new() -> Result<Self, AnalyzerError> {
        Ok(Self {
            recognizers: builtin_recognizers()?,
        })
    }

    /// Creates an analyzer without recognizers.
    pub fn empty() -> Self {
        Self {
            recognizers: Vec::new(),
        }
    }

    /// Registers a recognizer. A recognizer with the same name is replaced.
    pub fn register(&mut self, recognizer: Box<dyn Recognizer>) {
        self.recognizers
            .retain(|existing| existing.name() != recognizer.name());
        self.recognizers.push(recognizer);
    }

    #[must_use]
    pub fn with_recognizer(mut self, recognizer: impl Recognizer + 'static) -> Self {
        self.register(Box::new(recognizer));
        self
    }

    pub fn recognizers(&self) -> impl Iterator<Item = &dyn Recognizer> + '_ {
        self.recognizers.iter().map(|recognizer| recognizer.as_ref())
    }

    pub fn len(&self) -> usize {
        self.recognizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recognizers.is_empty()
    }

    fn check_language(&self, language: &str) -> Result<(), AnalyzerError> {
        if self
            .recognizers
            .iter()
            .any(|recognizer| recognizer.supported_language() == language)
        {
            Ok(())
        } else {
            Err(AnalyzerError::UnsupportedLanguage {
                language: language.to_string(),
                supported: self.supported_languages(),
            })
        }
    }

    fn check_entities(&self, options: &AnalyzeOptions) -> Result<(), AnalyzerError> {
        let Some(requested) = &options.entities else {
            return Ok(());
        };
        let known = self.supported_entities();
        match requested.iter().find(|entity| !known.contains(*entity)) {
            Some(unknown) => Err(AnalyzerError::UnknownEntity(unknown.clone())),
            None => Ok(()),
        }
    }
}

impl Analyzer for PatternAnalyzer {
    fn analyze(
        &self,
        text: &str,
        language: &str,
        options: &AnalyzeOptions,
    ) -> Result<Vec<DetectionResult>, AnalyzerError> {
        self.check_language(language)?;
        self.check_entities(options)?;
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let mut results = Vec::new();
        for recognizer in &self.recognizers {
            if recognizer.supported_language() != language {
                continue;
            }
            if let Some(entities) = &options.entities
                && !entities.iter().any(|entity| entity == recognizer.entity())
            {
                continue;
            }
            let found = recognizer.analyze(text)?;
            trace!(recognizer = recognizer.name(), found = found.len(), "recognizer finished");
            results.extend(found);
        }

        if options.score_threshold > 0.0 {
            results.retain(|result| result.score >= options.score_threshold);
        }
        if !options.allow_list.is_empty() {
            results.retain(|result| !is_allowed(text, result, &options.allow_list));
        }
        results.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then(a.end.cmp(&b.end))
                .then_with(|| a.entity_type.cmp(&b.entity_type))
        });
        Ok(results)
    }

    fn supported_languages(&self) -> Vec<String> {
        self.recognizers
            .iter()
            .map(|recognizer| recognizer.supported_language().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn supported_entities(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.recognizers
            .iter()
            .map(|recognizer| recognizer.entity().to_string())
            .filter(|entity| seen.insert(entity.clone()))
            .collect()
    }
}

fn is_allowed(text: &str, result: &DetectionResult, allow_list: &[String]) -> bool {
    let matched: String = text
        .chars()
        .skip(result.start)
        .take(result.len())
        .collect();
    allow_list.iter().any(|allowed| allowed == &matched)
}
