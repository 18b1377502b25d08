//! The single-text analyzer capability.

use std::sync::Arc;

use pii_model::DetectionResult;

use crate::error::AnalyzerError;
use crate::options::AnalyzeOptions;

/// Analyzes exactly one text at a time.
///
/// The batch analyzer only depends on this trait, so any engine (the
/// built-in [`crate::PatternAnalyzer`], a remote service client, a test
/// double) can be batched over lists and column mappings.
///
/// # Example
///
/// ```ignore
/// use pii_analyzer::{AnalyzeOptions, Analyzer, PatternAnalyzer};
///
/// let analyzer = PatternAnalyzer::new()?;
/// let results = analyzer.analyze("mail me: jane@example.com", "en", &AnalyzeOptions::default())?;
/// assert_eq!(results[0].entity_type, "EMAIL_ADDRESS");
/// ```
pub trait Analyzer: Send + Sync {
    /// Returns detections in `text`, ordered by position.
    ///
    /// # Errors
    ///
    /// Returns an error when the language or an entity filter is not
    /// supported, or when a recognizer fails.
    fn analyze(
        &self,
        text: &str,
        language: &str,
        options: &AnalyzeOptions,
    ) -> Result<Vec<DetectionResult>, AnalyzerError>;

    /// Language codes this analyzer can serve.
    fn supported_languages(&self) -> Vec<String> {
        vec!["en".to_string()]
    }

    /// Entity types this analyzer can produce.
    fn supported_entities(&self) -> Vec<String>;
}

impl<A: Analyzer + ?Sized> Analyzer for &A {
    fn analyze(
        &self,
        text: &str,
        language: &str,
        options: &AnalyzeOptions,
    ) -> Result<Vec<DetectionResult>, AnalyzerError> {
        (**self).analyze(text, language, options)
    }

    fn supported_languages(&self) -> Vec<String> {
        (**self).supported_languages()
    }

    fn supported_entities(&self) -> Vec<String> {
        (**self).supported_entities()
    }
}

impl<A: Analyzer + ?Sized> Analyzer for Arc<A> {
    fn analyze(
        &self,
        text: &str,
        language: &str,
        options: &AnalyzeOptions,
    ) -> Result<Vec<DetectionResult>, AnalyzerError> {
        (**self).analyze(text, language, options)
    }

    fn supported_languages(&self) -> Vec<String> {
        (**self).supported_languages()
    }

    fn supported_entities(&self) -> Vec<String> {
        (**self).supported_entities()
    }
}

impl<A: Analyzer + ?Sized> Analyzer for Box<A> {
    fn analyze(
        &self,
        text: &str,
        language: &str,
        options: &AnalyzeOptions,
    ) -> Result<Vec<DetectionResult>, AnalyzerError> {
        (**self).analyze(text, language, options)
    }

    fn supported_languages(&self) -> Vec<String> {
        (**self).supported_languages()
    }

    fn supported_entities(&self) -> Vec<String> {
        (**self).supported_entities()
    }
}
