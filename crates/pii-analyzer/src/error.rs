//! Error types for single-text and batch analysis.

use thiserror::Error;

/// Errors raised by a single-text analyzer or while building recognizers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalyzerError {
    /// No registered recognizer serves the requested language.
    #[error("no recognizers available for language '{language}' (supported: {})", .supported.join(", "))]
    UnsupportedLanguage {
        language: String,
        supported: Vec<String>,
    },

    /// An entity filter names an entity no recognizer produces.
    #[error("unknown entity type '{0}'")]
    UnknownEntity(String),

    /// A recognizer pattern failed to compile.
    #[error("invalid pattern for recognizer '{recognizer}': {message}")]
    InvalidPattern { recognizer: String, message: String },

    /// A recognizer definition is incomplete.
    #[error("invalid recognizer '{recognizer}': {reason}")]
    InvalidRecognizer { recognizer: String, reason: String },

    /// A recognizer failed while analyzing text.
    #[error("recognizer '{recognizer}' failed: {message}")]
    Recognizer { recognizer: String, message: String },
}

/// Errors raised by the batch analyzer. Each variant names where the
/// failing value sits in the input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// A list item failed outside of any keyed value.
    #[error("item {index}: {source}")]
    Item {
        index: usize,
        source: AnalyzerError,
    },

    /// A scalar text value failed.
    #[error("key '{key}': {source}")]
    Value { key: String, source: AnalyzerError },

    /// An item of a list value failed.
    #[error("key '{key}', item {index}: {source}")]
    ListItem {
        key: String,
        index: usize,
        source: AnalyzerError,
    },

    /// The same key appeared twice in the input.
    #[error("duplicate key '{0}' in batch input")]
    DuplicateKey(String),
}

impl BatchError {
    /// The analyzer error underneath, if any.
    pub fn analyzer_error(&self) -> Option<&AnalyzerError> {
        match self {
            Self::Item { source, .. }
            | Self::Value { source, .. }
            | Self::ListItem { source, .. } => Some(source),
            Self::DuplicateKey(_) => None,
        }
    }

    fn with_key(self, key: &str) -> Self {
        match self {
            Self::Item { index, source } => Self::ListItem {
                key: key.to_string(),
                index,
                source,
            },
            other => other,
        }
    }
}

pub(crate) fn keyed(key: &str) -> impl Fn(BatchError) -> BatchError + '_ {
    move |error| error.with_key(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalyzerError::UnsupportedLanguage {
            language: "de".to_string(),
            supported: vec!["en".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "no recognizers available for language 'de' (supported: en)"
        );
    }

    #[test]
    fn list_errors_gain_their_key() {
        let err = BatchError::Item {
            index: 2,
            source: AnalyzerError::UnknownEntity("X".to_string()),
        };
        let keyed_err = keyed("name")(err);
        assert_eq!(
            keyed_err.to_string(),
            "key 'name', item 2: unknown entity type 'X'"
        );
        assert!(keyed_err.analyzer_error().is_some());
    }
}
