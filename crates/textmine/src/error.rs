//! Custom error types for the text-mining pipeline.
//!
//! This module provides the error hierarchy using `thiserror` so every
//! stage can propagate failures with `?` and the CLI can report them.
//!
//! Errors are serializable as `{ code, message }` pairs, which is what the
//! CLI prints in `--json` mode.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the text-mining pipeline.
#[derive(Error, Debug)]
pub enum TextMiningError {
    /// Column was not found in the loaded records.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The corpus handed to the vectorizer has no documents.
    #[error("Cannot fit a vectorizer on an empty corpus")]
    EmptyCorpus,

    /// No document produced a single token.
    #[error("Empty vocabulary; perhaps the documents only contain stop words")]
    EmptyVocabulary,

    /// Every term was pruned by the document-frequency thresholds.
    #[error("After pruning, no terms remain (min_df={min_df}, max_df={max_df})")]
    NoTermsRemain { min_df: usize, max_df: f64 },

    /// The vectorizer was used before `fit`.
    #[error("Vectorizer is not fitted yet; call fit() before transform()")]
    NotFitted,

    /// A stem could not be represented in the requested encoding.
    #[error("Cannot encode token '{token}' as {encoding}")]
    EncodingFailed { encoding: String, token: String },

    /// The requested stem encoding is not supported.
    #[error("Unknown stem encoding: {0}")]
    UnknownEncoding(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<TextMiningError>,
    },
}

impl TextMiningError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        TextMiningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable machine-readable code for the error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::EmptyCorpus => "EMPTY_CORPUS",
            Self::EmptyVocabulary => "EMPTY_VOCABULARY",
            Self::NoTermsRemain { .. } => "NO_TERMS_REMAIN",
            Self::NotFitted => "NOT_FITTED",
            Self::EncodingFailed { .. } => "ENCODING_FAILED",
            Self::UnknownEncoding(_) => "UNKNOWN_ENCODING",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if the failure comes from a degenerate corpus rather than bad input or IO.
    pub fn is_degenerate_corpus(&self) -> bool {
        match self {
            Self::EmptyCorpus | Self::EmptyVocabulary | Self::NoTermsRemain { .. } => true,
            Self::WithContext { source, .. } => source.is_degenerate_corpus(),
            _ => false,
        }
    }
}

impl Serialize for TextMiningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("TextMiningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for text-mining operations.
pub type Result<T> = std::result::Result<T, TextMiningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| TextMiningError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(TextMiningError::NotFitted.error_code(), "NOT_FITTED");
        assert_eq!(
            TextMiningError::ColumnNotFound("text".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    #[test]
    fn test_is_degenerate_corpus() {
        assert!(TextMiningError::EmptyVocabulary.is_degenerate_corpus());
        assert!(
            TextMiningError::NoTermsRemain {
                min_df: 5,
                max_df: 1.0
            }
            .with_context("Fitting vectorizer")
            .is_degenerate_corpus()
        );
        assert!(!TextMiningError::NotFitted.is_degenerate_corpus());
    }

    #[test]
    fn test_error_serialization() {
        let error = TextMiningError::ColumnNotFound("text".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("text"));
    }

    #[test]
    fn test_with_context() {
        let error = TextMiningError::EncodingFailed {
            encoding: "ascii".to_string(),
            token: "café".to_string(),
        }
        .with_context("During stemming");
        assert!(error.to_string().contains("During stemming"));
        assert_eq!(error.error_code(), "ENCODING_FAILED");
    }
}
