//! Configuration types for the text-mining pipeline.
//!
//! Every constant the pipeline depends on (column names, punctuation set,
//! document-frequency thresholds, stemming) lives here, so a run is
//! fully described by one [`PipelineConfig`]. Use the builder for a fluent
//! setup or deserialize one from JSON.

use crate::error::{Result, TextMiningError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Characters replaced by a space during normalization (a backslash is always added).
pub const DEFAULT_PUNCTUATION: [char; 11] = ['.', ',', '/', ':', '(', ')', '<', '>', '|', '?', '*'];

/// Byte encoding applied to every stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StemEncoding {
    /// UTF-8, never fails
    #[default]
    #[serde(alias = "utf-8")]
    Utf8,
    /// 7-bit ASCII, fails on any non-ASCII char
    Ascii,
    /// ISO-8859-1, fails on chars above U+00FF
    #[serde(alias = "iso-8859-1", alias = "latin-1")]
    Latin1,
}

impl StemEncoding {
    /// Canonical name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf8",
            Self::Ascii => "ascii",
            Self::Latin1 => "latin1",
        }
    }
}

impl fmt::Display for StemEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StemEncoding {
    type Err = TextMiningError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "ascii" | "us-ascii" => Ok(Self::Ascii),
            "latin1" | "latin-1" | "iso-8859-1" => Ok(Self::Latin1),
            other => Err(TextMiningError::UnknownEncoding(other.to_string())),
        }
    }
}

/// Suffix-stripping algorithm used for stemming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StemAlgorithm {
    /// Classic Porter (1980) rules
    #[default]
    Porter,
    /// Snowball English, also known as Porter2
    Snowball,
}

/// Row normalization applied after TF-IDF weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    /// Sum of absolute values is 1
    L1,
    /// Euclidean norm is 1
    #[default]
    L2,
    /// Keep raw TF-IDF weights
    None,
}

/// Configuration for the text-mining pipeline.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use textmine::config::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .min_document_frequency(2)
///     .max_vocabulary_size(500)
///     .enable_stemming(false)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Column holding the free-form message text.
    /// Default: "text"
    pub text_column: String,

    /// Column holding the label. Passed through untouched; only counted in the summary.
    /// Default: Some("label")
    pub label_column: Option<String>,

    /// Placeholder used for missing text cells.
    /// Default: "no_text"
    pub missing_text_sentinel: String,

    /// Characters replaced by a space during normalization.
    /// Default: `. , / : ( ) < > | ? *`
    pub punctuation_set: Vec<char>,

    /// Whether tokens are stemmed.
    /// Default: true
    pub enable_stemming: bool,

    /// Stemming algorithm.
    /// Default: Porter
    pub stem_algorithm: StemAlgorithm,

    /// Encoding applied to stems.
    /// Default: Utf8
    pub stem_encoding: StemEncoding,

    /// Terms must appear in at least this many documents.
    /// Default: 5
    pub min_document_frequency: usize,

    /// Terms appearing in more than this fraction of documents are dropped (0.0 - 1.0].
    /// Default: 1.0
    pub max_document_frequency: f64,

    /// Maximum number of terms kept, ranked by corpus frequency.
    /// Default: 100
    pub max_vocabulary_size: usize,

    /// Add one to document frequencies as if an extra document contained every term.
    /// Default: true
    pub smooth_idf: bool,

    /// Replace term frequency with 1 + ln(tf).
    /// Default: false
    pub sublinear_tf: bool,

    /// Row normalization.
    /// Default: L2
    pub norm: Norm,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            text_column: "text".to_string(),
            label_column: Some("label".to_string()),
            missing_text_sentinel: "no_text".to_string(),
            punctuation_set: DEFAULT_PUNCTUATION.to_vec(),
            enable_stemming: true,
            stem_algorithm: StemAlgorithm::default(),
            stem_encoding: StemEncoding::default(),
            min_document_frequency: 5,
            max_document_frequency: 1.0,
            max_vocabulary_size: 100,
            smooth_idf: true,
            sublinear_tf: false,
            norm: Norm::default(),
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Read a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: PipelineConfig = serde_json::from_str(&content)?;
        config
            .validate()
            .map_err(|e| TextMiningError::InvalidConfig(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> std::result::Result<(), ConfigValidationError> {
        if self.text_column.trim().is_empty() {
            return Err(ConfigValidationError::EmptyField("text_column".to_string()));
        }

        if self.missing_text_sentinel.trim().is_empty() {
            return Err(ConfigValidationError::EmptyField(
                "missing_text_sentinel".to_string(),
            ));
        }

        if self.min_document_frequency == 0 {
            return Err(ConfigValidationError::InvalidCount {
                field: "min_document_frequency".to_string(),
                value: self.min_document_frequency,
            });
        }

        if self.max_vocabulary_size == 0 {
            return Err(ConfigValidationError::InvalidCount {
                field: "max_vocabulary_size".to_string(),
                value: self.max_vocabulary_size,
            });
        }

        if !(self.max_document_frequency > 0.0 && self.max_document_frequency <= 1.0) {
            return Err(ConfigValidationError::InvalidFraction {
                field: "max_document_frequency".to_string(),
                value: self.max_document_frequency,
            });
        }

        if let Some(c) = self.punctuation_set.iter().find(|c| c.is_alphanumeric() || *c == &'_') {
            return Err(ConfigValidationError::WordCharInPunctuation(*c));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Field '{0}' must not be empty")]
    EmptyField(String),

    #[error("Invalid value for '{field}': {value} (must be at least 1)")]
    InvalidCount { field: String, value: usize },

    #[error("Invalid fraction for '{field}': {value} (must be in (0.0, 1.0])")]
    InvalidFraction { field: String, value: f64 },

    #[error("Punctuation set contains word character '{0}'")]
    WordCharInPunctuation(char),
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfigBuilder {
    base: Option<PipelineConfig>,
    text_column: Option<String>,
    label_column: Option<Option<String>>,
    missing_text_sentinel: Option<String>,
    punctuation_set: Option<Vec<char>>,
    enable_stemming: Option<bool>,
    stem_algorithm: Option<StemAlgorithm>,
    stem_encoding: Option<StemEncoding>,
    min_document_frequency: Option<usize>,
    max_document_frequency: Option<f64>,
    max_vocabulary_size: Option<usize>,
    smooth_idf: Option<bool>,
    sublinear_tf: Option<bool>,
    norm: Option<Norm>,
}

impl PipelineConfigBuilder {
    /// Start from an existing configuration instead of the defaults.
    ///
    /// Values set on the builder still override the base. The CLI uses this
    /// to layer flags over a `--config` file.
    pub fn from_config(config: PipelineConfig) -> Self {
        Self {
            base: Some(config),
            ..Self::default()
        }
    }

    /// Set the column holding the message text.
    pub fn text_column(mut self, column: impl Into<String>) -> Self {
        self.text_column = Some(column.into());
        self
    }

    /// Set the label column, or `None` to ignore labels entirely.
    pub fn label_column(mut self, column: Option<String>) -> Self {
        self.label_column = Some(column);
        self
    }

    /// Set the placeholder used for missing text.
    pub fn missing_text_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.missing_text_sentinel = Some(sentinel.into());
        self
    }

    /// Set the characters replaced by a space during normalization.
    pub fn punctuation_set(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.punctuation_set = Some(chars.into_iter().collect());
        self
    }

    /// Enable or disable stemming.
    pub fn enable_stemming(mut self, enable: bool) -> Self {
        self.enable_stemming = Some(enable);
        self
    }

    /// Set the stemming algorithm.
    pub fn stem_algorithm(mut self, algorithm: StemAlgorithm) -> Self {
        self.stem_algorithm = Some(algorithm);
        self
    }

    /// Set the byte encoding for stems.
    pub fn stem_encoding(mut self, encoding: StemEncoding) -> Self {
        self.stem_encoding = Some(encoding);
        self
    }

    /// Set the minimum number of documents a term must appear in.
    pub fn min_document_frequency(mut self, min_df: usize) -> Self {
        self.min_document_frequency = Some(min_df);
        self
    }

    /// Set the maximum fraction of documents a term may appear in.
    pub fn max_document_frequency(mut self, max_df: f64) -> Self {
        self.max_document_frequency = Some(max_df);
        self
    }

    /// Set the maximum vocabulary size.
    pub fn max_vocabulary_size(mut self, max_features: usize) -> Self {
        self.max_vocabulary_size = Some(max_features);
        self
    }

    /// Enable or disable IDF smoothing.
    pub fn smooth_idf(mut self, smooth: bool) -> Self {
        self.smooth_idf = Some(smooth);
        self
    }

    /// Enable or disable sublinear term frequency.
    pub fn sublinear_tf(mut self, sublinear: bool) -> Self {
        self.sublinear_tf = Some(sublinear);
        self
    }

    /// Set the row normalization.
    pub fn norm(mut self, norm: Norm) -> Self {
        self.norm = Some(norm);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> std::result::Result<PipelineConfig, ConfigValidationError> {
        let base = self.base.unwrap_or_default();
        let config = PipelineConfig {
            text_column: self.text_column.unwrap_or(base.text_column),
            label_column: self.label_column.unwrap_or(base.label_column),
            missing_text_sentinel: self
                .missing_text_sentinel
                .unwrap_or(base.missing_text_sentinel),
            punctuation_set: self.punctuation_set.unwrap_or(base.punctuation_set),
            enable_stemming: self.enable_stemming.unwrap_or(base.enable_stemming),
            stem_algorithm: self.stem_algorithm.unwrap_or(base.stem_algorithm),
            stem_encoding: self.stem_encoding.unwrap_or(base.stem_encoding),
            min_document_frequency: self
                .min_document_frequency
                .unwrap_or(base.min_document_frequency),
            max_document_frequency: self
                .max_document_frequency
                .unwrap_or(base.max_document_frequency),
            max_vocabulary_size: self.max_vocabulary_size.unwrap_or(base.max_vocabulary_size),
            smooth_idf: self.smooth_idf.unwrap_or(base.smooth_idf),
            sublinear_tf: self.sublinear_tf.unwrap_or(base.sublinear_tf),
            norm: self.norm.unwrap_or(base.norm),
        };

        config.validate()?;
        Ok(config)
    }
}
