use crate::vectorizer::TfidfVectorizer;
use chrono::{DateTime, Utc};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use sprs::CsMat;
use std::collections::BTreeMap;

/// One raw text cell as read from the input.
///
/// Missing cells are modelled explicitly instead of being discovered by a
/// failed string operation; the preliminary cleaner decides what to do with
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum TextInput {
    Text(String),
    Missing,
}

impl TextInput {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl From<Option<&str>> for TextInput {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some(s) => Self::Text(s.to_string()),
            None => Self::Missing,
        }
    }
}

impl From<&str> for TextInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for TextInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

// ============================================================================
// Run Summary
// ============================================================================

/// Human-readable summary of what the pipeline did.
///
/// This is what the CLI prints with `--json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Total execution time in milliseconds.
    pub duration_ms: u64,

    /// Number of input records (and matrix rows).
    pub documents: usize,
    /// Records whose text was missing and replaced by the sentinel.
    pub missing_texts: usize,
    /// Documents left without any token after processing.
    pub empty_documents: usize,
    /// Whether stemming was applied.
    pub stemmed: bool,

    /// Number of distinct terms before frequency pruning.
    pub candidate_terms: usize,
    /// Number of terms kept in the vocabulary.
    pub vocabulary_size: usize,
    /// Term-document matrix shape as (rows, columns).
    pub matrix_shape: (usize, usize),
    /// Number of stored non-zero weights.
    pub non_zero: usize,

    /// Count of records per label, when a label column is present.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub label_counts: BTreeMap<String, usize>,
}

impl RunSummary {
    /// Create a summary stamped with the current time.
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            duration_ms: 0,
            documents: 0,
            missing_texts: 0,
            empty_documents: 0,
            stemmed: false,
            candidate_terms: 0,
            vocabulary_size: 0,
            matrix_shape: (0, 0),
            non_zero: 0,
            label_counts: BTreeMap::new(),
        }
    }

    /// Fraction of matrix cells that hold a non-zero weight.
    pub fn density(&self) -> f64 {
        let cells = self.matrix_shape.0 * self.matrix_shape.1;
        if cells == 0 {
            return 0.0;
        }
        self.non_zero as f64 / cells as f64
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a run produces. Nothing here is written to disk.
#[derive(Debug)]
pub struct TextMiningOutput {
    /// Input records with the text column replaced by the processed text.
    /// `None` when the pipeline was fed raw inputs instead of a frame.
    pub frame: Option<DataFrame>,
    /// Processed documents in input order.
    pub documents: Vec<String>,
    /// Vectorizer fitted on `documents`.
    pub vectorizer: TfidfVectorizer,
    /// Term-document matrix (documents x vocabulary), CSR layout.
    pub matrix: CsMat<f64>,
    pub summary: RunSummary,
}

impl TextMiningOutput {
    /// Shape of the term-document matrix as (rows, columns).
    pub fn shape(&self) -> (usize, usize) {
        self.matrix.shape()
    }
}
