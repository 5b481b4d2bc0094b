//! Bag-of-words TF-IDF vectorizer.
//!
//! Weighting follows the common scikit-learn conventions:
//!
//! - documents are lowercased and tokens are runs of two or more word characters
//! - `idf(t) = ln((1 + n) / (1 + df(t))) + 1` with smoothing, `ln(n / df(t)) + 1` without
//! - `w(t, d) = tf(t, d) * idf(t)`, with `tf` optionally replaced by `1 + ln(tf)`
//! - every row is scaled to unit L2 (or L1) norm; all-zero rows stay zero
//!
//! The vocabulary is built once by [`TfidfVectorizer::fit`] and then frozen.
//! Column indices follow the lexicographic order of the terms.

use crate::config::{Norm, PipelineConfig};
use crate::error::{Result, TextMiningError};
use ndarray::Array1;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sprs::{CsMat, TriMat};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("Invalid regex: vectorizer token pattern"));

/// Fitting and weighting options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfOptions {
    /// Minimum number of documents a term must appear in.
    pub min_df: usize,
    /// Maximum fraction of documents a term may appear in.
    pub max_df: f64,
    /// Keep at most this many terms, ranked by total corpus frequency.
    pub max_features: Option<usize>,
    pub smooth_idf: bool,
    pub sublinear_tf: bool,
    pub norm: Norm,
}

impl Default for TfidfOptions {
    fn default() -> Self {
        Self {
            min_df: 1,
            max_df: 1.0,
            max_features: None,
            smooth_idf: true,
            sublinear_tf: false,
            norm: Norm::L2,
        }
    }
}

impl From<&PipelineConfig> for TfidfOptions {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            min_df: config.min_document_frequency,
            max_df: config.max_document_frequency,
            max_features: Some(config.max_vocabulary_size),
            smooth_idf: config.smooth_idf,
            sublinear_tf: config.sublinear_tf,
            norm: config.norm,
        }
    }
}

/// TF-IDF model: frozen vocabulary plus inverse document frequencies.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    options: TfidfOptions,
    vocabulary: BTreeMap<String, usize>,
    document_frequency: Vec<usize>,
    idf: Option<Array1<f64>>,
    candidate_terms: usize,
}

impl TfidfVectorizer {
    pub fn new(options: TfidfOptions) -> Self {
        Self {
            options,
            vocabulary: BTreeMap::new(),
            document_frequency: Vec::new(),
            idf: None,
            candidate_terms: 0,
        }
    }

    pub fn options(&self) -> &TfidfOptions {
        &self.options
    }

    pub fn is_fitted(&self) -> bool {
        self.idf.is_some()
    }

    /// Term to column index.
    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    /// Terms in column order.
    pub fn feature_names(&self) -> Vec<&str> {
        // BTreeMap order is the column order.
        self.vocabulary.keys().map(String::as_str).collect()
    }

    /// IDF weight per column, `None` before fitting.
    pub fn idf(&self) -> Option<&Array1<f64>> {
        self.idf.as_ref()
    }

    /// Number of fitted documents containing `term`, if it is in the vocabulary.
    pub fn document_frequency(&self, term: &str) -> Option<usize> {
        self.vocabulary
            .get(term)
            .map(|&col| self.document_frequency[col])
    }

    /// Number of distinct terms seen during fit, before pruning.
    pub fn candidate_terms(&self) -> usize {
        self.candidate_terms
    }

    /// Learn the vocabulary and IDF weights from `documents`.
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        if documents.is_empty() {
            return Err(TextMiningError::EmptyCorpus);
        }

        let n_docs = documents.len();
        let max_doc_count = self.options.max_df * n_docs as f64;
        if max_doc_count < self.options.min_df as f64 {
            return Err(TextMiningError::InvalidConfig(format!(
                "max_df={} corresponds to fewer documents ({:.1}) than min_df={}",
                self.options.max_df, max_doc_count, self.options.min_df
            )));
        }

        // term -> (document frequency, total count)
        let mut stats: HashMap<String, (usize, usize)> = HashMap::new();
        for doc in documents {
            for (term, count) in term_counts(doc) {
                let entry = stats.entry(term).or_insert((0, 0));
                entry.0 += 1;
                entry.1 += count;
            }
        }

        if stats.is_empty() {
            return Err(TextMiningError::EmptyVocabulary);
        }
        let candidate_terms = stats.len();

        let mut kept: Vec<(String, usize, usize)> = stats
            .into_iter()
            .filter(|(_, (df, _))| *df >= self.options.min_df && *df as f64 <= max_doc_count)
            .map(|(term, (df, total))| (term, df, total))
            .collect();

        if kept.is_empty() {
            return Err(TextMiningError::NoTermsRemain {
                min_df: self.options.min_df,
                max_df: self.options.max_df,
            });
        }

        if let Some(limit) = self.options.max_features
            && kept.len() > limit
        {
            // Most frequent first; ties go to the lexicographically smaller term.
            kept.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(&b.0)));
            kept.truncate(limit);
        }

        kept.sort_by(|a, b| a.0.cmp(&b.0));

        let smooth = if self.options.smooth_idf { 1.0 } else { 0.0 };
        let n = n_docs as f64 + smooth;

        let document_frequency: Vec<usize> = kept.iter().map(|(_, df, _)| *df).collect();
        let idf = Array1::from_iter(
            document_frequency
                .iter()
                .map(|&df| (n / (df as f64 + smooth)).ln() + 1.0),
        );

        // Replace state only once the new fit is complete.
        self.vocabulary = kept
            .into_iter()
            .enumerate()
            .map(|(col, (term, _, _))| (term, col))
            .collect();
        self.document_frequency = document_frequency;
        self.idf = Some(idf);
        self.candidate_terms = candidate_terms;

        info!(
            "Fitted vocabulary: {} of {} candidate terms kept",
            self.vocabulary.len(),
            self.candidate_terms
        );
        Ok(())
    }

    /// Map `documents` onto the frozen vocabulary.
    ///
    /// Returns a CSR matrix with one row per document, in input order.
    /// Terms outside the vocabulary are ignored.
    pub fn transform(&self, documents: &[String]) -> Result<CsMat<f64>> {
        let idf = self.idf.as_ref().ok_or(TextMiningError::NotFitted)?;
        let n_cols = self.vocabulary.len();
        let mut triplets = TriMat::new((documents.len(), n_cols));

        for (row, doc) in documents.iter().enumerate() {
            let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
            for token in analyze(doc) {
                if let Some(&col) = self.vocabulary.get(&token) {
                    *counts.entry(col).or_insert(0.0) += 1.0;
                }
            }

            let weights: Vec<(usize, f64)> = counts
                .into_iter()
                .map(|(col, tf)| {
                    let tf = if self.options.sublinear_tf { 1.0 + tf.ln() } else { tf };
                    (col, tf * idf[col])
                })
                .collect();

            let scale = match self.options.norm {
                Norm::L2 => weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt(),
                Norm::L1 => weights.iter().map(|(_, w)| w.abs()).sum::<f64>(),
                Norm::None => 1.0,
            };

            for (col, weight) in weights {
                let value = if scale > 0.0 { weight / scale } else { weight };
                triplets.add_triplet(row, col, value);
            }
        }

        let matrix: CsMat<f64> = triplets.to_csr();
        debug!(
            "Transformed {} documents into {:?} matrix with {} non-zeros",
            documents.len(),
            matrix.shape(),
            matrix.nnz()
        );
        Ok(matrix)
    }

    /// Fit on `documents`, then transform the same documents.
    pub fn fit_transform(&mut self, documents: &[String]) -> Result<CsMat<f64>> {
        self.fit(documents)?;
        self.transform(documents)
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(TfidfOptions::default())
    }
}

/// Lowercase `doc` and extract tokens of two or more word characters.
pub fn analyze(doc: &str) -> Vec<String> {
    let lowered = doc.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn term_counts(doc: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for token in analyze(doc) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}
