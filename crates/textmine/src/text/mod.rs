//! Text cleaning and token processing.
//!
//! This module provides the per-document stages of the pipeline:
//! - Preliminary cleaning (word-character extraction, missing-text sentinel)
//! - Normalization (line-break artifacts, punctuation)
//! - Treebank tokenization
//! - Stopword filtering
//! - Stemming with byte encoding
//!
//! [`DocumentProcessor`] composes the last four into one transform.

mod composer;
mod normalizer;
mod prelim;
mod stemmer;
mod stopwords;
mod tokenizer;

pub use composer::DocumentProcessor;
pub use normalizer::TextNormalizer;
pub use prelim::{PreliminaryCleaner, extract_words};
pub use stemmer::{TokenStemmer, decode, encode};
pub use stopwords::StopwordFilter;
pub use tokenizer::TreebankTokenizer;
