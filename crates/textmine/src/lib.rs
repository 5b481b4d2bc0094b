//! Text Mining Pipeline Library
//!
//! Turns a column of short free-text messages into a sparse TF-IDF
//! term-document matrix, built with Rust and Polars.
//!
//! # Overview
//!
//! Every document goes through the same stages:
//!
//! - **Preliminary Cleaning**: keep only runs of word characters; missing cells become a sentinel
//! - **Normalization**: lowercase, drop carriage returns and escaped newlines, blank out punctuation
//! - **Tokenization**: Treebank-style word splitting
//! - **Stopword Removal**: the English stopword list
//! - **Stemming**: optional Porter (or Snowball English) stemming
//! - **Vectorizing**: TF-IDF with document-frequency pruning and a vocabulary cap
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use textmine::{Pipeline, PipelineConfig};
//! use textmine::loader::{load_records, LoaderOptions};
//!
//! let df = load_records("SMSSpamCollection.tsv", "text", &LoaderOptions::default())?;
//!
//! let config = PipelineConfig::builder()
//!     .min_document_frequency(5)
//!     .max_vocabulary_size(100)
//!     .build()?;
//!
//! let output = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .process(df)?;
//!
//! println!("Matrix shape: {:?}", output.shape());
//! println!("Vocabulary: {:?}", output.vectorizer.feature_names());
//! ```
//!
//! # Stages on their own
//!
//! The text stages are usable without the pipeline:
//!
//! ```rust,ignore
//! use textmine::text::DocumentProcessor;
//!
//! let processor = DocumentProcessor::new(&PipelineConfig::default());
//! assert_eq!(processor.process("Winners are calling")?, "winner call");
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod text;
pub mod types;
pub mod vectorizer;

// Re-exports for convenient access
pub use config::{
    ConfigValidationError, Norm, PipelineConfig, PipelineConfigBuilder, StemAlgorithm,
    StemEncoding,
};
pub use error::{Result as TextMiningResult, ResultExt, TextMiningError};
pub use loader::{LoaderOptions, load_records, parse_records};
pub use pipeline::{
    ClosureProgressReporter, MiningStage, Pipeline, PipelineBuilder, ProgressReporter,
    ProgressUpdate,
};
pub use text::{
    DocumentProcessor, PreliminaryCleaner, StopwordFilter, TextNormalizer, TokenStemmer,
    TreebankTokenizer,
};
pub use types::{RunSummary, TextInput, TextMiningOutput};
pub use vectorizer::{TfidfOptions, TfidfVectorizer};
