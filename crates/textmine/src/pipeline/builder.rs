//! Main text-mining pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating the cleaning, processing and vectorizing stages.

use crate::config::{ConfigValidationError, PipelineConfig};
use crate::error::{Result, ResultExt};
use crate::loader::{label_counts, text_inputs};
use crate::pipeline::progress::{
    ClosureProgressReporter, MiningStage, ProgressReporter, ProgressUpdate,
};
use crate::text::{DocumentProcessor, PreliminaryCleaner, StopwordFilter};
use crate::types::{RunSummary, TextInput, TextMiningOutput};
use crate::vectorizer::{TfidfOptions, TfidfVectorizer};
use polars::prelude::*;
use sprs::CsMat;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// The main text-mining pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use textmine::{Pipeline, PipelineConfig};
/// use textmine::loader::{load_records, LoaderOptions};
///
/// let df = load_records("SMSSpamCollection.tsv", "text", &LoaderOptions::default())?;
///
/// let output = Pipeline::builder()
///     .config(PipelineConfig::builder().enable_stemming(true).build()?)
///     .build()?
///     .process(df)?;
///
/// println!("{:?}", output.shape());
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    cleaner: PreliminaryCleaner,
    processor: DocumentProcessor,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline over loaded records.
    ///
    /// The returned frame is the input with its text column replaced by the
    /// processed documents; every other column is passed through.
    pub fn process(&self, df: DataFrame) -> Result<TextMiningOutput> {
        self.finish(self.process_frame(df))
    }

    /// Run the pipeline over raw text cells, without a frame.
    pub fn process_inputs(&self, inputs: Vec<TextInput>) -> Result<TextMiningOutput> {
        self.finish(self.process_raw(inputs))
    }

    fn finish(&self, result: Result<TextMiningOutput>) -> Result<TextMiningOutput> {
        match result {
            Ok(output) => {
                self.report_progress(ProgressUpdate::complete(format!(
                    "Built {}x{} term-document matrix",
                    output.summary.matrix_shape.0, output.summary.matrix_shape.1
                )));
                Ok(output)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn process_frame(&self, mut df: DataFrame) -> Result<TextMiningOutput> {
        let start_time = Instant::now();
        let mut summary = RunSummary::new();
        let text_column = self.config.text_column.as_str();

        info!("Starting text-mining pipeline...");
        self.report_progress(ProgressUpdate::new(
            MiningStage::Loading,
            0.0,
            format!("Reading column '{}'", text_column),
        ));

        let inputs = text_inputs(&df, text_column)?;

        if let Some(label_column) = &self.config.label_column {
            match label_counts(&df, label_column) {
                Ok(counts) => summary.label_counts = counts,
                Err(e) => warn!("Skipping label distribution: {}", e),
            }
        }

        self.report_progress(ProgressUpdate::with_items(
            MiningStage::Loading,
            inputs.len(),
            inputs.len(),
            format!("Read {} records", inputs.len()),
        ));

        let (documents, vectorizer, matrix) = self.run(&inputs, &mut summary)?;

        let processed = Series::new(text_column.into(), documents.clone());
        df.replace(text_column, processed)
            .context("Replacing text column")?;

        summary.duration_ms = start_time.elapsed().as_millis() as u64;
        Ok(TextMiningOutput {
            frame: Some(df),
            documents,
            vectorizer,
            matrix,
            summary,
        })
    }

    fn process_raw(&self, inputs: Vec<TextInput>) -> Result<TextMiningOutput> {
        let start_time = Instant::now();
        let mut summary = RunSummary::new();

        info!("Starting text-mining pipeline on {} raw inputs...", inputs.len());
        let (documents, vectorizer, matrix) = self.run(&inputs, &mut summary)?;

        summary.duration_ms = start_time.elapsed().as_millis() as u64;
        Ok(TextMiningOutput {
            frame: None,
            documents,
            vectorizer,
            matrix,
            summary,
        })
    }

    fn run(
        &self,
        inputs: &[TextInput],
        summary: &mut RunSummary,
    ) -> Result<(Vec<String>, TfidfVectorizer, CsMat<f64>)> {
        let total = inputs.len();
        summary.documents = total;
        summary.stemmed = self.processor.stems();

        // Step 1: Preliminary cleaning
        self.report_progress(ProgressUpdate::new(
            MiningStage::PreliminaryCleaning,
            0.0,
            "Extracting word characters...",
        ));
        info!("Step 1: Preliminary cleaning...");

        summary.missing_texts = inputs.iter().filter(|i| i.is_missing()).count();
        if summary.missing_texts > 0 {
            debug!(
                "Replacing {} missing texts with '{}'",
                summary.missing_texts, self.config.missing_text_sentinel
            );
        }
        let cleaned = self.cleaner.clean_all(inputs);

        self.report_progress(ProgressUpdate::with_items(
            MiningStage::PreliminaryCleaning,
            cleaned.len(),
            total,
            "Preliminary cleaning complete",
        ));

        // Step 2: Normalize, tokenize, drop stopwords, stem
        self.report_progress(ProgressUpdate::new(
            MiningStage::Normalizing,
            0.0,
            "Normalizing and tokenizing documents...",
        ));
        info!("Step 2: Normalizing documents (stemming: {})...", self.processor.stems());

        let documents = self
            .processor
            .process_corpus(&cleaned)
            .context("Processing documents")?;
        summary.empty_documents = documents.iter().filter(|d| d.trim().is_empty()).count();
        if summary.empty_documents > 0 {
            debug!("{} documents are empty after processing", summary.empty_documents);
        }

        self.report_progress(ProgressUpdate::with_items(
            MiningStage::Normalizing,
            documents.len(),
            total,
            "Document processing complete",
        ));

        // Step 3: TF-IDF
        self.report_progress(ProgressUpdate::new(
            MiningStage::Vectorizing,
            0.0,
            "Fitting TF-IDF vocabulary...",
        ));
        info!("Step 3: Fitting TF-IDF vectorizer...");

        let mut vectorizer = TfidfVectorizer::new(TfidfOptions::from(&self.config));
        vectorizer
            .fit(&documents)
            .context("Fitting TF-IDF vectorizer")?;

        info!("Transform data sets");
        let matrix = vectorizer
            .transform(&documents)
            .context("Transforming documents")?;

        summary.candidate_terms = vectorizer.candidate_terms();
        summary.vocabulary_size = vectorizer.vocabulary().len();
        summary.matrix_shape = matrix.shape();
        summary.non_zero = matrix.nnz();

        self.report_progress(ProgressUpdate::new(
            MiningStage::Vectorizing,
            1.0,
            format!("Vocabulary of {} terms", summary.vocabulary_size),
        ));
        info!("Term-document matrix shape: {:?}", summary.matrix_shape);

        Ok((documents, vectorizer, matrix))
    }
}

/// Builder for creating a [`Pipeline`] instance.
///
/// Use [`Pipeline::builder()`] to get started.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
    stopwords: Option<StopwordFilter>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the English stopword list.
    pub fn stopwords(mut self, stopwords: StopwordFilter) -> Self {
        self.stopwords = Some(stopwords);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// This is a convenience method for simple progress handling.
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let mut processor = DocumentProcessor::new(&config);
        if let Some(stopwords) = self.stopwords {
            processor = processor.with_stopwords(stopwords);
        }

        Ok(Pipeline {
            cleaner: PreliminaryCleaner::new(config.missing_text_sentinel.clone()),
            processor,
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn small_config() -> PipelineConfig {
        PipelineConfig::builder()
            .min_document_frequency(1)
            .build()
            .unwrap()
    }

    #[test]
    fn test_pipeline_builder_default() {
        let pipeline = Pipeline::builder().build().unwrap();
        assert!(pipeline.progress_reporter.is_none());
        assert!(pipeline.processor.stems());
        assert_eq!(pipeline.config().min_document_frequency, 5);
    }

    #[test]
    fn test_pipeline_builder_rejects_invalid_config() {
        let config = PipelineConfig {
            max_vocabulary_size: 0,
            ..PipelineConfig::default()
        };
        assert!(Pipeline::builder().config(config).build().is_err());
    }

    #[test]
    fn test_process_inputs_keeps_rows() {
        let pipeline = Pipeline::builder().config(small_config()).build().unwrap();
        let inputs = vec![
            TextInput::from("Winning prizes! Call now"),
            TextInput::Missing,
            TextInput::from("the and of"),
            TextInput::from("call me later"),
        ];

        let output = pipeline.process_inputs(inputs).unwrap();

        assert!(output.frame.is_none());
        assert_eq!(output.documents[1], "no_text");
        assert_eq!(output.documents[2], "");
        assert_eq!(output.shape().0, 4);
        assert_eq!(output.summary.missing_texts, 1);
        assert_eq!(output.summary.empty_documents, 1);
        assert!(output.vectorizer.vocabulary().contains_key("call"));
    }

    #[test]
    fn test_progress_stages_reported_in_order() {
        let stages = Arc::new(Mutex::new(Vec::new()));
        let sink = stages.clone();

        let pipeline = Pipeline::builder()
            .config(small_config())
            .on_progress(move |update| sink.lock().unwrap().push(update.stage))
            .build()
            .unwrap();

        pipeline
            .process_inputs(vec!["alpha beta".into(), "beta gamma".into()])
            .unwrap();

        let mut seen = stages.lock().unwrap().clone();
        seen.dedup();
        assert_eq!(
            seen,
            vec![
                MiningStage::PreliminaryCleaning,
                MiningStage::Normalizing,
                MiningStage::Vectorizing,
                MiningStage::Complete,
            ]
        );
    }

    #[test]
    fn test_failure_reported() {
        let failed = Arc::new(Mutex::new(false));
        let sink = failed.clone();

        let pipeline = Pipeline::builder()
            .on_progress(move |update| {
                if update.stage == MiningStage::Failed {
                    *sink.lock().unwrap() = true;
                }
            })
            .build()
            .unwrap();

        // Every term appears once, below the default min_df of 5.
        let inputs = ["alpha", "beta", "gamma", "delta", "epsilon", "zeta"]
            .into_iter()
            .map(TextInput::from)
            .collect();
        let err = pipeline.process_inputs(inputs).unwrap_err();
        assert!(err.is_degenerate_corpus());
        assert!(*failed.lock().unwrap());
    }

    #[test]
    fn test_custom_stopwords() {
        let pipeline = Pipeline::builder()
            .config(small_config())
            .stopwords(StopwordFilter::from_words(["alpha"]))
            .build()
            .unwrap();

        let output = pipeline
            .process_inputs(vec!["alpha the beta".into()])
            .unwrap();
        assert_eq!(output.documents, vec!["the beta"]);
    }
}
