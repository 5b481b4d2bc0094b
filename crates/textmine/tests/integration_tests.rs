//! Integration tests for the text-mining pipeline.
//!
//! These tests run the loader, the text stages and the vectorizer end to end
//! on a small SMS-style fixture.

use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use textmine::loader::{LoaderOptions, load_records};
use textmine::{MiningStage, Pipeline, PipelineConfig, StemEncoding, TextMiningOutput};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Write `content` to a file under the system temp dir and return its path.
fn write_temp(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("textmine_{}_{}", std::process::id(), name));
    std::fs::write(&path, content).expect("Failed to write temp file");
    path
}

fn run(config: PipelineConfig) -> TextMiningOutput {
    let df = load_records(
        fixtures_path().join("sms_sample.tsv"),
        &config.text_column,
        &LoaderOptions::default(),
    )
    .expect("Failed to load fixture");

    Pipeline::builder()
        .config(config)
        .build()
        .unwrap()
        .process(df)
        .unwrap()
}

// ============================================================================
// Full Pipeline Tests
// ============================================================================

#[test]
fn test_full_pipeline_default_config() {
    let output = run(PipelineConfig::default());

    assert_eq!(output.shape().0, 20);
    assert!(output.shape().1 <= 100);
    assert_eq!(
        output.vectorizer.feature_names(),
        vec!["call", "claim", "free", "home", "prize", "win"]
    );

    for term in output.vectorizer.feature_names() {
        let df = output.vectorizer.document_frequency(term).unwrap();
        assert!(df >= 5, "{term} kept with document frequency {df}");
    }

    let summary = &output.summary;
    assert_eq!(summary.documents, 20);
    assert_eq!(summary.missing_texts, 1);
    assert!(summary.stemmed);
    assert_eq!(summary.vocabulary_size, 6);
    assert_eq!(summary.matrix_shape, (20, 6));
    assert_eq!(summary.non_zero, output.matrix.nnz());
    assert_eq!(summary.label_counts.get("ham"), Some(&12));
    assert_eq!(summary.label_counts.get("spam"), Some(&8));
}

#[test]
fn test_text_column_replaced_in_frame() {
    let output = run(PipelineConfig::default());
    let frame = output.frame.as_ref().unwrap();

    assert_eq!(frame.height(), 20);
    assert_eq!(frame.width(), 2);

    let text = frame.column("text").unwrap().str().unwrap();
    assert_eq!(text.get(0), Some("call later get home"));
    assert_eq!(text.get(6), Some("no_text"));
    assert_eq!(text.get(6), Some(output.documents[6].as_str()));

    let labels = frame.column("label").unwrap().str().unwrap();
    assert_eq!(labels.get(1), Some("spam"));
}

#[test]
fn test_rows_are_unit_length_or_empty() {
    let output = run(PipelineConfig::default());

    for (row, vec) in output.matrix.outer_iterator().enumerate() {
        let norm: f64 = vec.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
        assert!(
            norm.abs() < 1e-9 || (norm - 1.0).abs() < 1e-9,
            "row {row} has norm {norm}"
        );
    }

    // "Ok lar... Joking wif u oni..." shares no vocabulary term.
    assert_eq!(output.matrix.outer_view(16).unwrap().nnz(), 0);
}

#[test]
fn test_vocabulary_cap() {
    let config = PipelineConfig::builder()
        .min_document_frequency(1)
        .max_vocabulary_size(3)
        .build()
        .unwrap();
    let output = run(config);

    assert_eq!(output.shape(), (20, 3));
    assert!(output.summary.candidate_terms > 3);
    // call and free appear most often, then a tie broken alphabetically
    assert_eq!(output.vectorizer.feature_names(), vec!["call", "claim", "free"]);
}

#[test]
fn test_no_stemming_keeps_surface_forms() {
    let base = PipelineConfig::builder().min_document_frequency(1);

    let stemmed = run(base.clone().build().unwrap());
    let surface = run(base.enable_stemming(false).build().unwrap());

    assert!(stemmed.vectorizer.vocabulary().contains_key("congratul"));
    assert!(!stemmed.vectorizer.vocabulary().contains_key("congratulations"));
    assert!(surface.vectorizer.vocabulary().contains_key("congratulations"));
    assert!(!surface.summary.stemmed);
}

#[test]
fn test_ascii_encoding_on_ascii_corpus() {
    let config = PipelineConfig::builder()
        .stem_encoding(StemEncoding::Ascii)
        .build()
        .unwrap();
    let output = run(config);
    assert_eq!(output.shape(), (20, 6));
}

// ============================================================================
// Error Tests
// ============================================================================

#[test]
fn test_missing_text_column() {
    let err = load_records(
        fixtures_path().join("sms_sample.tsv"),
        "message",
        &LoaderOptions::default(),
    )
    .unwrap_err();

    assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
}

#[test]
fn test_no_terms_remain() {
    let path = write_temp(
        "sparse.tsv",
        "label\ttext\nham\talpha\nham\tbravo\nham\tcharlie\nspam\tdelta\nham\techo\nspam\tfoxtrot\n",
    );
    let df = load_records(&path, "text", &LoaderOptions::default()).unwrap();
    std::fs::remove_file(&path).ok();

    let err = Pipeline::builder()
        .build()
        .unwrap()
        .process(df)
        .unwrap_err();

    assert_eq!(err.error_code(), "NO_TERMS_REMAIN");
    assert!(err.is_degenerate_corpus());
}

#[test]
fn test_unicode_stem_fails_ascii_encoding() {
    let path = write_temp(
        "unicode.tsv",
        "label\ttext\nham\tcafé crème\nham\tcafé noir\n",
    );
    let df = load_records(&path, "text", &LoaderOptions::default()).unwrap();
    std::fs::remove_file(&path).ok();

    let config = PipelineConfig::builder()
        .stem_encoding(StemEncoding::Ascii)
        .min_document_frequency(1)
        .build()
        .unwrap();

    let err = Pipeline::builder()
        .config(config)
        .build()
        .unwrap()
        .process(df)
        .unwrap_err();

    assert_eq!(err.error_code(), "ENCODING_FAILED");
}

// ============================================================================
// Configuration Tests
// ============================================================================

#[test]
fn test_config_from_json_file() {
    let path = write_temp(
        "config.json",
        r#"{ "min_document_frequency": 2, "enable_stemming": false, "norm": "l1" }"#,
    );
    let config = PipelineConfig::from_json_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.min_document_frequency, 2);
    assert!(!config.enable_stemming);
    assert_eq!(config.text_column, "text");
    assert_eq!(config.max_vocabulary_size, 100);

    let output = run(config);
    for term in output.vectorizer.feature_names() {
        assert!(output.vectorizer.document_frequency(term).unwrap() >= 2);
    }
    for vec in output.matrix.outer_iterator() {
        let sum: f64 = vec.iter().map(|(_, v)| v.abs()).sum();
        assert!(sum.abs() < 1e-9 || (sum - 1.0).abs() < 1e-9);
    }
}

#[test]
fn test_invalid_config_file() {
    let path = write_temp("bad_config.json", r#"{ "max_vocabulary_size": 0 }"#);
    let err = PipelineConfig::from_json_file(&path).unwrap_err();
    std::fs::remove_file(&path).ok();

    assert_eq!(err.error_code(), "INVALID_CONFIG");
}

// ============================================================================
// Progress Reporting Tests
// ============================================================================

#[test]
fn test_progress_reaches_completion() {
    let updates = Arc::new(Mutex::new(Vec::new()));
    let sink = updates.clone();

    let df = load_records(
        fixtures_path().join("sms_sample.tsv"),
        "text",
        &LoaderOptions::default(),
    )
    .unwrap();

    Pipeline::builder()
        .on_progress(move |update| sink.lock().unwrap().push(update))
        .build()
        .unwrap()
        .process(df)
        .unwrap();

    let updates = updates.lock().unwrap();
    assert_eq!(updates.first().unwrap().stage, MiningStage::Loading);

    let last = updates.last().unwrap();
    assert_eq!(last.stage, MiningStage::Complete);
    assert_eq!(last.progress, 1.0);

    let progress: Vec<f32> = updates.iter().map(|u| u.progress).collect();
    assert!(progress.windows(2).all(|w| w[0] <= w[1] + 1e-6));
}
