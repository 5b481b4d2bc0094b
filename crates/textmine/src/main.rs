//! CLI entry point for the text-mining pipeline.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use dotenv::dotenv;
use std::path::Path;
use textmine::loader::{LoaderOptions, load_records};
use textmine::{
    Pipeline, PipelineConfig, PipelineConfigBuilder, StemAlgorithm, StemEncoding,
    TextMiningOutput,
};
use tracing::{error, info};

/// CLI-compatible stemming algorithm enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliStemAlgorithm {
    /// Classic Porter rules
    Porter,
    /// Snowball English (Porter2)
    Snowball,
}

impl From<CliStemAlgorithm> for StemAlgorithm {
    fn from(cli: CliStemAlgorithm) -> Self {
        match cli {
            CliStemAlgorithm::Porter => StemAlgorithm::Porter,
            CliStemAlgorithm::Snowball => StemAlgorithm::Snowball,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "TF-IDF term-document matrix from labeled short messages",
    long_about = "Cleans, tokenizes and stems a column of short messages, then builds a\n\
                  TF-IDF term-document matrix from them. Nothing is written to disk.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  TEXTMINE_INPUT    Input file used when --input is not given\n  \
                  RUST_LOG          Overrides --log-level\n\n\
                  EXAMPLES:\n  \
                  # Default settings (min_df 5, 100 terms, stemming on)\n  \
                  textmine -i SMSSpamCollection.tsv\n\n  \
                  # Larger vocabulary without stemming\n  \
                  textmine -i data.tsv --max-features 500 --no-stemming\n\n  \
                  # Machine-readable run summary\n  \
                  textmine -i data.tsv --json | jq .vocabulary_size"
)]
struct Args {
    /// Path to the tab-separated input file (header row required)
    #[arg(short, long, env = "TEXTMINE_INPUT")]
    input: String,

    /// Column holding the message text [default: text]
    #[arg(long)]
    text_column: Option<String>,

    /// Column holding the class label [default: label]
    #[arg(long)]
    label_column: Option<String>,

    /// Minimum number of documents a term must appear in [default: 5]
    #[arg(long)]
    min_df: Option<usize>,

    /// Maximum vocabulary size, most frequent terms first [default: 100]
    #[arg(long)]
    max_features: Option<usize>,

    /// Skip stemming; tokens are kept as they come out of the stopword filter
    #[arg(long)]
    no_stemming: bool,

    /// Stemming algorithm [default: porter]
    #[arg(long, value_enum)]
    stemmer: Option<CliStemAlgorithm>,

    /// Encoding applied to stems: utf8, ascii or latin1 [default: utf8]
    #[arg(long)]
    encoding: Option<String>,

    /// JSON file with a pipeline configuration
    ///
    /// Command line flags take precedence over values from this file.
    #[arg(short, long)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output the run summary as JSON to stdout instead of the human-readable result
    ///
    /// Disables all progress logs; only outputs the final JSON.
    #[arg(long)]
    json: bool,

    /// Print every vocabulary term with its IDF weight
    #[arg(long)]
    show_vocabulary: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    // .env must be loaded before parsing so TEXTMINE_INPUT can come from it
    dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = build_config(&args)?;
    let data = load_records(&args.input, &config.text_column, &LoaderOptions::default())?;
    info!("Dataset loaded successfully: {:?}", data.shape());

    let pipeline = build_pipeline(&args, config)?;

    match pipeline.process(data) {
        Ok(output) => print_output(&output, &args),
        Err(e) => {
            error!("Pipeline failed: {}", e);
            Err(anyhow!("Pipeline failed [{}]: {}", e.error_code(), e))
        }
    }
}

/// Layer command line flags over the configuration file (or the defaults).
fn build_config(args: &Args) -> Result<PipelineConfig> {
    let base = match &args.config {
        Some(path) => {
            info!("Reading configuration from: {}", path);
            PipelineConfig::from_json_file(path)?
        }
        None => PipelineConfig::default(),
    };

    let mut builder = PipelineConfigBuilder::from_config(base);

    if let Some(ref column) = args.text_column {
        builder = builder.text_column(column);
    }
    if let Some(ref column) = args.label_column {
        builder = builder.label_column(Some(column.clone()));
    }
    if let Some(min_df) = args.min_df {
        builder = builder.min_document_frequency(min_df);
    }
    if let Some(max_features) = args.max_features {
        builder = builder.max_vocabulary_size(max_features);
    }
    if args.no_stemming {
        builder = builder.enable_stemming(false);
    }
    if let Some(algorithm) = args.stemmer {
        builder = builder.stem_algorithm(algorithm.into());
    }
    if let Some(ref encoding) = args.encoding {
        builder = builder.stem_encoding(encoding.parse::<StemEncoding>()?);
    }

    Ok(builder.build()?)
}

fn build_pipeline(args: &Args, config: PipelineConfig) -> Result<Pipeline> {
    let mut builder = Pipeline::builder().config(config);

    if !args.quiet {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }

    Ok(builder.build()?)
}

/// Print the run result.
///
/// Uses `println!` on purpose: this is the program's output, not a log line.
fn print_output(output: &TextMiningOutput, args: &Args) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(&output.summary)?);
        return Ok(());
    }

    let summary = &output.summary;
    let (rows, cols) = output.shape();

    println!("Transform data sets");
    println!("({}, {})", rows, cols);

    if !args.quiet {
        println!();
        println!("Documents:       {}", summary.documents);
        println!("Missing texts:   {}", summary.missing_texts);
        println!("Empty documents: {}", summary.empty_documents);
        println!(
            "Vocabulary:      {} of {} candidate terms",
            summary.vocabulary_size, summary.candidate_terms
        );
        println!(
            "Non-zero:        {} ({:.2}% dense)",
            summary.non_zero,
            summary.density() * 100.0
        );
        for (label, count) in &summary.label_counts {
            println!("  {:<12} {}", label, count);
        }
        println!("Duration:        {}ms", summary.duration_ms);
    }

    if args.show_vocabulary
        && let Some(idf) = output.vectorizer.idf()
    {
        println!();
        println!("{:<24} {:>6} {:>8}", "Term", "DF", "IDF");
        println!("{}", "-".repeat(40));
        for (term, weight) in output.vectorizer.feature_names().iter().zip(idf.iter()) {
            let df = output.vectorizer.document_frequency(term).unwrap_or(0);
            println!("{:<24} {:>6} {:>8.4}", term, df, weight);
        }
    }

    Ok(())
}
