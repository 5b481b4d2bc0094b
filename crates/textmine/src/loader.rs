//! Loading labeled text records from delimited files.
//!
//! Records are read with the Polars CSV reader. Message text routinely
//! contains stray quote characters, so quoting is disabled, and schema
//! inference is off so every column stays a string column. Empty fields and
//! the usual NA spellings ("NA", "N/A", "null", "nan", ...) read as missing.

use crate::error::{Result, ResultExt, TextMiningError};
use crate::types::TextInput;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Key used in label counts for rows without a label.
pub const MISSING_LABEL: &str = "<missing>";

/// Field values read as missing, matching the pandas defaults.
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// How the input file is laid out.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    pub separator: u8,
    pub has_header: bool,
    /// Exact field values treated as missing, besides empty fields.
    pub na_values: Vec<String>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            separator: b'\t',
            has_header: true,
            na_values: DEFAULT_NA_VALUES.iter().map(|v| v.to_string()).collect(),
        }
    }
}

impl LoaderOptions {
    fn read_options(&self) -> CsvReadOptions {
        let null_values = (!self.na_values.is_empty()).then(|| {
            NullValues::AllColumns(self.na_values.iter().map(|v| v.as_str().into()).collect())
        });

        CsvReadOptions::default()
            .with_has_header(self.has_header)
            .with_infer_schema_length(Some(0))
            .with_parse_options(
                CsvParseOptions::default()
                    .with_separator(self.separator)
                    .with_quote_char(None)
                    .with_null_values(null_values),
            )
    }
}

/// Read a delimited file and check that `text_column` is present.
pub fn load_records(
    path: impl AsRef<Path>,
    text_column: &str,
    options: &LoaderOptions,
) -> Result<DataFrame> {
    let path = path.as_ref();
    info!("Loading records from: {}", path.display());

    let df = options
        .read_options()
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .context(format!("Opening {}", path.display()))?
        .finish()
        .context(format!("Parsing {}", path.display()))?;

    require_column(&df, text_column)?;
    info!("Loaded {} records with columns {:?}", df.height(), df.get_column_names());
    Ok(df)
}

/// Parse records from in-memory delimited content.
pub fn parse_records(content: &str, text_column: &str, options: &LoaderOptions) -> Result<DataFrame> {
    let cursor = Cursor::new(content.as_bytes().to_vec());
    let df = options
        .read_options()
        .into_reader_with_file_handle(cursor)
        .finish()
        .context("Parsing in-memory records")?;

    require_column(&df, text_column)?;
    debug!("Parsed {} records", df.height());
    Ok(df)
}

/// Fail with [`TextMiningError::ColumnNotFound`] unless `column` exists.
pub fn require_column(df: &DataFrame, column: &str) -> Result<()> {
    if df.get_column_names().iter().any(|c| c.as_str() == column) {
        Ok(())
    } else {
        Err(TextMiningError::ColumnNotFound(column.to_string()))
    }
}

/// Raw text cells of `column`, nulls as [`TextInput::Missing`].
pub fn text_inputs(df: &DataFrame, column: &str) -> Result<Vec<TextInput>> {
    let values = string_column(df, column)?;
    let values = values.str()?;
    Ok(values.into_iter().map(TextInput::from).collect())
}

/// Number of records per label value.
pub fn label_counts(df: &DataFrame, column: &str) -> Result<BTreeMap<String, usize>> {
    let values = string_column(df, column)?;
    let values = values.str()?;

    let mut counts = BTreeMap::new();
    for label in values.into_iter() {
        let key = label.unwrap_or(MISSING_LABEL).to_string();
        *counts.entry(key).or_insert(0) += 1;
    }
    Ok(counts)
}

fn string_column(df: &DataFrame, column: &str) -> Result<Series> {
    require_column(df, column)?;
    let series = df.column(column)?.as_materialized_series();
    Ok(series.cast(&DataType::String)?)
}
