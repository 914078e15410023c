//! Unified ingestion entrypoint.
//!
//! [`ingest`] takes a named input and a [`Schema`] and runs the whole pipeline:
//!
//! 1. pick a decoder from the file name (`.csv` is CSV, anything else is JSON) unless
//!    [`IngestionOptions::format`] forces one
//! 2. decode; a decode error is returned as is and validation is skipped
//! 3. validate every record; if any record fails, the whole batch is refused with
//!    [`IngestionError::Rejected`] carrying one `"Row {n}: ..."` message per failing row
//!
//! If an [`IngestionObserver`] is configured, the outcome is reported to it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{Record, Schema};
use crate::validation::validate_batch;

use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};
use super::{csv, json};

/// Supported ingestion formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values with a header row and no quoting.
    Csv,
    /// JSON array of objects.
    Json,
}

impl IngestionFormat {
    /// Pick a format from a file name: a `.csv` suffix selects CSV, everything else selects JSON.
    ///
    /// The suffix match ignores ASCII case, so `DATA.CSV` is CSV. An exact, case-sensitive
    /// `.csv` match would send such uploads to the JSON decoder instead.
    pub fn from_file_name(name: &str) -> Self {
        match name.rsplit_once('.') {
            Some((_, ext)) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Json,
        }
    }
}

/// A named in-memory input, as handed over by an upload widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestSource {
    /// File name (or path). Only used for format dispatch and reporting.
    pub name: String,
    /// Entire file contents.
    pub contents: String,
}

impl IngestSource {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    /// Read a file into memory.
    pub fn read(path: impl AsRef<Path>) -> IngestionResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::new(path.display().to_string(), contents))
    }

    /// Read a file into memory without blocking the async runtime.
    pub async fn read_async(path: impl AsRef<Path>) -> IngestionResult<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await?;
        Ok(Self::new(path.display().to_string(), contents))
    }

    /// Format selected by the file name.
    pub fn format(&self) -> IngestionFormat {
        IngestionFormat::from_file_name(&self.name)
    }
}

/// Options controlling unified ingestion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, pick the format from the file name.
    pub format: Option<IngestionFormat>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

impl IngestionOptions {
    fn format_for(&self, name: &str) -> IngestionFormat {
        self.format
            .unwrap_or_else(|| IngestionFormat::from_file_name(name))
    }
}

/// Decode `contents` with the given format. No validation.
pub fn decode(contents: &str, schema: &Schema, format: IngestionFormat) -> IngestionResult<Vec<Record>> {
    match format {
        IngestionFormat::Csv => csv::decode_csv_str(contents, schema),
        IngestionFormat::Json => json::decode_json_str(contents, schema),
    }
}

/// Decode and validate `source` against `schema`.
///
/// Returns all records, or none: if any record fails validation the result is
/// [`IngestionError::Rejected`] listing every failing row.
///
/// ```
/// use schema_records::ingestion::{ingest, IngestSource, IngestionOptions};
/// use schema_records::types::{Field, FieldType, Schema, Value};
///
/// let schema = Schema::new("ages", "", vec![Field::new("age", FieldType::Number).required()]).unwrap();
///
/// let ok = ingest(&IngestSource::new("ages.csv", "age\n30\n25"), &schema, &IngestionOptions::default()).unwrap();
/// assert_eq!(ok[1].get("age"), Some(&Value::Number(25.0)));
///
/// let err = ingest(&IngestSource::new("ages.csv", "age\n30\nabc"), &schema, &IngestionOptions::default()).unwrap_err();
/// assert_eq!(err.messages(), ["Row 2: age must be a number"]);
/// ```
pub fn ingest(source: &IngestSource, schema: &Schema, options: &IngestionOptions) -> IngestionResult<Vec<Record>> {
    let format = options.format_for(&source.name);
    debug!(source = %source.name, ?format, "ingesting");

    let result = decode(&source.contents, schema, format).and_then(|records| {
        let errors = validate_batch(&records, schema);
        if errors.is_empty() {
            Ok(records)
        } else {
            Err(IngestionError::Rejected { errors })
        }
    });

    report(options, &source.name, format, result.as_ref().map(Vec::len));
    result
}

/// Read `path` and run [`ingest`] on it.
///
/// I/O failures are reported to the observer like any other failure.
pub fn ingest_from_path(
    path: impl AsRef<Path>,
    schema: &Schema,
    options: &IngestionOptions,
) -> IngestionResult<Vec<Record>> {
    let path = path.as_ref();
    match IngestSource::read(path) {
        Ok(source) => ingest(&source, schema, options),
        Err(e) => Err(report_read_failure(options, path, e)),
    }
}

/// Async variant of [`ingest_from_path`]: the file is read with `tokio::fs`, and the caller gets a
/// single terminal outcome.
pub async fn ingest_from_path_async(
    path: impl AsRef<Path>,
    schema: &Schema,
    options: &IngestionOptions,
) -> IngestionResult<Vec<Record>> {
    let path = path.as_ref();
    match IngestSource::read_async(path).await {
        Ok(source) => ingest(&source, schema, options),
        Err(e) => Err(report_read_failure(options, path, e)),
    }
}

fn report_read_failure(options: &IngestionOptions, path: &Path, error: IngestionError) -> IngestionError {
    let name = path.display().to_string();
    report(options, &name, options.format_for(&name), Err(&error));
    error
}

fn report(
    options: &IngestionOptions,
    source: &str,
    format: IngestionFormat,
    outcome: Result<usize, &IngestionError>,
) {
    let Some(obs) = options.observer.as_ref() else {
        return;
    };

    let ctx = IngestionContext {
        source: source.to_string(),
        format,
    };
    match outcome {
        Ok(records) => obs.on_success(&ctx, IngestionStats { records }),
        Err(e) => {
            let sev = IngestionSeverity::of(e);
            obs.on_failure(&ctx, sev, e);
            if sev >= options.alert_at_or_above {
                obs.on_alert(&ctx, sev, e);
            }
        }
    }
}

/// Owned ingestion job: path, schema and options.
///
/// This can be useful if you want to enqueue ingestion work and run it later.
#[derive(Clone)]
pub struct IngestionRequest {
    /// Path to the input file.
    pub path: PathBuf,
    /// Schema to coerce and validate records against.
    pub schema: Schema,
    /// Options controlling ingestion.
    pub options: IngestionOptions,
}

impl fmt::Debug for IngestionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionRequest")
            .field("path", &self.path)
            .field("schema_fields", &self.schema.fields.len())
            .field("options", &self.options)
            .finish()
    }
}

impl IngestionRequest {
    /// Execute the request by calling [`ingest_from_path`].
    pub fn run(&self) -> IngestionResult<Vec<Record>> {
        ingest_from_path(&self.path, &self.schema, &self.options)
    }

    /// Execute the request by calling [`ingest_from_path_async`].
    pub async fn run_async(&self) -> IngestionResult<Vec<Record>> {
        ingest_from_path_async(&self.path, &self.schema, &self.options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_file_name() {
        assert_eq!(IngestionFormat::from_file_name("people.csv"), IngestionFormat::Csv);
        assert_eq!(IngestionFormat::from_file_name("PEOPLE.CSV"), IngestionFormat::Csv);
        assert_eq!(IngestionFormat::from_file_name("dir/people.csv"), IngestionFormat::Csv);
        assert_eq!(IngestionFormat::from_file_name("people.json"), IngestionFormat::Json);
        assert_eq!(IngestionFormat::from_file_name("people.txt"), IngestionFormat::Json);
        assert_eq!(IngestionFormat::from_file_name("csv"), IngestionFormat::Json);
        assert_eq!(IngestionFormat::from_file_name("people.csv.bak"), IngestionFormat::Json);
    }

    #[test]
    fn forced_format_overrides_file_name() {
        let opts = IngestionOptions {
            format: Some(IngestionFormat::Csv),
            ..Default::default()
        };
        assert_eq!(opts.format_for("upload.json"), IngestionFormat::Csv);
        assert_eq!(IngestionOptions::default().format_for("upload.json"), IngestionFormat::Json);
    }
}
