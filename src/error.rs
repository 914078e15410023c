use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by ingestion functions.
///
/// Decode-level variants (`Io`, `Csv`, `Json`, `Format`) abort an ingestion call before any
/// validation runs. [`IngestionError::Rejected`] carries the per-row validation messages of a batch
/// that was refused as a whole.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited-text decoding error (e.g. invalid UTF-8).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The input is not valid JSON.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    /// The input parsed but does not have the expected shape.
    #[error("{message}")]
    Format { message: String },

    /// The operation targeted a record collection owned by a different schema.
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// One or more decoded records failed validation; no record of the batch was accepted.
    #[error("{} row(s) failed validation", errors.len())]
    Rejected { errors: Vec<String> },
}

impl IngestionError {
    /// Caller-facing messages for this error.
    ///
    /// A rejected batch yields one `"Row {n}: ..."` message per failing row; every other error is
    /// a single message.
    pub fn messages(&self) -> Vec<String> {
        match self {
            IngestionError::Rejected { errors } => errors.clone(),
            other => vec![other.to_string()],
        }
    }
}

/// Error returned when a schema definition is malformed.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema name must not be empty")]
    EmptyName,

    #[error("field #{index} has an empty name")]
    EmptyFieldName { index: usize },

    #[error("duplicate field name '{name}'")]
    DuplicateField { name: String },

    #[error("schema {id} is already registered")]
    DuplicateId { id: uuid::Uuid },

    /// The schema definition is not valid JSON or has the wrong shape.
    #[error("invalid schema definition: {0}")]
    Json(#[from] serde_json::Error),
}
