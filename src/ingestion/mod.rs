//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest`] / [`ingest_from_path`] (from [`unified`]) which:
//!
//! - pick the decoder by file name (or you can override via [`IngestionOptions`])
//! - decode the whole input into [`crate::types::Record`]s
//! - validate every record and accept the batch only if all of them pass
//! - optionally report success/failure/alerts to an [`IngestionObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]

pub mod csv;
pub mod json;
pub mod observability;
pub mod unified;

pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    TracingObserver,
};
pub use unified::{
    decode, ingest, ingest_from_path, ingest_from_path_async, IngestSource, IngestionFormat, IngestionOptions,
    IngestionRequest,
};
