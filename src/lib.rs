//! `schema-records` ingests CSV and JSON files into [`types::Record`]s that conform to a
//! user-defined [`types::Schema`].
//!
//! The primary entrypoint is [`ingestion::ingest`] (or [`store::RecordStore::ingest`], which also
//! appends the accepted records to a collection). The pipeline is:
//!
//! 1. **decode**: pick the decoder by file name (`.csv` for CSV, anything else for JSON) and turn
//!    the file into records holding only the fields the schema declares
//! 2. **coerce**: every value is converted to its field's type by [`coerce`]; coercion never fails
//!    and keeps malformed input as a sentinel
//! 3. **validate**: [`validation`] checks required fields and types and reports human-readable
//!    messages
//! 4. **accept or reject**: a batch is accepted only if every record is valid; otherwise the
//!    caller gets one `"Row {n}: ..."` message per failing row and nothing is stored
//!
//! ## Field types
//!
//! - [`types::FieldType::String`]: any value
//! - [`types::FieldType::Number`]: finite `f64`
//! - [`types::FieldType::Boolean`]: `true` only for the text `"true"` (case-insensitive)
//! - [`types::FieldType::Date`]: UTC timestamp
//!
//! ## Example
//!
//! ```rust
//! use schema_records::ingestion::{IngestSource, IngestionOptions};
//! use schema_records::store::RecordStore;
//! use schema_records::types::{Field, FieldType, Schema, Value};
//!
//! let schema = Schema::new(
//!     "people",
//!     "club members",
//!     vec![
//!         Field::new("name", FieldType::String).required(),
//!         Field::new("age", FieldType::Number),
//!         Field::new("member", FieldType::Boolean),
//!     ],
//! )
//! .unwrap();
//!
//! let mut store = RecordStore::new(&schema);
//! let opts = IngestionOptions::default();
//!
//! let file = IngestSource::new("people.json", r#"[{"name":"Ada","age":"36","member":true}]"#);
//! store.ingest(&file, &schema, &opts).unwrap();
//! assert_eq!(store.records()[0].get("age"), Some(&Value::Number(36.0)));
//!
//! // One bad row rejects the whole file.
//! let file = IngestSource::new("people.csv", "name,age\nGrace,45\n,x");
//! let err = store.ingest(&file, &schema, &opts).unwrap_err();
//! assert_eq!(err.messages(), ["Row 2: name is required, age must be a number"]);
//! assert_eq!(store.len(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: unified ingestion entrypoints and format-specific decoders
//! - [`types`]: schema, record and value types
//! - [`coerce`]: raw input to typed value conversion
//! - [`validation`]: record checks against a schema
//! - [`store`]: accepted-record collection with update/delete and a table view
//! - [`catalog`]: registry of created schemas
//! - [`error`]: error types

pub mod catalog;
pub mod coerce;
pub mod error;
pub mod ingestion;
pub mod store;
pub mod types;
pub mod validation;

pub use error::{IngestionError, IngestionResult, SchemaError};
