//! In-memory collection of accepted records for one schema.
//!
//! [`RecordStore`] is the caller-held state the ingestion pipeline appends to. Appends only happen
//! on a fully accepted batch; a rejected batch leaves the store untouched. Every mutating method
//! takes `&mut self`, so two ingestions can never interleave on the same store.

use std::path::Path;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::error::{IngestionError, IngestionResult};
use crate::ingestion::{ingest, ingest_from_path, ingest_from_path_async, IngestSource, IngestionOptions};
use crate::types::{Record, RecordData, Schema};

/// Accepted records of one schema, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordStore {
    schema_id: Uuid,
    records: Vec<Record>,
}

impl RecordStore {
    /// Create an empty store for records of `schema`.
    pub fn new(schema: &Schema) -> Self {
        Self {
            schema_id: schema.id,
            records: Vec::new(),
        }
    }

    pub fn schema_id(&self) -> Uuid {
        self.schema_id
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Ingest `source` and append the batch if every record is valid.
    ///
    /// Returns the newly appended records.
    pub fn ingest(
        &mut self,
        source: &IngestSource,
        schema: &Schema,
        options: &IngestionOptions,
    ) -> IngestionResult<&[Record]> {
        self.ensure_schema(schema)?;
        let batch = ingest(source, schema, options)?;
        Ok(self.append(batch))
    }

    /// Read `path` and append its records if every record is valid.
    pub fn ingest_path(
        &mut self,
        path: impl AsRef<Path>,
        schema: &Schema,
        options: &IngestionOptions,
    ) -> IngestionResult<&[Record]> {
        self.ensure_schema(schema)?;
        let batch = ingest_from_path(path, schema, options)?;
        Ok(self.append(batch))
    }

    /// Async variant of [`RecordStore::ingest_path`].
    pub async fn ingest_path_async(
        &mut self,
        path: impl AsRef<Path>,
        schema: &Schema,
        options: &IngestionOptions,
    ) -> IngestionResult<&[Record]> {
        self.ensure_schema(schema)?;
        let batch = ingest_from_path_async(path, schema, options).await?;
        Ok(self.append(batch))
    }

    /// Remove the record with `id`. Returns whether a record was removed.
    pub fn delete(&mut self, id: Uuid) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        before != self.records.len()
    }

    /// Replace the data of the record with `id` and refresh its `updated_at`.
    ///
    /// The new data is stored as given; it is not re-validated. Returns whether a record matched.
    pub fn update(&mut self, id: Uuid, data: RecordData) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.data = data;
                record.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Render the store as a table: one column per schema field, one row per record.
    pub fn table(&self, schema: &Schema) -> Table {
        let header = schema.field_names().map(str::to_owned).collect();
        let rows = self
            .records
            .iter()
            .map(|record| TableRow {
                record_id: record.id,
                cells: schema
                    .fields
                    .iter()
                    .map(|f| record.get(&f.name).map(ToString::to_string).unwrap_or_default())
                    .collect(),
            })
            .collect();
        Table { header, rows }
    }

    fn ensure_schema(&self, schema: &Schema) -> IngestionResult<()> {
        if schema.id == self.schema_id {
            return Ok(());
        }
        Err(IngestionError::SchemaMismatch {
            message: format!(
                "store holds records of schema {} but '{}' has id {}",
                self.schema_id, schema.name, schema.id
            ),
        })
    }

    fn append(&mut self, batch: Vec<Record>) -> &[Record] {
        let start = self.records.len();
        self.records.extend(batch);
        debug!(appended = self.records.len() - start, total = self.records.len(), "records accepted");
        &self.records[start..]
    }
}

/// Text rendering of a [`RecordStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Field names in schema order.
    pub header: Vec<String>,
    pub rows: Vec<TableRow>,
}

/// One rendered record. Absent values render as empty cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub record_id: Uuid,
    pub cells: Vec<String>,
}
