//! JSON ingestion implementation.
//!
//! Supported input: a JSON array of flat objects, `[{"a":1}, {"a":2}]`. Any other top-level value is
//! a format error. Only keys matching schema field names are read. A `null` element is a format
//! error; other elements that are not objects produce records with no data (which the
//! required-check then reports).

use std::fs;
use std::path::Path;

use tracing::{debug, trace};

use crate::coerce::coerce_json;
use crate::error::{IngestionError, IngestionResult};
use crate::types::{Record, RecordData, Schema};

/// Message of the format error raised when the top-level JSON value is not an array.
pub const EXPECTED_ARRAY: &str = "expected an array of records";

/// Decode a JSON file into records for `schema`.
pub fn decode_json_from_path(path: impl AsRef<Path>, schema: &Schema) -> IngestionResult<Vec<Record>> {
    let text = fs::read_to_string(path)?;
    decode_json_str(&text, schema)
}

/// Decode in-memory JSON text into records for `schema`.
pub fn decode_json_str(input: &str, schema: &Schema) -> IngestionResult<Vec<Record>> {
    let serde_json::Value::Array(items) = serde_json::from_str::<serde_json::Value>(input)? else {
        return Err(IngestionError::Format {
            message: EXPECTED_ARRAY.to_string(),
        });
    };

    let records = items
        .iter()
        .enumerate()
        .map(|(idx0, item)| decode_object(idx0 + 1, item, schema).map(|data| Record::new(schema.id, data)))
        .collect::<IngestionResult<Vec<Record>>>()?;

    debug!(records = records.len(), "decoded json");
    Ok(records)
}

fn decode_object(row: usize, item: &serde_json::Value, schema: &Schema) -> IngestionResult<RecordData> {
    let obj = match item {
        serde_json::Value::Object(obj) => obj,
        serde_json::Value::Null => {
            return Err(IngestionError::Format {
                message: format!("record {row} is null"),
            });
        }
        _ => {
            trace!(row, "json element is not an object");
            return Ok(RecordData::new());
        }
    };

    let data: RecordData = schema
        .fields
        .iter()
        .filter_map(|field| {
            obj.get(&field.name)
                .map(|v| (field.name.clone(), coerce_json(v, field.field_type)))
        })
        .collect();
    Ok(data)
}
