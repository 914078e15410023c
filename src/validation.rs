//! Record validation against a [`Schema`].
//!
//! Validation runs after coercion and checks, per field in declaration order:
//!
//! - required fields are present (missing key, `Null` and `""` count as absent)
//! - present values conform to the declared type
//!
//! Every field is checked; there is no early exit.

use thiserror::Error;

use crate::types::{Field, FieldType, Record, RecordData, Schema, Value};

/// A single validation finding. The `Display` form is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldViolation {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be a number")]
    NotANumber { field: String },

    #[error("{field} must be a valid date")]
    InvalidDate { field: String },

    #[error("{field} must be a boolean")]
    NotABoolean { field: String },
}

/// Check a data map against `schema`, returning typed findings in field order.
pub fn check_data(data: &RecordData, schema: &Schema) -> Vec<FieldViolation> {
    let mut out = Vec::new();

    for field in &schema.fields {
        match data.get(&field.name).filter(|v| !v.is_absent()) {
            Some(value) => out.extend(type_violation(field, value)),
            None if field.required => out.push(FieldViolation::Required {
                field: field.name.clone(),
            }),
            None => {}
        }
    }

    out
}

/// Validate a record, returning human-readable messages (empty means valid).
pub fn validate_record(record: &Record, schema: &Schema) -> Vec<String> {
    check_data(&record.data, schema)
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Validate a batch, returning one `"Row {n}: ..."` message per failing record.
///
/// Rows are numbered from 1 in batch order.
pub fn validate_batch(records: &[Record], schema: &Schema) -> Vec<String> {
    records
        .iter()
        .enumerate()
        .filter_map(|(idx0, record)| {
            let errors = validate_record(record, schema);
            (!errors.is_empty()).then(|| row_message(idx0 + 1, &errors))
        })
        .collect()
}

/// Format the combined message for one failing row.
pub fn row_message(row: usize, errors: &[String]) -> String {
    format!("Row {row}: {}", errors.join(", "))
}

fn type_violation(field: &Field, value: &Value) -> Option<FieldViolation> {
    let name = || field.name.clone();
    match field.field_type {
        FieldType::String => None,
        FieldType::Number => value
            .as_finite_number()
            .is_none()
            .then(|| FieldViolation::NotANumber { field: name() }),
        FieldType::Date => (!matches!(value, Value::Date(_)))
            .then(|| FieldViolation::InvalidDate { field: name() }),
        FieldType::Boolean => (!matches!(value, Value::Boolean(_)))
            .then(|| FieldViolation::NotABoolean { field: name() }),
    }
}
