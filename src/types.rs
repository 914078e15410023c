//! Core data model types.
//!
//! A [`Schema`] is an ordered list of typed [`Field`]s. Ingestion turns untyped files into
//! [`Record`]s whose [`RecordData`] maps field names to typed [`Value`]s.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SchemaError;

/// Logical data type for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free text. Any value is a valid string.
    String,
    /// Finite floating point number.
    Number,
    /// Boolean.
    Boolean,
    /// Calendar date/time, normalized to UTC.
    Date,
}

impl FieldType {
    /// Lowercase name used in schema definitions (`"string"`, `"number"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name. Unique within a schema; matched against CSV headers and JSON keys.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether a record must carry a non-empty value for this field.
    #[serde(default)]
    pub required: bool,
    /// Optional human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Field {
    /// Create a new optional field without description.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            description: None,
        }
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A user-defined record shape.
///
/// Schemas are immutable once created: [`Schema::new`] checks the field list and stamps the
/// identifier and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Ordered list of fields. Order drives display, not parsing.
    pub fields: Vec<Field>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The user-supplied part of a schema, as submitted by a schema form or a JSON definition file.
#[derive(Debug, Clone, Deserialize)]
struct SchemaDefinition {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    fields: Vec<Field>,
}

impl Schema {
    /// Create a schema with a fresh id.
    ///
    /// Fails if the schema name is blank, a field name is blank, or two fields share a name.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        fields: Vec<Field>,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SchemaError::EmptyName);
        }

        let mut seen = HashSet::with_capacity(fields.len());
        for (index, field) in fields.iter().enumerate() {
            if field.name.trim().is_empty() {
                return Err(SchemaError::EmptyFieldName { index });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    name: field.name.clone(),
                });
            }
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description: description.into(),
            fields,
            created_at: now,
            updated_at: now,
        })
    }

    /// Create a schema from a JSON definition of the form
    /// `{"name": ..., "description": ..., "fields": [{"name": ..., "type": ..., "required": ...}]}`.
    pub fn from_json_str(input: &str) -> Result<Self, SchemaError> {
        let def: SchemaDefinition = serde_json::from_str(input)?;
        Self::new(def.name, def.description, def.fields)
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A single typed value stored in a [`Record`].
///
/// Coercion never fails, so malformed input is kept as a sentinel ([`Value::Number`] holding NaN,
/// [`Value::InvalidDate`]) and rejected later by validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value (JSON `null`).
    Null,
    String(String),
    /// NaN marks input that did not parse as a number.
    Number(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
    /// Input that did not parse as a date; keeps the raw text.
    InvalidDate(String),
}

impl Value {
    /// `true` for values the required-check treats as missing: `Null` and the empty string.
    pub fn is_absent(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Returns the value as a finite number, if it can be read as one.
    ///
    /// Numeric strings count; booleans and dates do not.
    pub fn as_finite_number(&self) -> Option<f64> {
        let n = match self {
            Value::Number(n) => *n,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        n.is_finite().then_some(n)
    }
}

impl fmt::Display for Value {
    /// Cell text as shown in a table view and written by the CSV encoder.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::String(s) => f.write_str(s),
            Value::Number(n) if n.is_nan() => f.write_str("NaN"),
            Value::Number(n) if n.is_infinite() => f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" }),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Value::Number(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Date(d) => f.write_str(&d.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::InvalidDate(_) => f.write_str("Invalid Date"),
        }
    }
}

/// Field-name keyed record payload.
pub type RecordData = BTreeMap<String, Value>;

/// One data instance belonging to a [`Schema`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: Uuid,
    /// Back-reference to the owning schema.
    pub schema_id: Uuid,
    pub data: RecordData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record {
    /// Create a record with a fresh id, stamped with the current time.
    pub fn new(schema_id: Uuid, data: RecordData) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            schema_id,
            data,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the value stored for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }
}
