//! Type coercion from raw input into typed [`Value`]s.
//!
//! Coercion is total: it never fails. Input that does not fit the target type becomes a sentinel
//! (`Number(NaN)`, `InvalidDate`) which [`crate::validation`] reports later.
//!
//! Rules by target type:
//!
//! - `string`: text passes through unchanged.
//! - `number`: decimal parse; anything else is NaN. Blank text is `0`.
//! - `boolean`: `true` iff the lowercased text equals `"true"`. Nothing else is true.
//! - `date`: RFC 3339, RFC 2822, ISO-like date/time or plain date. Anything else, blank text
//!   included, is `InvalidDate`.
//!
//! JSON input that is already of the target type (a JSON number for `number`, a JSON bool for
//! `boolean`) is kept as is. Other JSON scalars are rendered to text and go through the text
//! rules, except that a JSON number for a `date` field is read as Unix epoch milliseconds, with
//! any fraction truncated. JSON `null` is `Null` for every type.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::types::{FieldType, Value};

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Coerce a text cell into `field_type`.
pub fn coerce_str(raw: &str, field_type: FieldType) -> Value {
    match field_type {
        FieldType::String => Value::String(raw.to_owned()),
        FieldType::Number => parse_number(raw),
        FieldType::Boolean => Value::Boolean(raw.to_lowercase() == "true"),
        FieldType::Date => parse_date(raw),
    }
}

/// Coerce a JSON value into `field_type`.
pub fn coerce_json(raw: &serde_json::Value, field_type: FieldType) -> Value {
    use serde_json::Value as Json;

    match (raw, field_type) {
        (Json::Null, _) => Value::Null,
        (Json::String(s), _) => coerce_str(s, field_type),
        (Json::Number(n), FieldType::Number) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        (Json::Bool(b), FieldType::Boolean) => Value::Boolean(*b),
        (Json::Number(n), FieldType::Date) => n
            .as_f64()
            .filter(|ms| ms.is_finite())
            .and_then(|ms| DateTime::<Utc>::from_timestamp_millis(ms.trunc() as i64))
            .map(Value::Date)
            .unwrap_or_else(|| Value::InvalidDate(n.to_string())),
        (other, _) => coerce_str(&other.to_string(), field_type),
    }
}

fn parse_number(raw: &str) -> Value {
    let trimmed = raw.trim();
    let parsed = match trimmed {
        "" => Ok(0.0),
        "Infinity" | "+Infinity" => Ok(f64::INFINITY),
        "-Infinity" => Ok(f64::NEG_INFINITY),
        other => other.parse::<f64>(),
    };
    Value::Number(parsed.unwrap_or(f64::NAN))
}

fn parse_date(raw: &str) -> Value {
    match parse_date_time(raw.trim()) {
        Some(d) => Value::Date(d),
        None => Value::InvalidDate(raw.to_owned()),
    }
}

/// Parse a date/time. Inputs without an offset are taken as UTC.
pub fn parse_date_time(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Some(d.with_timezone(&Utc));
    }
    if let Ok(d) = DateTime::parse_from_rfc2822(s) {
        return Some(d.with_timezone(&Utc));
    }
    for fmt in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
