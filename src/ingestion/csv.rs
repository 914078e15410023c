//! Delimited-text (CSV) decoding and encoding.
//!
//! Grammar:
//!
//! - The first line is the header row; column names are whitespace-trimmed.
//! - Every following non-blank line is one record. Cells are split on `,` and trimmed.
//! - There is no quoting or escaping. A `,` inside a value shifts the remaining columns.
//!
//! Columns are matched to schema fields by name. Columns without a matching field are dropped;
//! fields without a column are left out of the record data.

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::coerce::coerce_str;
use crate::error::{IngestionError, IngestionResult};
use crate::types::{Field, Record, RecordData, Schema};

/// Reader configuration for the delimited-text grammar.
pub fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .quoting(false)
        .flexible(true)
        .trim(csv::Trim::All);
    builder
}

/// Decode a CSV file into records for `schema`.
pub fn decode_csv_from_path(path: impl AsRef<Path>, schema: &Schema) -> IngestionResult<Vec<Record>> {
    let mut rdr = reader_builder().from_path(path)?;
    decode_csv_from_reader(&mut rdr, schema)
}

/// Decode in-memory CSV text into records for `schema`.
pub fn decode_csv_str(input: &str, schema: &Schema) -> IngestionResult<Vec<Record>> {
    let mut rdr = reader_builder().from_reader(input.as_bytes());
    decode_csv_from_reader(&mut rdr, schema)
}

/// Decode CSV data from an existing reader.
///
/// The reader should be built with [`reader_builder`] so quoting and trimming follow the grammar.
pub fn decode_csv_from_reader<R: Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
) -> IngestionResult<Vec<Record>> {
    let headers = rdr.headers()?.clone();

    // CSV column index -> schema field (allows re-ordered and extra columns).
    let columns: Vec<(usize, &Field)> = headers
        .iter()
        .enumerate()
        .filter_map(|(idx, name)| schema.field(name).map(|field| (idx, field)))
        .collect();

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        if is_blank(&row) {
            continue;
        }

        let mut data = RecordData::new();
        for &(idx, field) in &columns {
            // Short rows leave trailing fields absent.
            if let Some(raw) = row.get(idx) {
                data.insert(field.name.clone(), coerce_str(raw, field.field_type));
            }
        }
        records.push(Record::new(schema.id, data));
    }

    debug!(
        columns = headers.len(),
        matched = columns.len(),
        records = records.len(),
        "decoded csv"
    );
    Ok(records)
}

/// Encode records as CSV text using the same grammar the decoder reads.
///
/// Columns follow schema field order; absent values are written as empty cells.
pub fn encode_records(records: &[Record], schema: &Schema) -> IngestionResult<String> {
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(Vec::new());

    wtr.write_record(schema.field_names())?;
    for record in records {
        let cells = schema
            .fields
            .iter()
            .map(|f| record.get(&f.name).map(ToString::to_string).unwrap_or_default());
        wtr.write_record(cells)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| IngestionError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| IngestionError::Format {
        message: format!("encoded csv is not utf-8: {e}"),
    })
}

fn is_blank(row: &csv::StringRecord) -> bool {
    row.len() <= 1 && row.get(0).is_none_or(str::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldType, Value};

    fn schema() -> Schema {
        Schema::new(
            "people",
            "",
            vec![
                Field::new("name", FieldType::String).required(),
                Field::new("age", FieldType::Number),
                Field::new("active", FieldType::Boolean),
            ],
        )
        .unwrap()
    }

    #[test]
    fn blank_and_whitespace_lines_are_skipped() {
        let records = decode_csv_str("name,age\n\nAda,36\n   \nGrace,45\n", &schema()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("name"), Some(&Value::String("Grace".into())));
    }

    #[test]
    fn row_of_empty_cells_is_not_blank() {
        let records = decode_csv_str("name,age\n,\n", &schema()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("name"), Some(&Value::String(String::new())));
        assert_eq!(records[0].get("age"), Some(&Value::Number(0.0)));
    }

    #[test]
    fn empty_date_cell_is_an_invalid_date() {
        let s = Schema::new("events", "", vec![Field::new("at", FieldType::Date)]).unwrap();
        let records = decode_csv_str("at,x\n,1\n", &s).unwrap();
        assert_eq!(records[0].get("at"), Some(&Value::InvalidDate(String::new())));
    }

    #[test]
    fn quotes_are_literal_and_commas_shift_columns() {
        let records = decode_csv_str("name,age\n\"Lovelace, Ada\",36\n", &schema()).unwrap();
        assert_eq!(records[0].get("name"), Some(&Value::String("\"Lovelace".into())));
        assert!(matches!(records[0].get("age"), Some(Value::Number(n)) if n.is_nan()));
    }

    #[test]
    fn crlf_line_endings_are_trimmed() {
        let records = decode_csv_str("name,active\r\nAda,true\r\n", &schema()).unwrap();
        assert_eq!(records[0].get("active"), Some(&Value::Boolean(true)));
    }

    #[test]
    fn short_rows_leave_trailing_fields_absent() {
        let records = decode_csv_str("name,age,active\nAda\n", &schema()).unwrap();
        assert_eq!(records[0].data.len(), 1);
        assert!(records[0].get("age").is_none());
    }

    #[test]
    fn encode_writes_schema_order_and_empty_cells() {
        let s = schema();
        let mut data = RecordData::new();
        data.insert("active".into(), Value::Boolean(false));
        data.insert("name".into(), Value::String("Ada".into()));
        let out = encode_records(&[Record::new(s.id, data)], &s).unwrap();
        assert_eq!(out, "name,age,active\nAda,,false\n");
    }
}
