use std::fs;

use schema_records::IngestionError;
use schema_records::ingestion::{
    ingest, ingest_from_path, ingest_from_path_async, IngestSource, IngestionFormat, IngestionOptions,
    IngestionRequest,
};
use schema_records::types::{Field, FieldType, Schema, Value};
use schema_records::validation::validate_record;

fn people_schema() -> Schema {
    Schema::from_json_str(&fs::read_to_string("tests/fixtures/people_schema.json").unwrap()).unwrap()
}

fn age_schema() -> Schema {
    Schema::new("ages", "", vec![Field::new("age", FieldType::Number).required()]).unwrap()
}

fn ingest_str(name: &str, contents: &str, schema: &Schema) -> Result<Vec<schema_records::types::Record>, IngestionError> {
    ingest(&IngestSource::new(name, contents), schema, &IngestionOptions::default())
}

#[test]
fn csv_with_one_bad_row_is_rejected() {
    let err = ingest_str("ages.csv", "age\n30\nabc", &age_schema()).unwrap_err();
    assert_eq!(err.messages(), ["Row 2: age must be a number"]);
}

#[test]
fn csv_with_valid_rows_is_accepted() {
    let records = ingest_str("ages.csv", "age\n30\n25", &age_schema()).unwrap();
    let ages: Vec<_> = records.iter().map(|r| r.get("age").cloned()).collect();
    assert_eq!(ages, [Some(Value::Number(30.0)), Some(Value::Number(25.0))]);
}

#[test]
fn json_string_number_is_accepted() {
    let records = ingest_str("ages.json", r#"[{"age":"40"}]"#, &age_schema()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("age"), Some(&Value::Number(40.0)));
}

#[test]
fn json_object_top_level_is_a_single_decode_error() {
    let err = ingest_str("ages.json", r#"{"age":40}"#, &age_schema()).unwrap_err();
    assert_eq!(err.messages(), ["expected an array of records"]);
}

#[test]
fn non_csv_names_are_decoded_as_json() {
    let records = ingest_str("upload", r#"[{"age":1}]"#, &age_schema()).unwrap();
    assert_eq!(records.len(), 1);
    let err = ingest_str("ages.txt", "age\n1", &age_schema()).unwrap_err();
    assert!(matches!(err, IngestionError::Json(_)));
}

#[test]
fn forced_format_overrides_extension() {
    let opts = IngestionOptions {
        format: Some(IngestionFormat::Csv),
        ..Default::default()
    };
    let records = ingest(&IngestSource::new("ages.json", "age\n7"), &age_schema(), &opts).unwrap();
    assert_eq!(records[0].get("age"), Some(&Value::Number(7.0)));
}

#[test]
fn header_only_file_yields_no_records_and_no_errors() {
    let records = ingest_str("ages.csv", "age\n", &age_schema()).unwrap();
    assert!(records.is_empty());
}

#[test]
fn missing_required_field_gives_one_entry_for_that_row() {
    let err = ingest_str("people.json", r#"[{"name":"Ada","age":1},{"name":"Lin"},{"name":"Bo","age":2}]"#, &people_schema())
        .unwrap_err();
    assert_eq!(err.messages(), ["Row 2: age is required"]);
}

#[test]
fn every_failing_row_is_listed() {
    let err = ingest_from_path("tests/fixtures/people_invalid.csv", &people_schema(), &IngestionOptions::default())
        .unwrap_err();
    assert_eq!(
        err.messages(),
        [
            "Row 2: name is required, age must be a number, joined must be a valid date",
            "Row 3: joined must be a valid date",
        ]
    );
}

fn events_schema(at_required: bool) -> Schema {
    let at = Field::new("at", FieldType::Date);
    let at = if at_required { at.required() } else { at };
    Schema::new("events", "", vec![Field::new("name", FieldType::String), at]).unwrap()
}

#[test]
fn blank_optional_date_cell_rejects_the_batch() {
    let err = ingest_str("events.csv", "name,at\nAda,2024-03-01\nGrace,\n", &events_schema(false)).unwrap_err();
    assert_eq!(err.messages(), ["Row 2: at must be a valid date"]);
}

#[test]
fn empty_json_date_string_is_a_type_error_not_a_missing_value() {
    let err = ingest_str("events.json", r#"[{"name":"Ada","at":""}]"#, &events_schema(true)).unwrap_err();
    assert_eq!(err.messages(), ["Row 1: at must be a valid date"]);
}

#[test]
fn blank_required_number_cell_is_accepted_as_zero() {
    let records = ingest_str("ages.csv", "age,note\n,x\n", &age_schema()).unwrap();
    assert_eq!(records[0].get("age"), Some(&Value::Number(0.0)));
}

#[test]
fn accepted_records_all_validate() {
    let schema = people_schema();
    for path in ["tests/fixtures/people.csv", "tests/fixtures/people.json"] {
        let records = ingest_from_path(path, &schema, &IngestionOptions::default()).unwrap();
        assert_eq!(records.len(), 2, "{path}");
        assert!(records.iter().all(|r| validate_record(r, &schema).is_empty()), "{path}");
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let err = ingest_from_path("tests/fixtures/does_not_exist.csv", &age_schema(), &IngestionOptions::default())
        .unwrap_err();
    assert!(matches!(err, IngestionError::Io(_)));
    assert_eq!(err.messages().len(), 1);
}

#[test]
fn request_runs_later() {
    let req = IngestionRequest {
        path: "tests/fixtures/people.csv".into(),
        schema: people_schema(),
        options: IngestionOptions::default(),
    };
    assert_eq!(req.run().unwrap().len(), 2);
}

#[tokio::test]
async fn async_ingest_reads_and_validates() {
    let schema = people_schema();
    let records = ingest_from_path_async("tests/fixtures/people.json", &schema, &IngestionOptions::default())
        .await
        .unwrap();
    assert_eq!(records.len(), 2);

    let err = ingest_from_path_async("tests/fixtures/people_invalid.csv", &schema, &IngestionOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, IngestionError::Rejected { ref errors } if errors.len() == 2));
}

#[tokio::test]
async fn async_request_from_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ages.csv");
    fs::write(&path, "age\n1\n2\n3\n").unwrap();

    let req = IngestionRequest {
        path,
        schema: age_schema(),
        options: IngestionOptions::default(),
    };
    assert_eq!(req.run_async().await.unwrap().len(), 3);
}
