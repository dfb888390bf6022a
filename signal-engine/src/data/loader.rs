use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use common::{AnalysisError, Result};
use serde_json::Value;

use super::record::{RawRecord, RawValue};

/// Read raw records from CSV text with a header row
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| AnalysisError::CsvError(e.to_string()))?
        .clone();

    let mut records = Vec::new();

    for result in csv_reader.records() {
        let row = result.map_err(|e| AnalysisError::CsvError(e.to_string()))?;

        let record: RawRecord = headers
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let value = row.get(i).map(RawValue::from_cell).unwrap_or(RawValue::Missing);
                (name.to_string(), value)
            })
            .collect();

        records.push(record);
    }

    Ok(records)
}

/// Read raw records from a JSON array of objects
pub fn read_json<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let value: Value = serde_json::from_reader(reader)?;

    let rows = match value {
        Value::Array(rows) => rows,
        other => {
            return Err(AnalysisError::DataLoadError(format!(
                "expected a JSON array of records, got {}",
                json_kind(&other)
            )))
        }
    };

    rows.into_iter()
        .enumerate()
        .map(|(i, row)| match row {
            Value::Object(map) => Ok(map
                .into_iter()
                .map(|(name, value)| (name, json_to_raw(value)))
                .collect()),
            other => Err(AnalysisError::DataLoadError(format!(
                "record {} is {}, not an object",
                i,
                json_kind(&other)
            ))),
        })
        .collect()
}

fn json_to_raw(value: Value) -> RawValue {
    match value {
        Value::Null => RawValue::Missing,
        Value::Number(n) => n.as_f64().map(RawValue::Number).unwrap_or(RawValue::Missing),
        Value::String(s) => RawValue::Text(s),
        other => RawValue::Text(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Load raw records from a CSV file
pub fn load_csv(path: &Path) -> Result<Vec<RawRecord>> {
    let file = File::open(path).map_err(|e| AnalysisError::DataLoadError(e.to_string()))?;
    read_csv(BufReader::new(file))
}

/// Load raw records from a JSON file
pub fn load_json(path: &Path) -> Result<Vec<RawRecord>> {
    let file = File::open(path).map_err(|e| AnalysisError::DataLoadError(e.to_string()))?;
    let mut reader = BufReader::new(file);

    // An empty file is an empty result set, not a parse error
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }
    read_json(contents.as_bytes())
}
