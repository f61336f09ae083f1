//! Record input parsing for the predict command

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::pipeline::Record;

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordInput {
    One(Record),
    Many(Vec<Record>),
}

/// Parse a JSON object or an array of JSON objects into records
pub fn parse_records(json: &str) -> Result<Vec<Record>> {
    let input: RecordInput = serde_json::from_str(json)
        .context("Records must be a JSON object or an array of JSON objects")?;

    Ok(match input {
        RecordInput::One(record) => vec![record],
        RecordInput::Many(records) => records,
    })
}

/// Read records from a JSON file
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read records file: {}", path.display()))?;
    parse_records(&json).with_context(|| format!("Invalid records file: {}", path.display()))
}
