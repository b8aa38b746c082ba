//! Sheets v4 handle (read-only)

use super::transport::{endpoint, ApiTransport};
use super::SheetsApi;
use crate::error::DeckResult;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

const SHEETS_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub struct SheetsClient {
    transport: Arc<ApiTransport>,
}

impl SheetsClient {
    pub fn new(transport: Arc<ApiTransport>) -> Self {
        Self { transport }
    }
}

impl SheetsApi for SheetsClient {
    fn read_range(&self, spreadsheet_id: &str, range: &str) -> DeckResult<Vec<Vec<String>>> {
        let url = endpoint(SHEETS_URL, &[spreadsheet_id, "values", range])?;
        let range: ValueRange = self.transport.get_json(url)?;
        Ok(range
            .values
            .iter()
            .map(|row| row.iter().map(value_text).collect())
            .collect())
    }
}
