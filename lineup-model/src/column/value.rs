//! Row data as seen by columns

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use super::BoxPlotData;
use crate::RowId;

/// One data row: its identifier and a JSON object of field values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    pub id: RowId,
    pub values: Value,
}

impl DataRow {
    pub fn new(id: RowId, values: Value) -> Self {
        Self { id, values }
    }

    /// Numeric field value. Missing or non-numeric fields are NaN.
    pub fn number(&self, key: &str) -> f64 {
        self.values
            .get(key)
            .and_then(Value::as_f64)
            .unwrap_or(f64::NAN)
    }

    /// Textual field value. Numbers and booleans are formatted; null and
    /// missing fields yield `None`.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn boxplot(&self, key: &str) -> Option<BoxPlotData> {
        let value = self.values.get(key)?;
        BoxPlotData::deserialize(value).ok()
    }
}
