//! Body configuration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::OptionsError;

/// Options of a [`BodyRenderer`](crate::BodyRenderer).
///
/// Built with chained setters or loaded from JSON with camelCase keys:
///
/// ```
/// use lineup_body::BodyOptions;
///
/// let options = BodyOptions::default().row_height(24.0).freeze_cols(1);
/// let loaded = BodyOptions::from_json(r#"{"rowHeight": 24, "freezeCols": 1}"#).unwrap();
/// assert_eq!(options, loaded);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BodyOptions {
    /// Height of a row in uniform mode.
    pub row_height: f64,
    /// Vertical gap subtracted from each row's height.
    pub row_padding: f64,
    /// Gap between a bar and its cell edges.
    pub row_bar_padding: f64,
    /// Prefix for generated element ids.
    pub id_prefix: String,
    /// Horizontal gap between rankings, holding the slope graph.
    pub slope_width: f64,
    /// Gap after every column.
    pub column_padding: f64,
    /// Draw stack columns as stacked bars.
    pub stacked: bool,
    pub animation: bool,
    /// Animation length in milliseconds.
    #[serde(rename = "animationDuration")]
    pub animation_duration_ms: u64,
    /// Draw a line at the mean of numeric columns.
    pub mean_line: bool,
    /// Columns of each ranking kept in view while scrolling horizontally.
    pub freeze_cols: usize,
    /// Free-form options read by cell renderers, looked up with dotted keys.
    pub custom: Map<String, Value>,
}

impl Default for BodyOptions {
    fn default() -> Self {
        Self {
            row_height: 20.0,
            row_padding: 1.0,
            row_bar_padding: 1.0,
            id_prefix: String::new(),
            slope_width: 150.0,
            column_padding: 5.0,
            stacked: true,
            animation: false,
            animation_duration_ms: 1000,
            mean_line: false,
            freeze_cols: 0,
            custom: Map::new(),
        }
    }
}

impl BodyOptions {
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn row_height(mut self, height: f64) -> Self {
        self.row_height = height;
        self
    }

    pub fn row_padding(mut self, padding: f64) -> Self {
        self.row_padding = padding;
        self
    }

    pub fn id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    pub fn slope_width(mut self, width: f64) -> Self {
        self.slope_width = width;
        self
    }

    pub fn column_padding(mut self, padding: f64) -> Self {
        self.column_padding = padding;
        self
    }

    pub fn stacked(mut self, stacked: bool) -> Self {
        self.stacked = stacked;
        self
    }

    /// Enable animated transitions lasting `duration_ms`.
    pub fn animated(mut self, duration_ms: u64) -> Self {
        self.animation = true;
        self.animation_duration_ms = duration_ms;
        self
    }

    pub fn mean_line(mut self, mean_line: bool) -> Self {
        self.mean_line = mean_line;
        self
    }

    pub fn freeze_cols(mut self, count: usize) -> Self {
        self.freeze_cols = count;
        self
    }

    /// Set a free-form renderer option.
    pub fn custom(mut self, key: impl Into<String>, value: Value) -> Self {
        self.custom.insert(key.into(), value);
        self
    }

    /// Change one option by its camelCase key. The value must deserialize
    /// into the option's type; on failure nothing changes.
    pub fn set_option(&mut self, key: &str, value: Value) -> Result<(), OptionsError> {
        match key {
            "rowHeight" => self.row_height = serde_json::from_value(value)?,
            "rowPadding" => self.row_padding = serde_json::from_value(value)?,
            "rowBarPadding" => self.row_bar_padding = serde_json::from_value(value)?,
            "idPrefix" => self.id_prefix = serde_json::from_value(value)?,
            "slopeWidth" => self.slope_width = serde_json::from_value(value)?,
            "columnPadding" => self.column_padding = serde_json::from_value(value)?,
            "stacked" => self.stacked = serde_json::from_value(value)?,
            "animation" => self.animation = serde_json::from_value(value)?,
            "animationDuration" => self.animation_duration_ms = serde_json::from_value(value)?,
            "meanLine" => self.mean_line = serde_json::from_value(value)?,
            "freezeCols" => self.freeze_cols = serde_json::from_value(value)?,
            "custom" => self.custom = serde_json::from_value(value)?,
            _ => return Err(OptionsError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Looks an option up by key. A key with dots that is not found as a
    /// whole is split at its first dot: the first segment selects an option
    /// and the rest is looked up inside it.
    pub fn find_option(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.field(key) {
            return Some(value);
        }
        let rest = key.strip_prefix("custom.")?;
        find_in(&self.custom, rest).cloned()
    }

    fn field(&self, key: &str) -> Option<Value> {
        let value = match key {
            "rowHeight" => Value::from(self.row_height),
            "rowPadding" => Value::from(self.row_padding),
            "rowBarPadding" => Value::from(self.row_bar_padding),
            "idPrefix" => Value::from(self.id_prefix.as_str()),
            "slopeWidth" => Value::from(self.slope_width),
            "columnPadding" => Value::from(self.column_padding),
            "stacked" => Value::from(self.stacked),
            "animation" => Value::from(self.animation),
            "animationDuration" => Value::from(self.animation_duration_ms),
            "meanLine" => Value::from(self.mean_line),
            "freezeCols" => Value::from(self.freeze_cols),
            "custom" => Value::Object(self.custom.clone()),
            _ => return None,
        };
        Some(value)
    }
}

fn find_in<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    if let Some(value) = fields.get(key) {
        return Some(value);
    }
    let (head, rest) = key.split_once('.')?;
    match fields.get(head)? {
        Value::Object(inner) => find_in(inner, rest),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = BodyOptions::default();
        assert_eq!(options.row_height, 20.0);
        assert_eq!(options.slope_width, 150.0);
        assert_eq!(options.column_padding, 5.0);
        assert_eq!(options.animation_duration_ms, 1000);
        assert!(options.stacked);
        assert!(!options.mean_line);
        assert_eq!(BodyOptions::from_json("{}").unwrap(), options);
    }

    #[test]
    fn test_set_option() {
        let mut options = BodyOptions::default();
        options.set_option("rowHeight", json!(30)).unwrap();
        assert_eq!(options.row_height, 30.0);

        assert!(matches!(
            options.set_option("rowHieght", json!(30)),
            Err(OptionsError::UnknownKey(_))
        ));
        assert!(matches!(
            options.set_option("freezeCols", json!("two")),
            Err(OptionsError::Json(_))
        ));
        assert_eq!(options.freeze_cols, 0);
    }

    #[test]
    fn test_set_option_with_non_finite_field() {
        let mut options = BodyOptions::default().slope_width(f64::INFINITY);
        options.set_option("freezeCols", json!(2)).unwrap();
        assert_eq!(options.freeze_cols, 2);
        assert_eq!(options.slope_width, f64::INFINITY);

        options.set_option("animationDuration", json!(250)).unwrap();
        assert_eq!(options.animation_duration_ms, 250);
        options.set_option("custom", json!({"text": {"align": "right"}})).unwrap();
        assert_eq!(options.find_option("custom.text.align"), Some(json!("right")));
    }

    #[test]
    fn test_find_option_dotted() {
        let options = BodyOptions::default().custom("number", json!({"barColor": "steelblue"}));
        assert_eq!(options.find_option("slopeWidth"), Some(json!(150.0)));
        assert_eq!(
            options.find_option("custom.number.barColor"),
            Some(json!("steelblue"))
        );
        assert_eq!(options.find_option("custom.string"), None);
        assert_eq!(options.find_option("nope"), None);
        assert_eq!(options.find_option("rowHeight.x"), None);
        assert_eq!(options.find_option("stacked"), Some(json!(true)));
    }
}
