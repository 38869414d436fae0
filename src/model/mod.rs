use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, ToolError};

/// One profile as emitted by the follower scraper. Field order is preserved
/// from the source document so column order stays deterministic.
pub type Record = Map<String, Value>;

/// Key holding the nested list of videos on every profile record.
pub const RECENT_VIDEOS_KEY: &str = "recent_videos";
/// Video field holding the list of category names.
pub const CATEGORIES_KEY: &str = "categories";
/// Video field holding the list of hashtags.
pub const HASHTAGS_KEY: &str = "video_hashtags";
/// Video field holding the list of mentioned accounts.
pub const MENTIONS_KEY: &str = "video_mentions";

/// Video fields that are joined into a single string cell.
pub const VIDEO_LIST_FIELDS: [&str; 3] = [CATEGORIES_KEY, HASHTAGS_KEY, MENTIONS_KEY];

/// Sheet holding one row per profile.
pub const PROFILES_SHEET: &str = "Profiles";
/// Sheet holding one row per video across all profiles.
pub const VIDEOS_SHEET: &str = "Videos";

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum Cell {
    /// No value: a missing column or an explicit JSON `null`.
    #[default]
    Empty,
    /// Text value.
    Text(String),
    /// Numeric value. Excel stores every number as a double.
    Number(f64),
    /// Boolean value.
    Bool(bool),
}

impl Cell {
    /// Converts a flattened leaf value into a cell. Arrays that were not
    /// rendered into strings beforehand keep their compact JSON form.
    pub fn from_json(value: &Value) -> Result<Self> {
        Ok(match value {
            Value::Null => Cell::Empty,
            Value::Bool(value) => Cell::Bool(*value),
            Value::Number(number) => number
                .as_f64()
                .map(Cell::Number)
                .unwrap_or_else(|| Cell::Text(number.to_string())),
            Value::String(value) => Cell::Text(value.clone()),
            other => Cell::Text(serde_json::to_string(other)?),
        })
    }

    /// Text rendering used when comparing cells regardless of their storage
    /// type, e.g. after reading a workbook back.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(value) => value.clone(),
            Cell::Number(value) => value.to_string(),
            Cell::Bool(value) => value.to_string(),
        }
    }

    /// Returns true when the cell should be left blank in the worksheet.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(value) => value.is_empty(),
            _ => false,
        }
    }
}

/// Interprets parsed scraper output as a list of records.
///
/// A top-level array must contain only objects. A single top-level object is
/// treated as a one-record list.
pub fn records_from_value(value: Value) -> Result<Vec<Record>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(record) => Ok(record),
                other => Err(ToolError::InvalidInput(format!(
                    "record {index} is {}, expected an object",
                    json_kind(&other)
                ))),
            })
            .collect(),
        Value::Object(record) => Ok(vec![record]),
        other => Err(ToolError::InvalidInput(format!(
            "top-level value is {}, expected an array of records",
            json_kind(&other)
        ))),
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
