use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};
use unicode_general_category::{GeneralCategory, get_general_category};

use crate::error::{Result, ToolError};
use crate::model::{
    Cell, PROFILES_SHEET, RECENT_VIDEOS_KEY, Record, VIDEO_LIST_FIELDS, VIDEOS_SHEET, json_kind,
};

/// Separator used when composing column names for nested fields.
pub const PATH_SEPARATOR: &str = ".";

/// A table that will be materialised as an Excel sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetTable {
    pub sheet_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl SheetTable {
    /// Returns the position of the named column.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    /// Returns the cell at `row` in the named column, if both exist.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }
}

/// Represents all tables required to materialise the Excel workbook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkbookData {
    pub tables: Vec<SheetTable>,
}

impl WorkbookData {
    /// Looks up a sheet by name.
    pub fn sheet(&self, name: &str) -> Option<&SheetTable> {
        self.tables.iter().find(|table| table.sheet_name == name)
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.tables
            .iter()
            .map(|table| table.sheet_name.as_str())
            .collect()
    }
}

/// Renders a list-valued field as a single cell string.
///
/// The value is formatted the way a Python list prints (`['a', 'b']`) and
/// every `[`, `]` and `'` is then removed, giving `a, b`. Absent, `null` and
/// empty values become the empty string.
///
/// Items that themselves contain brackets or single quotes lose those
/// characters. Downstream sheets already depend on this exact rendering, so
/// it is kept as is.
pub fn list_to_string(value: Option<&Value>) -> String {
    match value {
        Some(value) if is_truthy(value) => python_repr(value)
            .chars()
            .filter(|ch| !matches!(ch, '[' | ']' | '\''))
            .collect(),
        _ => String::new(),
    }
}

/// Flattens the profile-level fields of every record, leaving out the nested
/// video list. The caller's records are not modified.
pub fn profiles_to_table(records: &[Record]) -> Result<SheetTable> {
    let mut builder = TableBuilder::default();

    for (index, record) in records.iter().enumerate() {
        let mut profile = record.clone();
        if profile.remove(RECENT_VIDEOS_KEY).is_none() {
            return Err(ToolError::missing_field(
                RECENT_VIDEOS_KEY,
                format!("record {index}"),
            ));
        }
        builder.push_row(flatten_record(&profile));
    }

    builder.into_table(PROFILES_SHEET)
}

/// Collects every video across all records into one table, in record order
/// and then video order, joining the list-valued fields into strings.
///
/// When no record has any video the table has neither rows nor columns.
pub fn videos_to_table(records: &[Record]) -> Result<SheetTable> {
    let mut builder = TableBuilder::default();

    for (record_index, record) in records.iter().enumerate() {
        for (video_index, video) in recent_videos(record, record_index)?.iter().enumerate() {
            let Value::Object(video) = video else {
                return Err(ToolError::InvalidInput(format!(
                    "video {video_index} of record {record_index} is {}, expected an object",
                    json_kind(video)
                )));
            };

            let mut video = video.clone();
            for field in VIDEO_LIST_FIELDS {
                let slot = video.get_mut(field).ok_or_else(|| {
                    ToolError::missing_field(
                        field,
                        format!("video {video_index} of record {record_index}"),
                    )
                })?;
                *slot = Value::String(list_to_string(Some(&*slot)));
            }
            builder.push_row(flatten_record(&video));
        }
    }

    builder.into_table(VIDEOS_SHEET)
}

/// Flattens nested objects into dotted-path keys, preserving field order.
///
/// Nested empty objects contribute no key. Arrays are leaves.
pub fn flatten_record(record: &Map<String, Value>) -> Vec<(String, Value)> {
    let mut flat = Vec::with_capacity(record.len());
    flatten_into(None, record, &mut flat);
    flat
}

fn flatten_into(prefix: Option<&str>, map: &Map<String, Value>, out: &mut Vec<(String, Value)>) {
    for (key, value) in map {
        let path = match prefix {
            Some(prefix) => format!("{prefix}{PATH_SEPARATOR}{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(nested) => flatten_into(Some(&path), nested, out),
            leaf => out.push((path, leaf.clone())),
        }
    }
}

fn recent_videos(record: &Record, index: usize) -> Result<&Vec<Value>> {
    match record.get(RECENT_VIDEOS_KEY) {
        Some(Value::Array(videos)) => Ok(videos),
        Some(other) => Err(ToolError::InvalidInput(format!(
            "'{RECENT_VIDEOS_KEY}' of record {index} is {}, expected an array",
            json_kind(other)
        ))),
        None => Err(ToolError::missing_field(
            RECENT_VIDEOS_KEY,
            format!("record {index}"),
        )),
    }
}

/// Accumulates rows whose columns are the union of their keys, in the order
/// each key was first seen.
#[derive(Default)]
struct TableBuilder {
    columns: Vec<String>,
    positions: HashMap<String, usize>,
    rows: Vec<Vec<(usize, Value)>>,
}

impl TableBuilder {
    fn push_row(&mut self, fields: Vec<(String, Value)>) {
        let mut row = Vec::with_capacity(fields.len());
        for (column, value) in fields {
            let position = match self.positions.get(&column) {
                Some(position) => *position,
                None => {
                    let position = self.columns.len();
                    self.positions.insert(column.clone(), position);
                    self.columns.push(column);
                    position
                }
            };
            row.push((position, value));
        }
        self.rows.push(row);
    }

    fn into_table(self, sheet_name: &str) -> Result<SheetTable> {
        let width = self.columns.len();
        let mut rows = Vec::with_capacity(self.rows.len());
        for row in self.rows {
            let mut cells = vec![Cell::Empty; width];
            for (position, value) in row {
                cells[position] = Cell::from_json(&value)?;
            }
            rows.push(cells);
        }

        Ok(SheetTable {
            sheet_name: sheet_name.to_string(),
            columns: self.columns,
            rows,
        })
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(value) => *value,
        Value::Number(number) => number.as_f64().is_some_and(|value| value != 0.0),
        Value::String(value) => !value.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn python_repr(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => python_str_repr(text),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(python_repr).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(key, value)| format!("{}: {}", python_str_repr(key), python_repr(value)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

fn python_str_repr(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut repr = String::with_capacity(text.len() + 2);
    repr.push(quote);
    for ch in text.chars() {
        match ch {
            '\\' => repr.push_str("\\\\"),
            '\n' => repr.push_str("\\n"),
            '\r' => repr.push_str("\\r"),
            '\t' => repr.push_str("\\t"),
            ch if ch == quote => {
                repr.push('\\');
                repr.push(ch);
            }
            ch if !is_printable(ch) => repr.push_str(&escape_code_point(ch)),
            ch => repr.push(ch),
        }
    }
    repr.push(quote);
    repr
}

/// Matches Python's `str.isprintable`: every separator except the plain
/// space, and every "other" category, is escaped.
fn is_printable(ch: char) -> bool {
    if ch == ' ' {
        return true;
    }
    !matches!(
        get_general_category(ch),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
            | GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
    )
}

fn escape_code_point(ch: char) -> String {
    let code = ch as u32;
    if code <= 0xff {
        format!("\\x{code:02x}")
    } else if code <= 0xffff {
        format!("\\u{code:04x}")
    } else {
        format!("\\U{code:08x}")
    }
}
