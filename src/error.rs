use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tool loads scraper output, flattens it, or emits the workbook.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a record or video lacks a field the conversion relies on.
    #[error("missing field '{field}' in {context}")]
    MissingField { field: String, context: String },

    /// Raised when a caller-supplied argument is rejected before any work is
    /// persisted.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Raised when the input JSON does not have the scraper output shape.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Raised when a workbook read back from disk lacks an expected sheet.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl ToolError {
    pub(crate) fn missing_field(field: &str, context: impl Into<String>) -> Self {
        ToolError::MissingField {
            field: field.to_string(),
            context: context.into(),
        }
    }
}
