use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{Result, ToolError};
use crate::model::{Record, records_from_value};

/// Loads scraper output from a JSON file.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    if !path.exists() {
        return Err(ToolError::MissingInput(path.to_path_buf()));
    }

    let source = fs::read_to_string(path)?;
    let json: Value = serde_json::from_str(&source)?;
    let records = records_from_value(json)?;
    debug!(record_count = records.len(), "loaded records");
    Ok(records)
}
