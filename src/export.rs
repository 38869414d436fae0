use std::path::Path;

use tracing::{debug, info, instrument};

use crate::error::{Result, ToolError};
use crate::flatten::{WorkbookData, profiles_to_table, videos_to_table};
use crate::io::{excel_write, json_read};
use crate::model::Record;

/// Extension every persisted workbook must carry.
pub const XLSX_EXTENSION: &str = ".xlsx";

/// Builds the "Profiles" and "Videos" sheets from the scraper records and,
/// when `output` is given, writes them to that path.
///
/// Missing fields are reported before the output path is checked. A path not
/// ending in `.xlsx` is rejected before anything is written.
#[instrument(
    level = "info",
    skip_all,
    fields(record_count = records.len(), output = ?output.map(Path::display))
)]
pub fn data_to_workbook(records: &[Record], output: Option<&Path>) -> Result<WorkbookData> {
    let profiles = profiles_to_table(records)?;
    let videos = videos_to_table(records)?;
    debug!(
        profile_rows = profiles.rows.len(),
        video_rows = videos.rows.len(),
        "tables flattened"
    );

    let workbook = WorkbookData {
        tables: vec![profiles, videos],
    };

    if let Some(path) = output {
        validate_output_path(path)?;
        excel_write::write_workbook(path, &workbook)?;
        info!("workbook saved");
    }

    Ok(workbook)
}

/// Converts a scraper JSON file into an Excel workbook.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn convert_file(input: &Path, output: &Path) -> Result<WorkbookData> {
    let records = json_read::load_records(input)?;
    info!(record_count = records.len(), "parsed records from JSON source");
    data_to_workbook(&records, Some(output))
}

fn validate_output_path(path: &Path) -> Result<()> {
    if path.to_string_lossy().ends_with(XLSX_EXTENSION) {
        Ok(())
    } else {
        Err(ToolError::InvalidArgument(format!(
            "path must end in {XLSX_EXTENSION}, got {}",
            path.display()
        )))
    }
}
