use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};
use tracing::{debug, instrument};

use crate::error::{Result, ToolError};
use crate::flatten::{SheetTable, WorkbookData};
use crate::model::Cell;

/// Reads every sheet of a workbook, in workbook order. The first row of each
/// sheet is taken as the header.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn read_workbook(path: &Path) -> Result<WorkbookData> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let mut tables = Vec::new();
    for sheet_name in workbook.sheet_names().to_vec() {
        let range = read_required_sheet(&mut workbook, &sheet_name)?;
        tables.push(range_to_table(&sheet_name, &range));
    }

    debug!(sheet_count = tables.len(), "workbook read");
    Ok(WorkbookData { tables })
}

/// Reads a single named sheet.
pub fn read_sheet(path: &Path, name: &str) -> Result<SheetTable> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = read_required_sheet(&mut workbook, name)?;
    Ok(range_to_table(name, &range))
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ToolError::InvalidWorkbook(format!("missing sheet '{name}'")))?;
    let range = range_result.map_err(ToolError::from)?;
    Ok(range)
}

fn range_to_table(sheet_name: &str, range: &Range<DataType>) -> SheetTable {
    let mut rows = range.rows();

    let columns: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|cell| data_type_to_cell(cell).as_text()).collect(),
        None => Vec::new(),
    };

    let rows = rows
        .map(|row| row.iter().map(data_type_to_cell).collect())
        .collect();

    SheetTable {
        sheet_name: sheet_name.to_string(),
        columns,
        rows,
    }
}

fn data_type_to_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::String(value) => Cell::Text(value.clone()),
        DataType::Float(value) => Cell::Number(*value),
        DataType::Int(value) => Cell::Number(*value as f64),
        DataType::Bool(value) => Cell::Bool(*value),
        DataType::Empty => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}
