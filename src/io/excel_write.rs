use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::{debug, instrument, warn};

use crate::error::Result;
use crate::flatten::{SheetTable, WorkbookData};
use crate::model::Cell;

/// Longest text, in characters, Excel accepts in a single cell.
pub const MAX_CELL_CHARS: usize = 32_767;

/// Writes the provided workbook data to the given path, replacing any file
/// already there.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn write_workbook(path: &Path, workbook: &WorkbookData) -> Result<()> {
    let mut workbook_writer = Workbook::new();
    let header_format = Format::new().set_bold();

    for table in &workbook.tables {
        let worksheet = workbook_writer.add_worksheet();
        write_table(worksheet, table, &header_format)?;
        debug!(
            sheet = %table.sheet_name,
            columns = table.columns.len(),
            rows = table.rows.len(),
            "sheet written"
        );
    }

    workbook_writer.save(path)?;
    Ok(())
}

fn write_table(worksheet: &mut Worksheet, table: &SheetTable, header_format: &Format) -> Result<()> {
    worksheet.set_name(&table.sheet_name)?;

    for (col_idx, header) in table.columns.iter().enumerate() {
        let header = fit_cell_text(header, &table.sheet_name, 0, col_idx);
        worksheet.write_string_with_format(0, col_idx as u16, header, header_format)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let excel_row = (row_idx + 1) as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let excel_col = col_idx as u16;
            match cell {
                _ if cell.is_blank() => {}
                Cell::Text(value) => {
                    let value = fit_cell_text(value, &table.sheet_name, row_idx + 1, col_idx);
                    worksheet.write_string(excel_row, excel_col, value)?;
                }
                Cell::Number(value) => {
                    worksheet.write_number(excel_row, excel_col, *value)?;
                }
                Cell::Bool(value) => {
                    worksheet.write_boolean(excel_row, excel_col, *value)?;
                }
                Cell::Empty => {}
            }
        }
    }

    if !table.columns.is_empty() {
        worksheet.set_freeze_panes(1, 0)?;
        if !table.rows.is_empty() {
            let col_end = (table.columns.len() as u16).saturating_sub(1);
            worksheet.autofilter(0, 0, table.rows.len() as u32, col_end)?;
        }
    }

    Ok(())
}

/// Truncates text longer than Excel's cell limit instead of failing the save.
fn fit_cell_text<'a>(text: &'a str, sheet: &str, row: usize, col: usize) -> &'a str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((cut, _)) => {
            warn!(
                sheet,
                row,
                col,
                chars = text.chars().count(),
                limit = MAX_CELL_CHARS,
                "cell text truncated to Excel limit"
            );
            &text[..cut]
        }
        None => text,
    }
}
