//! Spreadsheet input and output.
//!
//! Input: the first worksheet of any workbook calamine can open, as rows of
//! cells with trailing blanks trimmed. Output: one single-sheet xlsx per table.

use crate::constants::{
    MATCHING_FILE_NAME, MATCHING_SHEET_NAME, NON_MATCHING_FILE_NAME, NON_MATCHING_SHEET_NAME,
};
use crate::error::{EnrichError, Result};
use crate::pipeline::ProcessedTables;
use crate::types::{CellValue, SheetTable};
use calamine::{open_workbook_auto, Data, Range, Reader};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Reads the first worksheet of `path`.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<CellValue>>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| EnrichError::Config(format!("No worksheet found in {}", path.display())))??;
    let rows = rows_from_range(&range);
    info!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Converts a calamine range to rows. Columns keep their sheet positions even
/// when the used range does not start in column A.
pub fn rows_from_range(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let leading_cols = range.start().map(|(_, col)| col as usize).unwrap_or(0);
    range
        .rows()
        .map(|row| {
            let mut cells: Vec<CellValue> = std::iter::repeat(CellValue::Empty)
                .take(leading_cols)
                .chain(row.iter().map(cell_from_data))
                .collect();
            while matches!(cells.last(), Some(CellValue::Empty)) {
                cells.pop();
            }
            cells
        })
        .collect()
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        other => CellValue::Text(other.to_string()),
    }
}

/// Serializes `table` into an xlsx workbook with a single sheet.
pub fn write_table(table: &SheetTable, sheet_name: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, title) in table.header.iter().enumerate() {
        worksheet.write_string(0, col as u16, title)?;
    }
    for (row_index, row) in table.rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            write_cell(worksheet, row_index as u32 + 1, col as u16, cell)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &CellValue) -> Result<()> {
    match cell {
        CellValue::Empty => {}
        CellValue::Text(s) => {
            worksheet.write_string(row, col, s)?;
        }
        CellValue::Number(n) if n.is_finite() => {
            worksheet.write_number(row, col, *n)?;
        }
        CellValue::Number(n) => {
            worksheet.write_string(row, col, n.to_string())?;
        }
        CellValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
    }
    Ok(())
}

/// Both output workbooks, serialized.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub matching: Vec<u8>,
    pub non_matching: Vec<u8>,
}

impl Artifacts {
    pub fn from_tables(tables: &ProcessedTables) -> Result<Self> {
        Ok(Self {
            matching: write_table(&tables.matching, MATCHING_SHEET_NAME)?,
            non_matching: write_table(&tables.non_matching, NON_MATCHING_SHEET_NAME)?,
        })
    }

    /// Writes `Clients.xlsx` and `Ecosystem.xlsx` into `dir`.
    pub fn write_to_dir(&self, dir: &Path) -> Result<(PathBuf, PathBuf)> {
        fs::create_dir_all(dir)?;
        let matching_path = dir.join(MATCHING_FILE_NAME);
        let non_matching_path = dir.join(NON_MATCHING_FILE_NAME);
        fs::write(&matching_path, &self.matching)?;
        fs::write(&non_matching_path, &self.non_matching)?;
        Ok((matching_path, non_matching_path))
    }
}
