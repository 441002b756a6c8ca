//! Excel workbook parsing for `.xlsx` and `.xls` payloads.
//!
//! Only the first sheet is read. Its first row supplies the headers;
//! typed cells map onto table cells without re-parsing strings, so a text
//! cell holding `"42"` stays text even though the CSV parser would have
//! cast it.

use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, Reader, Xls, Xlsx};
use tracing::debug;

use crate::services::tabular::error::ParseError;
use crate::services::tabular::types::{Cell, Table};
use crate::services::tabular::utils::unique_column_names;

pub fn parse_xlsx(bytes: &[u8]) -> Result<Table, ParseError> {
    let cursor = Cursor::new(bytes);
    let mut workbook: Xlsx<_> = open_workbook_from_rs(cursor)
        .map_err(|e| ParseError::Format(format!("Failed to open Excel file: {}", e)))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = first_sheet_name(&sheet_names)?;
    debug!("Reading sheet {} of {} in workbook", sheet_name, sheet_names.len());

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ParseError::Format(format!("Failed to read sheet {}: {}", sheet_name, e)))?;
    rows_to_table(range.rows().map(|row| row.to_vec()).collect())
}

pub fn parse_xls(bytes: &[u8]) -> Result<Table, ParseError> {
    let cursor = Cursor::new(bytes);
    let mut workbook: Xls<_> = open_workbook_from_rs(cursor)
        .map_err(|e| ParseError::Format(format!("Failed to open Excel file: {}", e)))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = first_sheet_name(&sheet_names)?;
    debug!("Reading sheet {} of {} in workbook", sheet_name, sheet_names.len());

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ParseError::Format(format!("Failed to read sheet {}: {}", sheet_name, e)))?;
    rows_to_table(range.rows().map(|row| row.to_vec()).collect())
}

fn first_sheet_name(sheet_names: &[String]) -> Result<String, ParseError> {
    sheet_names
        .first()
        .cloned()
        .ok_or_else(|| ParseError::Format("No sheets found in workbook".to_string()))
}

fn rows_to_table(rows: Vec<Vec<Data>>) -> Result<Table, ParseError> {
    let mut rows = rows.into_iter();

    let header = rows
        .next()
        .ok_or_else(|| ParseError::EmptyData("Excel sheet is empty".to_string()))?;
    let columns = unique_column_names(
        header
            .iter()
            .map(|cell| cell.to_string().trim().to_string()),
    );

    let data_rows: Vec<Vec<Cell>> = rows
        .map(|row| {
            (0..columns.len())
                .map(|idx| convert_cell(row.get(idx).cloned().unwrap_or(Data::Empty)))
                .collect()
        })
        .collect();

    if data_rows.is_empty() {
        return Err(ParseError::EmptyData("Excel sheet is empty".to_string()));
    }

    Ok(Table::new(columns, data_rows))
}

/// Map a spreadsheet cell onto a table cell.
///
/// Dates arrive as their serial number, matching how a generic JSON dump of
/// the sheet would render them. Booleans become the text `true`/`false`.
/// Error cells count as missing values.
fn convert_cell(data: Data) -> Cell {
    match data {
        Data::Empty => Cell::Null,
        Data::String(s) => Cell::Text(s),
        Data::Float(f) => Cell::Number(f),
        Data::Int(i) => Cell::Number(i as f64),
        Data::Bool(b) => Cell::Text(if b { "true" } else { "false" }.to_string()),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) => Cell::Text(s),
        Data::DurationIso(s) => Cell::Text(s),
        Data::Error(_) => Cell::Null,
    }
}
