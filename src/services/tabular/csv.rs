//! Comma-separated text parsing.
//!
//! The grammar is deliberately simple: rows split on newlines, fields split
//! on commas, no quoting or escaping. The first non-empty line is the
//! header; every later non-empty line is a data row.

use crate::services::tabular::error::ParseError;
use crate::services::tabular::types::{Cell, Table};
use crate::services::tabular::utils::{parse_number, unique_column_names};

pub fn parse_csv(bytes: &[u8]) -> Result<Table, ParseError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| ParseError::Format("CSV is not valid UTF-8".to_string()))?;

    let mut lines = text.lines().filter(|line| !line.is_empty());

    let header = lines
        .next()
        .ok_or_else(|| ParseError::Format("CSV must have a header row".to_string()))?;
    let columns = unique_column_names(header.split(',').map(|name| name.trim().to_string()));

    let mut rows = Vec::new();
    for line in lines {
        let fields: Vec<&str> = line.split(',').collect();
        // Missing trailing fields become nulls; extra fields are dropped.
        let row = (0..columns.len())
            .map(|index| fields.get(index).map_or(Cell::Null, |raw| cast_field(raw)))
            .collect();
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(ParseError::EmptyData(
            "CSV must have at least one row of data".to_string(),
        ));
    }

    Ok(Table::new(columns, rows))
}

/// Empty fields are null, fields that read as a finite number become
/// numbers, everything else is kept as trimmed text.
fn cast_field(raw: &str) -> Cell {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Cell::Null;
    }
    match parse_number(trimmed) {
        Some(n) => Cell::Number(n),
        None => Cell::Text(trimmed.to_string()),
    }
}
