//! Entry point for uploaded files: route bytes to a parser by extension.

use std::path::Path;

use tracing::info;

use crate::services::tabular::csv::parse_csv;
use crate::services::tabular::excel::{parse_xls, parse_xlsx};
use crate::services::tabular::{ParseError, Table};

/// Parse an uploaded file into a table.
///
/// Dispatch is by file extension alone (case-insensitive), so an
/// unsupported name is rejected without touching the payload.
pub fn parse_file(bytes: &[u8], file_name: &str) -> Result<Table, ParseError> {
    let start = std::time::Instant::now();

    let table = match extension_of(file_name).as_deref() {
        Some("csv") => parse_csv(bytes),
        Some("xlsx") => parse_xlsx(bytes),
        Some("xls") => parse_xls(bytes),
        _ => Err(ParseError::UnsupportedFormat(file_name.to_string())),
    }?;

    info!(
        "Parsed {} into {} rows x {} columns in {:?}",
        file_name,
        table.row_count(),
        table.column_count(),
        start.elapsed()
    );
    Ok(table)
}

fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}
