//! Column profiling: semantic type, cardinality, null counts and samples.

use std::collections::HashSet;

use smallvec::SmallVec;

use crate::services::tabular::types::{Cell, ColumnProfile, ColumnType, Table, SAMPLE_SIZE};
use crate::services::tabular::utils::is_date_string;

/// Profile every column of the table, in column order.
///
/// Pure over the table contents: profiling twice yields identical results,
/// and nothing about view state (chart kind, filters) feeds in.
pub fn profile_columns(table: &Table) -> Vec<ColumnProfile> {
    table
        .columns
        .iter()
        .enumerate()
        .map(|(index, name)| profile_column(table, index, name))
        .collect()
}

fn profile_column(table: &Table, index: usize, name: &str) -> ColumnProfile {
    let mut seen: HashSet<&Cell> = HashSet::new();
    let mut sample_values: SmallVec<[String; SAMPLE_SIZE]> = SmallVec::new();
    let mut null_count = 0;
    let mut non_null_count = 0;

    // Type flags narrow as evidence arrives; nulls never vote.
    let mut all_numbers = true;
    let mut all_text = true;
    let mut all_dates = true;

    for cell in table.column_cells(index) {
        if sample_values.len() < SAMPLE_SIZE {
            sample_values.push(cell.to_string());
        }
        match cell {
            Cell::Null => null_count += 1,
            Cell::Number(_) => {
                non_null_count += 1;
                seen.insert(cell);
                all_text = false;
                all_dates = false;
            }
            Cell::Text(s) => {
                non_null_count += 1;
                seen.insert(cell);
                all_numbers = false;
                if !is_date_string(s) {
                    all_dates = false;
                }
            }
        }
    }

    // Number wins over date wins over string; columns with no non-null
    // values or mixed types are unknown.
    let column_type = if non_null_count == 0 {
        ColumnType::Unknown
    } else if all_numbers {
        ColumnType::Number
    } else if all_dates {
        ColumnType::Date
    } else if all_text {
        ColumnType::Text
    } else {
        ColumnType::Unknown
    };

    ColumnProfile {
        name: name.to_string(),
        column_type,
        unique_count: seen.len(),
        null_count,
        sample_values,
    }
}
