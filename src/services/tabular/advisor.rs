//! Initial chart recommendation from column profiles.

use crate::services::tabular::types::{ChartSuggestion, ColumnProfile, ColumnType};

/// Pick a starting encoding for freshly profiled data.
///
/// Rules fire in order, each binding the first profile of the needed type:
/// a date plus a number suggests a line chart over time, a string plus a
/// number suggests a bar chart per category, anything else suggests
/// nothing. Pie is never the initial suggestion; it is only reachable
/// through an explicit chart-kind change.
pub fn suggest_chart(profiles: &[ColumnProfile]) -> Option<ChartSuggestion> {
    let first_of = |wanted: ColumnType| {
        profiles
            .iter()
            .find(|profile| profile.column_type == wanted)
            .map(|profile| profile.name.clone())
    };

    let numeric = first_of(ColumnType::Number);
    let categorical = first_of(ColumnType::Text);
    let temporal = first_of(ColumnType::Date);

    if let (Some(x), Some(y)) = (temporal, numeric.clone()) {
        return Some(ChartSuggestion::Line { x, y });
    }
    if let (Some(x), Some(y)) = (categorical, numeric) {
        return Some(ChartSuggestion::Bar { x, y });
    }
    None
}
