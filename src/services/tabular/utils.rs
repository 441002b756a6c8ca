//! Small helpers shared by the parsers and the profiler.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

// Cheap shape check before handing candidates to chrono.
static DATE_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,4}[-/]\d{1,2}[-/]\d{1,4}([ T]\d{1,2}:\d{2}(:\d{2})?)?$")
        .expect("date shape pattern is valid")
});

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d", "%d-%m-%Y"];

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// True when the whole string is a calendar date (optionally with a time of
/// day) in one of the supported formats. Field values are validated, so
/// `"2024-13-40"` fails even though it matches the shape.
pub fn is_date_string(s: &str) -> bool {
    let trimmed = s.trim();
    if !DATE_SHAPE.is_match(trimmed) {
        return false;
    }
    DATE_FORMATS
        .iter()
        .any(|format| NaiveDate::parse_from_str(trimmed, format).is_ok())
        || DATETIME_FORMATS
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(trimmed, format).is_ok())
}

/// Parse a numeric literal, accepting only strings whose entire trimmed text
/// is a finite number. Currency symbols, thousands separators, hex prefixes
/// and infinities all fail, which keeps values like `"$5"` textual.
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Resolve blank and duplicate header names so table columns stay unique.
///
/// Blank headers become `column_<position>` (1-based); a repeated name gets a
/// numeric suffix, so `a, a, a` comes out as `a, a_1, a_2`. Non-colliding
/// names pass through untouched.
pub fn unique_column_names<I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut existing_names: HashSet<String> = HashSet::new();
    let mut names = Vec::new();

    for (index, name) in raw.into_iter().enumerate() {
        let base_name = if name.is_empty() {
            format!("column_{}", index + 1)
        } else {
            name
        };

        let mut cleaned = base_name.clone();
        let mut counter = 1;
        while !existing_names.insert(cleaned.clone()) {
            cleaned = format!("{}_{}", base_name, counter);
            counter += 1;
        }
        names.push(cleaned);
    }

    names
}
