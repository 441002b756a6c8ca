//! Core data model shared by the parsers, the profiler, and the chart advisor.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// How many leading values each column profile keeps as a preview.
pub const SAMPLE_SIZE: usize = 3;

/// A single table value.
///
/// Serialized untagged, so the wire form is the bare scalar: `42`, `"north"`
/// or `null`. Deserialization tries numbers first, then strings; anything
/// else (bools, arrays, objects) is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Null,
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    // 0.0 and -0.0 share one bit pattern so set membership agrees with `==`.
    fn number_bits(n: f64) -> u64 {
        if n == 0.0 {
            0f64.to_bits()
        } else {
            n.to_bits()
        }
    }
}

/// Equality is exact on both type and value: `Number(1.0)` never equals
/// `Text("1")`, and `Null` only equals `Null`.
impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cell::Number(a), Cell::Number(b)) => Self::number_bits(*a) == Self::number_bits(*b),
            (Cell::Text(a), Cell::Text(b)) => a == b,
            (Cell::Null, Cell::Null) => true,
            _ => false,
        }
    }
}

// Parsed numbers are always finite, so there is no NaN to break reflexivity.
impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Cell::Number(n) => {
                0u8.hash(state);
                Self::number_bits(*n).hash(state);
            }
            Cell::Text(s) => {
                1u8.hash(state);
                s.hash(state);
            }
            Cell::Null => 2u8.hash(state),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Null => Ok(()),
        }
    }
}

/// A parsed file: one header row plus zero-indexed data rows.
///
/// Every row has exactly `columns.len()` cells; `new` enforces that by
/// padding short rows with `Null` and truncating long ones.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        for row in &mut rows {
            row.resize(width, Cell::Null);
        }
        Table { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate the cells of one column, top to bottom.
    pub fn column_cells(&self, index: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().map(move |row| &row[index])
    }
}

/// Semantic type inferred for a whole column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Number,
    #[serde(rename = "string")]
    Text,
    Date,
    Unknown,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColumnType::Number => "number",
            ColumnType::Text => "string",
            ColumnType::Date => "date",
            ColumnType::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

/// Per-column statistics computed by the profiler.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    pub name: String,
    pub column_type: ColumnType,
    pub unique_count: usize,
    pub null_count: usize,
    pub sample_values: SmallVec<[String; SAMPLE_SIZE]>,
}

/// The chart families a table can be rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
}

impl ChartKind {
    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
        }
    }
}

/// A concrete encoding: which chart to draw and which columns feed each role.
///
/// Line and bar bind an x and a y column; pie binds a category (`name`)
/// column and a `value` column. Column names always refer to the table the
/// suggestion was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChartSuggestion {
    Line { x: String, y: String },
    Bar { x: String, y: String },
    Pie { name: String, value: String },
}

impl ChartSuggestion {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartSuggestion::Line { .. } => ChartKind::Line,
            ChartSuggestion::Bar { .. } => ChartKind::Bar,
            ChartSuggestion::Pie { .. } => ChartKind::Pie,
        }
    }
}
