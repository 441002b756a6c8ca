pub mod advisor;
pub mod csv;
pub mod error;
pub mod excel;
pub mod profiler;
pub mod types;
pub mod utils;

pub use advisor::suggest_chart;
pub use error::ParseError;
pub use profiler::profile_columns;
pub use types::{Cell, ChartKind, ChartSuggestion, ColumnProfile, ColumnType, Table};
