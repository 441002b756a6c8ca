//! Visualization sessions: one parsed table plus its mutable view state.
//!
//! A session is created per upload and owns everything derived from the
//! file: the table, the column profiles, the current chart encoding and the
//! active filter. The store below holds the single live session and decides
//! which of several concurrent uploads gets to become it.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::services::tabular::advisor::suggest_chart;
use crate::services::tabular::profiler::profile_columns;
use crate::services::tabular::types::{Cell, ChartKind, ChartSuggestion, ColumnProfile, Table};

/// View state layered over a table. The table itself never changes;
/// re-encoding and filtering only touch this struct.
#[derive(Debug, Clone)]
struct VisualizationState {
    suggestion: Option<ChartSuggestion>,
    filter: Option<Cell>,
    visible: Vec<usize>,
}

pub struct Session {
    file_name: String,
    table: Table,
    profiles: Vec<ColumnProfile>,
    viz: VisualizationState,
}

impl Session {
    /// Profile the table, derive the initial suggestion and start with every
    /// row visible and no filter.
    pub fn new(file_name: String, table: Table) -> Self {
        let profiles = profile_columns(&table);
        let suggestion = suggest_chart(&profiles);
        info!(
            "Session for {}: {} rows, {} columns, initial chart {:?}",
            file_name,
            table.row_count(),
            table.column_count(),
            suggestion.as_ref().map(|s| s.kind().label())
        );

        let visible = (0..table.row_count()).collect();
        Session {
            file_name,
            table,
            profiles,
            viz: VisualizationState {
                suggestion,
                filter: None,
                visible,
            },
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn profiles(&self) -> &[ColumnProfile] {
        &self.profiles
    }

    pub fn suggestion(&self) -> Option<&ChartSuggestion> {
        self.viz.suggestion.as_ref()
    }

    pub fn chart_kind(&self) -> Option<ChartKind> {
        self.viz.suggestion.as_ref().map(|s| s.kind())
    }

    pub fn filter(&self) -> Option<&Cell> {
        self.viz.filter.as_ref()
    }

    /// Rows that pass the active filter, in table order.
    pub fn visible_rows(&self) -> Vec<&Vec<Cell>> {
        self.viz.visible.iter().map(|&i| &self.table.rows[i]).collect()
    }

    /// Switch the chart kind, rebinding columns from the table itself.
    ///
    /// Roles are rebound from scratch using the first data row: x (or the
    /// pie category) takes the first column, y (or the pie value) takes the
    /// first column whose row-one value is numeric. The prior suggestion
    /// never feeds in. When a required role has no column the switch is a
    /// no-op and returns false, leaving suggestion, filter and visible rows
    /// untouched.
    pub fn set_chart_kind(&mut self, kind: ChartKind) -> bool {
        match self.derive_suggestion(kind) {
            Some(suggestion) => {
                debug!("Re-encoding {} as {:?}", self.file_name, suggestion);
                self.viz.suggestion = Some(suggestion);
                self.recompute_visible();
                true
            }
            None => {
                debug!(
                    "No columns satisfy the {} roles for {}; keeping current encoding",
                    kind.label(),
                    self.file_name
                );
                false
            }
        }
    }

    fn derive_suggestion(&self, kind: ChartKind) -> Option<ChartSuggestion> {
        let first_row = self.table.rows.first()?;
        let bound = |pick: fn(&Cell) -> bool| {
            self.table
                .columns
                .iter()
                .zip(first_row)
                .find(|(_, cell)| pick(cell))
                .map(|(name, _)| name.clone())
        };

        match kind {
            ChartKind::Line => Some(ChartSuggestion::Line {
                x: self.table.columns.first()?.clone(),
                y: bound(|cell| cell.as_number().is_some())?,
            }),
            ChartKind::Bar => Some(ChartSuggestion::Bar {
                x: self.table.columns.first()?.clone(),
                y: bound(|cell| cell.as_number().is_some())?,
            }),
            ChartKind::Pie => Some(ChartSuggestion::Pie {
                name: bound(|cell| cell.as_text().is_some())?,
                value: bound(|cell| cell.as_number().is_some())?,
            }),
        }
    }

    /// Set or clear the filter value and recompute the visible rows.
    ///
    /// Null and empty-string values clear the filter. The value is kept
    /// whatever the current chart kind is, but only a pie encoding narrows
    /// the visible rows; under line and bar every row stays visible.
    pub fn set_filter(&mut self, value: Option<Cell>) {
        self.viz.filter = normalize_filter(value);
        debug!("Filter for {} now {:?}", self.file_name, self.viz.filter);
        self.recompute_visible();
    }

    /// Distinct category values offered for filtering, or empty when the
    /// current encoding is not a pie.
    ///
    /// Values come from the full table, not the filtered subset, in
    /// first-seen row order with nulls left out. Applying a filter must not
    /// shrink the choices for the next one.
    pub fn distinct_filter_values(&self) -> Vec<Cell> {
        let Some(ChartSuggestion::Pie { name, .. }) = &self.viz.suggestion else {
            return Vec::new();
        };
        let Some(index) = self.table.column_index(name) else {
            return Vec::new();
        };

        let mut seen = std::collections::HashSet::new();
        let mut values = Vec::new();
        for cell in self.table.column_cells(index) {
            if cell.is_null() {
                continue;
            }
            if seen.insert(cell) {
                values.push(cell.clone());
            }
        }
        values
    }

    fn recompute_visible(&mut self) {
        let narrowed = match (&self.viz.suggestion, &self.viz.filter) {
            (Some(ChartSuggestion::Pie { name, .. }), Some(filter)) => {
                self.table.column_index(name).map(|index| {
                    self.table
                        .rows
                        .iter()
                        .enumerate()
                        .filter(|(_, row)| &row[index] == filter)
                        .map(|(i, _)| i)
                        .collect()
                })
            }
            _ => None,
        };
        self.viz.visible = narrowed.unwrap_or_else(|| (0..self.table.row_count()).collect());
    }
}

/// Empty values mean "no filter".
fn normalize_filter(value: Option<Cell>) -> Option<Cell> {
    match value {
        None | Some(Cell::Null) => None,
        Some(Cell::Text(s)) if s.is_empty() => None,
        other => other,
    }
}

/// Owner of the single live session.
///
/// Uploads are last-submitted-wins: each upload claims a ticket before its
/// payload is read, and a parse result is installed only while its ticket
/// is still the newest. A slow parse of an older upload therefore cannot
/// clobber a newer one, no matter how the tasks interleave.
pub struct SessionStore {
    current: Mutex<Option<Session>>,
    upload_seq: AtomicU64,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore {
            current: Mutex::new(None),
            upload_seq: AtomicU64::new(0),
        }
    }

    /// Claim a ticket for an upload that is about to be read and parsed.
    pub fn begin_upload(&self) -> u64 {
        self.upload_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Install a parsed session, unless a newer upload has claimed a ticket
    /// in the meantime.
    pub fn install(&self, ticket: u64, session: Session) -> Result<(), AppError> {
        let mut current = self.current.lock();
        let newest = self.upload_seq.load(Ordering::SeqCst);
        if ticket != newest {
            warn!(
                "Discarding parse of {}: upload {} superseded by upload {}",
                session.file_name(),
                ticket,
                newest
            );
            return Err(AppError::Superseded(
                "Upload superseded by a newer file".to_string(),
            ));
        }

        if let Some(prior) = current.as_ref() {
            info!(
                "Replacing session for {} with {}",
                prior.file_name(),
                session.file_name()
            );
        }
        *current = Some(session);
        Ok(())
    }

    pub fn has_data(&self) -> bool {
        self.current.lock().is_some()
    }

    /// Run `f` against the live session, failing when nothing has been
    /// uploaded yet.
    pub fn with_session<T>(&self, f: impl FnOnce(&mut Session) -> T) -> Result<T, AppError> {
        let mut guard = self.current.lock();
        match guard.as_mut() {
            Some(session) => Ok(f(session)),
            None => Err(AppError::NoData(
                "No file has been uploaded yet".to_string(),
            )),
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
