//! Row filtering
//!
//! A student is "missing" for a window when their row carries no attendance
//! marker inside it. Rows made only of empty cells are spacer rows and never
//! reach the output.

use crate::{ColumnRange, Grid, ReportError, Roster, SheetLayout};

/// Case-insensitive attendance marker
pub const MARKER: &str = "x";

/// Whether a cell holds the attendance marker
pub fn is_marker(cell: &str) -> bool {
    cell.eq_ignore_ascii_case(MARKER)
}

/// Whether every cell of a row is the empty string
pub fn is_blank(row: &[String]) -> bool {
    row.iter().all(String::is_empty)
}

/// Produces the roster of unmarked students for a column window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowFilter {
    /// Column projected into the roster
    pub name_column: usize,
}

impl Default for RowFilter {
    fn default() -> Self {
        Self::from_layout(&SheetLayout::default())
    }
}

impl RowFilter {
    pub fn from_layout(layout: &SheetLayout) -> Self {
        Self {
            name_column: layout.name_column,
        }
    }

    /// Names of the non-blank rows without a marker in `range`.
    ///
    /// With `range = None` the whole row is inspected (whole-month mode).
    /// A grid too narrow to hold a name yields an empty roster.
    pub fn filter(&self, grid: &Grid, range: Option<ColumnRange>) -> Result<Roster, ReportError> {
        if grid.is_empty() || grid.width() <= self.name_column {
            tracing::debug!(
                width = grid.width(),
                height = grid.height(),
                "grid has no name column; empty roster"
            );
            return Ok(Roster::default());
        }

        if let Some(range) = range {
            if range.end > grid.width() {
                return Err(ReportError::RangeOutOfBounds {
                    range,
                    width: grid.width(),
                });
            }
        }

        let roster: Roster = grid
            .rows()
            .iter()
            .filter(|row| !is_blank(row))
            .filter(|row| !Self::window(row, range).iter().any(|cell| is_marker(cell)))
            .map(|row| row[self.name_column].clone())
            .collect();

        tracing::debug!(
            range = ?range,
            rows = grid.height(),
            missing = roster.len(),
            "filtered attendance rows"
        );
        Ok(roster)
    }

    /// Cells of `row` inspected for markers; inverted ranges select none
    fn window(row: &[String], range: Option<ColumnRange>) -> &[String] {
        match range {
            Some(range) => row.get(range.start..range.end).unwrap_or(&[]),
            None => row,
        }
    }
}
