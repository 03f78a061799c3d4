//! # mialist-core
//!
//! Core domain model for building "missing student" rosters out of an
//! attendance spreadsheet.
//!
//! This crate provides:
//! - Domain types: `Grid`, `ColumnRange`, `Roster`, `SheetLayout`
//! - Date windows: `DateWindow` maps a calendar date onto attendance columns
//! - Filtering: `RowFilter` and the three-pass `ReportBuilder`
//! - The `SheetGateway` collaborator trait and the write-back orchestration
//!
//! ## Example
//!
//! ```rust
//! use mialist_core::{Grid, ReportBuilder};
//!
//! let grid = Grid::from_rows(vec![
//!     vec!["".into(), "Alice".into(), "".into(), "X".into(), "".into()],
//!     vec!["".into(), "Bob".into(), "".into(), "".into(), "o".into()],
//! ])
//! .unwrap();
//!
//! let builder = ReportBuilder::default();
//! let month = builder.filter().filter(&grid, None).unwrap();
//! assert_eq!(month.names(), ["Bob"]);
//! ```

pub mod filter;
pub mod publish;
pub mod report;
pub mod window;

pub use filter::RowFilter;
pub use publish::{publish, run, Destination, ReportColumn, RunError};
pub use report::{Report, ReportBuilder};
pub use window::DateWindow;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Layout
// ============================================================================

/// Fixed-layout assumptions about the attendance sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetLayout {
    /// Column holding the student name
    pub name_column: usize,
    /// Offset between a day-of-month and that day's attendance column
    pub day_buffer: usize,
    /// Shift, in days, from the current week's Monday to the last-week anchor
    pub last_week_offset_days: i64,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            name_column: 1,
            day_buffer: 6,
            last_week_offset_days: -5, // previous Monday, plus two days
        }
    }
}

/// Last zero-based column of a worksheet (`XFD`)
pub const MAX_SHEET_COLUMN: usize = 16_383;

/// Largest buffer that keeps day 31 inside the worksheet
pub const MAX_DAY_BUFFER: usize = MAX_SHEET_COLUMN - 31;

/// Largest last-week shift, in either direction
pub const MAX_LAST_WEEK_OFFSET_DAYS: i64 = 366;

impl SheetLayout {
    /// Reject layouts that point outside a worksheet.
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.name_column > MAX_SHEET_COLUMN {
            return Err(ReportError::InvalidLayout(format!(
                "name_column {} is past the last column {MAX_SHEET_COLUMN}",
                self.name_column
            )));
        }
        if self.day_buffer > MAX_DAY_BUFFER {
            return Err(ReportError::InvalidLayout(format!(
                "day_buffer {} exceeds {MAX_DAY_BUFFER}",
                self.day_buffer
            )));
        }
        if self.last_week_offset_days.unsigned_abs() > MAX_LAST_WEEK_OFFSET_DAYS.unsigned_abs() {
            return Err(ReportError::InvalidLayout(format!(
                "last_week_offset_days {} is outside -{MAX_LAST_WEEK_OFFSET_DAYS}..={MAX_LAST_WEEK_OFFSET_DAYS}",
                self.last_week_offset_days
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Grid
// ============================================================================

/// Rectangular table of cell text, as read from the attendance sheet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<String>>,
    width: usize,
}

impl Grid {
    /// Build a grid, rejecting rows of differing length.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Result<Self, ReportError> {
        let width = rows.first().map_or(0, Vec::len);
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(ReportError::MalformedGrid {
                row,
                expected: width,
                found: cells.len(),
            });
        }
        Ok(Self { rows, width })
    }

    /// Number of columns shared by every row
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

// ============================================================================
// Column ranges and rosters
// ============================================================================

/// Half-open interval `[start, end)` of column indices.
///
/// A range whose start is not below its end selects no columns. Weeks that
/// cross a month boundary produce such ranges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ColumnRange {
    pub start: usize,
    pub end: usize,
}

impl ColumnRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Number of columns selected
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn contains(&self, column: usize) -> bool {
        column >= self.start && column < self.end
    }
}

impl std::fmt::Display for ColumnRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Ordered list of student names produced by one filter pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Roster(Vec<String>);

impl Roster {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// One single-cell row per name, ready for write-back
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.0.iter().map(|name| vec![name.clone()]).collect()
    }
}

impl FromIterator<String> for Roster {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// Traits
// ============================================================================

/// External spreadsheet collaborator.
///
/// Reference arguments use A1 notation (`"C3"`, `"A1:E1000"`), optionally
/// prefixed with a sheet name.
pub trait SheetGateway {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Every cell of the source sheet, one `Vec` per row
    fn fetch_grid(&mut self) -> Result<Vec<Vec<String>>, Self::Error>;

    /// Blank out a rectangular region of the destination sheet
    fn clear_range(&mut self, range: &str) -> Result<(), Self::Error>;

    /// Write `rows` starting at `cell`; values are stored literally
    fn write_values(&mut self, cell: &str, rows: &[Vec<String>]) -> Result<(), Self::Error>;

    fn set_cell_text(&mut self, cell: &str, text: &str) -> Result<(), Self::Error>;

    fn set_range_bold(&mut self, range: &str) -> Result<(), Self::Error>;
}

// ============================================================================
// Errors
// ============================================================================

/// Error raised while validating a grid or filtering it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("Malformed grid: row {row} has {found} cells, expected {expected}")]
    MalformedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Column range {range} exceeds grid width {width}")]
    RangeOutOfBounds { range: ColumnRange, width: usize },

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
}

// ============================================================================
// Tests
// ============================================================================
