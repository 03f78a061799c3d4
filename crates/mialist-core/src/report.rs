//! Three-window attendance report
//!
//! A report holds the last-week, current-week and whole-month rosters for a
//! single snapshot of the attendance grid.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{ColumnRange, DateWindow, Grid, ReportError, Roster, RowFilter, SheetLayout};

/// Rosters for the three reporting windows
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Date the windows were computed from
    pub today: NaiveDate,
    pub last_week_range: ColumnRange,
    pub current_week_range: ColumnRange,
    pub last_week: Roster,
    pub current_week: Roster,
    pub month: Roster,
}

/// Runs the row filter over the last-week, current-week and whole-month windows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReportBuilder {
    window: DateWindow,
    filter: RowFilter,
}

impl ReportBuilder {
    pub fn new(window: DateWindow, filter: RowFilter) -> Self {
        Self { window, filter }
    }

    pub fn from_layout(layout: &SheetLayout) -> Self {
        Self::new(DateWindow::from_layout(layout), RowFilter::from_layout(layout))
    }

    pub fn window(&self) -> &DateWindow {
        &self.window
    }

    pub fn filter(&self) -> &RowFilter {
        &self.filter
    }

    /// Build all three rosters for `today`.
    ///
    /// The passes share nothing but the read-only grid, so they run in
    /// parallel; the first error in (last week, current week, month) order
    /// is returned.
    pub fn build(&self, grid: &Grid, today: NaiveDate) -> Result<Report, ReportError> {
        let last_week_range = self.window.last_week_range(today);
        let current_week_range = self.window.current_week_range(today);

        let (last_week, (current_week, month)) = rayon::join(
            || self.filter.filter(grid, Some(last_week_range)),
            || {
                rayon::join(
                    || self.filter.filter(grid, Some(current_week_range)),
                    || self.filter.filter(grid, None),
                )
            },
        );

        let report = Report {
            today,
            last_week_range,
            current_week_range,
            last_week: last_week?,
            current_week: current_week?,
            month: month?,
        };

        tracing::info!(
            %today,
            last_week = report.last_week.len(),
            current_week = report.current_week.len(),
            month = report.month.len(),
            "built attendance report"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    /// Attendance row with marks at the given day-of-month values
    fn student(name: &str, marked_days: &[usize]) -> Vec<String> {
        let layout = SheetLayout::default();
        let mut row = vec![String::new(); 31 + layout.day_buffer + 1];
        row[layout.name_column] = name.to_string();
        for day in marked_days {
            row[day + layout.day_buffer] = "X".to_string();
        }
        row
    }

    #[test]
    fn builds_three_rosters() {
        // Today: Wednesday 2025-01-15; current week 13..19, last week 8..14
        let grid = Grid::from_rows(vec![
            student("Ann", &[13]),
            student("Ben", &[9]),
            student("Cal", &[2]),
            vec![String::new(); 38],
            student("Dee", &[]),
        ])
        .unwrap();

        let report = ReportBuilder::default().build(&grid, date(2025, 1, 15)).unwrap();

        assert_eq!(report.current_week_range, ColumnRange::new(19, 25));
        assert_eq!(report.last_week_range, ColumnRange::new(14, 20));
        // Day 13 sits in both windows, day 9 only in last week
        assert_eq!(report.current_week.names(), ["Ben", "Cal", "Dee"]);
        assert_eq!(report.last_week.names(), ["Cal", "Dee"]);
        assert_eq!(report.month.names(), ["Dee"]);
    }

    #[test]
    fn empty_grid_builds_empty_report() {
        let grid = Grid::from_rows(Vec::new()).unwrap();
        let report = ReportBuilder::default().build(&grid, date(2025, 1, 15)).unwrap();
        assert!(report.last_week.is_empty());
        assert!(report.current_week.is_empty());
        assert!(report.month.is_empty());
    }

    #[test]
    fn narrow_grid_reports_out_of_bounds() {
        let grid = Grid::from_rows(vec![vec!["".into(), "Ann".into(), "".into()]]).unwrap();
        let err = ReportBuilder::default()
            .build(&grid, date(2025, 1, 15))
            .unwrap_err();
        assert_eq!(
            err,
            ReportError::RangeOutOfBounds {
                range: ColumnRange::new(14, 20),
                width: 3
            }
        );
    }

    #[test]
    fn layout_flows_into_both_passes() {
        let layout = SheetLayout {
            name_column: 0,
            day_buffer: 1,
            last_week_offset_days: -7,
        };
        let builder = ReportBuilder::from_layout(&layout);
        assert_eq!(builder.filter().name_column, 0);
        assert_eq!(builder.window().day_buffer, 1);
        assert_eq!(builder.window().last_week_offset_days, -7);
    }

    #[test]
    fn report_serializes_rosters_as_name_arrays() {
        let grid = Grid::from_rows(vec![student("Ann", &[])]).unwrap();
        let report = ReportBuilder::default().build(&grid, date(2025, 1, 15)).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["today"], "2025-01-15");
        assert_eq!(json["month"], serde_json::json!(["Ann"]));
        assert_eq!(json["current_week_range"]["start"], 19);
    }
}
