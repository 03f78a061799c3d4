//! Write-back of a report through a `SheetGateway`
//!
//! ## Destination layout
//!
//! ```text
//! |     A     | B |      C       | D |      E       |
//! |-----------|---|--------------|---|--------------|
//! | Last Week |   | Current Week |   | Entire Month |   <- bold headers
//! |           |   |              |   |              |
//! | Bob       |   | Bob          |   | Bob          |   <- rosters from row 3
//! | ...       |   | ...          |   |              |
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Grid, Report, ReportBuilder, ReportError, Roster, SheetGateway};

/// One roster column of the destination sheet
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportColumn {
    /// Cell receiving the header label
    pub header_cell: String,
    pub label: String,
    /// First cell of the roster
    pub anchor: String,
}

impl ReportColumn {
    pub fn new(
        header_cell: impl Into<String>,
        label: impl Into<String>,
        anchor: impl Into<String>,
    ) -> Self {
        Self {
            header_cell: header_cell.into(),
            label: label.into(),
            anchor: anchor.into(),
        }
    }
}

/// Where and how a report is written back
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Destination {
    /// Region wiped before every write-back
    pub clear_range: String,
    /// Region set in bold after the header labels are written
    pub header_range: String,
    pub last_week: ReportColumn,
    pub current_week: ReportColumn,
    pub month: ReportColumn,
}

impl Default for Destination {
    fn default() -> Self {
        Self {
            clear_range: "A1:E1000".into(),
            header_range: "A1:E1".into(),
            last_week: ReportColumn::new("A1", "Last Week", "A3"),
            current_week: ReportColumn::new("C1", "Current Week", "C3"),
            month: ReportColumn::new("E1", "Entire Month", "E3"),
        }
    }
}

impl Destination {
    /// Columns paired with their rosters, in write order
    fn columns<'a>(&'a self, report: &'a Report) -> [(&'a ReportColumn, &'a Roster); 3] {
        [
            (&self.current_week, &report.current_week),
            (&self.last_week, &report.last_week),
            (&self.month, &report.month),
        ]
    }
}

/// Failure of a full fetch, build and publish run
#[derive(Debug, Error)]
pub enum RunError<E>
where
    E: std::error::Error + 'static,
{
    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("Sheet gateway error: {0}")]
    Gateway(#[source] E),
}

/// Replace the destination contents with `report`.
///
/// The destination is cleared first, so rosters shorter than the previous
/// run leave no stale names behind.
pub fn publish<G: SheetGateway>(
    gateway: &mut G,
    report: &Report,
    destination: &Destination,
) -> Result<(), G::Error> {
    gateway.clear_range(&destination.clear_range)?;

    for (column, _) in destination.columns(report) {
        gateway.set_cell_text(&column.header_cell, &column.label)?;
    }
    gateway.set_range_bold(&destination.header_range)?;

    for (column, roster) in destination.columns(report) {
        if roster.is_empty() {
            continue;
        }
        gateway.write_values(&column.anchor, &roster.rows())?;
    }

    tracing::info!(clear_range = %destination.clear_range, "published report");
    Ok(())
}

/// Fetch the attendance grid, build the report and publish it.
pub fn run<G: SheetGateway>(
    gateway: &mut G,
    builder: &ReportBuilder,
    destination: &Destination,
    today: NaiveDate,
) -> Result<Report, RunError<G::Error>> {
    let rows = gateway.fetch_grid().map_err(RunError::Gateway)?;
    let grid = Grid::from_rows(rows)?;
    tracing::debug!(rows = grid.height(), columns = grid.width(), "fetched attendance grid");

    let report = builder.build(&grid, today)?;
    publish(gateway, &report, destination).map_err(RunError::Gateway)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Error)]
    #[error("offline")]
    struct Offline;

    /// Records every call it receives
    #[derive(Default)]
    struct Recorder {
        rows: Vec<Vec<String>>,
        calls: Vec<String>,
        offline: bool,
    }

    impl SheetGateway for Recorder {
        type Error = Offline;

        fn fetch_grid(&mut self) -> Result<Vec<Vec<String>>, Offline> {
            if self.offline {
                return Err(Offline);
            }
            Ok(self.rows.clone())
        }

        fn clear_range(&mut self, range: &str) -> Result<(), Offline> {
            self.calls.push(format!("clear {range}"));
            Ok(())
        }

        fn write_values(&mut self, cell: &str, rows: &[Vec<String>]) -> Result<(), Offline> {
            self.calls.push(format!("write {cell} {rows:?}"));
            Ok(())
        }

        fn set_cell_text(&mut self, cell: &str, text: &str) -> Result<(), Offline> {
            self.calls.push(format!("text {cell} {text}"));
            Ok(())
        }

        fn set_range_bold(&mut self, range: &str) -> Result<(), Offline> {
            self.calls.push(format!("bold {range}"));
            Ok(())
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn attendance_row(name: &str, mark_column: Option<usize>) -> Vec<String> {
        let mut row = vec![String::new(); 40];
        row[1] = name.to_string();
        if let Some(column) = mark_column {
            row[column] = "x".to_string();
        }
        row
    }

    #[test]
    fn run_writes_headers_then_rosters() {
        let mut gateway = Recorder {
            rows: vec![attendance_row("Ann", Some(20)), attendance_row("Ben", None)],
            ..Default::default()
        };

        let report = run(
            &mut gateway,
            &ReportBuilder::default(),
            &Destination::default(),
            date(2025, 1, 15),
        )
        .unwrap();

        assert_eq!(report.month.names(), ["Ben"]);
        assert_eq!(
            gateway.calls,
            vec![
                "clear A1:E1000",
                "text C1 Current Week",
                "text A1 Last Week",
                "text E1 Entire Month",
                "bold A1:E1",
                r#"write C3 [["Ben"]]"#,
                r#"write A3 [["Ann"], ["Ben"]]"#,
                r#"write E3 [["Ben"]]"#,
            ]
        );
    }

    #[test]
    fn empty_rosters_still_clear_and_label() {
        let mut gateway = Recorder::default();
        run(
            &mut gateway,
            &ReportBuilder::default(),
            &Destination::default(),
            date(2025, 1, 15),
        )
        .unwrap();

        assert_eq!(gateway.calls.len(), 5);
        assert!(gateway.calls.iter().all(|c| !c.starts_with("write")));
    }

    #[test]
    fn malformed_grid_stops_before_write_back() {
        let mut gateway = Recorder {
            rows: vec![attendance_row("Ann", None), vec!["".into(), "Ben".into()]],
            ..Default::default()
        };

        let err = run(
            &mut gateway,
            &ReportBuilder::default(),
            &Destination::default(),
            date(2025, 1, 15),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            RunError::Report(ReportError::MalformedGrid { row: 1, .. })
        ));
        assert!(gateway.calls.is_empty());
    }

    #[test]
    fn gateway_failure_is_surfaced() {
        let mut gateway = Recorder {
            offline: true,
            ..Default::default()
        };

        let err = run(
            &mut gateway,
            &ReportBuilder::default(),
            &Destination::default(),
            date(2025, 1, 15),
        )
        .unwrap_err();

        assert!(matches!(err, RunError::Gateway(Offline)));
        assert_eq!(err.to_string(), "Sheet gateway error: offline");
    }

    #[test]
    fn destination_defaults_match_report_sheet() {
        let destination = Destination::default();
        assert_eq!(destination.last_week.anchor, "A3");
        assert_eq!(destination.current_week.anchor, "C3");
        assert_eq!(destination.month.anchor, "E3");
        assert_eq!(destination.month.label, "Entire Month");
    }
}
