//! Human-readable and JSON rendering of reports

use std::fmt::Write;

use mialist_core::{ColumnRange, Destination, Report, Roster};
use mialist_sheets::a1::MAX_COLUMN;
use mialist_sheets::column_letters;

/// Output format for `report`
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Spreadsheet column span of a range, e.g. `T:Y`
pub fn column_span(range: ColumnRange) -> String {
    if range.is_empty() {
        return "none, week crosses a month boundary".to_string();
    }
    match (u16::try_from(range.start), u16::try_from(range.end - 1)) {
        (Ok(first), Ok(last)) if last <= MAX_COLUMN => {
            format!("{}:{}", column_letters(first), column_letters(last))
        }
        _ => format!("columns {}..{}", range.start, range.end),
    }
}

fn roster_section(out: &mut String, label: &str, range: Option<ColumnRange>, roster: &Roster) {
    let _ = match range {
        Some(range) => writeln!(
            out,
            "{label} {range} ({}): {} missing",
            column_span(range),
            roster.len()
        ),
        None => writeln!(out, "{label}: {} missing", roster.len()),
    };
    for name in roster.names() {
        let _ = writeln!(out, "  {name}");
    }
}

/// Plain-text report, one section per window in destination order
pub fn render_text(report: &Report, destination: &Destination) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Attendance report for {}", report.today);
    out.push('\n');
    roster_section(
        &mut out,
        &destination.last_week.label,
        Some(report.last_week_range),
        &report.last_week,
    );
    out.push('\n');
    roster_section(
        &mut out,
        &destination.current_week.label,
        Some(report.current_week_range),
        &report.current_week,
    );
    out.push('\n');
    roster_section(&mut out, &destination.month.label, None, &report.month);
    out
}

pub fn render_json(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Tab-separated rows with trailing empty cells dropped
pub fn render_rows(rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    for row in rows {
        let used = row.iter().rposition(|c| !c.is_empty()).map_or(0, |i| i + 1);
        out.push_str(&row[..used].join("\t"));
        out.push('\n');
    }
    out
}
