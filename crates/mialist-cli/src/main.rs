//! mialist CLI - Missing-student rosters from attendance workbooks
//!
//! Command-line interface for reporting and publishing last-week,
//! current-week and whole-month rosters of unmarked students.

mod config;
mod output;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use mialist_core::{DateWindow, Grid, ReportBuilder, SheetGateway};
use mialist_sheets::{MemorySheet, XlsxWorkbook};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;
use crate::output::{column_span, render_json, render_rows, render_text, OutputFormat};

#[derive(Parser)]
#[command(name = "mialist")]
#[command(author, version, about = "Missing-student rosters from attendance sheets", long_about = None)]
struct Cli {
    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ./mialist.toml when present)
    #[arg(short, long, global = true, env = "MIALIST_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the three rosters for an attendance workbook
    Report {
        /// Attendance workbook (xlsx, xls, xlsb, ods)
        #[arg(value_name = "WORKBOOK")]
        workbook: PathBuf,

        /// Attendance worksheet name
        #[arg(short, long)]
        sheet: Option<String>,

        /// Date to compute the weekly windows from (defaults to today)
        #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_date)]
        today: Option<NaiveDate>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Write the rosters to the destination sheet of a new workbook
    Publish {
        /// Attendance workbook (xlsx, xls, xlsb, ods)
        #[arg(value_name = "WORKBOOK")]
        workbook: PathBuf,

        /// Attendance worksheet name
        #[arg(short, long)]
        sheet: Option<String>,

        /// Destination worksheet name
        #[arg(short, long)]
        destination: Option<String>,

        /// Output file (defaults to <WORKBOOK stem>-mia.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Date to compute the weekly windows from (defaults to today)
        #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_date)]
        today: Option<NaiveDate>,

        /// Print the destination sheet instead of saving it
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the attendance columns covered by this week and last week
    Window {
        /// Date to compute the windows from (defaults to today)
        #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_date)]
        today: Option<NaiveDate>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Report {
            workbook,
            sheet,
            today,
            format,
        } => {
            if let Some(sheet) = sheet {
                config.sheets.source = sheet;
            }
            cmd_report(&config, &workbook, resolve_today(today), format)
        }
        Commands::Publish {
            workbook,
            sheet,
            destination,
            output,
            today,
            dry_run,
        } => {
            if let Some(sheet) = sheet {
                config.sheets.source = sheet;
            }
            if let Some(destination) = destination {
                config.sheets.destination = destination;
            }
            let output = output.unwrap_or_else(|| default_output(&workbook));
            cmd_publish(&config, &workbook, &output, resolve_today(today), dry_run)
        }
        Commands::Window { today } => {
            cmd_window(&config, resolve_today(today));
            Ok(())
        }
    }
}

/// `--today` values, limited to four-digit years
fn parse_date(text: &str) -> Result<NaiveDate, String> {
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))?;
    if !(1900..=9999).contains(&date.year()) {
        return Err(format!("year {} is outside 1900..=9999", date.year()));
    }
    Ok(date)
}

fn resolve_today(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| chrono::Local::now().date_naive())
}

/// `attendance.xlsx` -> `attendance-mia.xlsx` in the same directory
fn default_output(workbook: &Path) -> PathBuf {
    let stem = workbook
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attendance".to_string());
    workbook.with_file_name(format!("{stem}-mia.xlsx"))
}

fn open_workbook(config: &Config, path: &Path) -> Result<XlsxWorkbook> {
    XlsxWorkbook::open(path, &config.sheets.source, &config.sheets.destination)
        .with_context(|| format!("failed to open {}", path.display()))
}

fn cmd_report(config: &Config, path: &Path, today: NaiveDate, format: OutputFormat) -> Result<()> {
    let mut workbook = open_workbook(config, path)?;
    let rows = workbook
        .fetch_grid()
        .with_context(|| format!("failed to read sheet '{}'", config.sheets.source))?;
    let grid = Grid::from_rows(rows).context("attendance sheet is not usable")?;

    let report = ReportBuilder::from_layout(&config.layout)
        .build(&grid, today)
        .context("failed to build report")?;

    match format {
        OutputFormat::Text => print!("{}", render_text(&report, &config.destination)),
        OutputFormat::Json => println!("{}", render_json(&report)?),
    }
    Ok(())
}

fn cmd_publish(
    config: &Config,
    path: &Path,
    output: &Path,
    today: NaiveDate,
    dry_run: bool,
) -> Result<()> {
    let builder = ReportBuilder::from_layout(&config.layout);
    let mut workbook = open_workbook(config, path)?;

    if dry_run {
        let rows = workbook
            .fetch_grid()
            .with_context(|| format!("failed to read sheet '{}'", config.sheets.source))?;
        let mut sheet = MemorySheet::new(&config.sheets.destination, rows);
        mialist_core::run(&mut sheet, &builder, &config.destination, today)
            .context("publish failed")?;
        print!("{}", render_rows(&sheet.destination_rows()));
        return Ok(());
    }

    let report = mialist_core::run(&mut workbook, &builder, &config.destination, today)
        .context("publish failed")?;
    workbook
        .save(output)
        .with_context(|| format!("failed to save {}", output.display()))?;

    println!(
        "Published to {} ('{}'): {} last week, {} current week, {} entire month",
        output.display(),
        config.sheets.destination,
        report.last_week.len(),
        report.current_week.len(),
        report.month.len()
    );
    Ok(())
}

fn cmd_window(config: &Config, today: NaiveDate) {
    let window = DateWindow::from_layout(&config.layout);
    let current = window.current_week_range(today);
    let last = window.last_week_range(today);

    println!("Today: {today}");
    println!("Current week: {current} ({})", column_span(current));
    println!("Last week: {last} ({})", column_span(last));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_sits_beside_input() {
        assert_eq!(
            default_output(Path::new("/data/attendance.xlsx")),
            PathBuf::from("/data/attendance-mia.xlsx")
        );
        assert_eq!(
            default_output(Path::new("october.ods")),
            PathBuf::from("october-mia.xlsx")
        );
    }

    #[test]
    fn explicit_today_wins() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(resolve_today(Some(date)), date);
    }

    #[test]
    fn cli_parses_publish_flags() {
        let cli = Cli::try_parse_from([
            "mialist",
            "publish",
            "attendance.xlsx",
            "--destination",
            "Absent",
            "--today",
            "2025-01-15",
            "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Commands::Publish {
                destination,
                today,
                dry_run,
                ..
            } => {
                assert_eq!(destination.as_deref(), Some("Absent"));
                assert_eq!(today, NaiveDate::from_ymd_opt(2025, 1, 15));
                assert!(dry_run);
            }
            _ => panic!("expected publish"),
        }
    }

    #[test]
    fn cli_rejects_bad_date() {
        assert!(Cli::try_parse_from(["mialist", "window", "--today", "15/01/2025"]).is_err());
    }

    #[test]
    fn cli_rejects_out_of_range_year() {
        assert!(Cli::try_parse_from(["mialist", "window", "--today", "+262142-12-31"]).is_err());
        assert!(parse_date("10000-01-01").is_err());
        assert!(parse_date("1899-12-31").is_err());
        assert_eq!(
            parse_date("2025-01-15"),
            Ok(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap())
        );
    }
}
