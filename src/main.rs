use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};

mod models;
mod parse;
mod report;
mod sheet;
mod timesheet;

use models::{Audit, IngestFailure, Quarter};

#[derive(Parser)]
#[command(name = "timesheet-audit")]
#[command(about = "Work-log compliance auditor for student timesheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct QuarterArgs {
    /// First day of the quarter
    #[arg(long, default_value = "2024-09-23")]
    day_zero: NaiveDate,
    /// Quarter length in days
    #[arg(long, default_value_t = 86)]
    quarter_days: i64,
    /// Days per regular week
    #[arg(long, default_value_t = 7)]
    week_length: i64,
    /// Regular weeks before the trailing finals window
    #[arg(long, default_value_t = 11)]
    regular_weeks: usize,
}

impl QuarterArgs {
    fn quarter(&self) -> anyhow::Result<Quarter> {
        Quarter::new(
            self.day_zero,
            self.quarter_days,
            self.week_length,
            self.regular_weeks,
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check compliance and print a ranked summary
    Check {
        /// Roster file mapping student names to sheet exports
        #[arg(long)]
        roster: PathBuf,
        /// Reference date for the audit (defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
        /// Maximum sheet rows to scan per student
        #[arg(long, default_value_t = 300)]
        max_rows: usize,
        /// Emit a machine-readable JSON summary instead of the table
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        quarter: QuarterArgs,
    },
    /// Write a detailed report itemizing missing days and weeks
    Report {
        #[arg(long)]
        roster: PathBuf,
        #[arg(long)]
        as_of: Option<NaiveDate>,
        #[arg(long, default_value_t = 300)]
        max_rows: usize,
        #[arg(long, default_value = "report.txt")]
        out: PathBuf,
        #[command(flatten)]
        quarter: QuarterArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            roster,
            as_of,
            max_rows,
            json,
            quarter,
        } => {
            let quarter = quarter.quarter()?;
            let as_of = as_of.unwrap_or_else(|| Utc::now().date_naive());
            let audit = run_audit(&roster, quarter, max_rows)?;
            let statuses = report::evaluate_records(&audit.records, as_of);

            if json {
                let summary = report::json_summary(as_of, &audit, &statuses);
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", report::render_summary(&audit, &statuses, as_of));
            }
        }
        Commands::Report {
            roster,
            as_of,
            max_rows,
            out,
            quarter,
        } => {
            let quarter = quarter.quarter()?;
            let as_of = as_of.unwrap_or_else(|| Utc::now().date_naive());
            let audit = run_audit(&roster, quarter, max_rows)?;
            let statuses = report::evaluate_records(&audit.records, as_of);
            let rendered = report::render_detail(&quarter, &audit, &statuses, as_of);
            std::fs::write(&out, rendered)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

/// Walk the roster and build one record per linked student. A failure for one
/// student never aborts the run: it is collected and reported distinctly.
fn run_audit(roster_path: &Path, quarter: Quarter, max_rows: usize) -> anyhow::Result<Audit> {
    let roster = sheet::load_roster(roster_path)?;
    let total_students = roster.len();

    let mut records = Vec::new();
    let mut failures = Vec::new();
    let mut with_timesheets = 0;

    for entry in roster {
        let Some(source) = entry.source else {
            continue;
        };
        with_timesheets += 1;
        let outcome = sheet::fetch_columns(Path::new(&source), max_rows).and_then(
            |(date_cells, hour_cells)| {
                timesheet::build_record(quarter, &entry.name, &date_cells, &hour_cells)
            },
        );
        match outcome {
            Ok(record) => records.push(record),
            Err(err) => failures.push(IngestFailure {
                name: entry.name,
                reason: format!("{err:#}"),
            }),
        }
    }

    Ok(Audit {
        records,
        failures,
        total_students,
        with_timesheets,
    })
}
