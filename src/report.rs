use std::fmt::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Audit, IngestFailure, Quarter, StudentStatus, TimesheetRecord};
use crate::timesheet;

/// Evaluate every record at the reference date and rank by severity: most
/// zero weeks first, then most unlogged days, then name ascending so ties are
/// deterministic.
pub fn evaluate_records(records: &[TimesheetRecord], as_of: NaiveDate) -> Vec<StudentStatus> {
    let mut statuses: Vec<StudentStatus> = records
        .iter()
        .map(|record| StudentStatus {
            name: record.name.clone(),
            unlogged_days: timesheet::unlogged_days(record, as_of),
            zero_weeks: timesheet::zero_weeks(record, as_of),
        })
        .collect();

    statuses.sort_by(|a, b| {
        b.zero_weeks
            .len()
            .cmp(&a.zero_weeks.len())
            .then_with(|| b.unlogged_days.len().cmp(&a.unlogged_days.len()))
            .then_with(|| a.name.cmp(&b.name))
    });
    statuses
}

/// One fixed-width line per student, compliant or not.
pub fn status_line(status: &StudentStatus) -> String {
    let label = format!("{}:", status.name);
    if status.is_compliant() {
        format!("{label: <30} OK.")
    } else {
        let days = format!("Unlogged days: {}.", status.unlogged_days.len());
        let weeks = format!("Zero weeks: {}.", status.zero_weeks.len());
        format!("{label: <30} {days: ^20} {weeks: >15}")
    }
}

pub fn render_summary(audit: &Audit, statuses: &[StudentStatus], as_of: NaiveDate) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Timesheet audit as of {}", as_of);
    let _ = writeln!(
        output,
        "Linked timesheets: {} of {} students.",
        audit.with_timesheets, audit.total_students
    );
    let _ = writeln!(output);

    for status in statuses {
        let _ = writeln!(output, "{}", status_line(status));
    }

    if !audit.failures.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "{} timesheet(s) could not be processed:",
            audit.failures.len()
        );
        for failure in &audit.failures {
            let label = format!("{}:", failure.name);
            let _ = writeln!(output, "{label: <30} FAILED: {}", failure.reason);
        }
    }

    output
}

/// The summary plus an itemized listing of exactly which days and weeks each
/// flagged student is missing.
pub fn render_detail(
    quarter: &Quarter,
    audit: &Audit,
    statuses: &[StudentStatus],
    as_of: NaiveDate,
) -> String {
    let mut output = render_summary(audit, statuses, as_of);
    let flagged: Vec<&StudentStatus> = statuses
        .iter()
        .filter(|status| !status.is_compliant())
        .collect();

    let _ = writeln!(output);
    if flagged.is_empty() {
        let _ = writeln!(output, "All processed students are up to date.");
        return output;
    }

    let _ = writeln!(output, "Missing entries by student:");
    for status in flagged {
        let _ = writeln!(output);
        let _ = writeln!(output, "{}", status.name);
        if !status.unlogged_days.is_empty() {
            let days: Vec<String> = status
                .unlogged_days
                .iter()
                .map(|day| day.format("%b %-d").to_string())
                .collect();
            let _ = writeln!(output, "  days:  {}", days.join(", "));
        }
        if !status.zero_weeks.is_empty() {
            let weeks: Vec<String> = status
                .zero_weeks
                .iter()
                .map(|week| quarter.week_label(*week))
                .collect();
            let _ = writeln!(output, "  weeks: {}", weeks.join(", "));
        }
    }

    output
}

#[derive(Debug, Serialize)]
pub struct AuditSummary<'a> {
    pub as_of: NaiveDate,
    pub total_students: usize,
    pub with_timesheets: usize,
    pub students: &'a [StudentStatus],
    pub failures: &'a [IngestFailure],
}

pub fn json_summary<'a>(
    as_of: NaiveDate,
    audit: &'a Audit,
    statuses: &'a [StudentStatus],
) -> AuditSummary<'a> {
    AuditSummary {
        as_of,
        total_students: audit.total_students,
        with_timesheets: audit.with_timesheets,
        students: statuses,
        failures: &audit.failures,
    }
}
