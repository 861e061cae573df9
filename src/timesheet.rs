use std::collections::BTreeMap;

use anyhow::{bail, ensure};
use chrono::{Datelike, NaiveDate};

use crate::models::{Quarter, TimesheetRecord};
use crate::parse::{self, DateCell, HourCell};

/// Build one student's frozen record from the raw date and hours columns.
pub fn build_record(
    quarter: Quarter,
    name: &str,
    date_cells: &[String],
    hour_cells: &[String],
) -> anyhow::Result<TimesheetRecord> {
    let daily_hours = aggregate_rows(&quarter, date_cells, hour_cells)?;
    let weekly_hours = weekly_rollup(&quarter, &daily_hours);
    Ok(TimesheetRecord {
        name: name.to_string(),
        quarter,
        daily_hours,
        weekly_hours,
    })
}

/// Fold the paired columns into a per-day map seeded with every quarter date.
/// Rows whose date cell does not normalize are skipped whole; rows dated
/// outside the quarter are ignored. Duplicate dates sum. An empty hours cell
/// contributes nothing, so a date can stay "no entry" even after being named
/// by a row; a non-empty cell that is not a non-negative number rejects the
/// whole record.
pub fn aggregate_rows(
    quarter: &Quarter,
    date_cells: &[String],
    hour_cells: &[String],
) -> anyhow::Result<BTreeMap<NaiveDate, Option<f64>>> {
    ensure!(
        date_cells.len() == hour_cells.len(),
        "date and hours columns differ in length ({} vs {})",
        date_cells.len(),
        hour_cells.len()
    );

    let mut daily: BTreeMap<NaiveDate, Option<f64>> =
        quarter.days().map(|day| (day, None)).collect();
    let default_year = quarter.day_zero.year();

    for (row, (date_cell, hours_cell)) in date_cells.iter().zip(hour_cells).enumerate() {
        let DateCell::Date(day) = parse::normalize_date(date_cell, default_year) else {
            continue;
        };
        // Only quarter dates are keys, so a miss means the row is out of range.
        let Some(total) = daily.get_mut(&day) else {
            continue;
        };
        match parse::parse_hours(hours_cell) {
            HourCell::Value(value) => *total = Some(total.unwrap_or(0.0) + value),
            HourCell::Empty => {}
            HourCell::Invalid => bail!(
                "row {}: hours cell {:?} is not a non-negative number",
                row + 1,
                hours_cell.trim()
            ),
        }
    }

    Ok(daily)
}

/// Sum each week window over the daily map, counting "no entry" as 0.
pub fn weekly_rollup(
    quarter: &Quarter,
    daily_hours: &BTreeMap<NaiveDate, Option<f64>>,
) -> Vec<f64> {
    (0..quarter.week_count())
        .map(|week| {
            let (start, end) = quarter.week_window(week);
            daily_hours
                .range(start..end)
                .map(|(_, hours)| hours.unwrap_or(0.0))
                .sum()
        })
        .collect()
}

/// Days strictly before `targ_date` that were never logged at all. An explicit
/// zero-hour entry is compliant and is not returned.
pub fn unlogged_days(record: &TimesheetRecord, targ_date: NaiveDate) -> Vec<NaiveDate> {
    record
        .daily_hours
        .iter()
        .filter(|(day, hours)| **day < targ_date && hours.is_none())
        .map(|(day, _)| *day)
        .collect()
}

/// Week indices whose window has fully elapsed by `targ_date` and whose total
/// is exactly zero. A week still in progress is never flagged; the trailing
/// window is judged by its own shorter end bound.
pub fn zero_weeks(record: &TimesheetRecord, targ_date: NaiveDate) -> Vec<usize> {
    record
        .weekly_hours
        .iter()
        .enumerate()
        .filter(|(week, total)| {
            record.quarter.week_end(*week) <= targ_date && **total == 0.0
        })
        .map(|(week, _)| week)
        .collect()
}
