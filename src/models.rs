use std::collections::BTreeMap;

use anyhow::ensure;
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// A fixed academic period: `regular_weeks` full weeks tiling the head of the
/// range, plus one shorter trailing window (finals week) covering the rest.
#[derive(Debug, Clone, Copy)]
pub struct Quarter {
    pub day_zero: NaiveDate,
    pub length_days: i64,
    pub week_length: i64,
    pub regular_weeks: usize,
}

impl Quarter {
    pub fn new(
        day_zero: NaiveDate,
        length_days: i64,
        week_length: i64,
        regular_weeks: usize,
    ) -> anyhow::Result<Self> {
        ensure!(week_length > 0, "week length must be positive");
        ensure!(length_days > 0, "quarter length must be positive");
        let regular_days = regular_weeks as i64 * week_length;
        ensure!(
            regular_days < length_days,
            "{} regular weeks of {} days leave no trailing window in a {}-day quarter",
            regular_weeks,
            week_length,
            length_days
        );
        Ok(Self {
            day_zero,
            length_days,
            week_length,
            regular_weeks,
        })
    }

    /// Regular weeks plus the trailing window.
    pub fn week_count(&self) -> usize {
        self.regular_weeks + 1
    }

    /// First day after the quarter.
    pub fn end_date(&self) -> NaiveDate {
        self.day_zero + Duration::days(self.length_days)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.day_zero && day < self.end_date()
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.length_days).map(|offset| self.day_zero + Duration::days(offset))
    }

    /// Half-open `[start, end)` window for a week index in `0..week_count()`.
    pub fn week_window(&self, week: usize) -> (NaiveDate, NaiveDate) {
        let start = self.day_zero + Duration::days(week as i64 * self.week_length);
        let end = if week < self.regular_weeks {
            start + Duration::days(self.week_length)
        } else {
            self.end_date()
        };
        (start, end)
    }

    /// A window is fully elapsed once the reference date reaches this bound.
    pub fn week_end(&self, week: usize) -> NaiveDate {
        self.week_window(week).1
    }

    pub fn week_label(&self, week: usize) -> String {
        if week < self.regular_weeks {
            format!("Week {}", week + 1)
        } else {
            "Finals week".to_string()
        }
    }
}

/// One student's aggregated hours, frozen after ingest. Every quarter date is
/// a key; `None` means no entry was ever logged for that day, which is
/// distinct from an explicit zero.
#[derive(Debug, Clone)]
pub struct TimesheetRecord {
    pub name: String,
    pub quarter: Quarter,
    pub daily_hours: BTreeMap<NaiveDate, Option<f64>>,
    pub weekly_hours: Vec<f64>,
}

/// Roster line: students without a source locator are counted but not audited.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub name: String,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestFailure {
    pub name: String,
    pub reason: String,
}

/// Outcome of one audit run across the roster.
#[derive(Debug)]
pub struct Audit {
    pub records: Vec<TimesheetRecord>,
    pub failures: Vec<IngestFailure>,
    pub total_students: usize,
    pub with_timesheets: usize,
}

/// Evaluated compliance for one student at a reference date.
#[derive(Debug, Clone, Serialize)]
pub struct StudentStatus {
    pub name: String,
    pub unlogged_days: Vec<NaiveDate>,
    pub zero_weeks: Vec<usize>,
}

impl StudentStatus {
    pub fn is_compliant(&self) -> bool {
        self.unlogged_days.is_empty() && self.zero_weeks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn production_quarter() -> Quarter {
        Quarter::new(NaiveDate::from_ymd_opt(2024, 9, 23).unwrap(), 86, 7, 11).unwrap()
    }

    #[test]
    fn windows_tile_the_quarter_exactly() {
        let quarter = production_quarter();
        let mut expected = quarter.day_zero;
        for week in 0..quarter.week_count() {
            let (start, end) = quarter.week_window(week);
            assert_eq!(start, expected, "gap or overlap before week {week}");
            assert!(end > start);
            expected = end;
        }
        assert_eq!(expected, quarter.end_date());
    }

    #[test]
    fn trailing_window_covers_the_remainder() {
        let quarter = production_quarter();
        assert_eq!(quarter.week_count(), 12);
        let (start, end) = quarter.week_window(11);
        assert_eq!(start, quarter.day_zero + Duration::days(77));
        assert_eq!(end, quarter.day_zero + Duration::days(86));
        assert_eq!((end - start).num_days(), 9);
    }

    #[test]
    fn rejects_quarter_with_no_trailing_window() {
        let day_zero = NaiveDate::from_ymd_opt(2024, 9, 23).unwrap();
        assert!(Quarter::new(day_zero, 77, 7, 11).is_err());
        assert!(Quarter::new(day_zero, 70, 7, 11).is_err());
    }

    #[test]
    fn contains_matches_day_range() {
        let quarter = production_quarter();
        assert!(quarter.contains(quarter.day_zero));
        assert!(quarter.contains(quarter.day_zero + Duration::days(85)));
        assert!(!quarter.contains(quarter.day_zero + Duration::days(86)));
        assert!(!quarter.contains(quarter.day_zero - Duration::days(1)));
        assert_eq!(quarter.days().count(), 86);
    }

    #[test]
    fn week_labels_are_one_based_with_named_finals() {
        let quarter = production_quarter();
        assert_eq!(quarter.week_label(0), "Week 1");
        assert_eq!(quarter.week_label(10), "Week 11");
        assert_eq!(quarter.week_label(11), "Finals week");
    }
}
