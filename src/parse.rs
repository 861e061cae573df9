use chrono::NaiveDate;

/// Result of normalizing a free-form date cell. `NotADate` is the expected
/// outcome for header rows, blanks, and label rows ("Week 3 total hours"),
/// and callers must skip such rows rather than fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCell {
    Date(NaiveDate),
    NotADate,
}

/// Result of parsing an hours cell. An empty cell contributes no value and is
/// not the same as zero; anything non-empty that is not a non-negative number
/// is `Invalid`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HourCell {
    Value(f64),
    Empty,
    Invalid,
}

// %y must come before %Y: chrono's %Y accepts two digits too, which would
// turn "9/23/24" into year 24 AD.
const DATED_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%A, %B %d, %Y",
    "%a %b %d %Y",
    "%a %m/%d/%Y",
];

// Year-less entries are completed with the default year before parsing.
const YEARLESS_FORMATS: &[&str] = &[
    "%m/%d",
    "%m-%d",
    "%B %d",
    "%b %d",
    "%a %m/%d",
    "%A, %B %d",
];

/// Permissive date normalization: tries a fixed list of common spreadsheet
/// date shapes, then year-less shapes completed with `default_year` (the
/// quarter's anchor year).
pub fn normalize_date(raw: &str, default_year: i32) -> DateCell {
    let text = raw.trim();
    if text.is_empty() {
        return DateCell::NotADate;
    }
    for format in DATED_FORMATS {
        if let Ok(day) = NaiveDate::parse_from_str(text, format) {
            return DateCell::Date(day);
        }
    }
    let dated = format!("{text} {default_year}");
    for format in YEARLESS_FORMATS {
        let format = format!("{format} %Y");
        if let Ok(day) = NaiveDate::parse_from_str(&dated, &format) {
            return DateCell::Date(day);
        }
    }
    DateCell::NotADate
}

pub fn parse_hours(raw: &str) -> HourCell {
    let text = raw.trim();
    if text.is_empty() {
        return HourCell::Empty;
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => HourCell::Value(value),
        _ => HourCell::Invalid,
    }
}
