use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::Context;

use crate::models::RosterEntry;

// Worksheet exports keep dates in column A and hours in column C.
const DATE_COLUMN: usize = 0;
const HOURS_COLUMN: usize = 2;

/// Load the roster file: one `name;locator` line per student, `#` comments
/// and blank lines skipped. A line without a locator still yields an entry so
/// coverage can be reported.
pub fn load_roster(path: &Path) -> anyhow::Result<Vec<RosterEntry>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read roster {}", path.display()))?;
    Ok(parse_roster(&text))
}

pub fn parse_roster(text: &str) -> Vec<RosterEntry> {
    let mut entries = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (name, source) = match line.split_once(';') {
            Some((name, source)) => {
                let source = source.trim();
                (name.trim(), (!source.is_empty()).then(|| source.to_string()))
            }
            None => (line, None),
        };
        entries.push(RosterEntry {
            name: name.to_string(),
            source,
        });
    }
    entries
}

/// Fetch the raw date and hours columns from one student's worksheet export,
/// scanning at most `max_rows` rows. Missing cells read as empty so the two
/// columns always come back equal length.
pub fn fetch_columns(path: &Path, max_rows: usize) -> anyhow::Result<(Vec<String>, Vec<String>)> {
    let file = fs::File::open(path)
        .with_context(|| format!("failed to open sheet export {}", path.display()))?;
    read_columns(file, max_rows)
        .with_context(|| format!("failed to read sheet export {}", path.display()))
}

pub fn read_columns(
    reader: impl Read,
    max_rows: usize,
) -> anyhow::Result<(Vec<String>, Vec<String>)> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut date_cells = Vec::new();
    let mut hour_cells = Vec::new();
    for result in csv_reader.records().take(max_rows) {
        let record = result?;
        date_cells.push(record.get(DATE_COLUMN).unwrap_or("").to_string());
        hour_cells.push(record.get(HOURS_COLUMN).unwrap_or("").to_string());
    }
    Ok((date_cells, hour_cells))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_skips_comments_and_blank_lines() {
        let entries = parse_roster(
            "# fall quarter roster\n\
             Avery Lee;sheets/avery.csv\n\
             \n\
             Jules Moreno\n\
             Kiara Patel; sheets/kiara.csv \n",
        );

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name, "Avery Lee");
        assert_eq!(entries[0].source.as_deref(), Some("sheets/avery.csv"));
        assert_eq!(entries[1].name, "Jules Moreno");
        assert_eq!(entries[1].source, None);
        assert_eq!(entries[2].source.as_deref(), Some("sheets/kiara.csv"));
    }

    #[test]
    fn roster_treats_empty_locator_as_missing() {
        let entries = parse_roster("Avery Lee;\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].source, None);
    }

    #[test]
    fn columns_come_back_paired_and_padded() {
        let input = "Date,Notes,Hours\n9/23,standup,3\n9/24\n\"Sep 25, 2024\",,2.5\n";
        let (dates, hours) = read_columns(input.as_bytes(), 300).unwrap();

        assert_eq!(dates, vec!["Date", "9/23", "9/24", "Sep 25, 2024"]);
        assert_eq!(hours, vec!["Hours", "3", "", "2.5"]);
        assert_eq!(dates.len(), hours.len());
    }

    #[test]
    fn max_rows_caps_the_scan() {
        let input = "9/23,,1\n9/24,,2\n9/25,,3\n";
        let (dates, hours) = read_columns(input.as_bytes(), 2).unwrap();
        assert_eq!(dates.len(), 2);
        assert_eq!(hours, vec!["1", "2"]);
    }
}
