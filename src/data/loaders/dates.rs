// dates.rs - Sampling date parsing and two-column dates files

use crate::data::SequenceSet;
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Convert a calendar date to a decimal year (2020-01-01 -> 2020.0)
pub fn decimal_year(date: NaiveDate) -> f64 {
    let year = date.year();
    let days_in_year = if NaiveDate::from_ymd_opt(year, 2, 29).is_some() { 366.0 } else { 365.0 };
    year as f64 + date.ordinal0() as f64 / days_in_year
}

fn is_missing(raw: &str) -> bool {
    matches!(raw, "" | "NA" | "na" | "?" | "-")
}

/// Parse a decimal year (`2020.5`), an ISO date (`2020-07-02`) or a month (`2020-07`)
pub fn parse_date(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if is_missing(raw) {
        return None;
    }
    if let Ok(year) = raw.parse::<f64>() {
        return year.is_finite().then_some(year);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d"))
        .ok()
        .map(decimal_year)
}

/// Read `id<delim>date` rows. A first row whose date does not parse is taken as a header.
pub fn read_dates<R: Read>(reader: R, delimiter: u8) -> Result<HashMap<String, f64>, String> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut dates = HashMap::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| format!("Invalid dates record {}: {}", row + 1, e))?;
        if record.len() < 2 {
            return Err(format!("Dates record {} has {} columns, expected 2", row + 1, record.len()));
        }
        let (id, raw) = (&record[0], &record[1]);
        if is_missing(raw) {
            continue;
        }
        match parse_date(raw) {
            Some(date) => {
                dates.insert(id.to_string(), date);
            }
            None if row == 0 => continue,
            None => return Err(format!("Invalid date '{}' for '{}' in record {}", raw, id, row + 1)),
        }
    }
    Ok(dates)
}

/// Load a dates file; `.csv` is comma separated, anything else tab separated
pub fn load_dates(path: &Path) -> Result<HashMap<String, f64>, String> {
    let file = File::open(path)
        .map_err(|e| format!("Failed to open dates file {}: {}", path.display(), e))?;
    let delimiter = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => b',',
        _ => b'\t',
    };
    let dates = read_dates(BufReader::new(file), delimiter)
        .map_err(|e| format!("{} ({})", e, path.display()))?;
    println!("📅 Loaded {} sampling dates from {}", dates.len(), path.display());
    Ok(dates)
}

impl SequenceSet {
    /// Overwrite sampling dates from a lookup table, returning how many sequences matched
    pub fn apply_dates(&mut self, dates: &HashMap<String, f64>) -> usize {
        let mut matched = 0;
        for seq in &mut self.sequences {
            if let Some(&date) = dates.get(&seq.id) {
                seq.date = date;
                matched += 1;
            }
        }
        matched
    }
}
