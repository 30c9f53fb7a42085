// fasta.rs - FASTA alignment loader with dates taken from record headers

use crate::data::loaders::dates::parse_date;
use crate::data::{DatedSequence, SequenceSet};
use bio::io::fasta;
use regex::Regex;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Trailing `|2020`, `|2020.37` or `|2020-05-14` on the record id
pub const DEFAULT_DATE_PATTERN: &str = r"\|(\d{4}(?:\.\d+)?|\d{4}-\d{2}-\d{2})$";

/// Split a header into (sequence id, date) using the first capture group of `pattern`.
/// The matched suffix is removed from the id unless that would leave it empty.
fn split_header(header: &str, pattern: &Regex) -> (String, f64) {
    let Some(caps) = pattern.captures(header) else {
        return (header.to_string(), f64::NAN);
    };
    let date = caps
        .get(1)
        .or_else(|| caps.get(0))
        .and_then(|m| parse_date(m.as_str()))
        .unwrap_or(f64::NAN);
    let start = caps.get(0).map_or(header.len(), |m| m.start());
    let id = if start > 0 { &header[..start] } else { header };
    (id.to_string(), date)
}

impl SequenceSet {
    /// Load an aligned FASTA file
    pub fn from_fasta(path: &Path, date_pattern: Option<&Regex>) -> Result<Self, String> {
        println!("🧬 Loading sequences from: {}", path.display());
        let file = File::open(path)
            .map_err(|e| format!("Failed to open FASTA file {}: {}", path.display(), e))?;
        let set = Self::from_fasta_reader(BufReader::new(file), date_pattern)
            .map_err(|e| format!("{} in {}", e, path.display()))?;
        println!("✅ Loaded {} sequences ({} dated)", set.len(), set.dated_count());
        Ok(set)
    }

    /// Parse FASTA records from any reader. Bases are upper-cased; ids must be unique.
    pub fn from_fasta_reader<R: Read>(reader: R, date_pattern: Option<&Regex>) -> Result<Self, String> {
        let reader = fasta::Reader::new(reader);
        let mut set = SequenceSet::new();
        let mut seen = HashSet::new();

        for record_result in reader.records() {
            let record = record_result.map_err(|e| format!("Invalid FASTA record: {}", e))?;
            record
                .check()
                .map_err(|e| format!("Invalid FASTA record '{}': {}", record.id(), e))?;

            let (id, date) = match date_pattern {
                Some(pattern) => split_header(record.id(), pattern),
                None => (record.id().to_string(), f64::NAN),
            };
            if !seen.insert(id.clone()) {
                return Err(format!("Duplicate sequence id '{}'", id));
            }

            let bases = String::from_utf8(record.seq().to_ascii_uppercase())
                .map_err(|e| format!("Sequence '{}' is not valid text: {}", id, e))?;
            let mut seq = DatedSequence::new(id, bases, date);
            if let Some(desc) = record.desc() {
                seq = seq.with_metadata("description", desc);
            }
            set.push(seq);
        }

        if set.is_empty() {
            return Err("No sequences found".to_string());
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern() -> Regex {
        Regex::new(DEFAULT_DATE_PATTERN).unwrap()
    }

    #[test]
    fn test_header_dates() {
        let p = pattern();
        assert_eq!(split_header("A/Texas/1|2019", &p), ("A/Texas/1".to_string(), 2019.0));
        assert_eq!(split_header("s1|2020.25", &p), ("s1".to_string(), 2020.25));
        let (id, date) = split_header("s2|2020-07-02", &p);
        assert_eq!(id, "s2");
        assert!((date - 2020.5).abs() < 1e-12);

        let (id, date) = split_header("nodate", &p);
        assert_eq!(id, "nodate");
        assert!(date.is_nan());
    }

    #[test]
    fn test_load_fasta_records() {
        let data = b">a|2020.5 first isolate\nacgt\nACGT\n>b|2021-01-01\nACGTACGA\n>c\nACGTACGG\n";
        let set = SequenceSet::from_fasta_reader(&data[..], Some(&pattern())).unwrap();

        assert_eq!(set.len(), 3);
        assert_eq!(set.dated_count(), 2);
        assert_eq!(set.validate_alignment(), Ok(8));

        let a = &set.sequences[0];
        assert_eq!(a.id, "a");
        assert_eq!(a.sequence, "ACGTACGT");
        assert_eq!(a.date, 2020.5);
        assert_eq!(a.metadata.get("description").map(String::as_str), Some("first isolate"));
        assert_eq!(set.sequences[1].date, 2021.0);
        assert!(!set.sequences[2].has_date());
    }

    #[test]
    fn test_without_pattern_keeps_full_id() {
        let data = b">a|2020\nACGT\n";
        let set = SequenceSet::from_fasta_reader(&data[..], None).unwrap();
        assert_eq!(set.sequences[0].id, "a|2020");
        assert!(!set.sequences[0].has_date());
    }

    #[test]
    fn test_rejects_duplicates_and_empty_input() {
        let data = b">a|2020\nACGT\n>a|2021\nACGT\n";
        let err = SequenceSet::from_fasta_reader(&data[..], Some(&pattern())).unwrap_err();
        assert!(err.contains("Duplicate"));
        assert!(SequenceSet::from_fasta_reader(&b""[..], None).is_err());
    }
}
