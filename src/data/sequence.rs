// sequence.rs - Dated sequence records and aligned sequence sets

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single aligned sequence with its collection date (decimal year)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatedSequence {
    pub id: String,
    pub sequence: String,
    /// Decimal year; NaN when the sampling date is unknown
    pub date: f64,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl DatedSequence {
    pub fn new(id: impl Into<String>, sequence: impl Into<String>, date: f64) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
            date,
            metadata: BTreeMap::new(),
        }
    }

    /// Create a record with no known sampling date
    pub fn undated(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self::new(id, sequence, f64::NAN)
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn has_date(&self) -> bool {
        self.date.is_finite()
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Ordered collection of dated sequences loaded for one analysis
#[derive(Debug, Clone, Default)]
pub struct SequenceSet {
    pub sequences: Vec<DatedSequence>,
}

impl SequenceSet {
    pub fn new() -> Self {
        Self { sequences: Vec::new() }
    }

    pub fn from_sequences(sequences: Vec<DatedSequence>) -> Self {
        Self { sequences }
    }

    pub fn push(&mut self, sequence: DatedSequence) {
        self.sequences.push(sequence);
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn dated_count(&self) -> usize {
        self.sequences.iter().filter(|s| s.has_date()).count()
    }

    /// Alignment length, if every sequence has the same length
    pub fn alignment_length(&self) -> Option<usize> {
        let first = self.sequences.first()?.len();
        self.sequences
            .iter()
            .all(|s| s.len() == first)
            .then_some(first)
    }

    /// Check the pre-alignment guarantee the inference core relies on
    pub fn validate_alignment(&self) -> Result<usize, String> {
        let first = match self.sequences.first() {
            Some(seq) => seq,
            None => return Err("No sequences loaded".to_string()),
        };
        for seq in &self.sequences[1..] {
            if seq.len() != first.len() {
                return Err(format!(
                    "Sequences are not aligned: '{}' has {} bases, '{}' has {}",
                    first.id,
                    first.len(),
                    seq.id,
                    seq.len()
                ));
            }
        }
        Ok(first.len())
    }

    /// Earliest and latest finite sampling dates
    pub fn date_range(&self) -> Option<(f64, f64)> {
        self.sequences
            .iter()
            .filter(|s| s.has_date())
            .fold(None, |acc, s| match acc {
                None => Some((s.date, s.date)),
                Some((lo, hi)) => Some((lo.min(s.date), hi.max(s.date))),
            })
    }
}
