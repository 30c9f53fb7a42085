// distance.rs - Pairwise nucleotide distance engine

use std::str::FromStr;
use std::time::Instant;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use crate::core::error::{PhyloError, PhyloResult};
use crate::data::DatedSequence;

/// Distance reported once the mismatch proportion saturates the model (p >= 0.75)
pub const MAX_DISTANCE: f64 = 10.0;

/// Substitution model applied to the raw mismatch proportion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistanceModel {
    /// Jukes-Cantor (1969) single-parameter correction
    #[default]
    Jc69,
    /// Uncorrected proportion of differing sites
    PDistance,
}

impl FromStr for DistanceModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jc69" | "jc" | "jukes-cantor" => Ok(DistanceModel::Jc69),
            "p" | "p-distance" | "raw" => Ok(DistanceModel::PDistance),
            _ => Err(format!("Invalid distance model: {}. Use: jc69, p-distance", s)),
        }
    }
}

impl DistanceModel {
    pub fn description(&self) -> &str {
        match self {
            DistanceModel::Jc69 => "Jukes-Cantor corrected",
            DistanceModel::PDistance => "uncorrected p-distance",
        }
    }

    /// Convert a mismatch proportion into a distance under this model
    pub fn correct(&self, p: f64) -> f64 {
        match self {
            DistanceModel::Jc69 => jukes_cantor(p),
            DistanceModel::PDistance => p,
        }
    }
}

/// Jukes-Cantor correction: d = -3/4 ln(1 - 4p/3), saturating at MAX_DISTANCE
pub fn jukes_cantor(p: f64) -> f64 {
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 0.75 {
        return MAX_DISTANCE;
    }
    let d = -0.75 * (1.0 - 4.0 * p / 3.0).ln();
    d.min(MAX_DISTANCE)
}

/// Map a nucleotide to its canonical uppercase form, None for gaps and ambiguity codes
#[inline]
pub(crate) fn canonical_base(b: u8) -> Option<u8> {
    match b.to_ascii_uppercase() {
        b'A' => Some(b'A'),
        b'C' => Some(b'C'),
        b'G' => Some(b'G'),
        b'T' | b'U' => Some(b'T'),
        _ => None,
    }
}

/// Count (differences, valid positions) over two aligned byte sequences
pub fn count_differences(seq1: &[u8], seq2: &[u8]) -> (usize, usize) {
    let mut differences = 0;
    let mut valid = 0;

    for (&a, &b) in seq1.iter().zip(seq2.iter()) {
        if let (Some(a), Some(b)) = (canonical_base(a), canonical_base(b)) {
            valid += 1;
            if a != b {
                differences += 1;
            }
        }
    }

    (differences, valid)
}

/// Distance between two aligned sequences under the given model
pub fn sequence_distance(seq1: &str, seq2: &str, model: DistanceModel) -> PhyloResult<f64> {
    if seq1.len() != seq2.len() {
        return Err(PhyloError::length_mismatch("seq1", "seq2", seq1.len(), seq2.len()));
    }

    Ok(model_distance(seq1.as_bytes(), seq2.as_bytes(), model))
}

/// Corrected distance over the comparable positions; 0 when nothing is comparable
fn model_distance(seq1: &[u8], seq2: &[u8], model: DistanceModel) -> f64 {
    let (differences, valid) = count_differences(seq1, seq2);
    if valid == 0 {
        return 0.0;
    }
    model.correct(differences as f64 / valid as f64)
}

/// Jukes-Cantor distance between two aligned sequences
pub fn distance(seq1: &str, seq2: &str) -> PhyloResult<f64> {
    sequence_distance(seq1, seq2, DistanceModel::Jc69)
}

/// Symmetric pairwise distance matrix with a zero diagonal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrix {
    pub ids: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    pub fn zeros(ids: Vec<String>) -> Self {
        let n = ids.len();
        Self { ids, values: vec![vec![0.0; n]; n] }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    fn set_pair(&mut self, i: usize, j: usize, d: f64) {
        self.values[i][j] = d;
        self.values[j][i] = d;
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.len();
        (0..n).all(|i| self.values[i][i] == 0.0 && (0..n).all(|j| self.values[i][j] == self.values[j][i]))
    }

    /// Largest off-diagonal entry
    pub fn max_distance(&self) -> f64 {
        self.values
            .iter()
            .flat_map(|row| row.iter().copied())
            .fold(0.0, f64::max)
    }
}

fn check_pair(a: &DatedSequence, b: &DatedSequence) -> PhyloResult<()> {
    if a.sequence.len() != b.sequence.len() {
        return Err(PhyloError::length_mismatch(&a.id, &b.id, a.sequence.len(), b.sequence.len()));
    }
    Ok(())
}

fn pair_distance(a: &DatedSequence, b: &DatedSequence, model: DistanceModel) -> PhyloResult<f64> {
    check_pair(a, b)?;
    Ok(model_distance(a.sequence.as_bytes(), b.sequence.as_bytes(), model))
}

/// Fill the matrix from the upper triangle in parallel, ticking `progress` once per pair
fn fill_matrix(
    sequences: &[DatedSequence],
    model: DistanceModel,
    progress: Option<&ProgressBar>,
) -> PhyloResult<DistanceMatrix> {
    let n = sequences.len();
    let ids = sequences.iter().map(|s| s.id.clone()).collect();
    let mut matrix = DistanceMatrix::zeros(ids);

    let upper_triangle: Vec<(usize, usize, f64)> = (0..n)
        .into_par_iter()
        .flat_map(|i| {
            (i + 1..n).into_par_iter().map(move |j| {
                let result = pair_distance(&sequences[i], &sequences[j], model).map(|d| (i, j, d));
                if let Some(pb) = progress {
                    pb.inc(1);
                }
                result
            })
        })
        .collect::<PhyloResult<Vec<_>>>()?;

    for (i, j, d) in upper_triangle {
        matrix.set_pair(i, j, d);
    }

    Ok(matrix)
}

/// Calculate the full Jukes-Cantor distance matrix
pub fn compute_genetic_distance_matrix(sequences: &[DatedSequence]) -> PhyloResult<DistanceMatrix> {
    compute_distance_matrix(sequences, DistanceModel::Jc69)
}

/// Calculate the full distance matrix, one evaluation per unordered pair
pub fn compute_distance_matrix(
    sequences: &[DatedSequence],
    model: DistanceModel,
) -> PhyloResult<DistanceMatrix> {
    fill_matrix(sequences, model, None)
}

/// Same as [`compute_distance_matrix`] but reports progress on the terminal
pub fn compute_distance_matrix_with_progress(
    sequences: &[DatedSequence],
    model: DistanceModel,
) -> PhyloResult<DistanceMatrix> {
    let n = sequences.len();
    let total_comparisons = n * n.saturating_sub(1) / 2;
    println!("🔄 Computing distance matrix ({} × {} = {} comparisons, {})...",
             n, n, total_comparisons, model.description());

    let start = Instant::now();
    let pb = ProgressBar::new(total_comparisons as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) ETA: {eta}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    let matrix = fill_matrix(sequences, model, Some(&pb));
    pb.finish_and_clear();
    let matrix = matrix?;

    println!("✅ Distance matrix computed in {:.2}s", start.elapsed().as_secs_f64());
    Ok(matrix)
}
