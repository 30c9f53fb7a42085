// error.rs - Contract violations raised by the inference core

use std::fmt;

/// Misuse of the core API. Data-quality problems (no clock signal, no
/// comparable codons) are never reported through this type.
#[derive(Debug, Clone, PartialEq)]
pub enum PhyloError {
    /// Two sequences that must be aligned have different lengths
    LengthMismatch {
        left: String,
        right: String,
        left_len: usize,
        right_len: usize,
    },
    /// Tree construction was asked to work on zero sequences
    EmptyInput,
    /// A precomputed distance matrix does not match the sequence set
    MatrixSize { expected: usize, found: usize },
}

impl PhyloError {
    pub fn length_mismatch(left: &str, right: &str, left_len: usize, right_len: usize) -> Self {
        PhyloError::LengthMismatch {
            left: left.to_string(),
            right: right.to_string(),
            left_len,
            right_len,
        }
    }
}

impl fmt::Display for PhyloError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhyloError::LengthMismatch { left, right, left_len, right_len } => write!(
                f,
                "Sequence length mismatch: '{}' has {} bases, '{}' has {} (inputs must be aligned)",
                left, left_len, right, right_len
            ),
            PhyloError::EmptyInput => write!(f, "Cannot build a tree from an empty sequence set"),
            PhyloError::MatrixSize { expected, found } => write!(
                f,
                "Distance matrix has {} rows but {} sequences were supplied",
                found, expected
            ),
        }
    }
}

impl std::error::Error for PhyloError {}

impl From<PhyloError> for String {
    fn from(err: PhyloError) -> Self {
        err.to_string()
    }
}

pub type PhyloResult<T> = Result<T, PhyloError>;
