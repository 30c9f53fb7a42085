// lib.rs - phylodyn library root

//! # phylodyn - Phylodynamic analysis of dated sequence alignments
//!
//! This library turns a set of aligned, dated nucleotide sequences into a
//! rooted phylogeny and the quantities derived from it: a molecular clock,
//! a coalescent skyline of effective population size, and codon-level
//! selection pressure.
//!
//! ## Features
//!
//! - **Distances**: Jukes-Cantor (JC69) or raw p-distance, computed in parallel
//! - **Trees**: UPGMA (ultrametric) or neighbor joining rooted on the earliest sample
//! - **Clock**: root-to-tip regression, residuals and time-calibrated trees
//! - **Skyline**: per-interval Ne estimates from a calibrated tree
//! - **Selection**: per-leaf and tree-wide dN/dS
//! - **Outputs**: TSV, CSV, PHYLIP, NEXUS matrices, Newick trees, CSV tables and a JSON summary
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use phylodyn::prelude::*;
//!
//! let sequences = vec![
//!     DatedSequence::new("s2020", "ATGAAAAAA", 2020.0),
//!     DatedSequence::new("s2021", "ATGAAAAAC", 2021.0),
//!     DatedSequence::new("s2022", "ATGAAAACC", 2022.0),
//! ];
//!
//! let options = PipelineOptions {
//!     tree_method: TreeMethod::NeighborJoining,
//!     ..PipelineOptions::default()
//! };
//! let result = analyze_phylodynamics(&sequences, &options)?;
//! println!("{}", result.tree.to_newick());
//! if let Some(clock) = &result.clock_regression {
//!     println!("rate = {}", clock.rate);
//! }
//! # Ok::<(), PhyloError>(())
//! ```

// Re-export all main modules
pub mod cli;
pub mod core;
pub mod data;
pub mod output;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{validate_args, Args, ValidationResult};
    pub use crate::core::{analyze_phylodynamics, analyze_with_matrix, PhylodynamicsResult, PipelineOptions};
    pub use crate::core::{calibrate_tree, clock_regression, compute_dnds, compute_selection, compute_skyline};
    pub use crate::core::{build_tree, build_tree_with_method, TieBreak, TreeMethod};
    pub use crate::core::{compute_distance_matrix, compute_distance_matrix_with_progress, distance};
    pub use crate::core::{DistanceMatrix, DistanceModel, PhyloError, PhyloResult, PhylogeneticTree, TreeNode};
    pub use crate::data::loaders::load_dates;
    pub use crate::data::{DatedSequence, SequenceSet};
    pub use crate::output::{write_matrix, write_results};
}

// Re-export main types at the root level for convenience
pub use cli::{Args, ValidationResult};
pub use core::{analyze_phylodynamics, PhyloError, PhylodynamicsResult, PipelineOptions};
pub use data::{DatedSequence, SequenceSet};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!(
        "phylodyn v{} - Phylodynamic analysis of dated sequence alignments",
        VERSION
    )
}
