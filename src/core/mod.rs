// mod.rs - Core logic module

pub mod clock;
pub mod distance;
pub mod error;
pub mod pipeline;
pub mod selection;
pub mod skyline;
pub mod tree;

// Re-export main types for convenience
pub use clock::{calibrate_tree, clock_regression, ClockRegressionResult, ClockResidual};
pub use distance::{
    compute_distance_matrix, compute_distance_matrix_with_progress, compute_genetic_distance_matrix,
    distance, jukes_cantor, sequence_distance, DistanceMatrix, DistanceModel, MAX_DISTANCE,
};
pub use error::{PhyloError, PhyloResult};
pub use pipeline::{analyze_phylodynamics, analyze_with_matrix, PhylodynamicsResult, PipelineOptions};
pub use selection::{annotate_selection, compute_dnds, compute_selection, BranchDnDs, DnDsEstimate, SelectionResult};
pub use skyline::{compute_skyline, CoalescentInterval, SkylineParams, SkylinePlot};
pub use tree::{
    build_nj_tree, build_tree, build_tree_with_method, build_upgma_tree, PhylogeneticTree, TieBreak,
    TreeMethod, TreeNode,
};
