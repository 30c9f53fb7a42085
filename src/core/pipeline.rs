// pipeline.rs - Orchestrates distance -> tree -> clock -> skyline / selection

use serde::{Deserialize, Serialize};
use crate::core::clock::{calibrate_tree, clock_regression, ClockRegressionResult};
use crate::core::distance::{compute_distance_matrix, DistanceMatrix, DistanceModel};
use crate::core::error::{PhyloError, PhyloResult};
use crate::core::selection::{annotate_selection, compute_selection, SelectionResult};
use crate::core::skyline::{compute_skyline, SkylineParams, SkylinePlot};
use crate::core::tree::{build_tree_with_method, PhylogeneticTree, TieBreak, TreeMethod};
use crate::data::DatedSequence;

/// Which stages to run and the constants they use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOptions {
    pub run_clock: bool,
    pub run_skyline: bool,
    pub run_selection: bool,
    /// A clock is usable only when its r2 is strictly above this
    pub min_clock_r2: f64,
    pub distance_model: DistanceModel,
    pub tree_method: TreeMethod,
    pub tie_break: TieBreak,
    pub skyline: SkylineParams,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            run_clock: true,
            run_skyline: true,
            run_selection: true,
            min_clock_r2: 0.5,
            distance_model: DistanceModel::default(),
            tree_method: TreeMethod::default(),
            tie_break: TieBreak::default(),
            skyline: SkylineParams::default(),
        }
    }
}

impl PipelineOptions {
    /// Whether a regression is good enough to calibrate the tree
    pub fn accepts_clock(&self, regression: &ClockRegressionResult) -> bool {
        regression.rate > 0.0 && regression.r2 > self.min_clock_r2
    }
}

/// Everything one analysis produced. `None` means the stage was not computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhylodynamicsResult {
    pub tree: PhylogeneticTree,
    pub calibrated_tree: Option<PhylogeneticTree>,
    pub clock_regression: Option<ClockRegressionResult>,
    pub skyline: Option<SkylinePlot>,
    pub selection: Option<SelectionResult>,
}

/// Run the full analysis with a freshly computed distance matrix
pub fn analyze_phylodynamics(
    sequences: &[DatedSequence],
    options: &PipelineOptions,
) -> PhyloResult<PhylodynamicsResult> {
    if sequences.is_empty() {
        return Err(PhyloError::EmptyInput);
    }
    let matrix = compute_distance_matrix(sequences, options.distance_model)?;
    analyze_with_matrix(sequences, &matrix, options)
}

/// Run the analysis on a distance matrix the caller already holds
pub fn analyze_with_matrix(
    sequences: &[DatedSequence],
    matrix: &DistanceMatrix,
    options: &PipelineOptions,
) -> PhyloResult<PhylodynamicsResult> {
    let tree = build_tree_with_method(sequences, matrix, options.tree_method, options.tie_break)?;

    let clock = options.run_clock.then(|| clock_regression(&tree));

    let calibrated_tree = clock
        .as_ref()
        .filter(|regression| options.accepts_clock(regression))
        .map(|regression| calibrate_tree(&tree, regression));

    let skyline = if options.run_skyline {
        calibrated_tree
            .as_ref()
            .map(|calibrated| compute_skyline(calibrated, &options.skyline))
    } else {
        None
    };

    let selection = if options.run_selection {
        Some(compute_selection(&tree)?)
    } else {
        None
    };

    let tree = match &selection {
        Some(result) => annotate_selection(&tree, result),
        None => tree,
    };

    Ok(PhylodynamicsResult {
        tree,
        calibrated_tree,
        clock_regression: clock,
        skyline,
        selection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monotone() -> Vec<DatedSequence> {
        vec![
            DatedSequence::new("s2020", "AAAAAAAAAA", 2020.0),
            DatedSequence::new("s2021", "AAAAAAAAAC", 2021.0),
            DatedSequence::new("s2022", "AAAAAAAACC", 2022.0),
            DatedSequence::new("s2023", "AAAAAAAACT", 2023.0),
        ]
    }

    #[test]
    fn test_identical_sequences_scenario() {
        let input: Vec<_> = (0..4)
            .map(|i| DatedSequence::new(format!("s{}", i), "ACGTACGTAC", 2020.0))
            .collect();
        let result = analyze_phylodynamics(&input, &PipelineOptions::default()).unwrap();
        assert_eq!(result.tree.leaf_count, 4);
        let clock = result.clock_regression.unwrap();
        assert_eq!(clock.rate, 0.0);
        assert!(result.calibrated_tree.is_none());
        assert!(result.skyline.is_none());
        // 10 bases leave 3 identical codons per leaf
        let selection = result.selection.unwrap();
        assert!(selection.branch_dnds.iter().all(|b| b.dnds == 1.0));
    }

    #[test]
    fn test_upgma_monotone_scenario_has_no_skyline() {
        let result = analyze_phylodynamics(&monotone(), &PipelineOptions::default()).unwrap();
        let clock = result.clock_regression.unwrap();
        // Ultrametric tree: every tip is equally far from the root, so no slope
        assert_eq!(clock.rate, 0.0);
        assert_eq!(clock.r2, 0.0);
        let first = clock.residuals[0].observed;
        assert!(clock.residuals.iter().all(|r| (r.observed - first).abs() < 1e-12));
        assert!(result.calibrated_tree.is_none());
        assert!(result.skyline.is_none());
    }

    #[test]
    fn test_nj_monotone_scenario_runs_skyline() {
        let options = PipelineOptions { tree_method: TreeMethod::NeighborJoining, ..Default::default() };
        let result = analyze_phylodynamics(&monotone(), &options).unwrap();

        let clock = result.clock_regression.as_ref().unwrap();
        assert!(clock.rate > 0.0);
        assert!(clock.r2 > 0.5);

        let calibrated = result.calibrated_tree.as_ref().unwrap();
        assert!(calibrated.is_clock_calibrated);
        assert!(!result.tree.is_clock_calibrated);

        let skyline = result.skyline.as_ref().unwrap();
        assert!(!skyline.is_empty());
        assert!(skyline.ne_values.iter().all(|&ne| ne >= 1.0));
        for pair in skyline.intervals.windows(2) {
            assert!(pair[1].lineages <= pair[0].lineages);
        }
    }

    #[test]
    fn test_skyline_requires_clock() {
        let options = PipelineOptions {
            tree_method: TreeMethod::NeighborJoining,
            run_clock: false,
            ..Default::default()
        };
        let result = analyze_phylodynamics(&monotone(), &options).unwrap();
        assert!(result.clock_regression.is_none());
        assert!(result.calibrated_tree.is_none());
        assert!(result.skyline.is_none());
        assert!(result.selection.is_some());
    }

    #[test]
    fn test_strict_r2_threshold() {
        let options = PipelineOptions {
            tree_method: TreeMethod::NeighborJoining,
            min_clock_r2: 1.0,
            ..Default::default()
        };
        let result = analyze_phylodynamics(&monotone(), &options).unwrap();
        assert!(result.clock_regression.unwrap().rate > 0.0);
        assert!(result.skyline.is_none());
    }

    #[test]
    fn test_stages_can_be_disabled() {
        let options = PipelineOptions {
            run_clock: false,
            run_skyline: false,
            run_selection: false,
            ..Default::default()
        };
        let result = analyze_phylodynamics(&monotone(), &options).unwrap();
        assert_eq!(result.tree.leaf_count, 4);
        assert!(result.clock_regression.is_none());
        assert!(result.skyline.is_none());
        assert!(result.selection.is_none());
    }

    #[test]
    fn test_empty_input_and_single_sequence() {
        assert_eq!(
            analyze_phylodynamics(&[], &PipelineOptions::default()).unwrap_err(),
            PhyloError::EmptyInput
        );

        let single = vec![DatedSequence::new("only", "ATG", 2020.0)];
        let result = analyze_phylodynamics(&single, &PipelineOptions::default()).unwrap();
        assert_eq!(result.tree.leaf_count, 1);
        assert!(result.tree.root.is_leaf());
        assert_eq!(result.clock_regression.unwrap().rate, 0.0);
        assert!(result.skyline.is_none());
        assert_eq!(result.selection.unwrap().tree_dnds, None);
    }

    #[test]
    fn test_unaligned_input_is_error() {
        let input = vec![
            DatedSequence::new("a", "ACGT", 2020.0),
            DatedSequence::new("b", "ACG", 2021.0),
        ];
        assert!(matches!(
            analyze_phylodynamics(&input, &PipelineOptions::default()),
            Err(PhyloError::LengthMismatch { .. })
        ));
    }
}
