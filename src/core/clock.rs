// clock.rs - Root-to-tip molecular clock regression and time calibration

use serde::{Deserialize, Serialize};
use crate::core::tree::{PhylogeneticTree, TreeNode};

/// Relative spread below which root-to-tip distances count as identical
const FLAT_TOLERANCE: f64 = 1e-12;

/// Per-leaf fit of root-to-tip distance against sampling date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockResidual {
    pub id: String,
    pub date: f64,
    pub observed: f64,
    pub expected: f64,
    pub residual: f64,
}

/// Outcome of a root-to-tip regression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockRegressionResult {
    /// Substitutions per site per year; 0 when no usable clock exists
    pub rate: f64,
    /// Date at which the fitted line crosses zero divergence
    pub root_age: f64,
    pub r2: f64,
    pub residuals: Vec<ClockResidual>,
}

impl ClockRegressionResult {
    /// A regression that found no clock signal
    fn rejected(root_age: f64, residuals: Vec<ClockResidual>) -> Self {
        Self { rate: 0.0, root_age, r2: 0.0, residuals }
    }

    pub fn has_signal(&self) -> bool {
        self.rate > 0.0
    }
}

/// Regress root-to-tip distance (y) on sampling date (x) over dated leaves.
///
/// A non-positive slope is rejected: rate and r2 are reported as 0 and the
/// residuals are taken against the mean distance.
pub fn clock_regression(tree: &PhylogeneticTree) -> ClockRegressionResult {
    let points: Vec<(&TreeNode, f64, f64)> = tree
        .root_to_tip_distances()
        .into_iter()
        .filter_map(|(leaf, distance)| {
            let date = leaf.sequence.as_ref()?.date;
            date.is_finite().then_some((leaf, date, distance))
        })
        .collect();

    let earliest = points.iter().map(|&(_, x, _)| x).fold(f64::NAN, f64::min);
    if points.len() < 2 {
        return ClockRegressionResult::rejected(earliest, Vec::new());
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|&(_, x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|&(_, _, y)| y).sum::<f64>() / n;

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for &(_, x, y) in &points {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    // Equal root-to-tip distances (ultrametric trees) carry no slope, even if
    // rounding in the sums would suggest a tiny one
    let (min_y, max_y) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, _, y)| (lo.min(y), hi.max(y)));
    let flat = max_y - min_y <= FLAT_TOLERANCE * max_y.abs();

    let slope = if sxx > 0.0 && !flat { sxy / sxx } else { 0.0 };

    if slope <= 0.0 {
        let residuals = points
            .iter()
            .map(|&(leaf, x, y)| residual(leaf, x, y, mean_y))
            .collect();
        return ClockRegressionResult::rejected(earliest, residuals);
    }

    let intercept = mean_y - slope * mean_x;
    let residuals: Vec<ClockResidual> = points
        .iter()
        .map(|&(leaf, x, y)| residual(leaf, x, y, slope * x + intercept))
        .collect();

    let ss_res: f64 = residuals.iter().map(|r| r.residual * r.residual).sum();
    let r2 = if syy > 0.0 { (1.0 - ss_res / syy).clamp(0.0, 1.0) } else { 0.0 };

    ClockRegressionResult {
        rate: slope,
        root_age: -intercept / slope,
        r2,
        residuals,
    }
}

fn residual(leaf: &TreeNode, date: f64, observed: f64, expected: f64) -> ClockResidual {
    ClockResidual {
        id: leaf.id.clone(),
        date,
        observed,
        expected,
        residual: observed - expected,
    }
}

/// Rescale branch lengths from substitutions/site to years.
///
/// Returns an uncalibrated copy when the regression found no positive rate;
/// the input tree is never modified.
pub fn calibrate_tree(tree: &PhylogeneticTree, regression: &ClockRegressionResult) -> PhylogeneticTree {
    if regression.rate <= 0.0 {
        let mut copy = tree.clone();
        copy.is_clock_calibrated = false;
        return copy;
    }

    let root = rescale(&tree.root, regression.rate, 0.0);
    let height = root.leaves().iter().map(|l| l.height).fold(0.0, f64::max);

    PhylogeneticTree {
        root,
        leaf_count: tree.leaf_count,
        height,
        is_clock_calibrated: true,
        substitution_rate: Some(regression.rate),
        clock_r2: Some(regression.r2),
        clamped_branches: tree.clamped_branches,
    }
}

fn rescale(node: &TreeNode, rate: f64, parent_height: f64) -> TreeNode {
    let distance = node.distance / rate;
    let height = parent_height + distance;
    TreeNode {
        id: node.id.clone(),
        distance,
        height,
        children: node.children.iter().map(|c| rescale(c, rate, height)).collect(),
        sequence: node.sequence.clone(),
        dnds: node.dnds,
    }
}
