// skyline.rs - Coalescent-interval (skyline) effective population size

use serde::{Deserialize, Serialize};
use crate::core::tree::PhylogeneticTree;

/// Event times closer than this are treated as the same event
const EVENT_TOLERANCE: f64 = 1e-9;

/// Tunable constants of the skyline heuristic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkylineParams {
    /// Multiplier applied to Ne for intervals that do not end in a coalescence
    pub non_coalescent_scale: f64,
}

impl Default for SkylineParams {
    fn default() -> Self {
        Self { non_coalescent_scale: 10.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoalescentInterval {
    pub start_time: f64,
    pub end_time: f64,
    pub lineages: usize,
    pub ne: f64,
    pub width: f64,
    pub is_coalescent: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SkylinePlot {
    pub intervals: Vec<CoalescentInterval>,
    /// Interval start times
    pub times: Vec<f64>,
    pub ne_values: Vec<f64>,
    pub time_span: f64,
}

impl SkylinePlot {
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

fn same_time(a: f64, b: f64) -> bool {
    (a - b).abs() <= EVENT_TOLERANCE
}

/// Sorted, de-duplicated event times
fn event_times(internal: &[f64], leaves: &[f64]) -> Vec<f64> {
    let mut times: Vec<f64> = internal.iter().chain(leaves.iter()).copied().filter(|t| t.is_finite()).collect();
    times.sort_by(f64::total_cmp);
    times.dedup_by(|later, earlier| same_time(*later, *earlier));
    times
}

/// Estimate Ne per interval between consecutive node heights.
///
/// Meant for clock-calibrated trees; on an uncalibrated tree the intervals are
/// in substitution units.
pub fn compute_skyline(tree: &PhylogeneticTree, params: &SkylineParams) -> SkylinePlot {
    let internal = tree.internal_heights();
    let times = event_times(&internal, &tree.leaf_heights());
    if times.len() < 2 {
        return SkylinePlot::default();
    }

    let mut lineages = tree.leaf_count.max(1);
    let mut intervals = Vec::with_capacity(times.len() - 1);

    for window in times.windows(2) {
        let (start, end) = (window[0], window[1]);
        let width = end - start;
        if width <= 0.0 {
            continue;
        }

        let is_coalescent = internal.iter().any(|&h| same_time(h, end));
        let pairs = (lineages * (lineages - 1)) as f64 / 2.0;
        let mut ne = pairs * width;
        if !is_coalescent {
            ne *= params.non_coalescent_scale;
        }

        intervals.push(CoalescentInterval {
            start_time: start,
            end_time: end,
            lineages,
            ne: ne.max(1.0),
            width,
            is_coalescent,
        });

        if is_coalescent {
            lineages = (lineages - 1).max(1);
        }
    }

    let time_span = times[times.len() - 1] - times[0];
    SkylinePlot {
        times: intervals.iter().map(|i| i.start_time).collect(),
        ne_values: intervals.iter().map(|i| i.ne).collect(),
        intervals,
        time_span,
    }
}
