//! Row clustering parameters.

use serde::{Deserialize, Serialize};

/// Reference point a candidate word is compared against when deciding
/// whether it joins the current row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClusterAnchor {
    /// Compare against the running mean of member `y0` values. The mean is
    /// recomputed after each merge, so the reference drifts with slightly
    /// skewed text. Matches the behavior of production CRF extractions.
    #[default]
    DriftingMean,
    /// Compare against the first member's `y0`. A stable interval
    /// reference; grouping is independent of merge order.
    FirstWord,
}

/// Parameters for grouping words into rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowParams {
    /// A word joins the current row when its `y0` is within this distance
    /// of the row's reference point, in page units.
    pub y_tolerance: f64,

    /// Which reference point the tolerance is measured against.
    pub anchor: ClusterAnchor,
}

impl Default for RowParams {
    fn default() -> Self {
        Self {
            y_tolerance: 2.0,
            anchor: ClusterAnchor::DriftingMean,
        }
    }
}
