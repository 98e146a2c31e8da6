//! Validity filtering: which raw points may enter the fit.
//!
//! OD series are unreliable at both ends — near the measurement floor the
//! signal is dominated by noise, and in saturation the trajectory is no
//! longer exponential. A [`FilterPolicy`] decides elementwise (stateless,
//! hence idempotent) which points are eligible, while preserving original
//! indices so the peak can be reported against the unfiltered series.

use crate::domain::FilterPolicy;

/// Points that survived filtering.
///
/// All three vectors have equal length; `indices[i]` is the position of
/// point `i` in the original series.
#[derive(Debug, Clone, Default)]
pub struct EligibleSeries {
    pub time: Vec<f64>,
    /// Background-subtracted measurement.
    pub od: Vec<f64>,
    pub indices: Vec<usize>,
}

impl EligibleSeries {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Apply a filter policy to one well.
///
/// Returns the eligible subsequence and the excluded original indices.
/// `time` and `values` must already be equal-length (the estimator checks).
pub fn apply_policy(
    policy: FilterPolicy,
    background: f64,
    time: &[f64],
    values: &[f64],
) -> (EligibleSeries, Vec<usize>) {
    let mut eligible = EligibleSeries::default();
    let mut excluded = Vec::new();

    for (i, (&t, &v)) in time.iter().zip(values.iter()).enumerate() {
        if keeps(policy, background, v) {
            eligible.time.push(t);
            eligible.od.push(v - background);
            eligible.indices.push(i);
        } else {
            excluded.push(i);
        }
    }

    (eligible, excluded)
}

fn keeps(policy: FilterPolicy, background: f64, value: f64) -> bool {
    match policy {
        // ln(value - background) is finite exactly when the subtraction is
        // finite and positive. NaN readings fail both tests.
        FilterPolicy::FiniteLog => {
            let od = value - background;
            od.is_finite() && od > 0.0
        }
        FilterPolicy::AbsoluteCutoff(cutoff) => value > cutoff,
        FilterPolicy::LogCutoff(cutoff) => value > 0.0 && value.ln() > cutoff,
    }
}
