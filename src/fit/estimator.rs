//! Single-well estimation pipeline.
//!
//! raw series -> validity filter -> smoothing spline -> derivative at the
//! eligible points -> peak selection -> growth estimate + renderable data.
//!
//! Everything here is a pure computation over one well; no I/O, no shared
//! mutable state, so the batch layer is free to run wells in parallel.

use crate::domain::{EstimatorConfig, GrowthEstimate, RateMode, WellFit};
use crate::error::EstimateError;
use crate::fit::filter::{EligibleSeries, apply_policy};
use crate::fit::peak::{alpha_monotone_decreasing, prediction_line, rate_series, select_peak};
use crate::fit::spline::fit_smoothing_spline;
use crate::math::BSpline;

/// Sample count for the prediction line and the fitted-curve grid.
const PREDICTION_SAMPLES: usize = 50;
const CURVE_SAMPLES: usize = 101;

/// Estimate one well.
///
/// Per-well failures come back as [`EstimateError`]; the caller decides how
/// to record them (the batch pipeline turns them into null rows).
pub fn estimate_well(
    time: &[f64],
    values: &[f64],
    config: &EstimatorConfig,
) -> Result<WellFit, EstimateError> {
    if time.len() != values.len() {
        return Err(EstimateError::MalformedSeries(format!(
            "time axis has {} points, series has {}",
            time.len(),
            values.len()
        )));
    }
    if time.windows(2).any(|w| w[1] < w[0]) {
        return Err(EstimateError::MalformedSeries(
            "time axis is not monotonically non-decreasing".to_string(),
        ));
    }

    let (eligible, _excluded) = apply_policy(config.policy, config.background, time, values);
    let (fit_t, fit_y, fit_od, fit_idx) = build_ordinates(&eligible, config.mode);

    let spline = fit_smoothing_spline(&fit_t, &fit_y, config.smoothing)?;

    if config.mode == RateMode::Specific && alpha_monotone_decreasing(&spline, &fit_t) {
        return Err(EstimateError::NoExponentialPhase);
    }

    let rates = rate_series(&spline, &fit_t, config.mode);
    let peak = select_peak(&rates, &fit_t)?;

    let max_index = fit_idx[peak.index];
    let estimate = GrowthEstimate {
        rate: peak.rate,
        max_time: peak.time,
        max_index,
        doubling_time: std::f64::consts::LN_2 / peak.rate,
    };

    // Anchor the prediction line at the observed log-OD of the peak point;
    // fall back to the fitted value when the raw reading is non-positive
    // (possible under the cutoff policies in specific mode).
    let od_at_peak = fit_od[peak.index];
    let anchor = if od_at_peak > 0.0 {
        od_at_peak.ln()
    } else {
        log_scale_value(&spline, config.mode, peak.time)
    };

    let prediction = prediction_line(
        peak.rate,
        peak.time,
        anchor,
        config.window,
        PREDICTION_SAMPLES,
    );

    let log_points: Vec<(f64, f64)> = eligible
        .time
        .iter()
        .zip(eligible.od.iter())
        .filter(|&(_, &od)| od > 0.0)
        .map(|(&t, &od)| (t, od.ln()))
        .collect();

    let fitted = sample_log_curve(&spline, config.mode, CURVE_SAMPLES);

    Ok(WellFit {
        estimate,
        log_points,
        fitted,
        prediction,
    })
}

/// Build the fit ordinates for the chosen mode.
///
/// Log-slope mode fits `ln(od)`; the cutoff policies can admit points whose
/// log is non-finite (cutoff below the background constant), and those are
/// dropped here alongside the policy's own exclusions. Specific mode fits
/// the background-subtracted curve directly.
fn build_ordinates(
    eligible: &EligibleSeries,
    mode: RateMode,
) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<usize>) {
    let mut time = Vec::with_capacity(eligible.len());
    let mut y = Vec::with_capacity(eligible.len());
    let mut od = Vec::with_capacity(eligible.len());
    let mut idx = Vec::with_capacity(eligible.len());

    for i in 0..eligible.len() {
        let v = eligible.od[i];
        let ordinate = match mode {
            RateMode::LogSlope => {
                if !(v > 0.0) {
                    continue;
                }
                v.ln()
            }
            RateMode::Specific => {
                if !v.is_finite() {
                    continue;
                }
                v
            }
        };
        time.push(eligible.time[i]);
        y.push(ordinate);
        od.push(v);
        idx.push(eligible.indices[i]);
    }

    (time, y, od, idx)
}

/// The fitted curve on a fine grid over its domain, mapped to the log scale
/// for overlay on the raw log points.
fn sample_log_curve(spline: &BSpline, mode: RateMode, samples: usize) -> Vec<(f64, f64)> {
    let (t0, t1) = spline.domain();
    let samples = samples.max(2);

    let mut out = Vec::with_capacity(samples);
    for i in 0..samples {
        let u = i as f64 / (samples as f64 - 1.0);
        let t = t0 + u * (t1 - t0);
        let v = log_scale_value(spline, mode, t);
        if v.is_finite() {
            out.push((t, v));
        }
    }
    out
}

fn log_scale_value(spline: &BSpline, mode: RateMode, t: f64) -> f64 {
    match mode {
        RateMode::LogSlope => spline.value(t),
        RateMode::Specific => {
            let g = spline.value(t);
            if g > 0.0 { g.ln() } else { f64::NAN }
        }
    }
}
