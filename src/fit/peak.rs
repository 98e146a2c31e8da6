//! Peak growth-rate selection and the diagnostic prediction line.
//!
//! The derivative is evaluated only at the eligible time points (never
//! beyond the fitted domain) and the maximum is selected deterministically:
//! ties break to the first occurrence in time order.

use crate::domain::{PredictionLine, RateMode};
use crate::error::EstimateError;
use crate::math::BSpline;

/// Tolerance when deciding whether the specific rate still increases
/// anywhere. Tiny positive slopes at this scale are numerical noise.
const ALPHA_SLOPE_EPS: f64 = 1e-12;

/// The selected peak, indexed into the eligible series.
#[derive(Debug, Clone, Copy)]
pub struct Peak {
    pub rate: f64,
    pub time: f64,
    pub index: usize,
}

/// Stable argmax over finite values: the first occurrence of the maximum
/// wins, non-finite entries never win.
pub fn argmax_stable(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if !v.is_finite() {
            continue;
        }
        match best {
            None => best = Some((i, v)),
            Some((_, bv)) if v > bv => best = Some((i, v)),
            _ => {}
        }
    }
    best.map(|(i, _)| i)
}

/// Growth rate at each eligible time point, for the chosen mode.
///
/// In specific mode, points where the fitted curve is non-positive yield a
/// NaN rate; they are skipped by [`argmax_stable`].
pub fn rate_series(curve: &BSpline, times: &[f64], mode: RateMode) -> Vec<f64> {
    let der = curve.derivative();
    match mode {
        RateMode::LogSlope => times.iter().map(|&t| der.value(t)).collect(),
        RateMode::Specific => times
            .iter()
            .map(|&t| {
                let g = curve.value(t);
                if g > 0.0 { der.value(t) / g } else { f64::NAN }
            })
            .collect(),
    }
}

/// Specific-rate mode: decide whether `alpha = g'/g` is monotonically
/// non-increasing over all eligible points, i.e. the culture was already
/// past its exponential phase when the read started (or never entered one).
///
/// Uses the analytic second derivative:
/// `d(alpha)/dt = (g'' * g - g'^2) / g^2`.
/// Points with a non-positive fitted value carry no usable alpha; if none
/// remain the well has no exponential phase either.
pub fn alpha_monotone_decreasing(curve: &BSpline, times: &[f64]) -> bool {
    let d1 = curve.derivative();
    let d2 = d1.derivative();

    for &t in times {
        let g = curve.value(t);
        if !(g > 0.0) {
            continue;
        }
        let slope = (d2.value(t) * g - d1.value(t).powi(2)) / (g * g);
        if slope > ALPHA_SLOPE_EPS {
            return false;
        }
    }
    true
}

/// Select the peak growth rate.
///
/// A derivative that never attains a positive finite value means the fit
/// shows no growth to report.
pub fn select_peak(rates: &[f64], times: &[f64]) -> Result<Peak, EstimateError> {
    debug_assert_eq!(rates.len(), times.len());
    let index = argmax_stable(rates).ok_or(EstimateError::NoExponentialPhase)?;
    let rate = rates[index];
    if rate <= 0.0 {
        return Err(EstimateError::NoExponentialPhase);
    }
    Ok(Peak {
        rate,
        time: times[index],
        index,
    })
}

/// Build the prediction line `y(t) = rate * (t - max_time) + anchor` over
/// `[max_time - window, max_time + window]`, sampled on `samples` points.
pub fn prediction_line(
    rate: f64,
    max_time: f64,
    anchor: f64,
    window: f64,
    samples: usize,
) -> PredictionLine {
    let samples = samples.max(2);
    let t0 = max_time - window;
    let t1 = max_time + window;

    let mut time = Vec::with_capacity(samples);
    let mut value = Vec::with_capacity(samples);
    for i in 0..samples {
        let u = i as f64 / (samples as f64 - 1.0);
        let t = t0 + u * (t1 - t0);
        time.push(t);
        value.push(rate * (t - max_time) + anchor);
    }

    PredictionLine { time, value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::spline::fit_smoothing_spline;

    #[test]
    fn argmax_ties_break_to_first() {
        assert_eq!(argmax_stable(&[0.1, 0.5, 0.5, 0.2]), Some(1));
        assert_eq!(argmax_stable(&[2.0, 2.0]), Some(0));
    }

    #[test]
    fn argmax_skips_non_finite() {
        assert_eq!(argmax_stable(&[f64::NAN, 1.0, f64::INFINITY, 0.5]), Some(1));
        assert_eq!(argmax_stable(&[f64::NAN, f64::NAN]), None);
        assert_eq!(argmax_stable(&[]), None);
    }

    #[test]
    fn select_peak_rejects_non_positive_maximum() {
        let rates = [-0.2, -0.05, -0.4];
        let times = [0.0, 10.0, 20.0];
        assert_eq!(
            select_peak(&rates, &times).unwrap_err(),
            EstimateError::NoExponentialPhase
        );
    }

    #[test]
    fn select_peak_picks_earliest_time_on_tie() {
        let rates = [0.1, 0.3, 0.3];
        let times = [0.0, 10.0, 20.0];
        let peak = select_peak(&rates, &times).unwrap();
        assert_eq!(peak.index, 1);
        assert_eq!(peak.time, 10.0);
    }

    #[test]
    fn prediction_line_passes_through_anchor_with_slope() {
        let line = prediction_line(0.04, 120.0, -1.5, 100.0, 50);
        assert_eq!(line.time.len(), 50);
        assert!((line.time[0] - 20.0).abs() < 1e-12);
        assert!((line.time[49] - 220.0).abs() < 1e-12);

        // Endpoint values follow the slope exactly.
        assert!((line.value[0] - (-1.5 + 0.04 * (20.0 - 120.0))).abs() < 1e-12);
        assert!((line.value[49] - (-1.5 + 0.04 * 100.0)).abs() < 1e-12);
    }

    #[test]
    fn decreasing_alpha_is_detected() {
        // od(t) = t + 10 grows linearly, so alpha = 1/(t+10) strictly
        // decreases everywhere.
        let time: Vec<f64> = (0..11).map(|i| i as f64 * 10.0).collect();
        let od: Vec<f64> = time.iter().map(|t| t + 10.0).collect();

        let curve = fit_smoothing_spline(&time, &od, 0.0).unwrap();
        assert!(alpha_monotone_decreasing(&curve, &time));
    }

    #[test]
    fn growing_culture_keeps_an_increasing_alpha_somewhere() {
        // Early-exponential curve: alpha rises out of the noise floor.
        let time: Vec<f64> = (0..13).map(|i| i as f64 * 10.0).collect();
        let od: Vec<f64> = time.iter().map(|t| 0.05 + (0.03 * t).exp() * 0.01).collect();

        let curve = fit_smoothing_spline(&time, &od, 0.0).unwrap();
        assert!(!alpha_monotone_decreasing(&curve, &time));
    }
}
