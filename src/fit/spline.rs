//! Degree-5 smoothing spline fit over an eligible series.
//!
//! Why a global smoothing spline?
//! - raw OD series are noisy at both the low-signal and saturation ends;
//!   a penalized global fit balances bias and variance better than finite
//!   differencing on raw points
//! - the derivative is analytic, so point-to-point noise is not amplified
//!
//! The fit is a penalized regression spline: knots by de Boor averaging of
//! the eligible sites (square collocation matrix, interpolating at `s = 0`),
//! second-difference coefficient penalty scaled by the smoothing factor,
//! solved as one least-squares problem.

use nalgebra::{DMatrix, DVector};

use crate::error::EstimateError;
use crate::math::{BSpline, averaged_knots, design_row, solve_penalized};

/// Spline degree used for every fit. Quintic, so the estimator has two
/// well-behaved analytic derivatives to work with.
pub const SPLINE_DEGREE: usize = 5;

/// Minimum number of eligible points for a fit.
pub const MIN_POINTS: usize = SPLINE_DEGREE + 1;

/// Fit a smoothing spline to `(time, y)`.
///
/// Requires strictly increasing time values with at least [`MIN_POINTS`]
/// distinct points; anything less is `InsufficientData`.
pub fn fit_smoothing_spline(
    time: &[f64],
    y: &[f64],
    smoothing: f64,
) -> Result<BSpline, EstimateError> {
    debug_assert_eq!(time.len(), y.len());
    let n = time.len();

    // The caller has already established non-decreasing order, so counting
    // strict increases counts distinct sites.
    let distinct = if n == 0 {
        0
    } else {
        1 + time.windows(2).filter(|w| w[1] > w[0]).count()
    };
    if distinct < MIN_POINTS || distinct != n {
        return Err(EstimateError::InsufficientData {
            have: distinct,
            need: MIN_POINTS,
        });
    }

    let knots = averaged_knots(time, SPLINE_DEGREE);
    let m = n; // one basis function per site with averaged knots

    let mut design = DMatrix::<f64>::zeros(n, m);
    let mut row = vec![0.0; m];
    for (i, &t) in time.iter().enumerate() {
        design_row(&knots, SPLINE_DEGREE, m, t, &mut row);
        for (j, v) in row.iter().enumerate() {
            design[(i, j)] = *v;
        }
    }

    let rhs = DVector::from_column_slice(y);
    let coeffs = solve_penalized(&design, &rhs, smoothing).ok_or_else(|| {
        EstimateError::MalformedSeries("spline system is numerically singular".to_string())
    })?;

    Ok(BSpline::new(
        SPLINE_DEGREE,
        knots,
        coeffs.iter().copied().collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_few_points_is_insufficient_data() {
        let time = [0.0, 10.0, 20.0, 30.0, 40.0];
        let y = [0.1, 0.2, 0.4, 0.8, 1.6];

        let err = fit_smoothing_spline(&time, &y, 0.0).unwrap_err();
        assert_eq!(
            err,
            EstimateError::InsufficientData {
                have: 5,
                need: MIN_POINTS
            }
        );
    }

    #[test]
    fn duplicate_times_are_insufficient_data() {
        let time = [0.0, 10.0, 10.0, 30.0, 40.0, 50.0, 60.0];
        let y = [0.1; 7];

        let err = fit_smoothing_spline(&time, &y, 0.0).unwrap_err();
        assert!(matches!(err, EstimateError::InsufficientData { have: 6, .. }));
    }

    #[test]
    fn zero_smoothing_interpolates_the_data() {
        let time: Vec<f64> = (0..10).map(|i| i as f64 * 10.0).collect();
        let y: Vec<f64> = time.iter().map(|t| (t * 0.05).sin()).collect();

        let spline = fit_smoothing_spline(&time, &y, 0.0).unwrap();
        for (&t, &v) in time.iter().zip(y.iter()) {
            assert!(
                (spline.value(t) - v).abs() < 1e-8,
                "interpolation miss at t={t}"
            );
        }
    }

    #[test]
    fn linear_data_has_constant_derivative() {
        // A straight line lies in the spline space, so the interpolating fit
        // recovers it exactly; a mild penalty may bend the ends slightly but
        // must keep the interior slope close.
        let time: Vec<f64> = (0..12).map(|i| i as f64 * 5.0).collect();
        let y: Vec<f64> = time.iter().map(|t| 0.3 + 0.05 * t).collect();

        let interp = fit_smoothing_spline(&time, &y, 0.0).unwrap();
        let der = interp.derivative();
        for &t in &[0.0, 12.5, 30.0, 55.0] {
            assert!((der.value(t) - 0.05).abs() < 1e-6, "slope at t={t}");
        }

        let smooth = fit_smoothing_spline(&time, &y, 0.2).unwrap();
        let der = smooth.derivative();
        for &t in &[15.0, 30.0, 40.0] {
            let d = der.value(t);
            assert!((d - 0.05).abs() < 5e-3, "smoothed slope {d} at t={t}");
        }
    }

    #[test]
    fn smoothing_reduces_roughness() {
        // Noisy line: the smoothed fit should deviate from the jittered
        // observations more than the interpolating fit does.
        let time: Vec<f64> = (0..14).map(|i| i as f64 * 4.0).collect();
        let y: Vec<f64> = time
            .iter()
            .enumerate()
            .map(|(i, t)| 0.02 * t + if i % 2 == 0 { 0.05 } else { -0.05 })
            .collect();

        let interp = fit_smoothing_spline(&time, &y, 0.0).unwrap();
        let smooth = fit_smoothing_spline(&time, &y, 10.0).unwrap();

        let sse = |spl: &crate::math::BSpline| {
            time.iter()
                .zip(y.iter())
                .map(|(&t, &v)| (spl.value(t) - v).powi(2))
                .sum::<f64>()
        };

        assert!(sse(&interp) < 1e-10);
        assert!(sse(&smooth) > sse(&interp));
    }
}
