//! Penalized least squares for the spline fit.
//!
//! The smoothing objective is:
//!
//! ```text
//! minimize ||B c - y||^2 + s ||D2 c||^2
//! ```
//!
//! where `B` is the B-spline collocation matrix, `c` the coefficient vector,
//! and `D2` the second-difference operator on coefficients. `s = 0` reduces
//! to plain interpolation; larger `s` pulls the coefficient sequence toward
//! a straight line.
//!
//! Implementation choices:
//! - The penalty is folded in by stacking `sqrt(s) * D2` under `B` and
//!   solving one ordinary least-squares problem.
//! - SVD is used to solve robustly even when the stacked matrix is tall.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic
//!   for non-square matrices.)
//! - A small tolerance ladder accepts the tightest solve that yields finite
//!   coefficients, since near-boundary knots can make the collocation matrix
//!   poorly conditioned.

use nalgebra::{DMatrix, DVector};

/// Second-difference operator on an `m`-vector: `(m - 2) x m` rows of
/// `[1, -2, 1]`. Empty for `m < 3`.
pub fn second_difference(m: usize) -> DMatrix<f64> {
    let rows = m.saturating_sub(2);
    let mut d = DMatrix::<f64>::zeros(rows, m);
    for i in 0..rows {
        d[(i, i)] = 1.0;
        d[(i, i + 1)] = -2.0;
        d[(i, i + 2)] = 1.0;
    }
    d
}

/// Solve the penalized least-squares problem for the spline coefficients.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_penalized(
    design: &DMatrix<f64>,
    y: &DVector<f64>,
    smoothing: f64,
) -> Option<DVector<f64>> {
    let (n, m) = design.shape();
    let pen_rows = if smoothing > 0.0 {
        m.saturating_sub(2)
    } else {
        0
    };

    let mut stacked = DMatrix::<f64>::zeros(n + pen_rows, m);
    stacked.view_mut((0, 0), (n, m)).copy_from(design);

    let mut rhs = DVector::<f64>::zeros(n + pen_rows);
    rhs.rows_mut(0, n).copy_from(y);

    if pen_rows > 0 {
        let penalty = second_difference(m) * smoothing.sqrt();
        stacked.view_mut((n, 0), (pen_rows, m)).copy_from(&penalty);
    }

    let svd = stacked.svd(true, true);
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(c) = svd.solve(&rhs, tol) {
            if c.iter().all(|v| v.is_finite()) {
                return Some(c);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpenalized_solves_exact_system() {
        // Fit y = 2 + 3x on x = [0,1,2] with an intercept/slope design.
        let a = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let c = solve_penalized(&a, &y, 0.0).unwrap();
        assert!((c[0] - 2.0).abs() < 1e-10);
        assert!((c[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn second_difference_shape() {
        let d = second_difference(6);
        assert_eq!(d.shape(), (4, 6));
        assert_eq!(d[(0, 0)], 1.0);
        assert_eq!(d[(0, 1)], -2.0);
        assert_eq!(d[(0, 2)], 1.0);
        assert_eq!(d[(3, 5)], 1.0);
    }

    #[test]
    fn heavy_penalty_straightens_coefficients() {
        // Identity design with a wiggly target: a strong penalty must drive
        // the second differences of the solution toward zero.
        let m = 8;
        let design = DMatrix::<f64>::identity(m, m);
        let y = DVector::from_iterator(m, (0..m).map(|i| (i as f64 * 1.1).sin()));

        let c = solve_penalized(&design, &y, 1e9).unwrap();
        for i in 0..m - 2 {
            let dd = c[i] - 2.0 * c[i + 1] + c[i + 2];
            assert!(dd.abs() < 1e-4, "second difference {dd} at {i}");
        }
    }

    #[test]
    fn zero_smoothing_interpolates() {
        let m = 5;
        let design = DMatrix::<f64>::identity(m, m);
        let y = DVector::from_row_slice(&[1.0, -2.0, 0.5, 3.0, 0.0]);

        let c = solve_penalized(&design, &y, 0.0).unwrap();
        for i in 0..m {
            assert!((c[i] - y[i]).abs() < 1e-10);
        }
    }
}
