//! Clamped B-spline primitives.
//!
//! The smoothing spline is represented in B-spline form:
//!
//! - a knot vector with `(degree+1)`-fold clamped ends and interior knots
//!   obtained by de Boor averaging of the data sites
//! - one coefficient per basis function
//!
//! Numerical notes:
//! - Basis values come from the Cox–de Boor recurrence, which only combines
//!   non-negative terms (no cancellation).
//! - Evaluation at the right boundary is clamped into the last span so
//!   `f(t_last)` is exact instead of falling off the half-open interval.
//! - The analytic derivative is another B-spline of one lower degree; no
//!   finite differencing anywhere.

/// A polynomial spline in B-spline form.
#[derive(Debug, Clone)]
pub struct BSpline {
    degree: usize,
    knots: Vec<f64>,
    coeffs: Vec<f64>,
}

impl BSpline {
    /// Build a spline from a knot vector and coefficients.
    ///
    /// # Panics
    /// Panics if `knots.len() != coeffs.len() + degree + 1`.
    pub fn new(degree: usize, knots: Vec<f64>, coeffs: Vec<f64>) -> Self {
        assert_eq!(
            knots.len(),
            coeffs.len() + degree + 1,
            "knot/coefficient count mismatch"
        );
        Self {
            degree,
            knots,
            coeffs,
        }
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of basis functions (= number of coefficients).
    pub fn num_basis(&self) -> usize {
        self.coeffs.len()
    }

    /// Closed interval on which the spline is defined.
    pub fn domain(&self) -> (f64, f64) {
        (self.knots[self.degree], self.knots[self.num_basis()])
    }

    /// Evaluate the spline at `t` (must lie inside the domain; boundary
    /// values are exact).
    pub fn value(&self, t: f64) -> f64 {
        let span = find_span(&self.knots, self.degree, self.num_basis(), t);
        let basis = basis_values(&self.knots, self.degree, span, t);
        let mut acc = 0.0;
        for (j, b) in basis.iter().enumerate() {
            acc += b * self.coeffs[span - self.degree + j];
        }
        acc
    }

    /// Analytic first derivative as a spline of one lower degree.
    ///
    /// Standard coefficient-difference construction:
    /// `d_i = degree * (c_{i+1} - c_i) / (u_{i+degree+1} - u_{i+1})`
    /// over the knot vector with the first and last knot removed.
    pub fn derivative(&self) -> BSpline {
        assert!(self.degree >= 1, "cannot differentiate a degree-0 spline");
        let k = self.degree;
        let m = self.num_basis();

        let mut coeffs = Vec::with_capacity(m - 1);
        for i in 0..m - 1 {
            let denom = self.knots[i + k + 1] - self.knots[i + 1];
            let d = if denom > 0.0 {
                k as f64 * (self.coeffs[i + 1] - self.coeffs[i]) / denom
            } else {
                0.0
            };
            coeffs.push(d);
        }

        BSpline {
            degree: k - 1,
            knots: self.knots[1..self.knots.len() - 1].to_vec(),
            coeffs,
        }
    }
}

/// Knot vector by de Boor site averaging, with clamped ends.
///
/// For `n` strictly increasing sites and degree `k` this yields `n + k + 1`
/// knots and therefore exactly `n` basis functions, so the collocation
/// matrix is square and (by Schoenberg–Whitney) nonsingular.
///
/// Requires `n >= k + 1`; callers validate before reaching this point.
pub fn averaged_knots(sites: &[f64], degree: usize) -> Vec<f64> {
    let n = sites.len();
    let k = degree;
    debug_assert!(n >= k + 1);

    let mut knots = Vec::with_capacity(n + k + 1);
    for _ in 0..=k {
        knots.push(sites[0]);
    }
    for j in 1..n - k {
        let avg = sites[j..j + k].iter().sum::<f64>() / k as f64;
        knots.push(avg);
    }
    for _ in 0..=k {
        knots.push(sites[n - 1]);
    }
    knots
}

/// Locate the knot span containing `t`: the index `i` with
/// `knots[i] <= t < knots[i+1]`, clamped into `[degree, num_basis - 1]`.
pub fn find_span(knots: &[f64], degree: usize, num_basis: usize, t: f64) -> usize {
    if t >= knots[num_basis] {
        return num_basis - 1;
    }
    if t <= knots[degree] {
        return degree;
    }
    let mut lo = degree;
    let mut hi = num_basis;
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if t < knots[mid] {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    lo
}

/// The `degree + 1` basis values that are nonzero on `span`, at `t`
/// (Cox–de Boor recurrence).
pub fn basis_values(knots: &[f64], degree: usize, span: usize, t: f64) -> Vec<f64> {
    let mut values = vec![0.0; degree + 1];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];

    values[0] = 1.0;
    for j in 1..=degree {
        left[j] = t - knots[span + 1 - j];
        right[j] = knots[span + j] - t;
        let mut saved = 0.0;
        for r in 0..j {
            let denom = right[r + 1] + left[j - r];
            let term = if denom != 0.0 { values[r] / denom } else { 0.0 };
            values[r] = saved + right[r + 1] * term;
            saved = left[j - r] * term;
        }
        values[j] = saved;
    }
    values
}

/// Fill one collocation row: the value of every basis function at `t`.
///
/// `out` must have length `num_basis`; entries outside the active span are
/// zeroed.
pub fn design_row(knots: &[f64], degree: usize, num_basis: usize, t: f64, out: &mut [f64]) {
    debug_assert_eq!(out.len(), num_basis);
    out.fill(0.0);
    let span = find_span(knots, degree, num_basis, t);
    let basis = basis_values(knots, degree, span, t);
    for (j, b) in basis.iter().enumerate() {
        out[span - degree + j] = *b;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sites() -> Vec<f64> {
        (0..12).map(|i| i as f64 * 7.5).collect()
    }

    #[test]
    fn basis_partitions_unity() {
        let s = sites();
        let knots = averaged_knots(&s, 5);
        let nb = s.len();
        let mut row = vec![0.0; nb];

        for &t in &[0.0, 1.3, 20.0, 41.7, 82.4, 82.5] {
            design_row(&knots, 5, nb, t, &mut row);
            let sum: f64 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12, "sum at t={t} was {sum}");
            assert!(row.iter().all(|v| *v >= -1e-15));
        }
    }

    #[test]
    fn constant_spline_evaluates_to_constant() {
        let s = sites();
        let knots = averaged_knots(&s, 5);
        let spline = BSpline::new(5, knots, vec![3.5; s.len()]);

        for &t in &[0.0, 10.0, 55.5, 82.5] {
            assert!((spline.value(t) - 3.5).abs() < 1e-12);
        }
    }

    #[test]
    fn derivative_of_constant_is_zero() {
        let s = sites();
        let knots = averaged_knots(&s, 5);
        let spline = BSpline::new(5, knots, vec![2.0; s.len()]);
        let der = spline.derivative();

        assert_eq!(der.degree(), 4);
        for &t in &[0.0, 30.0, 82.5] {
            assert!(der.value(t).abs() < 1e-12);
        }
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let s = sites();
        let knots = averaged_knots(&s, 5);
        // Arbitrary smooth coefficient profile.
        let coeffs: Vec<f64> = (0..s.len()).map(|i| (i as f64 * 0.3).sin()).collect();
        let spline = BSpline::new(5, knots, coeffs);
        let der = spline.derivative();

        let h = 1e-6;
        for &t in &[5.0, 22.0, 47.0, 70.0] {
            let fd = (spline.value(t + h) - spline.value(t - h)) / (2.0 * h);
            assert!(
                (der.value(t) - fd).abs() < 1e-5,
                "analytic {} vs fd {} at t={t}",
                der.value(t),
                fd
            );
        }
    }

    #[test]
    fn averaged_knots_shape_and_order() {
        let s = sites();
        let knots = averaged_knots(&s, 5);
        assert_eq!(knots.len(), s.len() + 5 + 1);
        for w in knots.windows(2) {
            assert!(w[1] >= w[0]);
        }
        assert_eq!(knots[0], s[0]);
        assert_eq!(knots[knots.len() - 1], s[s.len() - 1]);
    }
}
