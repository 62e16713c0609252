//! Least squares solvers.
//!
//! Two entry points:
//!
//! - `simple_regression`: closed-form `y = slope·x + intercept`, used directly by
//!   the linear family and, after log transforms, by the exponential,
//!   logarithmic and power families.
//! - `solve_normal_equations`: general least squares via `XᵀX β = Xᵀy`, used by
//!   the polynomial families.
//!
//! Implementation choices:
//! - Columns are equilibrated (scaled to unit norm) before forming `XᵀX`. The
//!   monomial columns of a Vandermonde matrix differ by orders of magnitude and
//!   the raw normal matrix is needlessly ill-conditioned without this.
//! - The scaled normal matrix is rejected when its condition number (from its
//!   singular values) exceeds `MAX_CONDITION`; otherwise it is solved by
//!   Cholesky.

use nalgebra::{DMatrix, DVector};

use crate::math::stats::is_constant;

/// Largest accepted condition number of the scaled normal matrix.
pub const MAX_CONDITION: f64 = 1e12;

/// Solve a least squares problem through the normal equations.
///
/// Returns `None` if the system is singular or too ill-conditioned to trust.
pub fn solve_normal_equations(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() < x.ncols() || x.nrows() != y.len() {
        return None;
    }

    let norms: Vec<f64> = x.column_iter().map(|c| c.norm()).collect();
    if norms.iter().any(|n| !(n.is_finite() && *n > 0.0)) {
        return None;
    }

    let mut scaled = x.clone();
    for (j, norm) in norms.iter().enumerate() {
        for v in scaled.column_mut(j).iter_mut() {
            *v /= norm;
        }
    }

    let xt = scaled.transpose();
    let xtx = &xt * &scaled;
    let xty = &xt * y;

    let sv = xtx.singular_values();
    let sv_max = sv.max();
    let sv_min = sv.min();
    if !(sv_min > 0.0 && (sv_max / sv_min) <= MAX_CONDITION) {
        return None;
    }

    let beta_scaled = xtx.cholesky()?.solve(&xty);
    let beta = DVector::from_iterator(
        beta_scaled.len(),
        beta_scaled.iter().zip(norms.iter()).map(|(b, n)| b / n),
    );

    if beta.iter().all(|v| v.is_finite()) {
        Some(beta)
    } else {
        None
    }
}

/// Closed-form simple linear regression.
///
/// Returns `(slope, intercept)`, or `None` when all `x` coincide (zero spread)
/// or the inputs are mismatched.
pub fn simple_regression(x: &[f64], y: &[f64]) -> Option<(f64, f64)> {
    let n = x.len();
    if n < 2 || n != y.len() {
        return None;
    }
    let n_f = n as f64;
    let x_bar = x.iter().sum::<f64>() / n_f;
    let y_bar = y.iter().sum::<f64>() / n_f;

    if is_constant(x, x_bar) {
        return None;
    }

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - x_bar;
        sxx += dx * dx;
        sxy += dx * (yi - y_bar);
    }

    let slope = sxy / sxx;
    let intercept = y_bar - slope * x_bar;
    if slope.is_finite() && intercept.is_finite() {
        Some((slope, intercept))
    } else {
        None
    }
}
