//! Model evaluation for every family.
//!
//! `predict` is the single place that knows each family's functional form. The
//! fitters use it to score fits on the original scale, and the reporting side
//! uses it for residuals and plotting grids.

use crate::domain::{FitResult, ModelKind};

/// Predict `y(x)` from a family and its coefficients.
///
/// Returns `None` when the model is undefined at `x` (logarithmic and power
/// families at `x <= 0`), when the coefficient count is not a valid shape for
/// the family, or when the result is not finite. Polynomial families evaluate
/// at the degree implied by the coefficient count.
pub fn predict(model: ModelKind, coefficients: &[f64], x: f64) -> Option<f64> {
    if !model.accepts_coefficients(coefficients.len()) {
        return None;
    }
    let y = match model {
        ModelKind::Linear | ModelKind::Quadratic | ModelKind::Cubic | ModelKind::Quartic => {
            horner(coefficients, x)
        }
        ModelKind::Exponential => coefficients[0] * (coefficients[1] * x).exp(),
        ModelKind::Logarithmic => {
            if x <= 0.0 {
                return None;
            }
            coefficients[0] + coefficients[1] * x.ln()
        }
        ModelKind::Power => {
            if x <= 0.0 {
                return None;
            }
            coefficients[0] * x.powf(coefficients[1])
        }
    };
    y.is_finite().then_some(y)
}

/// Evaluate a fitted model at `x`.
///
/// `None` means "undefined at this x": logarithmic and power fits at `x <= 0`.
/// The exponential is defined for every real `x`, but a value that overflows
/// `f64` (e.g. `a·e^(b·x)` with large `b·x`) is also reported as `None` rather
/// than as an infinity.
pub fn evaluate(fit: &FitResult, x: f64) -> Option<f64> {
    predict(fit.model, &fit.coefficients, x)
}

/// Horner evaluation with coefficients ordered highest degree first.
fn horner(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, c| acc * x + c)
}
