//! Goodness-of-fit statistics on the original y scale.

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Coefficient of determination `1 - SS_res / SS_tot`.
///
/// Returns `None` when undefined: mismatched or empty inputs, a non-finite
/// prediction, or zero variance in `observed` (see `is_constant`). The value
/// is not clamped; a model worse than the mean yields a negative R².
pub fn r_squared(observed: &[f64], predicted: &[f64]) -> Option<f64> {
    if observed.len() != predicted.len() {
        return None;
    }
    let y_bar = mean(observed)?;
    if is_constant(observed, y_bar) {
        return None;
    }

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (&y, &y_hat) in observed.iter().zip(predicted) {
        if !y_hat.is_finite() {
            return None;
        }
        let r = y - y_hat;
        let d = y - y_bar;
        ss_res += r * r;
        ss_tot += d * d;
    }

    let r2 = 1.0 - ss_res / ss_tot;
    r2.is_finite().then_some(r2)
}

/// Whether every value sits on `center` up to rounding.
///
/// The spread is compared with the rounding error of the mean itself
/// (`max|v| · n · ε`), not with the magnitude of the values, so a large offset
/// with small but representable variation still counts as varying.
pub fn is_constant(values: &[f64], center: f64) -> bool {
    let max_dev = values.iter().map(|v| (v - center).abs()).fold(0.0, f64::max);
    let max_abs = values.iter().map(|v| v.abs()).fold(0.0, f64::max);
    max_dev <= max_abs * values.len() as f64 * f64::EPSILON
}

/// Root mean squared error; `None` for empty/mismatched input or a non-finite result.
pub fn rmse(observed: &[f64], predicted: &[f64]) -> Option<f64> {
    if observed.is_empty() || observed.len() != predicted.len() {
        return None;
    }
    let sse: f64 = observed
        .iter()
        .zip(predicted)
        .map(|(y, y_hat)| (y - y_hat) * (y - y_hat))
        .sum();
    let value = (sse / observed.len() as f64).sqrt();
    value.is_finite().then_some(value)
}
