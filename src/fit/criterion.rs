//! R²-approximated information criterion.
//!
//! ```text
//! AIC ≈ n · ln(1 - R²) + 2k
//! ```
//!
//! This is a ranking heuristic derived from R², not a likelihood-based AIC, and
//! should not be reported as one. `ln(1 - R²)` diverges as `R² → 1` and carries
//! no signal as `R² → 0`, so both ends are replaced by fixed scores that still
//! grow with `k`:
//!
//! - `R² >= near_perfect_r2`: `perfect_baseline + k · complexity_step`
//! - `R² <= near_zero_r2`: `poor_baseline + k · complexity_step`
//!
//! A non-finite interior value falls back to the near-perfect branch.

use crate::domain::CriterionConfig;

/// Compute the criterion for `n` points, `k` coefficients and `r2`.
///
/// Returns `None` (undefined) when `r2` is missing, NaN, or outside `[0, 1]`.
/// Lower is better.
pub fn aic(n: usize, k: usize, r2: Option<f64>, config: &CriterionConfig) -> Option<f64> {
    let r2 = r2?;
    if !(0.0..=1.0).contains(&r2) {
        return None;
    }

    let k_f = k as f64;
    let near_perfect = config.perfect_baseline + k_f * config.complexity_step;
    let near_zero = config.poor_baseline + k_f * config.complexity_step;

    if r2 >= config.near_perfect_r2 {
        return Some(near_perfect);
    }
    if r2 <= config.near_zero_r2 {
        return Some(near_zero);
    }

    let value = n as f64 * (1.0 - r2).ln() + 2.0 * k_f;
    if value.is_finite() {
        Some(value)
    } else {
        Some(near_perfect)
    }
}
