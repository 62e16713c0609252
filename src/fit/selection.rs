//! Model selection across all candidate families.
//!
//! `fit_all` attempts every family in a fixed order
//! (Linear, Quadratic, Cubic, Quartic, Exponential, Logarithmic, Power), scores
//! each fit with the R²-based criterion and picks the preferred model.
//!
//! Selection rule, scanning selectable fits in attempt order:
//! 1. start with the first selectable fit as the current best
//! 2. a candidate whose R² exceeds the current best by more than the tie margin
//!    (0.05 by default) replaces it
//! 3. within the tie margin, the candidate replaces the current best only if its
//!    criterion score is lower
//!
//! A fit is selectable when its R² lies in `[0, 1]` and its criterion score is
//! finite. All state is local to the call.

use log::{debug, info};

use crate::domain::{DataPoint, FitOptions, FitResult, ModelKind, SelectionConfig, SelectionResult, SkippedFamily};
use crate::error::FitError;
use crate::fit::criterion::aic;
use crate::fit::fitter::fit_family;

/// Minimum number of points accepted by `fit_all`.
pub const MIN_POINTS: usize = 2;

/// Fit every family and select the best model.
pub fn fit_all(points: &[DataPoint], options: &FitOptions) -> Result<SelectionResult, FitError> {
    let n = points.len();
    if n < MIN_POINTS {
        return Err(FitError::InvalidInput(format!(
            "at least {MIN_POINTS} points are required, got {n}"
        )));
    }
    if let Some((i, p)) = points
        .iter()
        .enumerate()
        .find(|(_, p)| !(p.x.is_finite() && p.y.is_finite()))
    {
        return Err(FitError::InvalidInput(format!(
            "point {} is not finite: ({}, {})",
            i + 1,
            p.x,
            p.y
        )));
    }
    options.validate()?;

    let order = ModelKind::ALL;
    let mut all_models = Vec::with_capacity(order.len());
    let mut skipped = Vec::new();

    for kind in order {
        match fit_family(kind, options.polynomial_degree, points) {
            Ok(fit) => {
                let score = aic(n, fit.coefficients.len(), fit.r_squared, &options.criterion);
                debug!(
                    "{kind}: r2={:?} aic={:?} {}",
                    fit.r_squared, score, fit.equation
                );
                all_models.push(FitResult { aic: score, ..fit });
            }
            Err(failure) => {
                debug!("{kind}: skipped ({failure})");
                skipped.push(SkippedFamily {
                    model: kind,
                    reason: failure.to_string(),
                });
            }
        }
    }

    let best = select_best(&all_models, &options.selection)
        .cloned()
        .ok_or(FitError::NoValidModel {
            attempted: order.len(),
        })?;

    info!(
        "selected {} (r2={:?}, aic={:?}) from {} fitted / {} skipped families",
        best.model,
        best.r_squared,
        best.aic,
        all_models.len(),
        skipped.len()
    );

    Ok(SelectionResult {
        best,
        all_models,
        skipped,
    })
}

/// Pick the preferred fit among `fits` (in attempt order).
///
/// Non-selectable fits are ignored; returns `None` if none qualify.
pub fn select_best<'a>(fits: &'a [FitResult], config: &SelectionConfig) -> Option<&'a FitResult> {
    let mut pool = fits.iter().filter(|f| f.is_selectable());
    let mut best = pool.next()?;

    for candidate in pool {
        let (Some(r2_best), Some(aic_best)) = (best.r_squared, best.aic) else {
            continue;
        };
        let (Some(r2_cand), Some(aic_cand)) = (candidate.r_squared, candidate.aic) else {
            continue;
        };

        let diff = r2_cand - r2_best;
        if diff > config.r2_tie_margin {
            best = candidate;
        } else if diff.abs() <= config.r2_tie_margin && aic_cand < aic_best {
            best = candidate;
        }
    }

    Some(best)
}
