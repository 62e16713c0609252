//! Per-family fitting routines.
//!
//! Each fitter is a pure function of the data and returns either a `FitResult`
//! or a `FitFailure` describing why the family does not apply. Failures are
//! expected outcomes (e.g. `x <= 0` for the logarithmic family) and are never
//! raised past the selector.
//!
//! Linearized families are solved in transformed space:
//!
//! - exponential: `ln y = ln a + b·x`
//! - logarithmic: `y = a + b·ln x`
//! - power: `ln y = ln a + b·ln x`
//!
//! but R² and RMSE are always computed on the original y scale with the
//! family's own prediction function, so scores are comparable across families.
//! The information criterion is filled in later by the selector.

use nalgebra::{DMatrix, DVector};

use crate::domain::{DataPoint, FitResult, ModelKind, quartic_degree};
use crate::error::{FamilyOutcome, FitFailure};
use crate::math::{r_squared, rmse, simple_regression, solve_normal_equations};
use crate::models::{equation_string, predict};

/// Points needed by the two-coefficient transformed families.
const TRANSFORMED_MIN_POINTS: usize = 3;

/// Fit a single family.
///
/// `polynomial_degree` is the degree option; it only affects the Quartic slot,
/// which is fitted at `min(4, polynomial_degree)`.
pub fn fit_family(model: ModelKind, polynomial_degree: u8, points: &[DataPoint]) -> FamilyOutcome {
    match model {
        ModelKind::Linear => fit_linear(points),
        ModelKind::Quadratic => polynomial_family(model, 2, points),
        ModelKind::Cubic => polynomial_family(model, 3, points),
        ModelKind::Quartic => polynomial_family(model, quartic_degree(polynomial_degree), points),
        ModelKind::Exponential => fit_exponential(points),
        ModelKind::Logarithmic => fit_logarithmic(points),
        ModelKind::Power => fit_power(points),
    }
}

/// `y = a·x + b` by closed-form least squares. Coefficients: `[a, b]`.
pub fn fit_linear(points: &[DataPoint]) -> FamilyOutcome {
    require_points(2, points)?;
    let (xs, ys) = unzip(points);
    let (slope, intercept) = simple_regression(&xs, &ys).ok_or(FitFailure::Singular)?;
    finish(ModelKind::Linear, vec![slope, intercept], points)
}

/// Least squares polynomial of `degree`, coefficients highest degree first.
///
/// The design matrix is built on `u = (x - x̄) / s` with `s = max|x - x̄|` and
/// the solution is expanded back to powers of `x`, so offset ranges (kelvin,
/// calendar years) stay well conditioned. Needs `degree + 2` points.
pub fn fit_polynomial(degree: usize, points: &[DataPoint]) -> Result<Vec<f64>, FitFailure> {
    let cols = degree + 1;
    require_points(cols + 1, points)?;

    let n = points.len();
    let center = points.iter().map(|p| p.x).sum::<f64>() / n as f64;
    let scale = points.iter().map(|p| (p.x - center).abs()).fold(0.0, f64::max);
    if !(scale.is_finite() && scale > 0.0) {
        return Err(FitFailure::Singular);
    }

    let mut design = DMatrix::<f64>::zeros(n, cols);
    let y = DVector::from_iterator(n, points.iter().map(|p| p.y));
    for (i, p) in points.iter().enumerate() {
        let u = (p.x - center) / scale;
        let mut power = 1.0;
        for j in (0..cols).rev() {
            design[(i, j)] = power;
            power *= u;
        }
    }

    let beta = solve_normal_equations(&design, &y).ok_or(FitFailure::Singular)?;
    let centered: Vec<f64> = beta.iter().copied().collect();
    Ok(expand_centered(&centered, center, scale))
}

fn polynomial_family(model: ModelKind, degree: usize, points: &[DataPoint]) -> FamilyOutcome {
    let coefficients = fit_polynomial(degree, points)?;
    finish(model, coefficients, points)
}

/// Rewrite a polynomial in `u = (x - center) / scale` as one in `x`.
/// Both sides are highest degree first.
fn expand_centered(centered: &[f64], center: f64, scale: f64) -> Vec<f64> {
    let degree = centered.len().saturating_sub(1);
    // Ascending powers of x.
    let mut raw = vec![0.0; centered.len()];
    // Ascending coefficients of u^k as a polynomial in x.
    let mut basis = vec![1.0];
    for k in 0..centered.len() {
        let b = centered[degree - k];
        for (p, v) in basis.iter().enumerate() {
            raw[p] += b * v;
        }
        let mut next = vec![0.0; basis.len() + 1];
        for (p, v) in basis.iter().enumerate() {
            next[p + 1] += v / scale;
            next[p] -= center * v / scale;
        }
        basis = next;
    }
    raw.reverse();
    raw
}

/// `y = a·e^(b·x)`, fitted on `ln y`. Requires all `y > 0`. Coefficients: `[a, b]`.
pub fn fit_exponential(points: &[DataPoint]) -> FamilyOutcome {
    require_points(TRANSFORMED_MIN_POINTS, points)?;
    if points.iter().any(|p| p.y <= 0.0) {
        return Err(FitFailure::NonPositiveY);
    }
    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let ln_y: Vec<f64> = points.iter().map(|p| p.y.ln()).collect();

    let (b, ln_a) = simple_regression(&xs, &ln_y).ok_or(FitFailure::Singular)?;
    finish(ModelKind::Exponential, vec![ln_a.exp(), b], points)
}

/// `y = a + b·ln(x)`. Requires all `x > 0`. Coefficients: `[a, b]`.
pub fn fit_logarithmic(points: &[DataPoint]) -> FamilyOutcome {
    require_points(TRANSFORMED_MIN_POINTS, points)?;
    if points.iter().any(|p| p.x <= 0.0) {
        return Err(FitFailure::NonPositiveX);
    }
    let ln_x: Vec<f64> = points.iter().map(|p| p.x.ln()).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y).collect();

    let (b, a) = simple_regression(&ln_x, &ys).ok_or(FitFailure::Singular)?;
    finish(ModelKind::Logarithmic, vec![a, b], points)
}

/// `y = a·x^b`, fitted on `ln y` vs `ln x`. Requires all `x > 0` and `y > 0`.
/// Coefficients: `[a, b]`.
pub fn fit_power(points: &[DataPoint]) -> FamilyOutcome {
    require_points(TRANSFORMED_MIN_POINTS, points)?;
    if points.iter().any(|p| p.x <= 0.0) {
        return Err(FitFailure::NonPositiveX);
    }
    if points.iter().any(|p| p.y <= 0.0) {
        return Err(FitFailure::NonPositiveY);
    }
    let ln_x: Vec<f64> = points.iter().map(|p| p.x.ln()).collect();
    let ln_y: Vec<f64> = points.iter().map(|p| p.y.ln()).collect();

    let (b, ln_a) = simple_regression(&ln_x, &ln_y).ok_or(FitFailure::Singular)?;
    finish(ModelKind::Power, vec![ln_a.exp(), b], points)
}

fn require_points(needed: usize, points: &[DataPoint]) -> Result<(), FitFailure> {
    if points.len() < needed {
        return Err(FitFailure::InsufficientPoints {
            needed,
            got: points.len(),
        });
    }
    Ok(())
}

fn unzip(points: &[DataPoint]) -> (Vec<f64>, Vec<f64>) {
    points.iter().map(|p| (p.x, p.y)).unzip()
}

/// Score coefficients on the original scale and assemble the result.
fn finish(model: ModelKind, coefficients: Vec<f64>, points: &[DataPoint]) -> FamilyOutcome {
    if coefficients.iter().any(|c| !c.is_finite()) {
        return Err(FitFailure::NonFinite);
    }

    let observed: Vec<f64> = points.iter().map(|p| p.y).collect();
    let predicted: Vec<f64> = points
        .iter()
        .map(|p| predict(model, &coefficients, p.x).unwrap_or(f64::NAN))
        .collect();

    let r2 = r_squared(&observed, &predicted).filter(|r2| (0.0..=1.0).contains(r2));
    let fit_rmse = rmse(&observed, &predicted);

    Ok(FitResult {
        model,
        equation: equation_string(model, &coefficients),
        coefficients,
        r_squared: r2,
        aic: None,
        rmse: fit_rmse,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(pairs: &[(f64, f64)]) -> Vec<DataPoint> {
        pairs.iter().copied().map(DataPoint::from).collect()
    }

    fn sample(f: impl Fn(f64) -> f64, xs: impl Iterator<Item = f64>) -> Vec<DataPoint> {
        xs.map(|x| DataPoint::new(x, f(x))).collect()
    }

    fn assert_close(actual: &[f64], expected: &[f64], tol: f64) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < tol, "got {actual:?}, expected {expected:?}");
        }
    }

    #[test]
    fn linear_two_colinear_points_is_exact() {
        let fit = fit_linear(&pts(&[(1.0, 3.0), (4.0, 9.0)])).unwrap();
        assert_close(&fit.coefficients, &[2.0, 1.0], 1e-12);
        assert!((fit.r_squared.unwrap() - 1.0).abs() < 1e-9);
        assert!(fit.aic.is_none());
    }

    #[test]
    fn linear_many_colinear_points_is_exact() {
        let data = sample(|x| -0.75 * x + 12.0, (0..25).map(|i| i as f64 * 0.4 - 3.0));
        let fit = fit_linear(&data).unwrap();
        assert_close(&fit.coefficients, &[-0.75, 12.0], 1e-10);
        assert!((fit.r_squared.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn linear_rejects_constant_x() {
        let err = fit_linear(&pts(&[(2.0, 1.0), (2.0, 5.0), (2.0, 3.0)])).unwrap_err();
        assert_eq!(err, FitFailure::Singular);
    }

    #[test]
    fn polynomial_families_recover_coefficients() {
        let xs = || (0..15).map(|i| i as f64 * 0.5 - 3.0);

        let quad = fit_family(ModelKind::Quadratic, 3, &sample(|x| 2.0 * x * x - x + 0.5, xs())).unwrap();
        assert_close(&quad.coefficients, &[2.0, -1.0, 0.5], 1e-8);

        let cubic = fit_family(ModelKind::Cubic, 2, &sample(|x| x.powi(3) - 2.0 * x + 4.0, xs())).unwrap();
        assert_close(&cubic.coefficients, &[1.0, 0.0, -2.0, 4.0], 1e-8);

        let quartic = fit_family(ModelKind::Quartic, 4, &sample(|x| 0.5 * x.powi(4) - x * x + 1.0, xs())).unwrap();
        assert_close(&quartic.coefficients, &[0.5, 0.0, -1.0, 0.0, 1.0], 1e-7);
        assert!((quartic.r_squared.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn quartic_slot_is_fitted_at_capped_option_degree() {
        let data = sample(|x| x.powi(3) - 2.0 * x + 1.0, (0..12).map(|i| i as f64 * 0.5 - 3.0));

        let at_two = fit_family(ModelKind::Quartic, 2, &data).unwrap();
        assert_eq!(at_two.coefficients.len(), 3);
        assert!(at_two.equation.starts_with("y = ") && at_two.equation.contains("x^2"));

        let at_three = fit_family(ModelKind::Quartic, 3, &data).unwrap();
        assert_close(&at_three.coefficients, &[1.0, 0.0, -2.0, 1.0], 1e-8);

        let at_six = fit_family(ModelKind::Quartic, 6, &data).unwrap();
        assert_eq!(at_six.coefficients.len(), 5);
        assert!(at_six.coefficients[0].abs() < 1e-8);
    }

    #[test]
    fn polynomial_on_offset_range_stays_well_conditioned() {
        // 0.01(x - 300)³ - 0.5(x - 300) + 7 over x = 290..=310.
        let data = sample(
            |x| 0.01 * (x - 300.0).powi(3) - 0.5 * (x - 300.0) + 7.0,
            (290..=310).map(f64::from),
        );
        let fit = fit_family(ModelKind::Cubic, 3, &data).unwrap();
        let expected = [0.01, -9.0, 2699.5, -269_843.0];
        for (a, e) in fit.coefficients.iter().zip(expected) {
            assert!((a - e).abs() <= 1e-8 * e.abs(), "got {:?}", fit.coefficients);
        }
        assert!((fit.r_squared.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn centered_solution_expands_to_powers_of_x() {
        // u = (x - 300) / 10, so u = x/10 - 30 and u² = x²/100 - 6x + 900.
        assert_close(&expand_centered(&[1.0, 0.0], 300.0, 10.0), &[0.1, -30.0], 1e-12);
        assert_close(&expand_centered(&[1.0, 0.0, 0.0], 300.0, 10.0), &[0.01, -6.0, 900.0], 1e-9);
    }

    #[test]
    fn polynomial_needs_one_more_point_than_coefficients() {
        let data = pts(&[(0.0, 1.0), (1.0, 2.0), (2.0, 5.0)]);
        let err = fit_family(ModelKind::Quadratic, 3, &data).unwrap_err();
        assert_eq!(err, FitFailure::InsufficientPoints { needed: 4, got: 3 });
        assert_eq!(fit_polynomial(2, &data).unwrap_err(), err);
    }

    #[test]
    fn polynomial_rejects_too_few_distinct_x() {
        // Four points but only two distinct x values: a quadratic is not identifiable.
        let data = pts(&[(0.0, 1.0), (0.0, 1.5), (1.0, 2.0), (1.0, 2.5)]);
        assert_eq!(fit_polynomial(2, &data).unwrap_err(), FitFailure::Singular);
        let constant_x = pts(&[(3.0, 1.0), (3.0, 2.0), (3.0, 4.0), (3.0, 8.0)]);
        assert_eq!(fit_polynomial(2, &constant_x).unwrap_err(), FitFailure::Singular);
    }

    #[test]
    fn exponential_recovers_parameters() {
        let data = sample(|x| 3.0 * (0.4 * x).exp(), (0..10).map(|i| i as f64 - 2.0));
        let fit = fit_exponential(&data).unwrap();
        assert_close(&fit.coefficients, &[3.0, 0.4], 1e-10);
        assert!((fit.r_squared.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn exponential_requires_positive_y() {
        let data = pts(&[(0.0, 1.0), (1.0, 0.0), (2.0, 4.0)]);
        assert_eq!(fit_exponential(&data).unwrap_err(), FitFailure::NonPositiveY);
    }

    #[test]
    fn logarithmic_recovers_parameters() {
        let data = sample(|x| 1.5 - 2.0 * x.ln(), (1..12).map(|i| i as f64 * 0.7));
        let fit = fit_logarithmic(&data).unwrap();
        assert_close(&fit.coefficients, &[1.5, -2.0], 1e-10);
    }

    #[test]
    fn power_recovers_parameters() {
        let data = sample(|x| 2.0 * x.powf(1.5), (1..12).map(|i| i as f64 * 0.5));
        let fit = fit_power(&data).unwrap();
        assert_close(&fit.coefficients, &[2.0, 1.5], 1e-10);
    }

    #[test]
    fn log_and_power_require_positive_x() {
        let data = pts(&[(-1.0, 1.0), (1.0, 2.0), (2.0, 3.0), (3.0, 4.0)]);
        assert_eq!(fit_logarithmic(&data).unwrap_err(), FitFailure::NonPositiveX);
        assert_eq!(fit_power(&data).unwrap_err(), FitFailure::NonPositiveX);

        let zero_x = pts(&[(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)]);
        assert_eq!(fit_family(ModelKind::Power, 3, &zero_x).unwrap_err(), FitFailure::NonPositiveX);
    }

    #[test]
    fn zero_variance_gives_undefined_r2() {
        let data = pts(&[(1.0, 4.0), (2.0, 4.0), (3.0, 4.0), (4.0, 4.0)]);
        let fit = fit_linear(&data).unwrap();
        assert!(fit.r_squared.is_none());
        let fit = fit_exponential(&data).unwrap();
        assert!(fit.r_squared.is_none());
    }

    #[test]
    fn equation_is_rendered_with_coefficients() {
        let fit = fit_linear(&pts(&[(0.0, 0.0), (1.0, 2.0), (2.0, 4.0)])).unwrap();
        assert!(fit.equation.starts_with("y = 2.0000x"), "{}", fit.equation);
    }
}
