//! Reporting utilities: residuals, plotting grids and formatted terminal output.
//!
//! Everything here consumes a fitted `FitResult` through `models::evaluate`; no
//! fitting happens in this module.

use crate::domain::{CurveGrid, DataPoint, FitResult, Residual};
use crate::models::evaluate;

pub mod format;

pub use format::*;

/// Observed-minus-fitted residuals in input order.
///
/// Points where the model is undefined are kept and flagged (`residual = None`)
/// rather than dropped.
pub fn residuals(points: &[DataPoint], fit: &FitResult) -> Vec<Residual> {
    points
        .iter()
        .map(|p| {
            let fitted = evaluate(fit, p.x);
            Residual {
                x: p.x,
                y: p.y,
                fitted,
                residual: fitted.map(|f| p.y - f),
            }
        })
        .collect()
}

/// Aggregate view of a residual series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResidualSummary {
    pub defined: usize,
    pub undefined: usize,
    pub max_abs: Option<f64>,
    pub mean_abs: Option<f64>,
}

pub fn summarize_residuals(residuals: &[Residual]) -> ResidualSummary {
    let values: Vec<f64> = residuals.iter().filter_map(|r| r.residual).collect();
    let defined = values.len();
    let max_abs = values.iter().map(|v| v.abs()).reduce(f64::max);
    let mean_abs = (defined > 0).then(|| values.iter().map(|v| v.abs()).sum::<f64>() / defined as f64);
    ResidualSummary {
        defined,
        undefined: residuals.len() - defined,
        max_abs,
        mean_abs,
    }
}

/// The `top_n` defined residuals with the largest magnitude, largest first.
pub fn largest_residuals(residuals: &[Residual], top_n: usize) -> Vec<Residual> {
    let mut sorted: Vec<Residual> = residuals.iter().filter(|r| r.is_defined()).copied().collect();
    sorted.sort_by(|a, b| {
        let a = a.residual.map(f64::abs).unwrap_or(0.0);
        let b = b.residual.map(f64::abs).unwrap_or(0.0);
        b.partial_cmp(&a).unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted.truncate(top_n);
    sorted
}

/// Sample a fitted curve on `n` evenly spaced x values in `[x_min, x_max]`.
///
/// Undefined points (e.g. `x <= 0` for a power fit) are kept as `None` so a
/// plotter can break the line there. A degenerate range is widened by ±0.5.
pub fn curve_grid(fit: &FitResult, x_min: f64, x_max: f64, n: usize) -> CurveGrid {
    let n = n.max(2);
    let mut x0 = x_min;
    let mut x1 = x_max;
    if !(x0.is_finite() && x1.is_finite()) || x1 < x0 {
        x0 = 0.0;
        x1 = 1.0;
    }
    if (x1 - x0).abs() < 1e-12 {
        x0 -= 0.5;
        x1 += 0.5;
    }

    let mut xs = Vec::with_capacity(n);
    let mut ys = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let x = x0 + u * (x1 - x0);
        xs.push(x);
        ys.push(evaluate(fit, x));
    }

    CurveGrid { x: xs, y: ys }
}
