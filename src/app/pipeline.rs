//! Shared "fit pipeline" used by the `fit` and `demo` commands:
//! points -> fit all families -> select -> residuals -> fitted grid

use chrono::Utc;

use crate::domain::{DataPoint, DatasetStats, FitOptions, Residual, RunReport, SelectionResult};
use crate::error::AppError;
use crate::fit::fit_all;
use crate::report::{curve_grid, residuals};

/// All computed outputs of a single analysis run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub stats: DatasetStats,
    pub selection: SelectionResult,
    pub residuals: Vec<Residual>,
}

/// Execute the fitting pipeline on already-cleaned points.
pub fn run_fit(points: &[DataPoint], options: &FitOptions) -> Result<RunOutput, AppError> {
    let selection = fit_all(points, options)?;
    let stats = DatasetStats::from_points(points).ok_or_else(|| AppError::new(4, "Empty dataset after fitting."))?;
    let residuals = residuals(points, &selection.best);

    Ok(RunOutput {
        stats,
        selection,
        residuals,
    })
}

/// Bundle a run into its portable JSON form.
pub fn build_report(run: &RunOutput, options: &FitOptions, source: Option<&str>, grid_points: usize) -> RunReport {
    let grid = curve_grid(&run.selection.best, run.stats.x_min, run.stats.x_max, grid_points);
    RunReport {
        tool: format!("labfit {}", env!("CARGO_PKG_VERSION")),
        generated_at: Utc::now(),
        source: source.map(str::to_string),
        stats: run.stats,
        options: *options,
        selection: run.selection.clone(),
        residuals: run.residuals.clone(),
        grid,
    }
}
