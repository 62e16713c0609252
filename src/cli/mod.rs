//! Command-line parsing for the curve family comparison tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! fitting and reporting code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{CriterionConfig, FitOptions, ModelKind, SelectionConfig};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "labfit", version, about = "Fit lab data against several curve families and pick the best")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a CSV of (x, y) pairs, print the comparison, and optionally export.
    Fit(FitArgs),
    /// Generate a synthetic sample from one family and fit it.
    Demo(DemoArgs),
    /// Evaluate the chosen model of a saved JSON report at given x values.
    Eval(EvalArgs),
}

/// Options shared by every command that runs the fitter.
#[derive(Debug, Args, Clone)]
pub struct ModelArgs {
    /// Polynomial degree option (2-6); the Quartic slot is fitted at min(4, degree).
    #[arg(long, env = "LABFIT_DEGREE", default_value_t = 3)]
    pub degree: u8,

    /// R² at or above which a fit scores as near-perfect.
    #[arg(long, env = "LABFIT_NEAR_PERFECT_R2", default_value_t = CriterionConfig::default().near_perfect_r2)]
    pub near_perfect_r2: f64,

    /// R² at or below which a fit scores as near-zero.
    #[arg(long, env = "LABFIT_NEAR_ZERO_R2", default_value_t = CriterionConfig::default().near_zero_r2)]
    pub near_zero_r2: f64,

    /// R² differences within this margin are decided by AIC.
    #[arg(long, env = "LABFIT_TIE_MARGIN", default_value_t = SelectionConfig::default().r2_tie_margin)]
    pub tie_margin: f64,

    /// Print the residual table of the chosen model.
    #[arg(long)]
    pub residuals: bool,

    /// Number of points in the exported fitted grid.
    #[arg(long, default_value_t = 101)]
    pub grid_points: usize,

    /// Export the run report (selection, residuals, fitted grid) to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,

    /// Export residuals of the chosen model to CSV.
    #[arg(long = "export-residuals", value_name = "CSV")]
    pub export_residuals: Option<PathBuf>,
}

impl ModelArgs {
    pub fn fit_options(&self) -> FitOptions {
        FitOptions {
            polynomial_degree: self.degree,
            criterion: CriterionConfig {
                near_perfect_r2: self.near_perfect_r2,
                near_zero_r2: self.near_zero_r2,
                ..CriterionConfig::default()
            },
            selection: SelectionConfig {
                r2_tie_margin: self.tie_margin,
            },
        }
    }
}

/// Fit a CSV file.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Input CSV with numeric x and y columns.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// x column: header name or 1-based position (default: first column).
    #[arg(long = "x-col")]
    pub x_column: Option<String>,

    /// y column: header name or 1-based position (default: second column).
    #[arg(long = "y-col")]
    pub y_column: Option<String>,

    /// The first row is data, not a header.
    #[arg(long)]
    pub no_header: bool,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Generate and fit a synthetic sample.
#[derive(Debug, Args, Clone)]
pub struct DemoArgs {
    /// Family used to generate the data.
    #[arg(long, value_enum, default_value_t = ModelKind::Exponential)]
    pub family: ModelKind,

    /// Number of points.
    #[arg(short = 'n', long, default_value_t = 40)]
    pub count: usize,

    /// Lower end of the x range.
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub x_min: f64,

    /// Upper end of the x range.
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    pub x_max: f64,

    /// Relative noise level.
    #[arg(long, default_value_t = 0.05)]
    pub noise: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Evaluate a saved report.
#[derive(Debug, Args, Clone)]
pub struct EvalArgs {
    /// Report JSON produced by `labfit fit --export`.
    #[arg(long, value_name = "JSON")]
    pub report: PathBuf,

    /// x values to evaluate (comma-separated or repeated).
    #[arg(long, value_delimiter = ',', required = true, allow_hyphen_values = true)]
    pub x: Vec<f64>,
}
