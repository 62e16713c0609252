//! Exports: JSON run report and residuals CSV.
//!
//! The JSON report is the portable record of a run (schema: `domain::RunReport`).
//! It can be reloaded to evaluate the chosen model without refitting.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{NOT_APPLICABLE, Residual, RunReport};
use crate::error::AppError;

/// Write a run report as pretty JSON.
pub fn write_report_json(path: &Path, report: &RunReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;
    Ok(())
}

/// Read a run report written by `write_report_json`.
pub fn read_report_json(path: &Path) -> Result<RunReport, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open report JSON '{}': {e}", path.display())))?;
    let report: RunReport =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid report JSON: {e}")))?;
    Ok(report)
}

/// Write residuals of the chosen model to CSV (input order).
pub fn write_residuals_csv(path: &Path, residuals: &[Residual], model_label: &str) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create residuals CSV '{}': {e}", path.display())))?;
    write_residuals(&mut file, residuals, model_label)
}

fn write_residuals<W: Write>(out: &mut W, residuals: &[Residual], model_label: &str) -> Result<(), AppError> {
    writeln!(out, "x,y,fitted,residual,model")
        .map_err(|e| AppError::new(2, format!("Failed to write residuals CSV header: {e}")))?;

    for r in residuals {
        writeln!(
            out,
            "{},{},{},{},{}",
            r.x,
            r.y,
            fmt_cell(r.fitted),
            fmt_cell(r.residual),
            model_label
        )
        .map_err(|e| AppError::new(2, format!("Failed to write residuals CSV row: {e}")))?;
    }
    Ok(())
}

fn fmt_cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.10}"),
        None => NOT_APPLICABLE.to_string(),
    }
}
