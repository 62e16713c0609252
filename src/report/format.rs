//! Formatted terminal output.
//!
//! Formatting lives in one place so the fitting code stays clean and output
//! changes stay localized.

use crate::domain::{DatasetStats, NOT_APPLICABLE, Residual, SelectionResult};
use crate::report::{ResidualSummary, largest_residuals, summarize_residuals};

/// Format the full run summary: dataset stats, family comparison, chosen model.
pub fn format_run_summary(source: &str, stats: &DatasetStats, selection: &SelectionResult) -> String {
    let mut out = String::new();

    out.push_str("=== labfit - curve family comparison ===\n");
    out.push_str(&format!("Source: {source}\n"));
    out.push_str(&format!(
        "Points: n={} | x=[{}, {}] | y=[{}, {}]\n",
        stats.n_points,
        fmt_num(stats.x_min),
        fmt_num(stats.x_max),
        fmt_num(stats.y_min),
        fmt_num(stats.y_max)
    ));

    out.push_str("\nModel comparison:\n");
    out.push_str(&format_comparison(selection));

    if !selection.skipped.is_empty() {
        out.push('\n');
        for skip in &selection.skipped {
            out.push_str(&format!("  (skipped {}) {}\n", skip.model, skip.reason));
        }
    }

    let best = &selection.best;
    out.push_str("\nChosen model:\n");
    out.push_str(&format!("- {}\n", best.model));
    out.push_str(&format!("- {}\n", best.equation));
    out.push_str(&format!("- coefficients: {}\n", fmt_vec(&best.coefficients)));
    out.push_str(&format!(
        "- R²={} AIC*={}\n",
        fmt_opt(best.r_squared, 6),
        fmt_opt(best.aic, 3)
    ));
    out.push_str("  (*AIC approximated from R²; use for ranking only)\n");

    out
}

/// Side-by-side table of every fitted family. The chosen one is starred.
pub fn format_comparison(selection: &SelectionResult) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        format!("  {:<12} {:>10} {:>14} {:>12}  {}", "model", "R²", "AIC*", "RMSE", "equation"),
    );
    push_row(
        &mut out,
        format!("  {:-<12} {:->10} {:->14} {:->12}  {:-<8}", "", "", "", "", ""),
    );

    for fit in &selection.all_models {
        let chosen = if fit.model == selection.best.model { "*" } else { " " };
        push_row(
            &mut out,
            format!(
                "{chosen} {:<12} {:>10} {:>14} {:>12}  {}",
                fit.model.label(),
                fmt_opt(fit.r_squared, 6),
                fmt_opt(fit.aic, 3),
                fmt_opt(fit.rmse, 4),
                fit.equation
            ),
        );
    }

    out
}

/// Residual table (input order), followed by a one-line summary.
pub fn format_residuals(residuals: &[Residual]) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        format!("{:>12} {:>12} {:>12} {:>12}", "x", "y", "fitted", "residual"),
    );
    push_row(&mut out, format!("{:->12} {:->12} {:->12} {:->12}", "", "", "", ""));

    for r in residuals {
        push_row(
            &mut out,
            format!(
                "{:>12} {:>12} {:>12} {:>12}",
                fmt_num(r.x),
                fmt_num(r.y),
                fmt_opt(r.fitted, 4),
                fmt_opt(r.residual, 4)
            ),
        );
    }

    out.push_str(&format_residual_summary(&summarize_residuals(residuals)));
    out
}

/// The `top_n` worst-fitted points of the chosen model.
pub fn format_largest_residuals(residuals: &[Residual], top_n: usize) -> String {
    let top = largest_residuals(residuals, top_n);
    if top.is_empty() {
        return String::new();
    }
    let mut out = format!("Largest residuals (top {}):\n", top.len());
    for r in &top {
        push_row(
            &mut out,
            format!("  x={} y={} residual={}", fmt_num(r.x), fmt_num(r.y), fmt_opt(r.residual, 4)),
        );
    }
    out
}

pub fn format_residual_summary(summary: &ResidualSummary) -> String {
    format!(
        "Residuals: {} defined, {} undefined | max|r|={} mean|r|={}\n",
        summary.defined,
        summary.undefined,
        fmt_opt(summary.max_abs, 4),
        fmt_opt(summary.mean_abs, 4)
    )
}

fn push_row(out: &mut String, row: String) {
    out.push_str(row.trim_end());
    out.push('\n');
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.decimals$}"),
        _ => NOT_APPLICABLE.to_string(),
    }
}

fn fmt_num(v: f64) -> String {
    let abs = v.abs();
    if v != 0.0 && !(1e-3..1e6).contains(&abs) {
        format!("{v:.3e}")
    } else {
        format!("{v:.4}")
    }
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", parts.join(", "))
}
