//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads CSV data or generates synthetic samples
//! - runs curve fitting + model selection
//! - prints reports
//! - writes optional exports

use clap::Parser;

use crate::cli::{Cli, Command, DemoArgs, EvalArgs, FitArgs, ModelArgs};
use crate::domain::{DataPoint, NOT_APPLICABLE};
use crate::error::AppError;
use crate::io::IngestOptions;

pub mod pipeline;

/// Entry point for the `labfit` binary.
pub fn run() -> Result<(), AppError> {
    // A local `.env` may carry LABFIT_* defaults; clap reads them via `env = ...`.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Demo(args) => handle_demo(args),
        Command::Eval(args) => handle_eval(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let ingest_opts = IngestOptions {
        x_column: args.x_column.clone(),
        y_column: args.y_column.clone(),
        no_header: args.no_header,
    };
    let data = crate::io::load_points(&args.input, &ingest_opts)?;

    if !data.row_errors.is_empty() {
        log::warn!(
            "{}: using {} of {} rows ({} skipped)",
            data.source,
            data.rows_used(),
            data.rows_read,
            data.row_errors.len()
        );
        for err in data.row_errors.iter().take(5) {
            log::warn!("  line {}: {}", err.line, err.message);
        }
    }

    analyze(&data.points, &data.source, &args.model)
}

fn handle_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = crate::data::SampleConfig {
        family: args.family,
        coefficients: None,
        count: args.count,
        x_min: args.x_min,
        x_max: args.x_max,
        noise: args.noise,
        seed: args.seed,
    };
    let sample = crate::data::generate_sample(&config)?;
    let source = format!(
        "synthetic {} (coefficients {:?}, noise {}, seed {})",
        sample.family, sample.coefficients, config.noise, config.seed
    );

    analyze(&sample.points, &source, &args.model)
}

fn handle_eval(args: EvalArgs) -> Result<(), AppError> {
    let report = crate::io::read_report_json(&args.report)?;
    let best = &report.selection.best;

    println!("{}", best.equation);
    for x in args.x {
        match crate::models::evaluate(best, x) {
            Some(y) => println!("{x}\t{y}"),
            None => println!("{x}\t{NOT_APPLICABLE}"),
        }
    }
    Ok(())
}

/// Fit, print, and export. Shared by `fit` and `demo`.
fn analyze(points: &[DataPoint], source: &str, model: &ModelArgs) -> Result<(), AppError> {
    let options = model.fit_options();
    let run = pipeline::run_fit(points, &options)?;

    println!(
        "{}",
        crate::report::format_run_summary(source, &run.stats, &run.selection)
    );

    if model.residuals {
        println!("{}", crate::report::format_residuals(&run.residuals));
    } else {
        println!("{}", crate::report::format_largest_residuals(&run.residuals, 3));
    }

    // Optional exports.
    if let Some(path) = &model.export {
        let report = pipeline::build_report(&run, &options, Some(source), model.grid_points);
        crate::io::write_report_json(path, &report)?;
        log::info!("wrote report to {}", path.display());
    }
    if let Some(path) = &model.export_residuals {
        crate::io::write_residuals_csv(path, &run.residuals, run.selection.best.model.label())?;
        log::info!("wrote residuals to {}", path.display());
    }

    Ok(())
}
