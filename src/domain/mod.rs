//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input points (`DataPoint`) and the closed family set (`ModelKind`)
//! - fit outputs (`FitResult`, `SelectionResult`, `Residual`, `CurveGrid`)
//! - run configuration (`FitOptions`, `CriterionConfig`, `SelectionConfig`)

pub mod types;

pub use types::*;
