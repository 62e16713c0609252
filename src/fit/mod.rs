//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - fit each candidate family (`fitter`)
//! - score fits with the R²-based information criterion (`criterion`)
//! - select the preferred model with the R² tie-break rule (`selection`)

pub mod criterion;
pub mod fitter;
pub mod selection;

pub use criterion::*;
pub use fitter::*;
pub use selection::*;
