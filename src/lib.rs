//! `lab-curves` library crate.
//!
//! The binary (`labfit`) is a thin wrapper around this library so that:
//!
//! - the fitting core is testable without spawning processes
//! - `fit_all` can be called directly by other tools
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
