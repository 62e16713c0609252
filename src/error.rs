//! Error types.
//!
//! Two layers:
//!
//! - `FitError` / `FitFailure`: typed errors of the fitting core.
//! - `AppError`: what the binary reports, carrying a process exit code.

use thiserror::Error;

/// Whole-run failure of `fit_all`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    /// The input was rejected before any family was attempted.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Every family failed or produced unusable statistics.
    #[error("No valid model: all {attempted} attempted families failed or had unusable R²/AIC")]
    NoValidModel { attempted: usize },
}

/// Why a single family could not be fitted.
///
/// These are recovered by the selector and only surface as "skipped"
/// entries in the comparison output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitFailure {
    #[error("needs at least {needed} points, got {got}")]
    InsufficientPoints { needed: usize, got: usize },

    #[error("requires all x > 0")]
    NonPositiveX,

    #[error("requires all y > 0")]
    NonPositiveY,

    #[error("linear system is singular or ill-conditioned")]
    Singular,

    #[error("non-finite coefficients")]
    NonFinite,
}

/// Convenience alias for per-family fitter outcomes.
pub type FamilyOutcome = Result<crate::domain::FitResult, FitFailure>;

/// Application-level error with an exit code.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        let code = match err {
            FitError::InvalidInput(_) => 2,
            FitError::NoValidModel { .. } => 3,
        };
        AppError::new(code, err.to_string())
    }
}
