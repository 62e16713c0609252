//! Shared domain types.
//!
//! These types are kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting and selection
//! - exported to JSON for plotting/reporting collaborators
//! - reloaded later to evaluate a saved model

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::FitError;

/// Marker written in place of a statistic that does not apply.
pub const NOT_APPLICABLE: &str = "N/A";

/// One observed `(x, y)` pair.
///
/// Order within a dataset is preserved for residual display but does not
/// affect fitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for DataPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Candidate functional forms.
///
/// Coefficient layout per family:
///
/// - polynomial families (`Linear` ..= `Quartic`): highest degree first, constant last
/// - `Exponential`: `[a, b]` for `y = a·e^(b·x)`
/// - `Logarithmic`: `[a, b]` for `y = a + b·ln(x)`
/// - `Power`: `[a, b]` for `y = a·x^b`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum ModelKind {
    Linear,
    Quadratic,
    Cubic,
    Quartic,
    Exponential,
    Logarithmic,
    Power,
}

impl ModelKind {
    /// Every family, in attempt order. This order is also the tie-break precedence.
    pub const ALL: [ModelKind; 7] = [
        ModelKind::Linear,
        ModelKind::Quadratic,
        ModelKind::Cubic,
        ModelKind::Quartic,
        ModelKind::Exponential,
        ModelKind::Logarithmic,
        ModelKind::Power,
    ];

    /// Label used in terminal output and serialized results.
    pub fn label(self) -> &'static str {
        match self {
            ModelKind::Linear => "Linear",
            ModelKind::Quadratic => "Quadratic",
            ModelKind::Cubic => "Cubic",
            ModelKind::Quartic => "Quartic",
            ModelKind::Exponential => "Exponential",
            ModelKind::Logarithmic => "Logarithmic",
            ModelKind::Power => "Power",
        }
    }

    /// Nominal polynomial degree, or `None` for the transformed families.
    ///
    /// The Quartic slot may be fitted at a lower degree, see `FitOptions`.
    pub fn polynomial_degree(self) -> Option<usize> {
        match self {
            ModelKind::Linear => Some(1),
            ModelKind::Quadratic => Some(2),
            ModelKind::Cubic => Some(3),
            ModelKind::Quartic => Some(4),
            ModelKind::Exponential | ModelKind::Logarithmic | ModelKind::Power => None,
        }
    }

    /// Number of coefficients at the nominal degree.
    pub fn coefficient_count(self) -> usize {
        match self.polynomial_degree() {
            Some(d) => d + 1,
            None => 2,
        }
    }

    /// Whether `n` coefficients is a valid shape for this family.
    ///
    /// The Quartic slot is fitted at degree 2 to 4, so it takes 3 to 5
    /// coefficients; every other family has a fixed count.
    pub fn accepts_coefficients(self, n: usize) -> bool {
        match self {
            ModelKind::Quartic => (3..=5).contains(&n),
            _ => n == self.coefficient_count(),
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Fit output for a single family.
///
/// `r_squared` is `None` when the statistic is undefined (zero variance in y,
/// non-finite predictions) or falls outside `[0, 1]`. `aic` is `None` when the
/// information criterion is undefined. Both serialize as `"N/A"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub model: ModelKind,
    pub equation: String,
    pub coefficients: Vec<f64>,
    #[serde(with = "not_applicable")]
    pub r_squared: Option<f64>,
    #[serde(with = "not_applicable")]
    pub aic: Option<f64>,
    /// Root mean squared error on the original y scale.
    #[serde(with = "not_applicable")]
    pub rmse: Option<f64>,
}

impl FitResult {
    /// Whether this entry may take part in best-model selection.
    pub fn is_selectable(&self) -> bool {
        let r2_ok = matches!(self.r_squared, Some(r2) if (0.0..=1.0).contains(&r2));
        let aic_ok = matches!(self.aic, Some(aic) if aic.is_finite());
        r2_ok && aic_ok
    }
}

/// A family that could not be fitted, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedFamily {
    pub model: ModelKind,
    pub reason: String,
}

/// Output of `fit_all`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub best: FitResult,
    /// Every family that produced coefficients, in attempt order, including
    /// those with non-applicable statistics.
    pub all_models: Vec<FitResult>,
    /// Families that failed to fit, in attempt order.
    pub skipped: Vec<SkippedFamily>,
}

/// Observed vs fitted value at one data point.
///
/// `fitted` and `residual` are `None` where the model is undefined at `x`
/// (e.g. `x <= 0` for logarithmic and power fits).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Residual {
    pub x: f64,
    pub y: f64,
    pub fitted: Option<f64>,
    pub residual: Option<f64>,
}

impl Residual {
    pub fn is_defined(&self) -> bool {
        self.residual.is_some()
    }
}

/// A fitted curve sampled on an even x-grid (for plotting).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveGrid {
    pub x: Vec<f64>,
    pub y: Vec<Option<f64>>,
}

/// Summary stats about the points used for fitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub n_points: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl DatasetStats {
    /// Compute stats; `None` for an empty dataset.
    pub fn from_points(points: &[DataPoint]) -> Option<Self> {
        let first = points.first()?;
        let mut stats = DatasetStats {
            n_points: points.len(),
            x_min: first.x,
            x_max: first.x,
            y_min: first.y,
            y_max: first.y,
        };
        for p in &points[1..] {
            stats.x_min = stats.x_min.min(p.x);
            stats.x_max = stats.x_max.max(p.x);
            stats.y_min = stats.y_min.min(p.y);
            stats.y_max = stats.y_max.max(p.y);
        }
        Some(stats)
    }
}

/// Calibration of the R²-based information criterion.
///
/// The boundary branches work around `ln(1 - R²)` being ill-defined near
/// `R² = 1` and uninformative near `R² = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriterionConfig {
    /// R² at or above this value takes the near-perfect branch.
    pub near_perfect_r2: f64,
    /// R² at or below this value takes the near-zero branch.
    pub near_zero_r2: f64,
    /// Score base for near-perfect fits (lower is better).
    pub perfect_baseline: f64,
    /// Score base for near-zero fits.
    pub poor_baseline: f64,
    /// Added per coefficient in both boundary branches.
    pub complexity_step: f64,
}

impl Default for CriterionConfig {
    fn default() -> Self {
        Self {
            near_perfect_r2: 0.9999,
            near_zero_r2: 1e-4,
            perfect_baseline: -1.0e6,
            poor_baseline: 1.0e6,
            complexity_step: 2.0,
        }
    }
}

impl CriterionConfig {
    pub fn validate(&self) -> Result<(), FitError> {
        let thresholds_ok = self.near_zero_r2.is_finite()
            && self.near_perfect_r2.is_finite()
            && self.near_zero_r2 >= 0.0
            && self.near_zero_r2 < self.near_perfect_r2
            && self.near_perfect_r2 <= 1.0;
        if !thresholds_ok {
            return Err(FitError::InvalidInput(format!(
                "criterion thresholds must satisfy 0 <= near_zero ({}) < near_perfect ({}) <= 1",
                self.near_zero_r2, self.near_perfect_r2
            )));
        }
        let scores_ok = self.perfect_baseline.is_finite()
            && self.poor_baseline.is_finite()
            && self.complexity_step.is_finite()
            && self.complexity_step >= 0.0;
        if !scores_ok {
            return Err(FitError::InvalidInput(
                "criterion baselines must be finite and complexity step >= 0".into(),
            ));
        }
        Ok(())
    }
}

/// Tie-break rule used by the selector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// R² differences at or below this margin are treated as a tie and
    /// decided by AIC.
    pub r2_tie_margin: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self { r2_tie_margin: 0.05 }
    }
}

/// Smallest and largest accepted polynomial degree option.
pub const MIN_POLYNOMIAL_DEGREE: u8 = 2;
pub const MAX_POLYNOMIAL_DEGREE: u8 = 6;

/// Options for a single `fit_all` call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    /// Polynomial degree option (2..=6). Every family is always attempted;
    /// this only sets the degree of the Quartic slot, `min(4, degree)`.
    pub polynomial_degree: u8,
    pub criterion: CriterionConfig,
    pub selection: SelectionConfig,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            polynomial_degree: 3,
            criterion: CriterionConfig::default(),
            selection: SelectionConfig::default(),
        }
    }
}

impl FitOptions {
    pub fn validate(&self) -> Result<(), FitError> {
        if !(MIN_POLYNOMIAL_DEGREE..=MAX_POLYNOMIAL_DEGREE).contains(&self.polynomial_degree) {
            return Err(FitError::InvalidInput(format!(
                "polynomial degree must be in [{MIN_POLYNOMIAL_DEGREE}, {MAX_POLYNOMIAL_DEGREE}], got {}",
                self.polynomial_degree
            )));
        }
        let margin = self.selection.r2_tie_margin;
        if !(margin.is_finite() && margin >= 0.0) {
            return Err(FitError::InvalidInput(format!(
                "R² tie margin must be finite and >= 0, got {margin}"
            )));
        }
        self.criterion.validate()
    }
}

/// Degree the Quartic slot is fitted at: `min(4, degree)`, never below 2.
pub fn quartic_degree(polynomial_degree: u8) -> usize {
    usize::from(polynomial_degree.clamp(MIN_POLYNOMIAL_DEGREE, 4))
}

/// Portable record of one analysis run (JSON export).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub source: Option<String>,
    pub stats: DatasetStats,
    pub options: FitOptions,
    pub selection: SelectionResult,
    pub residuals: Vec<Residual>,
    pub grid: CurveGrid,
}

/// Serde adapter writing `Option<f64>` as a number or `"N/A"`.
pub mod not_applicable {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::NOT_APPLICABLE;

    pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) if v.is_finite() => serializer.serialize_f64(*v),
            _ => serializer.serialize_str(NOT_APPLICABLE),
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(Some(v)),
            Raw::Text(s) if s == NOT_APPLICABLE => Ok(None),
            Raw::Text(s) => Err(D::Error::custom(format!(
                "expected a number or \"{NOT_APPLICABLE}\", got \"{s}\""
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit(r_squared: Option<f64>, aic: Option<f64>) -> FitResult {
        FitResult {
            model: ModelKind::Linear,
            equation: "y = x".to_string(),
            coefficients: vec![1.0, 0.0],
            r_squared,
            aic,
            rmse: Some(0.0),
        }
    }

    #[test]
    fn quartic_slot_degree_follows_option() {
        assert_eq!(quartic_degree(2), 2);
        assert_eq!(quartic_degree(FitOptions::default().polynomial_degree), 3);
        assert_eq!(quartic_degree(4), 4);
        assert_eq!(quartic_degree(6), 4);
        assert_eq!(quartic_degree(0), 2);
    }

    #[test]
    fn quartic_accepts_lower_degree_shapes() {
        for n in 3..=5 {
            assert!(ModelKind::Quartic.accepts_coefficients(n));
        }
        assert!(!ModelKind::Quartic.accepts_coefficients(2));
        assert!(!ModelKind::Cubic.accepts_coefficients(3));
        assert!(ModelKind::Power.accepts_coefficients(2));
    }

    #[test]
    fn degree_outside_range_is_rejected() {
        for degree in [0, 1, 7] {
            let opts = FitOptions {
                polynomial_degree: degree,
                ..FitOptions::default()
            };
            assert!(matches!(opts.validate(), Err(FitError::InvalidInput(_))));
        }
        assert!(FitOptions::default().validate().is_ok());
    }

    #[test]
    fn criterion_thresholds_must_be_ordered() {
        let cfg = CriterionConfig {
            near_zero_r2: 0.5,
            near_perfect_r2: 0.4,
            ..CriterionConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn selectable_requires_valid_r2_and_finite_aic() {
        assert!(fit(Some(0.9), Some(-3.0)).is_selectable());
        assert!(!fit(None, Some(-3.0)).is_selectable());
        assert!(!fit(Some(-0.2), Some(-3.0)).is_selectable());
        assert!(!fit(Some(0.9), None).is_selectable());
        assert!(!fit(Some(0.9), Some(f64::INFINITY)).is_selectable());
    }

    #[test]
    fn not_applicable_marker_serializes_and_parses() {
        let original = fit(None, Some(-12.5));
        let json = serde_json::to_value(&original).unwrap();
        assert_eq!(json["model"], "Linear");
        assert_eq!(json["r_squared"], NOT_APPLICABLE);
        assert_eq!(json["aic"], -12.5);

        let back: FitResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn unknown_marker_is_rejected() {
        let json = r#"{"model":"Power","equation":"","coefficients":[],"r_squared":"bad","aic":"N/A","rmse":"N/A"}"#;
        assert!(serde_json::from_str::<FitResult>(json).is_err());
    }

    #[test]
    fn stats_cover_extremes() {
        let pts = [DataPoint::new(2.0, -1.0), DataPoint::new(-3.0, 4.0), DataPoint::new(1.0, 0.5)];
        let stats = DatasetStats::from_points(&pts).unwrap();
        assert_eq!(stats.n_points, 3);
        assert_eq!((stats.x_min, stats.x_max), (-3.0, 2.0));
        assert_eq!((stats.y_min, stats.y_max), (-1.0, 4.0));
        assert!(DatasetStats::from_points(&[]).is_none());
    }
}
