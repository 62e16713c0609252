//! Synthetic sample generation for demos and tests.
//!
//! Points are placed on an even x-grid and perturbed with Gaussian noise:
//! multiplicative (log-normal) for the exponential and power families so `y`
//! stays positive, additive and scaled to the curve's magnitude otherwise.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::domain::{DataPoint, DatasetStats, ModelKind};
use crate::error::AppError;
use crate::models::predict;

/// How to generate a synthetic dataset.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub family: ModelKind,
    /// True coefficients; `None` uses `default_coefficients(family)`.
    pub coefficients: Option<Vec<f64>>,
    pub count: usize,
    pub x_min: f64,
    pub x_max: f64,
    /// Relative noise level (standard deviation as a fraction of the signal).
    pub noise: f64,
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            family: ModelKind::Linear,
            coefficients: None,
            count: 40,
            x_min: 1.0,
            x_max: 10.0,
            noise: 0.05,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SampleData {
    pub family: ModelKind,
    pub coefficients: Vec<f64>,
    pub points: Vec<DataPoint>,
    pub stats: DatasetStats,
}

/// Reasonable "true" coefficients per family.
pub fn default_coefficients(family: ModelKind) -> Vec<f64> {
    match family {
        ModelKind::Linear => vec![2.0, 1.0],
        ModelKind::Quadratic => vec![0.5, -3.0, 6.0],
        ModelKind::Cubic => vec![0.1, -1.2, 3.5, 2.0],
        ModelKind::Quartic => vec![0.02, -0.4, 2.5, -5.0, 4.0],
        ModelKind::Exponential => vec![1.5, 0.35],
        ModelKind::Logarithmic => vec![2.0, 3.0],
        ModelKind::Power => vec![2.0, 1.5],
    }
}

pub fn generate_sample(config: &SampleConfig) -> Result<SampleData, AppError> {
    if config.count < 2 {
        return Err(AppError::new(2, "Sample count must be >= 2."));
    }
    if !(config.x_min.is_finite() && config.x_max.is_finite() && config.x_max > config.x_min) {
        return Err(AppError::new(2, "Invalid x range for sample generation."));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(AppError::new(2, "Noise level must be finite and >= 0."));
    }

    let family = config.family;
    let coefficients = config
        .coefficients
        .clone()
        .unwrap_or_else(|| default_coefficients(family));
    if !family.accepts_coefficients(coefficients.len()) {
        return Err(AppError::new(
            2,
            format!(
                "{family} cannot take {} coefficients (expected {}).",
                coefficients.len(),
                family.coefficient_count()
            ),
        ));
    }

    let xs: Vec<f64> = (0..config.count)
        .map(|i| {
            let u = i as f64 / (config.count as f64 - 1.0);
            config.x_min + u * (config.x_max - config.x_min)
        })
        .collect();

    let mut truth = Vec::with_capacity(xs.len());
    for &x in &xs {
        let y = predict(family, &coefficients, x).ok_or_else(|| {
            AppError::new(2, format!("{family} is undefined at x={x}; choose a positive x range."))
        })?;
        truth.push(y);
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, 1.0).map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let multiplicative = matches!(family, ModelKind::Exponential | ModelKind::Power)
        && truth.iter().all(|y| *y > 0.0);
    let scale = truth.iter().map(|y| y.abs()).sum::<f64>() / truth.len() as f64;

    let points: Vec<DataPoint> = xs
        .iter()
        .zip(&truth)
        .map(|(&x, &y)| {
            let z: f64 = normal.sample(&mut rng);
            let y_obs = if multiplicative {
                y * (config.noise * z).exp()
            } else {
                y + config.noise * scale * z
            };
            DataPoint::new(x, y_obs)
        })
        .collect();

    let stats = DatasetStats::from_points(&points).ok_or_else(|| AppError::new(4, "Failed to compute sample stats."))?;

    Ok(SampleData {
        family,
        coefficients,
        points,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sample() {
        let config = SampleConfig {
            family: ModelKind::Cubic,
            ..SampleConfig::default()
        };
        let a = generate_sample(&config).unwrap();
        let b = generate_sample(&config).unwrap();
        assert_eq!(a.points, b.points);

        let c = generate_sample(&SampleConfig { seed: 7, ..config }).unwrap();
        assert_ne!(a.points, c.points);
    }

    #[test]
    fn zero_noise_reproduces_the_curve() {
        let config = SampleConfig {
            family: ModelKind::Logarithmic,
            noise: 0.0,
            count: 5,
            ..SampleConfig::default()
        };
        let sample = generate_sample(&config).unwrap();
        for p in &sample.points {
            let expected = 2.0 + 3.0 * p.x.ln();
            assert!((p.y - expected).abs() < 1e-12);
        }
        assert_eq!(sample.points[0].x, 1.0);
        assert_eq!(sample.points[4].x, 10.0);
    }

    #[test]
    fn multiplicative_noise_keeps_exponential_positive() {
        let config = SampleConfig {
            family: ModelKind::Exponential,
            noise: 0.5,
            count: 200,
            ..SampleConfig::default()
        };
        let sample = generate_sample(&config).unwrap();
        assert!(sample.points.iter().all(|p| p.y > 0.0));
    }

    #[test]
    fn rejects_bad_configs() {
        let bad_range = SampleConfig {
            x_min: 5.0,
            x_max: 1.0,
            ..SampleConfig::default()
        };
        assert_eq!(generate_sample(&bad_range).unwrap_err().exit_code(), 2);

        let undefined = SampleConfig {
            family: ModelKind::Power,
            x_min: -1.0,
            ..SampleConfig::default()
        };
        assert!(generate_sample(&undefined).is_err());

        let wrong_len = SampleConfig {
            coefficients: Some(vec![1.0]),
            ..SampleConfig::default()
        };
        assert!(generate_sample(&wrong_len).is_err());
    }
}
