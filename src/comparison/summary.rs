//! Descriptive statistics of scalar samples.

use serde::Serialize;
use statrs::statistics::Statistics;

/// Moments of a sample, population (biased) estimators throughout
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    /// m₃ / m₂^{3/2}
    pub skewness: f64,
    /// Excess kurtosis m₄ / m₂² − 3
    pub kurtosis: f64,
    pub min: f64,
    pub max: f64,
}

impl DescriptiveStats {
    /// Moments of `values`; every field is NaN for an empty sample
    pub fn from_slice(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                count: 0,
                mean: f64::NAN,
                variance: f64::NAN,
                std_dev: f64::NAN,
                skewness: f64::NAN,
                kurtosis: f64::NAN,
                min: f64::NAN,
                max: f64::NAN,
            };
        }

        let mean = values.mean();
        let variance = values.population_variance();
        let (skewness, kurtosis) = shape_moments(values, mean, variance);

        Self {
            count: values.len(),
            mean,
            variance,
            std_dev: variance.sqrt(),
            skewness,
            kurtosis,
            min: values.min(),
            max: values.max(),
        }
    }
}

fn shape_moments(values: &[f64], mean: f64, m2: f64) -> (f64, f64) {
    if m2 == 0.0 {
        return (f64::NAN, f64::NAN);
    }
    let n = values.len() as f64;
    let m3 = values.iter().map(|x| (x - mean).powi(3)).sum::<f64>() / n;
    let m4 = values.iter().map(|x| (x - mean).powi(4)).sum::<f64>() / n;
    (m3 / m2.powf(1.5), m4 / (m2 * m2) - 3.0)
}

/// Arithmetic mean, NaN for an empty sample
pub fn mean(values: &[f64]) -> f64 {
    values.mean()
}

/// Population variance, NaN for an empty sample
pub fn population_variance(values: &[f64]) -> f64 {
    values.population_variance()
}
