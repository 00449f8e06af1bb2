//! Statistics helpers
//!
//! Descriptive statistics for printing summaries, the sample autocorrelation
//! function with Bartlett bands, Yule-Walker estimation, normal distribution
//! helpers and a small dense matrix inverse used for coefficient standard
//! errors.

pub mod autocorrelation;
pub mod descriptive;
pub mod matrix;

use crate::error::Result;

pub use autocorrelation::{acf, yule_walker, AcfResult};
pub use matrix::matrix_inverse;

/// Compute descriptive statistics
///
/// # Example
/// ```rust
/// use tempcast::stats;
///
/// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// let summary = stats::describe(&data).unwrap();
/// assert_eq!(summary.count, 5);
/// assert_eq!(summary.median, 3.0);
/// ```
pub fn describe<T: AsRef<[f64]>>(data: T) -> Result<DescriptiveStats> {
    descriptive::describe_impl(data.as_ref())
}

/// Descriptive statistics of a sample
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    /// Number of observations
    pub count: usize,
    /// Mean
    pub mean: f64,
    /// Standard deviation (unbiased)
    pub std: f64,
    /// Minimum
    pub min: f64,
    /// 25th percentile
    pub q1: f64,
    /// Median
    pub median: f64,
    /// 75th percentile
    pub q3: f64,
    /// Maximum
    pub max: f64,
}

/// Arithmetic mean; 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard normal CDF (Abramowitz and Stegun 7.1.26)
pub fn normal_cdf(z: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = if z < 0.0 { -1.0 } else { 1.0 };
    let x = z.abs() / std::f64::consts::SQRT_2;

    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();

    0.5 * (1.0 + sign * y)
}

/// Standard normal quantile (Abramowitz and Stegun 26.2.23)
pub fn normal_quantile(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    let t = if p < 0.5 {
        (-2.0 * p.ln()).sqrt()
    } else {
        (-2.0 * (1.0 - p).ln()).sqrt()
    };

    const C0: f64 = 2.515517;
    const C1: f64 = 0.802853;
    const C2: f64 = 0.010328;
    const D1: f64 = 1.432788;
    const D2: f64 = 0.189269;
    const D3: f64 = 0.001308;

    let result = t - (C0 + C1 * t + C2 * t * t) / (1.0 + D1 * t + D2 * t * t + D3 * t * t * t);

    if p < 0.5 {
        -result
    } else {
        result
    }
}
