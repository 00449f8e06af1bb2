//! Sample autocorrelation and Yule-Walker estimation

use crate::error::{Error, Result};
use crate::stats::{mean, normal_quantile};

/// Sample autocorrelation function with confidence bands
#[derive(Debug, Clone)]
pub struct AcfResult {
    /// Autocorrelation at lags `0..=nlags`
    pub values: Vec<f64>,
    /// Half-width of the confidence band at each lag (Bartlett's formula)
    pub confint: Vec<f64>,
    /// Significance level used for the band
    pub alpha: f64,
    /// Number of observations
    pub nobs: usize,
}

impl AcfResult {
    /// Highest lag computed
    pub fn nlags(&self) -> usize {
        self.values.len().saturating_sub(1)
    }

    /// Lags (excluding 0) whose correlation lies outside the band
    pub fn significant_lags(&self) -> Vec<usize> {
        self.values
            .iter()
            .zip(self.confint.iter())
            .enumerate()
            .skip(1)
            .filter(|(_, (r, w))| r.abs() > **w)
            .map(|(lag, _)| lag)
            .collect()
    }
}

/// Autocovariances at lags `0..=nlags` (divide-by-n estimator)
fn autocovariances(values: &[f64], nlags: usize) -> Vec<f64> {
    let n = values.len();
    let m = mean(values);
    let centered: Vec<f64> = values.iter().map(|v| v - m).collect();

    (0..=nlags)
        .map(|lag| {
            centered
                .iter()
                .take(n - lag)
                .zip(centered.iter().skip(lag))
                .map(|(a, b)| a * b)
                .sum::<f64>()
                / n as f64
        })
        .collect()
}

/// Compute the sample ACF up to `nlags` with a `1 - alpha` Bartlett band
///
/// `nlags` is clamped to `len - 1`. Lag 0 has a band width of zero.
pub fn acf(values: &[f64], nlags: usize, alpha: f64) -> Result<AcfResult> {
    let n = values.len();
    if n < 2 {
        return Err(Error::InsufficientData { needed: 2, got: n });
    }
    if !(0.0..1.0).contains(&alpha) || alpha == 0.0 {
        return Err(Error::InvalidInput(format!(
            "alpha must be in (0, 1), got {}",
            alpha
        )));
    }

    let nlags = nlags.min(n - 1);
    let acov = autocovariances(values, nlags);
    if acov[0].abs() < 1e-12 {
        return Err(Error::ComputationError(
            "autocorrelation is undefined for a constant series".to_string(),
        ));
    }

    let values: Vec<f64> = acov.iter().map(|c| c / acov[0]).collect();

    let z = normal_quantile(1.0 - alpha / 2.0);
    let mut confint = Vec::with_capacity(values.len());
    confint.push(0.0);
    let mut cumulative = 0.0;
    for k in 1..values.len() {
        if k > 1 {
            cumulative += values[k - 1] * values[k - 1];
        }
        confint.push(z * ((1.0 + 2.0 * cumulative) / n as f64).sqrt());
    }

    Ok(AcfResult {
        values,
        confint,
        alpha,
        nobs: n,
    })
}

/// Estimate AR coefficients with the Yule-Walker equations (Levinson-Durbin)
///
/// Returns `order` coefficients. A constant series yields zeros.
pub fn yule_walker(values: &[f64], order: usize) -> Result<Vec<f64>> {
    if order == 0 {
        return Ok(vec![]);
    }
    if values.len() <= order {
        return Err(Error::InsufficientData {
            needed: order + 1,
            got: values.len(),
        });
    }

    let acov = autocovariances(values, order);
    if acov[0].abs() < 1e-10 {
        return Ok(vec![0.0; order]);
    }
    let r: Vec<f64> = acov.iter().map(|c| c / acov[0]).collect();

    let mut phi: Vec<f64> = Vec::with_capacity(order);
    let mut error: f64 = 1.0;

    for k in 1..=order {
        let acc = r[k]
            - phi
                .iter()
                .enumerate()
                .map(|(j, p)| p * r[k - 1 - j])
                .sum::<f64>();
        let reflection = if error.abs() < 1e-12 { 0.0 } else { acc / error };

        let previous = phi.clone();
        for j in 0..k - 1 {
            phi[j] = previous[j] - reflection * previous[k - 2 - j];
        }
        phi.push(reflection);
        error *= 1.0 - reflection * reflection;
    }

    Ok(phi)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ar1(phi: f64, n: usize) -> Vec<f64> {
        // deterministic pseudo-noise
        let mut state: u64 = 42;
        let mut x = 0.0;
        (0..n)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let e = ((state >> 33) as f64 / (1u64 << 31) as f64) - 0.5;
                x = phi * x + e;
                x
            })
            .collect()
    }

    #[test]
    fn test_acf_lag_zero_is_one() {
        let result = acf(&[1.0, 3.0, 2.0, 5.0, 4.0], 3, 0.05).unwrap();
        assert_eq!(result.values.len(), 4);
        assert!((result.values[0] - 1.0).abs() < 1e-12);
        assert_eq!(result.confint[0], 0.0);
    }

    #[test]
    fn test_acf_band_is_non_decreasing() {
        let data = ar1(0.7, 500);
        let result = acf(&data, 40, 0.05).unwrap();
        for w in result.confint[1..].windows(2) {
            assert!(w[1] >= w[0]);
        }
        assert!(result.significant_lags().contains(&1));
    }

    #[test]
    fn test_acf_clamps_lags_and_rejects_constant() {
        let result = acf(&[1.0, 2.0, 3.0], 200, 0.05).unwrap();
        assert_eq!(result.nlags(), 2);
        assert!(acf(&[2.0; 10], 3, 0.05).is_err());
    }

    #[test]
    fn test_yule_walker_recovers_ar1() {
        let data = ar1(0.6, 5000);
        let phi = yule_walker(&data, 1).unwrap();
        assert!((phi[0] - 0.6).abs() < 0.05, "phi = {}", phi[0]);

        let phi2 = yule_walker(&data, 2).unwrap();
        assert!((phi2[0] - 0.6).abs() < 0.05);
        assert!(phi2[1].abs() < 0.05);
    }

    #[test]
    fn test_yule_walker_higher_order_stays_finite() {
        let data = ar1(0.9, 2000);
        let phi = yule_walker(&data, 4).unwrap();
        assert_eq!(phi.len(), 4);
        assert!(phi.iter().all(|p| p.is_finite()));
        assert!((phi[0] - 0.9).abs() < 0.05, "phi = {:?}", phi);
        assert!(phi[1..].iter().all(|p| p.abs() < 0.1));
        assert_eq!(yule_walker(&[3.0; 20], 2).unwrap(), vec![0.0, 0.0]);
    }
}
