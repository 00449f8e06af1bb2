//! Fixed-lag differencing and its inverse
//!
//! Seasonal differencing subtracts the value observed one seasonal period
//! earlier: `out[i] = x[i + lag] - x[i]`. The inverse rebuilds an absolute
//! value by adding a (forecast) difference to the value `lag` steps before the
//! current end of a history buffer.

use crate::error::{Error, Result};

/// Difference `values` at a fixed lag
///
/// Requires `0 < lag < values.len()`; the output has `values.len() - lag` elements.
///
/// # Example
/// ```rust
/// use tempcast::time_series::difference;
///
/// let diff = difference(&[10.0, 12.0, 9.0, 14.0], 1).unwrap();
/// assert_eq!(diff, vec![2.0, -3.0, 5.0]);
/// ```
pub fn difference(values: &[f64], lag: usize) -> Result<Vec<f64>> {
    if lag == 0 {
        return Err(Error::InvalidInput("difference lag must be at least 1".into()));
    }
    if lag >= values.len() {
        return Err(Error::InsufficientData {
            needed: lag + 1,
            got: values.len(),
        });
    }

    Ok(values
        .iter()
        .skip(lag)
        .zip(values.iter())
        .map(|(curr, prev)| curr - prev)
        .collect())
}

/// Invert one differenced value against a history buffer
///
/// Returns `history[history.len() - lag] + yhat`. The history must already
/// include every value reconstructed before this one.
///
/// # Example
/// ```rust
/// use tempcast::time_series::inverse_difference;
///
/// assert_eq!(inverse_difference(&[10.0, 12.0, 9.0], 5.0, 1).unwrap(), 14.0);
/// ```
pub fn inverse_difference(history: &[f64], yhat: f64, lag: usize) -> Result<f64> {
    if lag == 0 {
        return Err(Error::InvalidInput("difference lag must be at least 1".into()));
    }
    if history.len() < lag {
        return Err(Error::InsufficientData {
            needed: lag,
            got: history.len(),
        });
    }

    Ok(history[history.len() - lag] + yhat)
}

/// Apply `order` first differences (lag 1) in sequence
pub(crate) fn difference_n(values: &[f64], order: usize) -> Result<Vec<f64>> {
    let mut result = values.to_vec();
    for _ in 0..order {
        result = difference(&result, 1)?;
    }
    Ok(result)
}

/// Binomial coefficient C(n, k)
pub(crate) fn binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

/// Rebuild a level from its `d`-th difference and the `d` preceding levels
///
/// `x_t = w_t - sum_{k=1..d} C(d,k) (-1)^k x_{t-k}`; `preceding` ends at `x_{t-1}`.
pub(crate) fn integrate_step(w: f64, preceding: &[f64], d: usize) -> f64 {
    let n = preceding.len();
    (1..=d).fold(w, |acc, k| {
        let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
        acc - binomial(d, k) * sign * preceding[n - k]
    })
}
