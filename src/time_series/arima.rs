//! ARIMA(p,d,q) estimation and prediction
//!
//! The model is fitted on `w`, the series after `d` first differences, in
//! mean form:
//!
//! ```text
//! (w_t - mu) = phi_1 (w_{t-1} - mu) + ... + phi_p (w_{t-p} - mu)
//!            + e_t + theta_1 e_{t-1} + ... + theta_q e_{t-q}
//! ```
//!
//! Parameters are estimated by conditional sum of squares (CSS): residuals
//! start at `t = p`, presample errors are zero, and the CSS is minimized with
//! Nelder-Mead starting from Yule-Walker AR estimates. Standard errors come
//! from a finite-difference Hessian of the concentrated log-likelihood.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::stats::{matrix_inverse, mean, normal_cdf, normal_quantile, yule_walker};
use crate::time_series::differencing::{binomial, difference_n, integrate_step};
use crate::time_series::forecasting::{Forecast, Forecaster};
use crate::time_series::optimization::NelderMead;
use crate::time_series::summary::{CoefficientRow, ModelSummary};

/// Largest AR or MA order accepted
pub const MAX_ARMA_ORDER: usize = 12;
/// Largest differencing order accepted
pub const MAX_DIFFERENCING: usize = 2;

/// Coefficient bound applied during optimization
const COEFFICIENT_BOUND: f64 = 0.99;

/// ARIMA order (p, d, q)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// AR order
    pub p: usize,
    /// Differencing order
    pub d: usize,
    /// MA order
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        ArimaOrder { p, d, q }
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.p, self.d, self.q)
    }
}

/// Space in which `predict` returns values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionType {
    /// The `d`-times differenced series
    Linear,
    /// The series the model was fitted on
    Levels,
}

/// State produced by `fit`
#[derive(Debug, Clone)]
struct FittedState {
    /// Observations passed to `fit`
    observations: Vec<f64>,
    /// Observations after `d` differences
    differenced: Vec<f64>,
    mean: f64,
    ar: Vec<f64>,
    ma: Vec<f64>,
    /// Conditional residuals (zero before `p`)
    residuals: Vec<f64>,
    /// One-step-ahead predictions of the differenced series
    fitted: Vec<f64>,
    sigma2: f64,
    log_likelihood: f64,
    /// Observations entering the likelihood
    n_eff: usize,
    std_errors: Vec<f64>,
    converged: bool,
    iterations: usize,
}

/// ARIMA model
#[derive(Debug, Clone)]
pub struct ArimaModel {
    order: ArimaOrder,
    include_constant: bool,
    /// Dependent variable name used in the summary
    name: String,
    state: Option<FittedState>,
}

impl ArimaModel {
    /// Create an unfitted model, validating the order
    pub fn new(order: ArimaOrder) -> Result<Self> {
        if order.p > MAX_ARMA_ORDER {
            return Err(Error::InvalidInput(format!(
                "AR order must be <= {}, got {}",
                MAX_ARMA_ORDER, order.p
            )));
        }
        if order.q > MAX_ARMA_ORDER {
            return Err(Error::InvalidInput(format!(
                "MA order must be <= {}, got {}",
                MAX_ARMA_ORDER, order.q
            )));
        }
        if order.d > MAX_DIFFERENCING {
            return Err(Error::InvalidInput(format!(
                "differencing order must be <= {}, got {}",
                MAX_DIFFERENCING, order.d
            )));
        }

        Ok(ArimaModel {
            order,
            include_constant: true,
            name: "y".to_string(),
            state: None,
        })
    }

    /// Include (default) or drop the constant term
    pub fn with_constant(mut self, include_constant: bool) -> Self {
        self.include_constant = include_constant;
        self
    }

    /// Name of the dependent variable
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    fn n_params(&self) -> usize {
        self.order.p + self.order.q + usize::from(self.include_constant)
    }

    /// Minimum observations needed to fit
    pub fn min_observations(&self) -> usize {
        self.order.d + self.order.p + self.order.q + 2
    }

    fn state(&self) -> Result<&FittedState> {
        self.state
            .as_ref()
            .ok_or_else(|| Error::InvalidOperation("model not fitted".to_string()))
    }

    /// Split a parameter vector into (mean, ar, ma)
    fn unpack<'a>(&self, params: &'a [f64]) -> (f64, &'a [f64], &'a [f64]) {
        let offset = usize::from(self.include_constant);
        let mu = if self.include_constant { params[0] } else { 0.0 };
        let ar = &params[offset..offset + self.order.p];
        let ma = &params[offset + self.order.p..];
        (mu, ar, ma)
    }

    /// Estimate the model on `values`
    pub fn fit(&mut self, values: &[f64]) -> Result<()> {
        let ArimaOrder { p, d, q } = self.order;

        if values.len() < self.min_observations() {
            return Err(Error::InsufficientData {
                needed: self.min_observations(),
                got: values.len(),
            });
        }
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "non-finite observation at position {}",
                pos
            )));
        }

        let w = difference_n(values, d)?;
        let w_mean = mean(&w);

        let mut initial = Vec::with_capacity(self.n_params());
        let mut bounds = Vec::with_capacity(self.n_params());
        if self.include_constant {
            initial.push(w_mean);
            bounds.push((f64::NEG_INFINITY, f64::INFINITY));
        }
        for phi in yule_walker(&w, p)? {
            initial.push(phi.clamp(-0.9, 0.9));
            bounds.push((-COEFFICIENT_BOUND, COEFFICIENT_BOUND));
        }
        for _ in 0..q {
            initial.push(0.0);
            bounds.push((-COEFFICIENT_BOUND, COEFFICIENT_BOUND));
        }

        let objective = |params: &[f64]| {
            let (mu, ar, ma) = self.unpack(params);
            let (residuals, _) = conditional_residuals(&w, mu, ar, ma);
            let css: f64 = residuals[p..].iter().map(|e| e * e).sum();
            if css.is_finite() {
                css
            } else {
                f64::MAX
            }
        };

        let (params, converged, iterations) = if p == 0 && q == 0 {
            // The mean minimizes the CSS exactly
            (initial, true, 0)
        } else {
            let optimizer = NelderMead::default()
                .max_iter(2000.max(400 * self.n_params()))
                .with_bounds(bounds);
            let first = optimizer.minimize(&objective, &initial);
            // Restart from the optimum to escape a collapsed simplex
            let second = optimizer.minimize(&objective, &first.point);
            log::debug!(
                "CSS optimization: {} + {} iterations, css {:.6} -> {:.6}",
                first.iterations,
                second.iterations,
                first.value,
                second.value
            );
            let best = if second.value <= first.value { second } else { first };
            (best.point, best.converged, best.iterations)
        };

        if !converged {
            log::warn!(
                "ARIMA{} optimizer stopped after {} iterations without converging",
                self.order,
                iterations
            );
        }

        let (mu, ar, ma) = self.unpack(&params);
        let (residuals, fitted) = conditional_residuals(&w, mu, ar, ma);
        let n_eff = w.len() - p;
        let css: f64 = residuals[p..].iter().map(|e| e * e).sum();
        let sigma2 = css / n_eff as f64;
        if !(sigma2 > 0.0) {
            return Err(Error::ComputationError(format!(
                "degenerate fit: innovation variance {}",
                sigma2
            )));
        }
        let log_likelihood = concentrated_log_likelihood(css, n_eff);

        let neg_log_likelihood =
            |params: &[f64]| -concentrated_log_likelihood(objective(params), n_eff);
        let std_errors = hessian_std_errors(&neg_log_likelihood, &params);

        let state = FittedState {
            observations: values.to_vec(),
            differenced: w,
            mean: mu,
            ar: ar.to_vec(),
            ma: ma.to_vec(),
            residuals,
            fitted,
            sigma2,
            log_likelihood,
            n_eff,
            std_errors,
            converged,
            iterations,
        };
        self.state = Some(state);

        log::info!(
            "fitted ARIMA{} on {} observations: sigma2 = {:.4}, log-likelihood = {:.3}",
            self.order,
            values.len(),
            sigma2,
            log_likelihood
        );
        Ok(())
    }

    /// Predict over the index range `[start, end]` of the fitted observations
    ///
    /// Indices below the number of observations give one-step-ahead in-sample
    /// predictions; later indices give dynamic forecasts with zero future errors.
    pub fn predict(&self, start: usize, end: usize, typ: PredictionType) -> Result<Vec<f64>> {
        let state = self.state()?;
        let d = self.order.d;
        let n = state.observations.len();

        if start < d {
            return Err(Error::InvalidInput(format!(
                "prediction start {} is before the first differenced index {}",
                start, d
            )));
        }
        if end < start {
            return Err(Error::InvalidInput(format!(
                "prediction end {} is before start {}",
                end, start
            )));
        }

        let steps = (end + 1).saturating_sub(n);
        let forecasts = self.forecast_differenced(state, steps);

        let level_forecasts = match typ {
            PredictionType::Linear => Vec::new(),
            PredictionType::Levels => {
                let mut extended = state.observations.clone();
                for &w in &forecasts {
                    let level = integrate_step(w, &extended, d);
                    extended.push(level);
                }
                extended.split_off(n)
            }
        };

        Ok((start..=end)
            .map(|t| match (typ, t < n) {
                (PredictionType::Linear, true) => state.fitted[t - d],
                (PredictionType::Linear, false) => forecasts[t - n],
                (PredictionType::Levels, true) => {
                    integrate_step(state.fitted[t - d], &state.observations[..t], d)
                }
                (PredictionType::Levels, false) => level_forecasts[t - n],
            })
            .collect())
    }

    /// Dynamic forecasts of the differenced series
    fn forecast_differenced(&self, state: &FittedState, steps: usize) -> Vec<f64> {
        let mut w = state.differenced.clone();
        let mut errors = state.residuals.clone();
        let base = w.len();

        for _ in 0..steps {
            let t = w.len();
            let ar_part: f64 = state
                .ar
                .iter()
                .enumerate()
                .filter(|(i, _)| t > *i)
                .map(|(i, phi)| phi * (w[t - 1 - i] - state.mean))
                .sum();
            let ma_part: f64 = state
                .ma
                .iter()
                .enumerate()
                .filter(|(j, _)| t > *j)
                .map(|(j, theta)| theta * errors[t - 1 - j])
                .sum();
            w.push(state.mean + ar_part + ma_part);
            errors.push(0.0);
        }

        w.split_off(base)
    }

    /// MA(infinity) weights of the integrated model, `psi_0 = 1`
    fn psi_weights(&self, state: &FittedState, count: usize) -> Vec<f64> {
        let d = self.order.d;

        // phi(B) (1 - B)^d
        let ar_poly: Vec<f64> = std::iter::once(1.0)
            .chain(state.ar.iter().map(|phi| -phi))
            .collect();
        let diff_poly: Vec<f64> = (0..=d)
            .map(|k| binomial(d, k) * if k % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let mut product = vec![0.0; ar_poly.len() + diff_poly.len() - 1];
        for (i, a) in ar_poly.iter().enumerate() {
            for (j, b) in diff_poly.iter().enumerate() {
                product[i + j] += a * b;
            }
        }
        let phi_star: Vec<f64> = product[1..].iter().map(|c| -c).collect();

        let mut psi = Vec::with_capacity(count);
        for j in 0..count {
            if j == 0 {
                psi.push(1.0);
                continue;
            }
            let theta = state.ma.get(j - 1).copied().unwrap_or(0.0);
            let ar_sum: f64 = phi_star
                .iter()
                .enumerate()
                .take(j)
                .map(|(i, phi)| phi * psi[j - 1 - i])
                .sum();
            psi.push(theta + ar_sum);
        }
        psi
    }

    pub fn ar_coefficients(&self) -> Option<&[f64]> {
        self.state.as_ref().map(|s| s.ar.as_slice())
    }

    pub fn ma_coefficients(&self) -> Option<&[f64]> {
        self.state.as_ref().map(|s| s.ma.as_slice())
    }

    /// Mean of the differenced series (0 without a constant)
    pub fn constant(&self) -> Option<f64> {
        self.state.as_ref().map(|s| s.mean)
    }

    /// Innovation variance
    pub fn sigma2(&self) -> Option<f64> {
        self.state.as_ref().map(|s| s.sigma2)
    }

    pub fn log_likelihood(&self) -> Option<f64> {
        self.state.as_ref().map(|s| s.log_likelihood)
    }

    /// Conditional residuals of the differenced series
    pub fn residuals(&self) -> Option<&[f64]> {
        self.state.as_ref().map(|s| s.residuals.as_slice())
    }

    /// Number of estimated parameters including the variance
    fn df_model(&self) -> f64 {
        (self.n_params() + 1) as f64
    }

    pub fn aic(&self) -> Option<f64> {
        self.state
            .as_ref()
            .map(|s| -2.0 * s.log_likelihood + 2.0 * self.df_model())
    }

    pub fn bic(&self) -> Option<f64> {
        self.state
            .as_ref()
            .map(|s| -2.0 * s.log_likelihood + (s.n_eff as f64).ln() * self.df_model())
    }

    pub fn hqic(&self) -> Option<f64> {
        self.state.as_ref().map(|s| {
            -2.0 * s.log_likelihood + 2.0 * (s.n_eff as f64).ln().ln() * self.df_model()
        })
    }

    /// Dependent variable label as printed in the summary
    fn dep_variable(&self) -> String {
        match self.order.d {
            0 => self.name.clone(),
            1 => format!("D.{}", self.name),
            d => format!("D{}.{}", d, self.name),
        }
    }

    /// Coefficient names in parameter order
    fn param_names(&self) -> Vec<String> {
        let dep = self.dep_variable();
        let mut names = Vec::with_capacity(self.n_params());
        if self.include_constant {
            names.push("const".to_string());
        }
        names.extend((1..=self.order.p).map(|i| format!("ar.L{}.{}", i, dep)));
        names.extend((1..=self.order.q).map(|j| format!("ma.L{}.{}", j, dep)));
        names
    }

    /// Fit statistics and coefficient table
    pub fn summary(&self) -> Result<ModelSummary> {
        let state = self.state()?;
        let z_crit = normal_quantile(0.975);

        let values = std::iter::once(state.mean)
            .filter(|_| self.include_constant)
            .chain(state.ar.iter().copied())
            .chain(state.ma.iter().copied());

        let coefficients = self
            .param_names()
            .into_iter()
            .zip(values)
            .zip(state.std_errors.iter())
            .map(|((name, coef), &std_err)| {
                let z = coef / std_err;
                CoefficientRow {
                    name,
                    coef,
                    std_err,
                    z,
                    p_value: 2.0 * (1.0 - normal_cdf(z.abs())),
                    lower: coef - z_crit * std_err,
                    upper: coef + z_crit * std_err,
                }
            })
            .collect();

        Ok(ModelSummary {
            dep_variable: self.dep_variable(),
            model: format!("ARIMA{}", self.order),
            method: "css".to_string(),
            nobs: state.differenced.len(),
            log_likelihood: state.log_likelihood,
            sigma: state.sigma2.sqrt(),
            aic: self.aic().unwrap_or(f64::NAN),
            bic: self.bic().unwrap_or(f64::NAN),
            hqic: self.hqic().unwrap_or(f64::NAN),
            converged: state.converged,
            iterations: state.iterations,
            coefficients,
        })
    }
}

impl Forecaster for ArimaModel {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        ArimaModel::fit(self, values)
    }

    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        let n = self.state()?.observations.len();
        if horizon == 0 {
            return Ok(Vec::new());
        }
        self.predict(n, n + horizon - 1, PredictionType::Levels)
    }

    fn forecast_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        if !(level > 0.0 && level < 1.0) {
            return Err(Error::InvalidInput(format!(
                "confidence level must be in (0, 1), got {}",
                level
            )));
        }
        let state = self.state()?;
        let values = self.forecast(horizon)?;
        let z = normal_quantile((1.0 + level) / 2.0);

        let psi = self.psi_weights(state, horizon);
        let mut cumulative = 0.0;
        let std_errors: Vec<f64> = psi
            .iter()
            .map(|w| {
                cumulative += w * w;
                (state.sigma2 * cumulative).sqrt()
            })
            .collect();

        let lower = values.iter().zip(&std_errors).map(|(v, se)| v - z * se).collect();
        let upper = values.iter().zip(&std_errors).map(|(v, se)| v + z * se).collect();

        Ok(Forecast {
            values,
            std_errors,
            lower,
            upper,
            confidence_level: level,
        })
    }

    fn name(&self) -> &str {
        "ARIMA"
    }

    fn parameters(&self) -> HashMap<String, f64> {
        let mut params = HashMap::new();
        params.insert("p".to_string(), self.order.p as f64);
        params.insert("d".to_string(), self.order.d as f64);
        params.insert("q".to_string(), self.order.q as f64);
        if let Some(state) = &self.state {
            if self.include_constant {
                params.insert("const".to_string(), state.mean);
            }
            for (i, phi) in state.ar.iter().enumerate() {
                params.insert(format!("ar.L{}", i + 1), *phi);
            }
            for (j, theta) in state.ma.iter().enumerate() {
                params.insert(format!("ma.L{}", j + 1), *theta);
            }
            params.insert("sigma2".to_string(), state.sigma2);
        }
        params
    }

    fn fit_summary(&self) -> Option<ModelSummary> {
        self.summary().ok()
    }
}

/// Conditional residuals and one-step predictions of `w`
///
/// Residuals before index `p` are fixed at zero.
fn conditional_residuals(w: &[f64], mu: f64, ar: &[f64], ma: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = w.len();
    let p = ar.len();
    let mut residuals = vec![0.0; n];
    let mut fitted = vec![0.0; n];

    for t in 0..n {
        let mut pred = mu;
        for (i, phi) in ar.iter().enumerate().take(t) {
            pred += phi * (w[t - 1 - i] - mu);
        }
        for (j, theta) in ma.iter().enumerate().take(t) {
            pred += theta * residuals[t - 1 - j];
        }
        fitted[t] = pred;
        if t >= p {
            residuals[t] = w[t] - pred;
        }
    }

    (residuals, fitted)
}

/// Gaussian log-likelihood with the variance concentrated out
fn concentrated_log_likelihood(css: f64, n_eff: usize) -> f64 {
    let n = n_eff as f64;
    -0.5 * n * ((2.0 * std::f64::consts::PI * css / n).ln() + 1.0)
}

/// Standard errors from the inverse of a central-difference Hessian
///
/// Returns NaN errors when the Hessian cannot be inverted.
fn hessian_std_errors<F>(objective: &F, params: &[f64]) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let k = params.len();
    if k == 0 {
        return Vec::new();
    }

    let steps: Vec<f64> = params.iter().map(|x| 1e-4 * x.abs().max(1.0)).collect();
    let shifted = |moves: &[(usize, f64)]| {
        let mut point = params.to_vec();
        for &(i, delta) in moves {
            point[i] += delta;
        }
        objective(&point)
    };

    let center = objective(params);
    let mut hessian = vec![vec![0.0; k]; k];
    for i in 0..k {
        let hi = steps[i];
        hessian[i][i] =
            (shifted(&[(i, hi)]) - 2.0 * center + shifted(&[(i, -hi)])) / (hi * hi);
        for j in 0..i {
            let hj = steps[j];
            let value = (shifted(&[(i, hi), (j, hj)]) - shifted(&[(i, hi), (j, -hj)])
                - shifted(&[(i, -hi), (j, hj)])
                + shifted(&[(i, -hi), (j, -hj)]))
                / (4.0 * hi * hj);
            hessian[i][j] = value;
            hessian[j][i] = value;
        }
    }

    match matrix_inverse(&hessian) {
        Ok(covariance) => (0..k)
            .map(|i| {
                let var = covariance[i][i];
                if var > 0.0 {
                    var.sqrt()
                } else {
                    f64::NAN
                }
            })
            .collect(),
        Err(err) => {
            log::warn!("could not invert the Hessian for standard errors: {}", err);
            vec![f64::NAN; k]
        }
    }
}
