//! Forecaster abstraction, forecast values and accuracy metrics

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::time_series::summary::ModelSummary;

/// A model that can be fitted on a value array and forecast past its end
pub trait Forecaster {
    /// Fit the model on the observations
    fn fit(&mut self, values: &[f64]) -> Result<()>;

    /// Point forecasts for the next `horizon` steps, in the space of the fitted values
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>>;

    /// Forecasts with standard errors and a `level` prediction interval
    fn forecast_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast>;

    /// Model name
    fn name(&self) -> &str;

    /// Model parameters by name
    fn parameters(&self) -> HashMap<String, f64>;

    /// Estimation summary, for models that produce one
    fn fit_summary(&self) -> Option<ModelSummary> {
        None
    }
}

/// Forecast values with their uncertainty
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    /// Point forecasts
    pub values: Vec<f64>,
    /// Standard error of each forecast
    pub std_errors: Vec<f64>,
    /// Lower interval bound
    pub lower: Vec<f64>,
    /// Upper interval bound
    pub upper: Vec<f64>,
    /// Confidence level of the interval
    pub confidence_level: f64,
}

impl Forecast {
    /// Forecast without uncertainty (bounds equal the point values)
    pub fn point(values: Vec<f64>) -> Self {
        let n = values.len();
        Forecast {
            lower: values.clone(),
            upper: values.clone(),
            values,
            std_errors: vec![0.0; n],
            confidence_level: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Accuracy of predictions against actual values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetrics {
    /// Mean absolute error
    pub mae: f64,
    /// Mean squared error
    pub mse: f64,
    /// Root mean squared error
    pub rmse: f64,
    /// Mean absolute percentage error (None when an actual value is zero)
    pub mape: Option<f64>,
    /// Symmetric MAPE
    pub smape: f64,
}

impl ForecastMetrics {
    /// Compare predictions to actual values
    pub fn evaluate(predicted: &[f64], actual: &[f64]) -> Result<Self> {
        if predicted.len() != actual.len() {
            return Err(Error::LengthMismatch {
                expected: actual.len(),
                actual: predicted.len(),
            });
        }
        if predicted.is_empty() {
            return Err(Error::EmptyData("no values to evaluate".into()));
        }

        let n = predicted.len() as f64;
        let errors: Vec<f64> = predicted.iter().zip(actual).map(|(p, a)| a - p).collect();

        let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
        let mse = errors.iter().map(|e| e * e).sum::<f64>() / n;

        let mape = if actual.iter().any(|a| a.abs() < f64::EPSILON) {
            None
        } else {
            Some(
                errors
                    .iter()
                    .zip(actual)
                    .map(|(e, a)| (e / a).abs())
                    .sum::<f64>()
                    / n
                    * 100.0,
            )
        };

        let smape = predicted
            .iter()
            .zip(actual)
            .map(|(p, a)| {
                let denom = p.abs() + a.abs();
                if denom < f64::EPSILON {
                    0.0
                } else {
                    2.0 * (a - p).abs() / denom
                }
            })
            .sum::<f64>()
            / n
            * 100.0;

        Ok(ForecastMetrics {
            mae,
            mse,
            rmse: mse.sqrt(),
            mape,
            smape,
        })
    }
}
