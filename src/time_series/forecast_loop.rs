//! Step-by-step inversion of seasonally differenced forecasts

use crate::error::{Error, Result};
use crate::time_series::differencing::inverse_difference;
use crate::time_series::forecasting::Forecast;

/// Position of a [`ForecastLoop`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No step taken yet
    Initialized,
    /// `step` values inverted so far
    Stepping { step: usize },
    /// All `horizon` values inverted
    Done,
}

/// Inverts forecast differences one step at a time against a growing history
///
/// Each step adds the forecast difference to the value `lag` positions before
/// the current end of the history, then appends the result so later steps
/// see it.
///
/// # Example
/// ```rust
/// use tempcast::time_series::{ForecastLoop, LoopState};
///
/// let mut forecast_loop = ForecastLoop::new(vec![10.0, 12.0, 9.0], 1, 1).unwrap();
/// assert_eq!(forecast_loop.step(5.0).unwrap(), 14.0);
/// assert_eq!(forecast_loop.state(), LoopState::Done);
/// ```
#[derive(Debug, Clone)]
pub struct ForecastLoop {
    history: Vec<f64>,
    lag: usize,
    horizon: usize,
    predictions: Vec<f64>,
    anchors: Vec<f64>,
    state: LoopState,
}

impl ForecastLoop {
    /// Seed the loop with the history it inverts against
    pub fn new(history: Vec<f64>, lag: usize, horizon: usize) -> Result<Self> {
        if lag == 0 {
            return Err(Error::InvalidInput("difference lag must be at least 1".into()));
        }
        if horizon == 0 {
            return Err(Error::InvalidInput("forecast horizon must be at least 1".into()));
        }
        if history.len() < lag {
            return Err(Error::InsufficientData {
                needed: lag,
                got: history.len(),
            });
        }
        if horizon > lag {
            log::warn!(
                "horizon {} exceeds lag {}: later steps are anchored on earlier forecasts",
                horizon,
                lag
            );
        }

        Ok(ForecastLoop {
            history,
            lag,
            horizon,
            predictions: Vec::with_capacity(horizon),
            anchors: Vec::with_capacity(horizon),
            state: LoopState::Initialized,
        })
    }

    /// Invert the next forecast difference and return the rebuilt value
    pub fn step(&mut self, yhat: f64) -> Result<f64> {
        let step = match self.state {
            LoopState::Initialized => 0,
            LoopState::Stepping { step } => step,
            LoopState::Done => {
                return Err(Error::InvalidOperation(format!(
                    "forecast loop already produced {} values",
                    self.horizon
                )))
            }
        };

        let anchor = self.history[self.history.len() - self.lag];
        let value = inverse_difference(&self.history, yhat, self.lag)?;
        log::debug!(
            "step {}: difference {:.4} + anchor {:.4} = {:.4}",
            step + 1,
            yhat,
            anchor,
            value
        );

        self.history.push(value);
        self.predictions.push(value);
        self.anchors.push(anchor);

        let next = step + 1;
        self.state = if next == self.horizon {
            LoopState::Done
        } else {
            LoopState::Stepping { step: next }
        };
        Ok(value)
    }

    /// Invert all `horizon` differences
    pub fn run(&mut self, raw: &[f64]) -> Result<&[f64]> {
        if raw.len() != self.horizon {
            return Err(Error::LengthMismatch {
                expected: self.horizon,
                actual: raw.len(),
            });
        }
        if self.state != LoopState::Initialized {
            return Err(Error::InvalidOperation(
                "forecast loop has already been stepped".into(),
            ));
        }
        for &yhat in raw {
            self.step(yhat)?;
        }
        Ok(&self.predictions)
    }

    /// Invert a forecast with bounds, shifting the bounds by the point anchors
    pub fn run_forecast(&mut self, forecast: &Forecast) -> Result<Forecast> {
        self.run(&forecast.values)?;

        let shift = |bounds: &[f64]| -> Vec<f64> {
            bounds
                .iter()
                .zip(&self.anchors)
                .map(|(b, anchor)| b + anchor)
                .collect()
        };

        Ok(Forecast {
            values: self.predictions.clone(),
            std_errors: forecast.std_errors.clone(),
            lower: shift(&forecast.lower),
            upper: shift(&forecast.upper),
            confidence_level: forecast.confidence_level,
        })
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Rebuilt values so far
    pub fn predictions(&self) -> &[f64] {
        &self.predictions
    }

    /// Seed values followed by every rebuilt value
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Value each step was added to
    pub fn anchors(&self) -> &[f64] {
        &self.anchors
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn lag(&self) -> usize {
        self.lag
    }

    pub fn into_predictions(self) -> Vec<f64> {
        self.predictions
    }
}
