//! Time Series Differencing and Forecasting Module
//!
//! This module provides seasonal differencing and its inverse, an ARIMA model
//! estimated by conditional sum of squares, and a forecast loop that turns
//! differenced forecasts back into levels.
//!
//! # Components
//!
//! - Fixed-lag differencing and inversion
//! - ARIMA(p,d,q) estimation, prediction and forecast intervals
//! - Model summary table
//! - Step-by-step forecast inversion

pub mod arima;
pub mod differencing;
pub mod forecast_loop;
pub mod forecasting;
pub mod optimization;
pub mod summary;

pub use arima::{ArimaModel, ArimaOrder, PredictionType};
pub use differencing::{difference, inverse_difference};
pub use forecast_loop::{ForecastLoop, LoopState};
pub use forecasting::{Forecast, ForecastMetrics, Forecaster};
pub use optimization::{Minimum, NelderMead};
pub use summary::{CoefficientRow, ModelSummary};
