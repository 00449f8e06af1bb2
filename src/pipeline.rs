//! End-to-end forecasting run
//!
//! Loads the series, shows it with its autocorrelation, holds out the last
//! `horizon` observations, fits ARIMA on the seasonally differenced training
//! values, rebuilds the forecast levels step by step and compares them to the
//! held-out values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::io::read_csv;
use crate::series::Series;
use crate::stats::acf;
use crate::time_series::{
    difference, ArimaModel, Forecast, ForecastLoop, ForecastMetrics, Forecaster, ModelSummary,
};
use crate::vis::{acf_figure, comparison_figure, series_figure, FigureSink};

/// Significance of the autocorrelation band
const ACF_ALPHA: f64 = 0.05;

/// Rows printed by the head and tail views
const PREVIEW_ROWS: usize = 5;

/// Forecast against held-out values, one row per day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Day numbers starting at 1
    pub days: Vec<usize>,
    pub dates: Vec<NaiveDate>,
    pub predicted: Vec<f64>,
    pub actual: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    /// Level of the bounds (0 when the forecast has none)
    pub confidence_level: f64,
    pub metrics: ForecastMetrics,
}

impl Comparison {
    /// Pair a forecast with the held-out series
    pub fn new(forecast: &Forecast, test: &Series) -> Result<Self> {
        if forecast.len() != test.len() {
            return Err(Error::LengthMismatch {
                expected: test.len(),
                actual: forecast.len(),
            });
        }
        let metrics = ForecastMetrics::evaluate(&forecast.values, test.values())?;

        Ok(Comparison {
            days: (1..=test.len()).collect(),
            dates: test.dates().to_vec(),
            predicted: forecast.values.clone(),
            actual: test.values().to_vec(),
            lower: forecast.lower.clone(),
            upper: forecast.upper.clone(),
            confidence_level: forecast.confidence_level,
            metrics,
        })
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = format!("{:.0}%", self.confidence_level * 100.0);
        writeln!(
            f,
            "{:>4}  {:<10}  {:>10}  {:>10}  {:>10}  {:>10}",
            "Day",
            "Date",
            "Predicted",
            "Actual",
            format!("Lo {}", level),
            format!("Hi {}", level)
        )?;
        for i in 0..self.len() {
            writeln!(
                f,
                "{:>4}  {:<10}  {:>10.3}  {:>10.3}  {:>10.3}  {:>10.3}",
                self.days[i],
                self.dates[i].format("%Y-%m-%d"),
                self.predicted[i],
                self.actual[i],
                self.lower[i],
                self.upper[i]
            )?;
        }
        let mape = self
            .metrics
            .mape
            .map_or_else(|| "n/a".to_string(), |m| format!("{:.2}%", m));
        write!(
            f,
            "MAE: {:.3}  RMSE: {:.3}  MAPE: {}  sMAPE: {:.2}%",
            self.metrics.mae, self.metrics.rmse, mape, self.metrics.smape
        )
    }
}

/// What a run produced
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Observations loaded
    pub observations: usize,
    pub train_len: usize,
    pub test_len: usize,
    /// Length of the seasonally differenced training values
    pub differenced_len: usize,
    pub summary: Option<ModelSummary>,
    /// Forecast in levels, bounds shifted by the seasonal anchors
    pub forecast: Forecast,
    pub comparison: Comparison,
}

/// Configured forecasting run
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Pipeline { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load the configured file and run with the configured ARIMA model
    pub fn run<S, W>(&self, sink: &mut S, out: &mut W) -> Result<PipelineReport>
    where
        S: FigureSink + ?Sized,
        W: Write,
    {
        self.config.validate()?;
        let series = read_csv(&self.config.data_path, &self.config.csv_options())?;

        let name = series.name().cloned().unwrap_or_else(|| "y".to_string());
        let mut model = ArimaModel::new(self.config.order)?
            .with_constant(self.config.include_constant)
            .with_name(name);

        self.run_series(&series, &mut model, sink, out)
    }

    /// Run on an already loaded series with any forecaster
    ///
    /// The model is fitted on the seasonally differenced training values, so
    /// each raw forecast `yhat` is a predicted seasonal difference (ARIMA
    /// forecasts in levels of that series, not its `d`-th differences).
    pub fn run_series<F, S, W>(
        &self,
        series: &Series,
        model: &mut F,
        sink: &mut S,
        out: &mut W,
    ) -> Result<PipelineReport>
    where
        F: Forecaster + ?Sized,
        S: FigureSink + ?Sized,
        W: Write,
    {
        let config = &self.config;

        writeln!(out, "{}\n", series.head(PREVIEW_ROWS))?;
        writeln!(out, "{}\n", series.tail(PREVIEW_ROWS))?;
        writeln!(out, "{}\n", series)?;
        if let Ok(stats) = series.describe() {
            log::info!(
                "series: {} observations, mean {:.3}, std {:.3}, range [{:.3}, {:.3}]",
                stats.count,
                stats.mean,
                stats.std,
                stats.min,
                stats.max
            );
        }

        sink.show(&series_figure(series))?;
        let correlations = acf(series.values(), config.acf_lags, ACF_ALPHA)?;
        log::debug!(
            "{} of {} autocorrelation lags outside the band",
            correlations.significant_lags().len(),
            correlations.nlags()
        );
        sink.show(&acf_figure(&correlations))?;

        let (train, test) = series.train_test_split(config.horizon)?;
        log::info!("split: {} training, {} test", train.len(), test.len());

        let differenced = difference(train.values(), config.seasonal_lag)?;
        log::info!(
            "seasonal difference at lag {}: {} values",
            config.seasonal_lag,
            differenced.len()
        );

        model.fit(&differenced)?;
        let summary = model.fit_summary();
        if let Some(summary) = &summary {
            writeln!(out, "{}\n", summary)?;
            log::info!(
                "{} fit: AIC {:.3}, BIC {:.3}, HQIC {:.3}",
                summary.model,
                summary.aic,
                summary.bic,
                summary.hqic
            );
        }

        let raw = model.forecast_with_intervals(config.horizon, config.confidence_level)?;
        let mut forecast_loop =
            ForecastLoop::new(train.values().to_vec(), config.seasonal_lag, config.horizon)?;
        let forecast = forecast_loop.run_forecast(&raw)?;

        let comparison = Comparison::new(&forecast, &test)?;
        writeln!(out, "{}", comparison)?;
        log::info!(
            "{} forecast over {} days: MAE {:.3}, RMSE {:.3}",
            model.name(),
            comparison.len(),
            comparison.metrics.mae,
            comparison.metrics.rmse
        );
        sink.show(&comparison_figure(&comparison))?;

        Ok(PipelineReport {
            observations: series.len(),
            train_len: train.len(),
            test_len: test.len(),
            differenced_len: differenced.len(),
            summary,
            forecast,
            comparison,
        })
    }
}
