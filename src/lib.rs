//! Seasonal ARIMA forecasting of daily temperature series
//!
//! The crate loads a dated series from CSV, removes its yearly cycle with a
//! fixed-lag difference, fits an ARIMA model on the differenced values and
//! rebuilds forecasts in the original scale one step at a time. Figures of the
//! series, its autocorrelation and the forecast are shown in the terminal or
//! written as images.
//!
//! ```rust
//! use tempcast::time_series::{difference, ForecastLoop};
//!
//! let history = vec![10.0, 12.0, 9.0, 14.0];
//! let diff = difference(&history, 1).unwrap();
//! assert_eq!(diff, vec![2.0, -3.0, 5.0]);
//!
//! let mut forecast_loop = ForecastLoop::new(history, 1, 2).unwrap();
//! let rebuilt = forecast_loop.run(&[1.0, -2.0]).unwrap();
//! assert_eq!(rebuilt, &[15.0, 13.0]);
//! ```

pub mod config;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod series;
pub mod stats;
pub mod time_series;
pub mod vis;

// Re-export commonly used types
pub use config::{ImageFormat, PipelineConfig};
pub use error::{Error, Result};
pub use pipeline::{Comparison, Pipeline, PipelineReport};
pub use series::Series;
pub use time_series::{ArimaModel, ArimaOrder, ForecastLoop, Forecaster};
pub use vis::{FigureSink, MultiSink, TerminalSink};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
