//! Pipeline configuration
//!
//! Settings are read from an optional TOML file. Every key has a default, so
//! an empty or missing file gives the stock run on
//! `daily-min-temperatures.csv`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::io::CsvOptions;
use crate::time_series::ArimaOrder;

/// File name looked up in the working directory by the binary
pub const DEFAULT_CONFIG_FILE: &str = "tempcast.toml";

/// Smallest terminal chart textplots can draw
const MIN_TERMINAL_WIDTH: u32 = 32;
const MIN_TERMINAL_HEIGHT: u32 = 3;

/// Image file format written by the image sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

/// Settings of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// CSV file with a date column and a value column
    pub data_path: PathBuf,
    /// Value column header (second column when unset)
    pub value_column: Option<String>,
    /// chrono date format (auto-detected when unset)
    pub date_format: Option<String>,
    /// Seasonal differencing lag in observations
    pub seasonal_lag: usize,
    /// Held-out steps to forecast
    pub horizon: usize,
    pub order: ArimaOrder,
    pub include_constant: bool,
    /// Prediction interval level
    pub confidence_level: f64,
    /// Lags shown in the autocorrelation figure
    pub acf_lags: usize,
    /// Pause after each terminal figure, in milliseconds
    pub pause_ms: u64,
    pub terminal_width: u32,
    pub terminal_height: u32,
    /// Directory for image files (no images when unset)
    pub plot_dir: Option<PathBuf>,
    pub image_format: ImageFormat,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            data_path: PathBuf::from("daily-min-temperatures.csv"),
            value_column: None,
            date_format: None,
            seasonal_lag: 365,
            horizon: 10,
            order: ArimaOrder::new(9, 1, 3),
            include_constant: true,
            confidence_level: 0.95,
            acf_lags: 200,
            pause_ms: 2000,
            terminal_width: 160,
            terminal_height: 48,
            plot_dir: None,
            image_format: ImageFormat::Png,
        }
    }
}

impl PipelineConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(Error::Io)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Read `path` if it exists, otherwise use the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            log::info!("using configuration from {}", path.display());
            Self::from_file(path)
        } else {
            log::info!("no {} found, using default configuration", path.display());
            let config = Self::default();
            config.validate()?;
            Ok(config)
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.seasonal_lag == 0 {
            return Err(Error::Config("seasonal_lag must be at least 1".into()));
        }
        if self.horizon == 0 {
            return Err(Error::Config("horizon must be at least 1".into()));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(Error::Config(format!(
                "confidence_level must be in (0, 1), got {}",
                self.confidence_level
            )));
        }
        if self.terminal_width < MIN_TERMINAL_WIDTH {
            return Err(Error::Config(format!(
                "terminal_width must be at least {}, got {}",
                MIN_TERMINAL_WIDTH, self.terminal_width
            )));
        }
        if self.terminal_height < MIN_TERMINAL_HEIGHT {
            return Err(Error::Config(format!(
                "terminal_height must be at least {}, got {}",
                MIN_TERMINAL_HEIGHT, self.terminal_height
            )));
        }
        Ok(())
    }

    /// Loader options derived from this configuration
    pub fn csv_options(&self) -> CsvOptions {
        CsvOptions {
            value_column: self.value_column.clone(),
            date_format: self.date_format.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.seasonal_lag, 365);
        assert_eq!(config.horizon, 10);
        assert_eq!(config.order, ArimaOrder::new(9, 1, 3));
        assert_eq!(config.acf_lags, 200);
        assert_eq!(config.pause_ms, 2000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(
            PipelineConfig::from_toml_str("").unwrap(),
            PipelineConfig::default()
        );
    }

    #[test]
    fn test_partial_toml() {
        let config = PipelineConfig::from_toml_str(
            r#"
            data_path = "temps.csv"
            horizon = 7
            image_format = "svg"

            [order]
            p = 2
            d = 0
            q = 1
            "#,
        )
        .unwrap();
        assert_eq!(config.data_path, PathBuf::from("temps.csv"));
        assert_eq!(config.horizon, 7);
        assert_eq!(config.order, ArimaOrder::new(2, 0, 1));
        assert_eq!(config.image_format, ImageFormat::Svg);
        assert_eq!(config.seasonal_lag, 365);
    }

    #[test]
    fn test_rejects_unknown_keys_and_bad_values() {
        assert!(matches!(
            PipelineConfig::from_toml_str("lag = 12"),
            Err(Error::Config(_))
        ));
        assert!(PipelineConfig::from_toml_str("horizon = 0").is_err());
        assert!(PipelineConfig::from_toml_str("seasonal_lag = 0").is_err());
        assert!(PipelineConfig::from_toml_str("confidence_level = 1.0").is_err());
        assert!(PipelineConfig::from_toml_str("terminal_width = 10").is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "pause_ms = 0\nacf_lags = 40\n").unwrap();
        let config = PipelineConfig::load_or_default(&path).unwrap();
        assert_eq!(config.pause_ms, 0);
        assert_eq!(config.acf_lags, 40);

        fs::write(&path, "pause_ms = \"soon\"\n").unwrap();
        let err = PipelineConfig::load_or_default(&path).unwrap_err();
        assert!(err.to_string().contains(DEFAULT_CONFIG_FILE));
    }
}
