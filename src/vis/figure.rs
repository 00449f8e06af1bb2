//! Figure description shared by every sink
//!
//! A [`Figure`] is plain data: settings, traces and an optional band. Sinks
//! decide how to draw it.

use chrono::NaiveDate;

use crate::pipeline::Comparison;
use crate::series::Series;
use crate::stats::AcfResult;

/// Colour of the raw series and the test values
pub const SERIES_COLOR: (u8, u8, u8) = (51, 51, 178);
/// Colour of the forecast line
pub const FORECAST_COLOR: (u8, u8, u8) = (255, 0, 0);
/// Colour of the confidence band
pub const BAND_COLOR: (u8, u8, u8) = (100, 149, 237);

/// How a trace is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    /// Connected line
    Line,
    /// Vertical stems from zero with a marker
    Stem,
}

/// Line pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceStyle {
    pub color: (u8, u8, u8),
    pub line: LineStyle,
}

impl TraceStyle {
    pub fn solid(color: (u8, u8, u8)) -> Self {
        TraceStyle {
            color,
            line: LineStyle::Solid,
        }
    }

    pub fn dashed(color: (u8, u8, u8)) -> Self {
        TraceStyle {
            color,
            line: LineStyle::Dashed,
        }
    }
}

/// One set of points
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    /// Legend label
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub kind: PlotKind,
    pub style: TraceStyle,
}

impl Trace {
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// Shaded region between two curves
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub x: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

/// Titles, size and axis settings of a figure
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSettings {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    pub show_legend: bool,
    pub show_grid: bool,
    /// Fixed x-axis range
    pub x_range: Option<(f64, f64)>,
    /// Distance between x ticks
    pub x_tick_step: Option<f64>,
}

impl Default for PlotSettings {
    fn default() -> Self {
        PlotSettings {
            title: String::new(),
            x_label: "X".to_string(),
            y_label: "Y".to_string(),
            width: 1500,
            height: 600,
            show_legend: false,
            show_grid: true,
            x_range: None,
            x_tick_step: None,
        }
    }
}

/// A drawable figure
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// Short identifier, used for file names
    pub id: String,
    pub settings: PlotSettings,
    pub traces: Vec<Trace>,
    pub band: Option<Band>,
    /// Date at x = 0 when x counts days
    pub x_origin: Option<NaiveDate>,
}

impl Figure {
    pub fn new(id: impl Into<String>, settings: PlotSettings) -> Self {
        Figure {
            id: id.into(),
            settings,
            traces: Vec::new(),
            band: None,
            x_origin: None,
        }
    }

    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.traces.push(trace);
        self
    }

    pub fn with_band(mut self, band: Band) -> Self {
        self.band = Some(band);
        self
    }

    pub fn with_x_origin(mut self, origin: NaiveDate) -> Self {
        self.x_origin = Some(origin);
        self
    }

    /// x range: the configured one, or the extent of the data
    pub fn x_bounds(&self) -> (f64, f64) {
        if let Some(range) = self.settings.x_range {
            return range;
        }
        let xs = self
            .traces
            .iter()
            .flat_map(|t| t.x.iter())
            .chain(self.band.iter().flat_map(|b| b.x.iter()));
        padded(extent(xs), 0.0)
    }

    /// y range over traces and band with a 5% margin; stems include zero
    pub fn y_bounds(&self) -> (f64, f64) {
        let has_stems = self.traces.iter().any(|t| t.kind == PlotKind::Stem);
        let ys = self
            .traces
            .iter()
            .flat_map(|t| t.y.iter())
            .chain(
                self.band
                    .iter()
                    .flat_map(|b| b.lower.iter().chain(b.upper.iter())),
            )
            .chain(if has_stems { Some(&0.0) } else { None });
        padded(extent(ys), 0.05)
    }

    /// Date label for an x position
    pub fn x_label_for(&self, x: f64) -> String {
        match self.x_origin {
            Some(origin) => (origin + chrono::Duration::days(x.round() as i64))
                .format("%Y-%m-%d")
                .to_string(),
            None => format!("{}", x),
        }
    }
}

fn extent<'a>(values: impl Iterator<Item = &'a f64>) -> (f64, f64) {
    values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

fn padded((lo, hi): (f64, f64), margin: f64) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if (hi - lo).abs() < f64::EPSILON {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * margin;
    (lo - pad, hi + pad)
}

/// Line plot of a dated series, x counted in days from the first date
pub fn series_figure(series: &Series) -> Figure {
    let settings = PlotSettings {
        title: "Daily minimum temperature".to_string(),
        x_label: "Date".to_string(),
        y_label: "Minimum temperature [°C]".to_string(),
        ..PlotSettings::default()
    };

    let origin = series.first_date();
    let x = series
        .dates()
        .iter()
        .map(|d| origin.map_or(0.0, |o| (*d - o).num_days() as f64))
        .collect();

    let figure = Figure::new("series", settings).with_trace(Trace {
        name: series.name().cloned().unwrap_or_else(|| "value".to_string()),
        x,
        y: series.values().to_vec(),
        kind: PlotKind::Line,
        style: TraceStyle::solid(SERIES_COLOR),
    });

    match origin {
        Some(origin) => figure.with_x_origin(origin),
        None => figure,
    }
}

/// Stem plot of autocorrelations with the confidence band around zero
pub fn acf_figure(acf: &AcfResult) -> Figure {
    let settings = PlotSettings {
        x_label: "Lags".to_string(),
        y_label: "Autocorrelation coefficient".to_string(),
        ..PlotSettings::default()
    };
    let lags: Vec<f64> = (0..acf.values.len()).map(|k| k as f64).collect();

    Figure::new("acf", settings)
        .with_band(Band {
            x: lags.clone(),
            lower: acf.confint.iter().map(|w| -w).collect(),
            upper: acf.confint.clone(),
        })
        .with_trace(Trace {
            name: "Autocorrelation".to_string(),
            x: lags,
            y: acf.values.clone(),
            kind: PlotKind::Stem,
            style: TraceStyle::solid(SERIES_COLOR),
        })
}

/// Forecast against the held-out values over days 1..=horizon
pub fn comparison_figure(comparison: &Comparison) -> Figure {
    let horizon = comparison.days.len();
    let settings = PlotSettings {
        x_label: "Days".to_string(),
        y_label: "Temperature [°C]".to_string(),
        show_legend: true,
        x_range: Some((0.0, horizon as f64)),
        x_tick_step: Some(1.0),
        ..PlotSettings::default()
    };
    let days: Vec<f64> = comparison.days.iter().map(|&d| d as f64).collect();

    let mut figure = Figure::new("comparison", settings)
        .with_trace(Trace {
            name: "Forecast".to_string(),
            x: days.clone(),
            y: comparison.predicted.clone(),
            kind: PlotKind::Line,
            style: TraceStyle::dashed(FORECAST_COLOR),
        })
        .with_trace(Trace {
            name: "Test value".to_string(),
            x: days.clone(),
            y: comparison.actual.clone(),
            kind: PlotKind::Line,
            style: TraceStyle::solid(SERIES_COLOR),
        });

    if comparison.confidence_level > 0.0 {
        figure = figure.with_band(Band {
            x: days,
            lower: comparison.lower.clone(),
            upper: comparison.upper.clone(),
        });
    }
    figure
}
