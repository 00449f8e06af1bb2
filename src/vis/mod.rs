//! Module providing data visualization functionality
//!
//! Figures are described as data in [`figure`] and shown through a
//! [`FigureSink`]. The text sink renders braille charts with textplots; the
//! image sink (feature `visualization`) writes PNG or SVG files with plotters.

pub mod figure;
#[cfg(feature = "visualization")]
pub mod plotters_ext;
pub mod text;

pub use self::figure::{
    acf_figure, comparison_figure, series_figure, Band, Figure, LineStyle, PlotKind,
    PlotSettings, Trace, TraceStyle,
};
#[cfg(feature = "visualization")]
pub use self::plotters_ext::ImageSink;
pub use self::text::{render_text, TerminalSink};

use crate::error::Result;

/// Destination for figures
pub trait FigureSink {
    /// Display or store one figure
    fn show(&mut self, figure: &Figure) -> Result<()>;
}

impl<S: FigureSink + ?Sized> FigureSink for Box<S> {
    fn show(&mut self, figure: &Figure) -> Result<()> {
        (**self).show(figure)
    }
}

/// Sends each figure to several sinks in order
#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Box<dyn FigureSink>>,
}

impl MultiSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: impl FigureSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl FigureSink for MultiSink {
    fn show(&mut self, figure: &Figure) -> Result<()> {
        for sink in &mut self.sinks {
            sink.show(figure)?;
        }
        Ok(())
    }
}
