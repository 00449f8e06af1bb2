//! Terminal rendering with textplots

use std::io::Write;
use std::thread;
use std::time::Duration;
use textplots::{Chart, Plot, Shape};

use crate::error::{Error, Result};
use crate::vis::figure::{Figure, LineStyle, PlotKind};
use crate::vis::FigureSink;

/// Smallest chart textplots can draw
const MIN_WIDTH: u32 = 32;
const MIN_HEIGHT: u32 = 3;

/// Render a figure as a braille chart with a title, legend and axis labels
pub fn render_text(figure: &Figure, width: u32, height: u32) -> Result<String> {
    if width < MIN_WIDTH || height < MIN_HEIGHT {
        return Err(Error::Visualization(format!(
            "terminal chart must be at least {}x{}, got {}x{}",
            MIN_WIDTH, MIN_HEIGHT, width, height
        )));
    }

    let (x_min, x_max) = figure.x_bounds();

    let mut point_sets: Vec<Vec<(f32, f32)>> = Vec::new();
    let mut kinds: Vec<PlotKind> = Vec::new();
    if let Some(band) = &figure.band {
        for edge in [&band.lower, &band.upper] {
            point_sets.push(
                band.x
                    .iter()
                    .zip(edge.iter())
                    .map(|(&x, &y)| (x as f32, y as f32))
                    .collect(),
            );
            kinds.push(PlotKind::Line);
        }
    }
    for trace in &figure.traces {
        point_sets.push(
            trace
                .points()
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .map(|(x, y)| (x as f32, y as f32))
                .collect(),
        );
        kinds.push(trace.kind);
    }

    let shapes: Vec<Shape> = point_sets
        .iter()
        .zip(&kinds)
        .filter(|(points, _)| !points.is_empty())
        .map(|(points, kind)| match kind {
            PlotKind::Line => Shape::Lines(points),
            PlotKind::Stem => Shape::Bars(points),
        })
        .collect();

    let mut out = String::new();
    if !figure.settings.title.is_empty() {
        out.push_str(&figure.settings.title);
        out.push('\n');
    }
    if figure.settings.show_legend {
        for trace in &figure.traces {
            let pattern = match trace.style.line {
                LineStyle::Solid => "solid",
                LineStyle::Dashed => "dashed",
            };
            out.push_str(&format!("  {} ({})\n", trace.name, pattern));
        }
    }

    if shapes.is_empty() {
        out.push_str("(no data)\n");
        return Ok(out);
    }

    let mut chart = Chart::new(width, height, x_min as f32, x_max as f32);
    let mut chart_ref = &mut chart;
    for shape in &shapes {
        chart_ref = chart_ref.lineplot(shape);
    }
    chart_ref.axis();
    chart_ref.figures();
    out.push_str(&chart_ref.to_string());

    out.push_str(&format!(
        "x: {}  y: {}\n",
        figure.settings.x_label, figure.settings.y_label
    ));
    if figure.x_origin.is_some() {
        out.push_str(&format!(
            "   {} .. {}\n",
            figure.x_label_for(x_min),
            figure.x_label_for(x_max)
        ));
    }
    Ok(out)
}

/// Writes each figure to a terminal and pauses
pub struct TerminalSink<W: Write> {
    out: W,
    width: u32,
    height: u32,
    pause: Duration,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, width: u32, height: u32) -> Self {
        TerminalSink {
            out,
            width,
            height,
            pause: Duration::from_secs(2),
        }
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FigureSink for TerminalSink<W> {
    fn show(&mut self, figure: &Figure) -> Result<()> {
        let rendered = render_text(figure, self.width, self.height)?;
        writeln!(self.out, "{}", rendered)?;
        self.out.flush()?;
        log::debug!("displayed figure '{}'", figure.id);
        if !self.pause.is_zero() {
            thread::sleep(self.pause);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vis::figure::{PlotSettings, Trace, TraceStyle, SERIES_COLOR};

    fn line_figure() -> Figure {
        let settings = PlotSettings {
            title: "Sine".to_string(),
            x_label: "t".to_string(),
            y_label: "v".to_string(),
            show_legend: true,
            ..PlotSettings::default()
        };
        Figure::new("sine", settings).with_trace(Trace {
            name: "sin".to_string(),
            x: (0..50).map(|i| i as f64).collect(),
            y: (0..50).map(|i| (i as f64 / 5.0).sin()).collect(),
            kind: PlotKind::Line,
            style: TraceStyle::solid(SERIES_COLOR),
        })
    }

    #[test]
    fn test_render_contains_labels() {
        let text = render_text(&line_figure(), 60, 15).unwrap();
        assert!(text.starts_with("Sine\n"));
        assert!(text.contains("sin (solid)"));
        assert!(text.contains("x: t  y: v"));
        assert!(text.lines().count() > 5);
    }

    #[test]
    fn test_render_rejects_small_terminal() {
        assert!(render_text(&line_figure(), 10, 15).is_err());
        assert!(render_text(&line_figure(), 60, 2).is_err());
    }

    #[test]
    fn test_sink_writes_without_pause() {
        let mut sink = TerminalSink::new(Vec::new(), 60, 15).with_pause(Duration::ZERO);
        sink.show(&line_figure()).unwrap();
        let written = String::from_utf8(sink.into_inner()).unwrap();
        assert!(written.contains("Sine"));
    }
}
