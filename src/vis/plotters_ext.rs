//! Image output of figures with plotters
//!
//! Each figure is written to `<dir>/<figure id>.<ext>`, as PNG through the
//! bitmap backend or as SVG.

use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ImageFormat;
use crate::error::{Error, Result};
use crate::vis::figure::{Figure, LineStyle, PlotKind, BAND_COLOR};
use crate::vis::FigureSink;

/// Writes figures as image files into a directory
#[derive(Debug, Clone)]
pub struct ImageSink {
    dir: PathBuf,
    format: ImageFormat,
    written: Vec<PathBuf>,
}

impl ImageSink {
    /// Create the sink, creating `dir` if needed
    pub fn new<P: AsRef<Path>>(dir: P, format: ImageFormat) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(Error::Io)?;
        Ok(ImageSink {
            dir,
            format,
            written: Vec::new(),
        })
    }

    /// Files written so far
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn path_for(&self, figure: &Figure) -> PathBuf {
        self.dir
            .join(format!("{}.{}", figure.id, self.format.extension()))
    }
}

impl FigureSink for ImageSink {
    fn show(&mut self, figure: &Figure) -> Result<()> {
        let path = self.path_for(figure);
        let size = (figure.settings.width, figure.settings.height);

        match self.format {
            ImageFormat::Png => {
                let root = BitMapBackend::new(&path, size).into_drawing_area();
                draw_figure(&root, figure)?;
            }
            ImageFormat::Svg => {
                let root = SVGBackend::new(&path, size).into_drawing_area();
                draw_figure(&root, figure)?;
            }
        }

        log::info!("wrote figure '{}' to {}", figure.id, path.display());
        self.written.push(path);
        Ok(())
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> RGBColor {
    RGBColor(r, g, b)
}

/// Draw a figure on any plotters backend
fn draw_figure<DB>(root: &DrawingArea<DB, Shift>, figure: &Figure) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let settings = &figure.settings;
    let (x_min, x_max) = figure.x_bounds();
    let (y_min, y_max) = figure.y_bounds();

    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(root)
        .caption(&settings.title, ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    let x_formatter = |v: &f64| match figure.x_origin {
        Some(_) => figure.x_label_for(*v),
        None => format!("{:.0}", v),
    };
    let y_formatter = |v: &f64| format!("{:.1}", v);
    let x_labels = match settings.x_tick_step {
        Some(step) if step > 0.0 => ((x_max - x_min) / step).round() as usize + 1,
        _ => 10,
    };

    let mut mesh = chart.configure_mesh();
    mesh.x_labels(x_labels)
        .y_labels(10)
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .x_desc(&settings.x_label)
        .y_desc(&settings.y_label);
    if !settings.show_grid {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    if let Some(band) = &figure.band {
        let outline: Vec<(f64, f64)> = band
            .x
            .iter()
            .copied()
            .zip(band.upper.iter().copied())
            .chain(
                band.x
                    .iter()
                    .copied()
                    .zip(band.lower.iter().copied())
                    .rev(),
            )
            .collect();
        chart.draw_series(std::iter::once(Polygon::new(
            outline,
            rgb(BAND_COLOR).mix(0.2),
        )))?;
    }

    for trace in &figure.traces {
        let color = rgb(trace.style.color);
        let points: Vec<(f64, f64)> = trace.points().collect();

        match (trace.kind, trace.style.line) {
            (PlotKind::Line, LineStyle::Solid) => {
                chart
                    .draw_series(LineSeries::new(points, color.stroke_width(2)))?
                    .label(trace.name.clone())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            }
            (PlotKind::Line, LineStyle::Dashed) => {
                chart
                    .draw_series(DashedLineSeries::new(
                        points,
                        10,
                        6,
                        color.stroke_width(2),
                    ))?
                    .label(trace.name.clone())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            }
            (PlotKind::Stem, _) => {
                chart.draw_series(
                    points
                        .iter()
                        .map(|&(x, y)| PathElement::new(vec![(x, 0.0), (x, y)], color)),
                )?;
                chart
                    .draw_series(
                        points
                            .iter()
                            .map(|&(x, y)| Circle::new((x, y), 3, color.filled())),
                    )?
                    .label(trace.name.clone())
                    .legend(move |(x, y)| Circle::new((x + 10, y), 3, color.filled()));
            }
        }
    }

    if settings.show_legend {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;
    }

    root.present()?;
    Ok(())
}
