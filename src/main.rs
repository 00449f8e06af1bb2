use std::error::Error;
use std::io;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use tempcast::config::DEFAULT_CONFIG_FILE;
use tempcast::{MultiSink, Pipeline, PipelineConfig, TerminalSink};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    log::info!("tempcast {}", tempcast::VERSION);
    let config = PipelineConfig::load_or_default(DEFAULT_CONFIG_FILE)?;

    let terminal = TerminalSink::new(io::stdout(), config.terminal_width, config.terminal_height)
        .with_pause(Duration::from_millis(config.pause_ms));
    let mut sink = with_image_sink(MultiSink::new().with_sink(terminal), &config)?;

    let report = Pipeline::new(config).run(&mut sink, &mut io::stdout())?;
    log::info!(
        "finished: {} observations, {} forecast days",
        report.observations,
        report.comparison.len()
    );
    Ok(())
}

#[cfg(feature = "visualization")]
fn with_image_sink(sink: MultiSink, config: &PipelineConfig) -> tempcast::Result<MultiSink> {
    match &config.plot_dir {
        Some(dir) => Ok(sink.with_sink(tempcast::vis::ImageSink::new(dir, config.image_format)?)),
        None => Ok(sink),
    }
}

#[cfg(not(feature = "visualization"))]
fn with_image_sink(sink: MultiSink, config: &PipelineConfig) -> tempcast::Result<MultiSink> {
    if config.plot_dir.is_some() {
        log::warn!("plot_dir is set but image output needs the `visualization` feature");
    }
    Ok(sink)
}
