mod common;

use std::time::Duration;

use common::{seasonal_csv, RecordingSink};
use tempcast::time_series::ArimaOrder;
use tempcast::vis::PlotKind;
use tempcast::{Error, Pipeline, PipelineConfig, TerminalSink};

fn weekly_config(path: &std::path::Path) -> PipelineConfig {
    PipelineConfig {
        data_path: path.to_path_buf(),
        seasonal_lag: 7,
        horizon: 5,
        order: ArimaOrder::new(2, 0, 1),
        acf_lags: 21,
        pause_ms: 0,
        ..PipelineConfig::default()
    }
}

#[test]
fn test_weekly_run() {
    let file = seasonal_csv("pipeline_weekly", 210, 7);
    let pipeline = Pipeline::new(weekly_config(file.path()));
    let mut sink = RecordingSink::default();
    let mut out = Vec::new();

    let report = pipeline.run(&mut sink, &mut out).unwrap();

    assert_eq!(report.observations, 210);
    assert_eq!(report.train_len, 205);
    assert_eq!(report.test_len, 5);
    assert_eq!(report.differenced_len, 198);
    assert_eq!(report.comparison.days, vec![1, 2, 3, 4, 5]);
    assert!(report.comparison.metrics.mae < 2.0);
    for i in 0..5 {
        assert!(report.forecast.lower[i] <= report.forecast.values[i]);
        assert!(report.forecast.values[i] <= report.forecast.upper[i]);
    }

    let summary = report.summary.as_ref().unwrap();
    assert_eq!(summary.model, "ARIMA(2, 0, 1)");
    assert_eq!(summary.dep_variable, "Temp");

    assert_eq!(sink.ids(), vec!["series", "acf", "comparison"]);
    let acf = &sink.figures[1];
    assert_eq!(acf.traces[0].kind, PlotKind::Stem);
    assert_eq!(acf.traces[0].y.len(), 22);
    let comparison = &sink.figures[2];
    assert_eq!(comparison.settings.x_range, Some((0.0, 5.0)));
    assert_eq!(comparison.traces[0].name, "Forecast");
    assert_eq!(comparison.traces[1].name, "Test value");

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("[210 rows x 1 columns]"));
    assert!(text.contains("ARIMA Model Results"));
    assert!(text.contains("MAE:"));
}

#[test]
fn test_yearly_default_order() {
    let file = seasonal_csv("pipeline_yearly", 3 * 365 + 10, 365);
    let config = PipelineConfig {
        data_path: file.path().to_path_buf(),
        pause_ms: 0,
        ..PipelineConfig::default()
    };
    let mut sink = RecordingSink::default();
    let report = Pipeline::new(config).run(&mut sink, &mut Vec::new()).unwrap();

    assert_eq!(report.test_len, 10);
    assert_eq!(report.differenced_len, 3 * 365 - 365);
    assert_eq!(report.comparison.predicted.len(), 10);
    assert!(report.comparison.predicted.iter().all(|v| v.is_finite()));
    assert!(report.comparison.metrics.rmse < 3.0);
}

#[test]
fn test_terminal_output() {
    let file = seasonal_csv("pipeline_terminal", 140, 7);
    let pipeline = Pipeline::new(weekly_config(file.path()));
    let mut sink = TerminalSink::new(Vec::new(), 80, 20).with_pause(Duration::ZERO);

    pipeline.run(&mut sink, &mut Vec::new()).unwrap();
    let rendered = String::from_utf8(sink.into_inner()).unwrap();
    assert!(rendered.contains("Daily minimum temperature"));
    assert!(rendered.contains("Autocorrelation coefficient"));
    assert!(rendered.contains("Forecast (dashed)"));
    assert!(rendered.contains("Test value (solid)"));
}

#[test]
fn test_failures_propagate() {
    let config = PipelineConfig {
        data_path: "missing/temperatures.csv".into(),
        pause_ms: 0,
        ..PipelineConfig::default()
    };
    let result = Pipeline::new(config).run(&mut RecordingSink::default(), &mut Vec::new());
    assert!(matches!(result, Err(Error::Io(_))));

    // Too short for a yearly difference
    let file = seasonal_csv("pipeline_short", 300, 365);
    let config = PipelineConfig {
        data_path: file.path().to_path_buf(),
        pause_ms: 0,
        ..PipelineConfig::default()
    };
    let mut sink = RecordingSink::default();
    let result = Pipeline::new(config).run(&mut sink, &mut Vec::new());
    assert!(matches!(result, Err(Error::InsufficientData { .. })));
    // Figures before the failure were still shown
    assert_eq!(sink.ids(), vec!["series", "acf"]);

    let config = PipelineConfig {
        horizon: 0,
        ..PipelineConfig::default()
    };
    let result = Pipeline::new(config).run(&mut RecordingSink::default(), &mut Vec::new());
    assert!(matches!(result, Err(Error::Config(_))));
}
