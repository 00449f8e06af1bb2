mod common;

use common::seasonal_values;
use tempcast::time_series::{difference, ArimaModel, ArimaOrder, Forecaster, PredictionType};
use tempcast::Error;

fn seasonal_difference(len: usize, period: usize) -> Vec<f64> {
    difference(&seasonal_values(len, period, 7), period).unwrap()
}

#[test]
fn test_default_order_on_yearly_difference() {
    let diff = seasonal_difference(3 * 365, 365);
    let mut model = ArimaModel::new(ArimaOrder::new(9, 1, 3)).unwrap();
    model.fit(&diff).unwrap();

    let forecast = model.forecast(10).unwrap();
    assert_eq!(forecast.len(), 10);
    assert!(forecast.iter().all(|v| v.is_finite()));

    let summary = model.summary().unwrap();
    assert_eq!(summary.coefficients.len(), 13);
    assert_eq!(summary.nobs, diff.len() - 1);
    assert!(summary.aic < summary.bic);
    let text = summary.to_string();
    assert!(text.contains("ARIMA(9, 1, 3)"));
    assert!(text.contains("ar.L9.D.y"));
    assert!(text.contains("ma.L3.D.y"));
}

#[test]
fn test_coefficients_within_bounds() {
    let diff = seasonal_difference(2 * 365, 365);
    let mut model = ArimaModel::new(ArimaOrder::new(3, 0, 2)).unwrap();
    model.fit(&diff).unwrap();
    for c in model
        .ar_coefficients()
        .unwrap()
        .iter()
        .chain(model.ma_coefficients().unwrap())
    {
        assert!(c.abs() <= 0.99);
    }
}

#[test]
fn test_noise_forecast_stays_near_mean() {
    // Differencing a pure cycle leaves noise around zero
    let diff = seasonal_difference(500, 50);
    let mut model = ArimaModel::new(ArimaOrder::new(2, 0, 0)).unwrap();
    model.fit(&diff).unwrap();

    for v in model.forecast(20).unwrap() {
        assert!(v.abs() < 0.5, "forecast {} too far from zero", v);
    }
    assert!(model.sigma2().unwrap() < 0.5);
}

#[test]
fn test_in_sample_prediction_lengths() {
    let diff = seasonal_difference(300, 30);
    let mut model = ArimaModel::new(ArimaOrder::new(1, 1, 1)).unwrap();
    model.fit(&diff).unwrap();

    let n = diff.len();
    assert_eq!(model.predict(1, n - 1, PredictionType::Linear).unwrap().len(), n - 1);
    assert_eq!(model.predict(n - 5, n + 4, PredictionType::Levels).unwrap().len(), 10);
}

#[test]
fn test_intervals_cover_point_forecast() {
    let diff = seasonal_difference(400, 40);
    let mut model = ArimaModel::new(ArimaOrder::new(2, 0, 0)).unwrap();
    model.fit(&diff).unwrap();

    let narrow = model.forecast_with_intervals(8, 0.8).unwrap();
    let wide = model.forecast_with_intervals(8, 0.99).unwrap();
    for i in 0..8 {
        assert!(narrow.lower[i] < narrow.values[i] && narrow.values[i] < narrow.upper[i]);
        assert!(wide.upper[i] - wide.lower[i] > narrow.upper[i] - narrow.lower[i]);
    }
}

#[test]
fn test_errors() {
    let model = ArimaModel::new(ArimaOrder::new(1, 0, 0)).unwrap();
    assert!(matches!(model.forecast(3), Err(Error::InvalidOperation(_))));
    assert!(matches!(
        ArimaModel::new(ArimaOrder::new(1, 3, 0)),
        Err(Error::InvalidInput(_))
    ));

    let mut model = ArimaModel::new(ArimaOrder::new(9, 1, 3)).unwrap();
    assert!(matches!(
        model.fit(&seasonal_difference(378, 365)),
        Err(Error::InsufficientData { needed: 15, got: 13 })
    ));
}
