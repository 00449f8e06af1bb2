//! Property-based tests for differencing and the forecast loop.

use proptest::prelude::*;
use tempcast::time_series::{difference, inverse_difference, ForecastLoop};

/// Series with a lag strictly inside its length
fn series_and_lag() -> impl Strategy<Value = (Vec<f64>, usize)> {
    (2usize..200).prop_flat_map(|len| {
        (prop::collection::vec(-50.0..50.0_f64, len), 1..len)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn difference_length_is_len_minus_lag((values, lag) in series_and_lag()) {
        let diff = difference(&values, lag).unwrap();
        prop_assert_eq!(diff.len(), values.len() - lag);
    }

    #[test]
    fn inverting_with_history_rebuilds_series((values, lag) in series_and_lag()) {
        let diff = difference(&values, lag).unwrap();
        let mut history = values[..lag].to_vec();
        for d in &diff {
            let next = inverse_difference(&history, *d, lag).unwrap();
            history.push(next);
        }
        for (rebuilt, original) in history.iter().zip(&values) {
            prop_assert!((rebuilt - original).abs() < 1e-9);
        }
    }

    #[test]
    fn loop_history_grows_by_horizon(
        (values, lag) in series_and_lag(),
        raw in prop::collection::vec(-5.0..5.0_f64, 1..30)
    ) {
        let mut forecast_loop = ForecastLoop::new(values.clone(), lag, raw.len()).unwrap();
        let predictions = forecast_loop.run(&raw).unwrap().to_vec();
        prop_assert_eq!(predictions.len(), raw.len());
        prop_assert_eq!(forecast_loop.history().len(), values.len() + raw.len());
        prop_assert_eq!(&forecast_loop.history()[..values.len()], &values[..]);
    }
}
