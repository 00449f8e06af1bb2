mod common;

use common::seasonal_csv;
use tempcast::io::{read_csv, CsvOptions};

#[test]
fn test_split_keeps_dates_and_order() {
    let file = seasonal_csv("split", 120, 30);
    let series = read_csv(file.path(), &CsvOptions::default()).unwrap();

    let (train, test) = series.train_test_split(10).unwrap();
    assert_eq!(train.len(), 110);
    assert_eq!(test.len(), 10);
    assert_eq!(train.last_date().unwrap().succ_opt(), test.first_date());
    assert_eq!(test.last_date(), series.last_date());
    assert_eq!(&series.values()[110..], test.values());
    assert_eq!(test.name(), series.name());
}

#[test]
fn test_split_needs_training_rows() {
    let file = seasonal_csv("split_short", 10, 5);
    let series = read_csv(file.path(), &CsvOptions::default()).unwrap();
    assert!(series.train_test_split(10).is_err());
    assert!(series.train_test_split(0).is_err());
    assert!(series.train_test_split(9).is_ok());
}

#[test]
fn test_head_tail_and_full_views() {
    let file = seasonal_csv("views", 3650, 365);
    let series = read_csv(file.path(), &CsvOptions::default()).unwrap();

    let head = series.head(5).to_string();
    assert!(head.contains("1981-01-01"));
    assert!(head.contains("1981-01-05"));
    assert!(!head.contains("1981-01-06"));

    let tail = series.tail(5);
    assert_eq!(tail.len(), 5);
    assert_eq!(tail.last_date(), series.last_date());

    let full = series.to_string();
    assert!(full.contains("..."));
    assert!(full.contains("[3650 rows x 1 columns]"));
    assert!(full.contains("Temp"));
}

#[test]
fn test_describe() {
    let file = seasonal_csv("describe", 365, 365);
    let series = read_csv(file.path(), &CsvOptions::default()).unwrap();
    let stats = series.describe().unwrap();
    assert_eq!(stats.count, 365);
    assert!((stats.mean - 11.0).abs() < 0.2);
    assert!(stats.min < stats.q1 && stats.q1 < stats.median);
    assert!(stats.median < stats.q3 && stats.q3 < stats.max);
    assert!(stats.max < 15.6 && stats.min > 6.4);
}
