//! Test utilities for temporary files and synthetic data

use chrono::{Duration, NaiveDate};
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use tempcast::vis::{Figure, FigureSink};

static TEST_FILE_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Generate a unique test file path in the temporary directory
pub fn test_temp_path(test_name: &str, extension: &str) -> PathBuf {
    let counter = TEST_FILE_COUNTER.fetch_add(1, Ordering::SeqCst);
    let filename = format!(
        "tempcast_test_{}_{}_{}.{}",
        test_name,
        std::process::id(),
        counter,
        extension
    );
    env::temp_dir().join(filename)
}

/// RAII wrapper for temporary test files with automatic cleanup
pub struct TempTestFile {
    path: PathBuf,
}

impl TempTestFile {
    pub fn new(test_name: &str, extension: &str) -> Self {
        TempTestFile {
            path: test_temp_path(test_name, extension),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempTestFile {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Helper to create a test CSV file with given data
pub fn create_test_csv(test_name: &str, headers: &[&str], rows: &[Vec<String>]) -> TempTestFile {
    let temp_file = TempTestFile::new(test_name, "csv");
    let mut file = File::create(temp_file.path()).expect("Failed to create test CSV");

    writeln!(file, "{}", headers.join(",")).expect("Failed to write headers");
    for row in rows {
        writeln!(file, "{}", row.join(",")).expect("Failed to write row");
    }

    temp_file
}

/// Deterministic noise in [-0.5, 0.5)
fn noise(i: usize, seed: u64) -> f64 {
    let mut state = seed ^ (i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    state ^= state >> 33;
    (state >> 11) as f64 / (1u64 << 53) as f64 - 0.5
}

/// Temperature-like values with a cycle of `period` days plus noise
pub fn seasonal_values(len: usize, period: usize, seed: u64) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let phase = 2.0 * std::f64::consts::PI * i as f64 / period as f64;
            11.0 + 4.0 * phase.cos() + noise(i, seed)
        })
        .collect()
}

/// CSV file of daily seasonal values starting at 1981-01-01
pub fn seasonal_csv(test_name: &str, len: usize, period: usize) -> TempTestFile {
    let start = NaiveDate::from_ymd_opt(1981, 1, 1).expect("valid date");
    let rows: Vec<Vec<String>> = seasonal_values(len, period, 42)
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            vec![
                (start + Duration::days(i as i64)).format("%Y-%m-%d").to_string(),
                format!("{:.1}", v),
            ]
        })
        .collect();
    create_test_csv(test_name, &["Date", "Temp"], &rows)
}

/// Keeps every figure it is shown
#[derive(Default)]
pub struct RecordingSink {
    pub figures: Vec<Figure>,
}

impl RecordingSink {
    pub fn ids(&self) -> Vec<&str> {
        self.figures.iter().map(|f| f.id.as_str()).collect()
    }
}

impl FigureSink for RecordingSink {
    fn show(&mut self, figure: &Figure) -> tempcast::Result<()> {
        self.figures.push(figure.clone());
        Ok(())
    }
}
