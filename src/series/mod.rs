//! Date-indexed univariate series
//!
//! A [`Series`] is an ordered sequence of `(date, value)` pairs. Dates are
//! strictly ascending, so there are no duplicates. The series is immutable
//! once built; slicing operations return new series.

use chrono::NaiveDate;
use std::fmt;

use crate::error::{Error, Result};
use crate::stats::{self, DescriptiveStats};

/// Maximum rows printed before the display is truncated to head and tail
const MAX_DISPLAY_ROWS: usize = 60;
/// Rows shown at each end of a truncated display
const TRUNCATED_ROWS: usize = 5;

/// Series: a date index with one numeric column
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Index dates (ascending, unique)
    dates: Vec<NaiveDate>,

    /// Values aligned with `dates`
    values: Vec<f64>,

    /// Column name
    name: Option<String>,

    /// Index name
    index_name: Option<String>,
}

impl Series {
    /// Create a new series, checking the index invariants
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>, name: Option<String>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(Error::LengthMismatch {
                expected: dates.len(),
                actual: values.len(),
            });
        }

        if let Some(pos) = dates.windows(2).position(|w| w[0] >= w[1]) {
            let (prev, next) = (dates[pos], dates[pos + 1]);
            let reason = if prev == next {
                "duplicate date"
            } else {
                "dates out of order"
            };
            return Err(Error::Consistency(format!(
                "{} at position {}: {} followed by {}",
                reason,
                pos + 1,
                prev,
                next
            )));
        }

        Ok(Series {
            dates,
            values,
            name,
            index_name: None,
        })
    }

    /// Set the index name
    pub fn with_index_name(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    /// Set the column name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the `(date, value)` pair at a position
    pub fn get(&self, pos: usize) -> Option<(NaiveDate, f64)> {
        Some((*self.dates.get(pos)?, *self.values.get(pos)?))
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    pub fn index_name(&self) -> Option<&String> {
        self.index_name.as_ref()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Iterate over `(date, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> Series {
        self.slice(0, n.min(self.len()))
    }

    /// Last `n` rows
    pub fn tail(&self, n: usize) -> Series {
        let start = self.len().saturating_sub(n);
        self.slice(start, self.len())
    }

    /// Split into a training prefix and a trailing test suffix of `test_size` rows
    ///
    /// Both parts keep their dates; the training part is never empty.
    pub fn train_test_split(&self, test_size: usize) -> Result<(Series, Series)> {
        if test_size == 0 {
            return Err(Error::InvalidInput(
                "test size must be at least 1".to_string(),
            ));
        }
        if test_size >= self.len() {
            return Err(Error::InsufficientData {
                needed: test_size + 1,
                got: self.len(),
            });
        }

        let split = self.len() - test_size;
        Ok((self.slice(0, split), self.slice(split, self.len())))
    }

    /// Descriptive statistics of the values
    pub fn describe(&self) -> Result<DescriptiveStats> {
        stats::describe(&self.values)
    }

    // Slices of a valid series are valid, so no re-validation here
    fn slice(&self, start: usize, end: usize) -> Series {
        Series {
            dates: self.dates[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
            name: self.name.clone(),
            index_name: self.index_name.clone(),
        }
    }
}

/// Number of decimals needed to print every value without loss (capped at 6)
fn display_precision(values: &[f64]) -> usize {
    values
        .iter()
        .map(|v| {
            let mut precision = 0;
            let mut scaled = *v;
            while precision < 6 && (scaled - scaled.round()).abs() > 1e-9 {
                scaled *= 10.0;
                precision += 1;
            }
            precision
        })
        .max()
        .unwrap_or(0)
        .max(1)
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let truncated = self.len() > MAX_DISPLAY_ROWS;
        let rows: Vec<usize> = if truncated {
            (0..TRUNCATED_ROWS)
                .chain(self.len() - TRUNCATED_ROWS..self.len())
                .collect()
        } else {
            (0..self.len()).collect()
        };

        let shown: Vec<f64> = rows.iter().map(|&i| self.values[i]).collect();
        let precision = display_precision(&shown);
        let cells: Vec<String> = shown
            .iter()
            .map(|v| format!("{:.*}", precision, v))
            .collect();

        let name = self.name.as_deref().unwrap_or("value");
        let index_name = self.index_name.as_deref().unwrap_or("");
        let index_width = index_name.len().max(10);
        let value_width = cells
            .iter()
            .map(String::len)
            .chain(std::iter::once(name.len()))
            .max()
            .unwrap_or(0);

        writeln!(
            f,
            "{:<iw$}  {:>vw$}",
            "",
            name,
            iw = index_width,
            vw = value_width
        )?;
        if !index_name.is_empty() {
            writeln!(
                f,
                "{:<iw$}  {:>vw$}",
                index_name,
                "",
                iw = index_width,
                vw = value_width
            )?;
        }

        for (k, (&row, cell)) in rows.iter().zip(cells.iter()).enumerate() {
            if truncated && k == TRUNCATED_ROWS {
                writeln!(
                    f,
                    "{:<iw$}  {:>vw$}",
                    "...",
                    "...",
                    iw = index_width,
                    vw = value_width
                )?;
            }
            writeln!(
                f,
                "{:<iw$}  {:>vw$}",
                self.dates[row].format("%Y-%m-%d").to_string(),
                cell,
                iw = index_width,
                vw = value_width
            )?;
        }

        if truncated {
            writeln!(f)?;
            writeln!(f, "[{} rows x 1 columns]", self.len())?;
        }
        Ok(())
    }
}
