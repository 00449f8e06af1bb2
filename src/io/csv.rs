use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};
use crate::series::Series;

/// Date formats tried in order when no format is configured
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d.%m.%Y"];

/// Date-time formats tried after the date formats (time of day is dropped)
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Options for reading a dated series
#[derive(Debug, Clone, Default)]
pub struct CsvOptions {
    /// Header of the value column (the second column when `None`)
    pub value_column: Option<String>,
    /// chrono format of the date column (auto-detected when `None`)
    pub date_format: Option<String>,
}

impl CsvOptions {
    pub fn with_value_column(mut self, column: impl Into<String>) -> Self {
        self.value_column = Some(column.into());
        self
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }
}

/// Read a dated series from a CSV file
///
/// The first column holds the dates and becomes the series index. The file
/// must have a header row.
pub fn read_csv<P: AsRef<Path>>(path: P, options: &CsvOptions) -> Result<Series> {
    let file = File::open(path.as_ref()).map_err(Error::Io)?;
    let series = read_csv_from_reader(file, options)?;
    log::info!(
        "loaded {} rows from {}",
        series.len(),
        path.as_ref().display()
    );
    Ok(series)
}

/// Read a dated series from any reader of CSV text
pub fn read_csv_from_reader<R: Read>(reader: R, options: &CsvOptions) -> Result<Series> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(Error::Csv)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.len() < 2 {
        return Err(Error::InvalidInput(format!(
            "expected a date column and a value column, found {} column(s)",
            headers.len()
        )));
    }

    let value_idx = match &options.value_column {
        Some(name) => headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::ColumnNotFound(name.clone()))?,
        None => 1,
    };
    let date_header = headers[0].clone();
    let value_header = headers[value_idx].clone();

    let mut dates = Vec::new();
    let mut values = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let record = result.map_err(Error::Csv)?;
        // Data rows are numbered from 1 after the header
        let row = i + 1;

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let date_field = record.get(0).unwrap_or("");
        let date = parse_date(date_field, options.date_format.as_deref()).map_err(|reason| {
            Error::Parse {
                row,
                column: date_header.clone(),
                value: date_field.to_string(),
                reason,
            }
        })?;

        let value_field = record.get(value_idx).unwrap_or("");
        let value = value_field
            .parse::<f64>()
            .map_err(|e| Error::Parse {
                row,
                column: value_header.clone(),
                value: value_field.to_string(),
                reason: e.to_string(),
            })?;

        dates.push(date);
        values.push(value);
    }

    if values.is_empty() {
        return Err(Error::EmptyData("CSV contains no data rows".into()));
    }

    Ok(Series::new(dates, values, Some(value_header))?.with_index_name(date_header))
}

/// Parse a date with `format`, or with the known formats in order
fn parse_date(field: &str, format: Option<&str>) -> std::result::Result<NaiveDate, String> {
    if let Some(format) = format {
        return NaiveDate::parse_from_str(field, format)
            .or_else(|_| NaiveDateTime::parse_from_str(field, format).map(|dt| dt.date()))
            .map_err(|e| format!("does not match '{}': {}", format, e));
    }

    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(field, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(field, f).ok())
                .map(|dt| dt.date())
        })
        .ok_or_else(|| "unrecognized date format".to_string())
}
