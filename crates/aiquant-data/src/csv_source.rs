//! CSV data source.

use aiquant_core::error::DataError;
use aiquant_core::types::Bar;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// CSV record format. Header aliases cover the common exchange exports.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close")]
    close: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
}

/// CSV data source for historical bars.
///
/// Loaded bars are sorted by timestamp; a duplicate timestamp after sorting
/// is a hard error since the replay engine requires a strictly increasing
/// series.
pub struct CsvDataSource {
    path: String,
}

impl CsvDataSource {
    /// Create a new CSV data source.
    pub fn new(path: &str) -> Result<Self, DataError> {
        if !Path::new(path).exists() {
            return Err(DataError::NoDataAvailable);
        }
        Ok(Self {
            path: path.to_string(),
        })
    }

    /// Load every bar from the file.
    pub fn load_all(&self) -> Result<Vec<Bar>, DataError> {
        let file = std::fs::File::open(&self.path)
            .map_err(|e| DataError::Parse(e.to_string()))?;
        let bars = load_from_reader(file)?;
        debug!(path = %self.path, bars = bars.len(), "loaded csv data");
        Ok(bars)
    }
}

/// Parse bars out of any CSV reader.
pub fn load_from_reader<R: Read>(reader: R) -> Result<Vec<Bar>, DataError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut bars = Vec::new();
    for result in csv_reader.deserialize() {
        let record: CsvRecord = result.map_err(|e| DataError::Parse(e.to_string()))?;
        let timestamp = parse_timestamp(&record.date)?;
        bars.push(Bar::new(
            timestamp,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        ));
    }

    if bars.is_empty() {
        return Err(DataError::EmptySeries);
    }

    bars.sort_by_key(|b| b.timestamp);
    for pair in bars.windows(2) {
        if pair[0].timestamp == pair[1].timestamp {
            return Err(DataError::DuplicateTimestamp {
                timestamp: pair[0].timestamp,
            });
        }
    }

    Ok(bars)
}

/// Parse the common timestamp formats: dates, datetimes, Unix seconds or
/// milliseconds.
fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
    for format in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                return Ok(dt.and_utc().timestamp_millis());
            }
        }
    }

    if let Ok(ts) = date_str.parse::<i64>() {
        // More than 10 digits means milliseconds
        if ts > 10_000_000_000 {
            return Ok(ts);
        }
        return Ok(ts * 1000);
    }

    Err(DataError::Parse(format!(
        "could not parse date: {date_str}"
    )))
}
