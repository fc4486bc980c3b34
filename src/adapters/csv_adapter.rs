//! CSV file data adapter.
//!
//! Columns are located by header name, case-insensitively: `close` (or
//! `price`) and `volume` are required, `timestamp` (or `date`) is optional.

use crate::domain::error::MtftraderError;
use crate::domain::price_series::{PriceBar, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const CLOSE_HEADERS: [&str; 2] = ["close", "price"];
const VOLUME_HEADERS: [&str; 1] = ["volume"];
const TIMESTAMP_HEADERS: [&str; 2] = ["timestamp", "date"];

pub struct CsvAdapter {
    path: PathBuf,
}

struct Columns {
    close: usize,
    volume: usize,
    timestamp: Option<usize>,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn locate_columns(headers: &csv::StringRecord) -> Result<Columns, MtftraderError> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        };
        let close = find(&CLOSE_HEADERS).ok_or_else(|| MtftraderError::DataSource {
            reason: "missing close column".into(),
        })?;
        let volume = find(&VOLUME_HEADERS).ok_or_else(|| MtftraderError::DataSource {
            reason: "missing volume column".into(),
        })?;
        Ok(Columns {
            close,
            volume,
            timestamp: find(&TIMESTAMP_HEADERS),
        })
    }
}

fn parse_number(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    line: u64,
) -> Result<f64, MtftraderError> {
    let raw = record.get(index).ok_or_else(|| MtftraderError::DataSource {
        reason: format!("line {}: missing {} value", line, name),
    })?;
    raw.trim().parse().map_err(|e| MtftraderError::DataSource {
        reason: format!("line {}: invalid {} value {:?}: {}", line, name, raw, e),
    })
}

/// Accepts `%Y-%m-%d`, `%Y-%m-%d %H:%M:%S` and RFC 3339.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc())
}

impl DataPort for CsvAdapter {
    fn fetch_series(&self) -> Result<PriceSeries, MtftraderError> {
        let content = fs::read_to_string(&self.path).map_err(|e| MtftraderError::DataSource {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| MtftraderError::DataSource {
            reason: format!("CSV header error: {}", e),
        })?;
        let columns = Self::locate_columns(headers)?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| MtftraderError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let timestamp = match columns.timestamp {
                Some(idx) => {
                    let raw = record.get(idx).unwrap_or("");
                    Some(parse_timestamp(raw).ok_or_else(|| MtftraderError::DataSource {
                        reason: format!("line {}: invalid timestamp {:?}", line, raw),
                    })?)
                }
                None => None,
            };

            bars.push(PriceBar {
                timestamp,
                close: parse_number(&record, columns.close, "close", line)?,
                volume: parse_number(&record, columns.volume, "volume", line)?,
            });
        }

        if columns.timestamp.is_some() {
            bars.sort_by_key(|b| b.timestamp);
        }
        debug!(path = %self.path.display(), bars = bars.len(), "loaded price data");
        Ok(PriceSeries::new(bars))
    }
}
