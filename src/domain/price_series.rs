//! Price/volume series representation.

use chrono::NaiveDateTime;

/// A single observation: closing price and traded volume.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub timestamp: Option<NaiveDateTime>,
    pub close: f64,
    pub volume: f64,
}

/// Bars ordered ascending by timestamp.
///
/// Closes and volumes are stored column-wise so indicator code can take
/// prefix slices (`&closes[..=i]`) while walking forward without copying.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    timestamps: Vec<Option<NaiveDateTime>>,
    closes: Vec<f64>,
    volumes: Vec<f64>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Self {
        let mut series = PriceSeries {
            timestamps: Vec::with_capacity(bars.len()),
            closes: Vec::with_capacity(bars.len()),
            volumes: Vec::with_capacity(bars.len()),
        };
        for bar in bars {
            series.push(bar);
        }
        series
    }

    /// Build an untimestamped series from aligned close/volume columns.
    /// Extra entries in the longer column are ignored.
    pub fn from_columns(closes: &[f64], volumes: &[f64]) -> Self {
        let len = closes.len().min(volumes.len());
        PriceSeries {
            timestamps: vec![None; len],
            closes: closes[..len].to_vec(),
            volumes: volumes[..len].to_vec(),
        }
    }

    pub fn push(&mut self, bar: PriceBar) {
        self.timestamps.push(bar.timestamp);
        self.closes.push(bar.close);
        self.volumes.push(bar.volume);
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn volumes(&self) -> &[f64] {
        &self.volumes
    }

    pub fn timestamp(&self, index: usize) -> Option<NaiveDateTime> {
        self.timestamps.get(index).copied().flatten()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.closes.last().copied()
    }

    pub fn bar(&self, index: usize) -> Option<PriceBar> {
        Some(PriceBar {
            timestamp: *self.timestamps.get(index)?,
            close: *self.closes.get(index)?,
            volume: *self.volumes.get(index)?,
        })
    }
}
