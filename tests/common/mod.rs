#![allow(dead_code)]

use chrono::NaiveDate;
use mtftrader::domain::error::MtftraderError;
use mtftrader::domain::price_series::{PriceBar, PriceSeries};
use mtftrader::domain::weights::WeightMapping;
use mtftrader::ports::data_port::DataPort;
use mtftrader::ports::weight_port::WeightPort;
use std::cell::Cell;

pub struct MockDataPort {
    pub series: PriceSeries,
    pub error: Option<String>,
    pub calls: Cell<usize>,
}

impl MockDataPort {
    pub fn new(series: PriceSeries) -> Self {
        Self {
            series,
            error: None,
            calls: Cell::new(0),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            series: PriceSeries::default(),
            error: Some(reason.to_string()),
            calls: Cell::new(0),
        }
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(&self) -> Result<PriceSeries, MtftraderError> {
        self.calls.set(self.calls.get() + 1);
        if let Some(reason) = &self.error {
            return Err(MtftraderError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self.series.clone())
    }
}

pub struct MockWeightPort {
    pub weights: Result<WeightMapping, String>,
}

impl MockWeightPort {
    pub fn new(weights: WeightMapping) -> Self {
        Self {
            weights: Ok(weights),
        }
    }

    pub fn empty() -> Self {
        Self::new(WeightMapping::new())
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            weights: Err(reason.to_string()),
        }
    }
}

impl WeightPort for MockWeightPort {
    fn load_weights(&self) -> Result<WeightMapping, MtftraderError> {
        self.weights
            .clone()
            .map_err(|reason| MtftraderError::WeightSource { reason })
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Rising series with alternating +3 bumps, so both gains and losses occur.
pub fn sawtooth_uptrend(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + i as f64 + if i % 2 == 1 { 3.0 } else { 0.0 })
        .collect()
}

pub fn linear(n: usize, start: f64, step: f64) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

pub fn constant_volume(n: usize) -> Vec<f64> {
    vec![1000.0; n]
}

/// Daily-stamped series starting 2024-01-01.
pub fn dated_series(closes: &[f64], volumes: &[f64]) -> PriceSeries {
    let start = date(2024, 1, 1);
    let bars = closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&close, &volume))| PriceBar {
            timestamp: (start + chrono::Days::new(i as u64)).and_hms_opt(0, 0, 0),
            close,
            volume,
        })
        .collect();
    PriceSeries::new(bars)
}
