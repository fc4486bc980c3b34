//! Signal classification and confidence scoring.
//!
//! [`classify`] is a fixed decision table over moving-average crossover, RSI
//! and momentum. Weights only move the volume acceptance threshold; they never
//! change which branch of the table applies. [`confidence`] scores how
//! pronounced the current indicator readings are, blended by weight.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::domain::indicator::{
    calculate_momentum, calculate_rsi, calculate_sma, trailing_mean, DEFAULT_MOMENTUM_PERIOD,
    DEFAULT_RSI_PERIOD,
};
use crate::domain::timeframe::Timeframe;
use crate::domain::weights::{WeightKey, WeightMapping};

/// Bars required before a confidence score is computed.
pub const MIN_CONFIDENCE_BARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "Buy"),
            Signal::Sell => write!(f, "Sell"),
            Signal::Hold => write!(f, "Hold"),
        }
    }
}

/// Component scores, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    pub ma_signal: f64,
    pub rsi_signal: f64,
    pub volume_signal: f64,
    pub overall: f64,
}

/// Indicator readings at the last bar of a history, for one timeframe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    pub ma_short: Option<f64>,
    pub ma_long: Option<f64>,
    pub rsi: f64,
    pub momentum: f64,
    pub avg_volume: f64,
    pub current_volume: f64,
}

impl IndicatorSnapshot {
    pub fn compute(prices: &[f64], volumes: &[f64], timeframe: Timeframe) -> Self {
        let profile = timeframe.profile();
        let window = profile.long_period.min(volumes.len());
        IndicatorSnapshot {
            ma_short: calculate_sma(prices, profile.short_period),
            ma_long: calculate_sma(prices, profile.long_period),
            rsi: calculate_rsi(prices, DEFAULT_RSI_PERIOD),
            momentum: calculate_momentum(prices, DEFAULT_MOMENTUM_PERIOD),
            avg_volume: trailing_mean(volumes, window).unwrap_or(0.0),
            current_volume: volumes.last().copied().unwrap_or(0.0),
        }
    }
}

pub fn classify(
    prices: &[f64],
    volumes: &[f64],
    timeframe: Timeframe,
    weights: &WeightMapping,
) -> Signal {
    if prices.len() < timeframe.profile().long_period {
        return Signal::Hold;
    }
    let snapshot = IndicatorSnapshot::compute(prices, volumes, timeframe);
    let volume_threshold = snapshot.avg_volume * (1.0 - weights.resolve(WeightKey::Generativity));
    decide(&snapshot, volume_threshold)
}

/// The decision table.
///
/// A bullish crossover that fails the RSI/volume acceptance yields Hold
/// rather than falling through to the overbought/oversold extremes. A steady
/// rise pushes RSI toward 100 and fails acceptance on `rsi < 70`, so a
/// fall-through would hit the `rsi > 80` rule and Sell the trend it is
/// riding. The extremes therefore only decide when the averages sit level.
pub fn decide(snapshot: &IndicatorSnapshot, volume_threshold: f64) -> Signal {
    let (Some(ma_short), Some(ma_long)) = (snapshot.ma_short, snapshot.ma_long) else {
        return Signal::Hold;
    };
    let rsi = snapshot.rsi;
    let momentum = snapshot.momentum;

    match ma_short.partial_cmp(&ma_long) {
        Some(Ordering::Greater) => {
            let accepted = rsi < 70.0 && snapshot.current_volume > volume_threshold;
            let confirmed = momentum > 0.0 || (rsi < 50.0 && momentum > -2.0);
            if (accepted && confirmed) || rsi < 50.0 {
                Signal::Buy
            } else {
                Signal::Hold
            }
        }
        Some(Ordering::Less) => {
            if rsi > 60.0 || momentum < -1.0 {
                Signal::Sell
            } else {
                Signal::Hold
            }
        }
        _ => {
            if rsi > 80.0 {
                Signal::Sell
            } else if rsi < 20.0 {
                Signal::Buy
            } else {
                Signal::Hold
            }
        }
    }
}

pub fn confidence(
    prices: &[f64],
    volumes: &[f64],
    timeframe: Timeframe,
    weights: &WeightMapping,
) -> Confidence {
    if prices.len() < MIN_CONFIDENCE_BARS {
        return Confidence::default();
    }
    let snapshot = IndicatorSnapshot::compute(prices, volumes, timeframe);
    score(&snapshot, weights)
}

pub fn score(snapshot: &IndicatorSnapshot, weights: &WeightMapping) -> Confidence {
    let ma_signal = match (snapshot.ma_short, snapshot.ma_long) {
        (Some(short), Some(long)) if long != 0.0 => {
            ((short - long).abs() / long * 100.0 * 10.0).min(100.0)
        }
        _ => 0.0,
    };

    let rsi = snapshot.rsi;
    let rsi_signal = if rsi > 70.0 || rsi < 30.0 {
        ((100.0 - (rsi - 50.0).abs()) / 50.0 * 100.0).min(100.0)
    } else {
        0.0
    };

    let volume_signal = if snapshot.avg_volume > 0.0 {
        let ratio = snapshot.current_volume / snapshot.avg_volume;
        if ratio > 1.0 {
            ((ratio - 1.0) * 100.0).min(100.0)
        } else {
            0.0
        }
    } else {
        0.0
    };

    let w_ma = weights.resolve(WeightKey::Certainty);
    let w_rsi = weights.resolve(WeightKey::Structure);
    let w_volume = weights.resolve(WeightKey::Generativity);
    let total = w_ma + w_rsi + w_volume;

    let overall = if total == 0.0 {
        0.0
    } else {
        ((w_ma * ma_signal + w_rsi * rsi_signal + w_volume * volume_signal) / total)
            .clamp(0.0, 100.0)
    };

    Confidence {
        ma_signal,
        rsi_signal,
        volume_signal,
        overall,
    }
}
