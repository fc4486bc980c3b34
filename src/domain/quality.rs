//! Signal quality analysis for a single timeframe.
//!
//! Complements the raw signal with recent volatility and with how many of the
//! MA, RSI and volume readings lean bullish.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::MtftraderError;
use super::indicator::{calculate_rsi, calculate_sma, trailing_mean, DEFAULT_RSI_PERIOD};
use super::signal::{classify, confidence, MIN_CONFIDENCE_BARS, Signal};
use super::timeframe::Timeframe;
use super::weights::WeightMapping;

const VOLATILITY_WINDOW: usize = 20;
const VOLUME_WINDOW: usize = 10;

const VALID_CONFIDENCE: f64 = 30.0;
const STRONG_BUY_CONFIDENCE: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Volatility is a percent: above 5 is high, above 2 medium.
    pub fn from_volatility(volatility: f64) -> Self {
        if volatility > 5.0 {
            RiskLevel::High
        } else if volatility > 2.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalQuality {
    pub timeframe: Timeframe,
    pub is_valid: bool,
    pub signal: Signal,
    pub confidence_score: f64,
    /// Population std of recent bar-to-bar returns, in percent.
    pub volatility: f64,
    /// Percent of aligned readings (0, 33.3, 66.7 or 100).
    pub trend_coherence: f64,
    pub ma_aligned: bool,
    pub rsi_aligned: bool,
    pub volume_aligned: bool,
    pub recommended_action: Signal,
    pub risk_level: RiskLevel,
}

pub fn analyze_signal_quality(
    prices: &[f64],
    volumes: &[f64],
    timeframe: Timeframe,
    weights: &WeightMapping,
) -> Result<SignalQuality, MtftraderError> {
    if prices.len() < MIN_CONFIDENCE_BARS {
        return Err(MtftraderError::InsufficientHistory {
            bars: prices.len(),
            minimum: MIN_CONFIDENCE_BARS,
        });
    }

    let volatility = recent_volatility(prices, VOLATILITY_WINDOW);
    let overall = confidence(prices, volumes, timeframe, weights).overall;

    let profile = timeframe.profile();
    let ma_aligned = match (
        calculate_sma(prices, profile.short_period),
        calculate_sma(prices, profile.long_period),
    ) {
        (Some(short), Some(long)) => short > long,
        _ => false,
    };
    let rsi_aligned = calculate_rsi(prices, DEFAULT_RSI_PERIOD) < 70.0;
    let volume_aligned = volume_rising(volumes, VOLUME_WINDOW);

    let aligned = [ma_aligned, rsi_aligned, volume_aligned]
        .iter()
        .filter(|&&a| a)
        .count();
    let trend_coherence = aligned as f64 / 3.0 * 100.0;

    let signal = classify(prices, volumes, timeframe, weights);
    let is_valid = overall > VALID_CONFIDENCE;
    let recommended_action = match signal {
        Signal::Buy if is_valid && overall > STRONG_BUY_CONFIDENCE => Signal::Buy,
        Signal::Sell if is_valid => Signal::Sell,
        _ => Signal::Hold,
    };

    Ok(SignalQuality {
        timeframe,
        is_valid,
        signal,
        confidence_score: overall,
        volatility,
        trend_coherence,
        ma_aligned,
        rsi_aligned,
        volume_aligned,
        recommended_action,
        risk_level: RiskLevel::from_volatility(volatility),
    })
}

fn recent_volatility(prices: &[f64], window: usize) -> f64 {
    let recent = &prices[prices.len().saturating_sub(window)..];
    let returns: Vec<f64> = recent
        .windows(2)
        .filter(|pair| pair[0] != 0.0)
        .map(|pair| (pair[1] - pair[0]) / pair[0])
        .collect();
    if returns.is_empty() {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt() * 100.0
}

/// Mean of the last `window` volumes above the mean of the `window` before.
fn volume_rising(volumes: &[f64], window: usize) -> bool {
    if volumes.len() < window * 2 {
        return false;
    }
    let earlier = &volumes[..volumes.len() - window];
    match (trailing_mean(volumes, window), trailing_mean(earlier, window)) {
        (Some(recent), Some(prior)) => recent > prior,
        _ => false,
    }
}
