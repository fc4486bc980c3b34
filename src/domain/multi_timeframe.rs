//! Cross-timeframe signals and backtests.
//!
//! Each timeframe run reads the same immutable series and weights and owns its
//! outputs, so runs are independent of each other and of their order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::backtest::{run_backtest, BacktestConfig, BacktestResult};
use super::indicator::{calculate_momentum, DEFAULT_MOMENTUM_PERIOD};
use super::metrics::PerformanceReport;
use super::price_series::PriceSeries;
use super::risk::{compute_stop_target, RiskLevels};
use super::signal::{classify, confidence, Confidence, Signal};
use super::timeframe::Timeframe;
use super::weights::WeightMapping;

/// Current signal for one timeframe, with risk levels for an entry at the
/// last close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeframeSignal {
    pub timeframe: Timeframe,
    pub signal: Signal,
    pub confidence: Confidence,
    pub entry_price: f64,
    pub risk: RiskLevels,
    pub momentum: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSummary {
    pub primary_signal: Signal,
    pub primary_timeframe: Timeframe,
    /// Overall confidence of the primary timeframe.
    pub confidence: f64,
    /// Percent of timeframes whose signal matches the primary signal.
    pub agreement_percent: f64,
    pub distribution: BTreeMap<Signal, usize>,
}

pub fn signal_snapshot(
    prices: &[f64],
    volumes: &[f64],
    timeframe: Timeframe,
    weights: &WeightMapping,
    risk_percent: f64,
) -> Option<TimeframeSignal> {
    let entry_price = *prices.last()?;
    let momentum = calculate_momentum(prices, DEFAULT_MOMENTUM_PERIOD);
    Some(TimeframeSignal {
        timeframe,
        signal: classify(prices, volumes, timeframe, weights),
        confidence: confidence(prices, volumes, timeframe, weights),
        entry_price,
        risk: compute_stop_target(entry_price, timeframe, risk_percent, momentum),
        momentum,
    })
}

/// Snapshots for each of `timeframes`. Empty when `prices` is empty.
pub fn multi_timeframe_signals(
    prices: &[f64],
    volumes: &[f64],
    timeframes: &[Timeframe],
    weights: &WeightMapping,
    risk_percent: f64,
) -> BTreeMap<Timeframe, TimeframeSignal> {
    timeframes
        .iter()
        .filter_map(|&tf| {
            signal_snapshot(prices, volumes, tf, weights, risk_percent).map(|s| (tf, s))
        })
        .collect()
}

/// Picks the timeframe with the highest overall confidence (ties go to the
/// shorter timeframe) and measures how many timeframes agree with it.
/// `None` for an empty mapping.
pub fn summarize(signals: &BTreeMap<Timeframe, TimeframeSignal>) -> Option<SignalSummary> {
    let mut primary: Option<&TimeframeSignal> = None;
    for snapshot in signals.values() {
        match primary {
            Some(best) if snapshot.confidence.overall <= best.confidence.overall => {}
            _ => primary = Some(snapshot),
        }
    }
    let primary = primary?;

    let mut distribution: BTreeMap<Signal, usize> = BTreeMap::new();
    for snapshot in signals.values() {
        *distribution.entry(snapshot.signal).or_insert(0) += 1;
    }

    let agreeing = distribution.get(&primary.signal).copied().unwrap_or(0);
    Some(SignalSummary {
        primary_signal: primary.signal,
        primary_timeframe: primary.timeframe,
        confidence: primary.confidence.overall,
        agreement_percent: agreeing as f64 / signals.len() as f64 * 100.0,
        distribution,
    })
}

/// Full backtest per configured timeframe.
pub fn run_multi_timeframe_detailed(
    series: &PriceSeries,
    weights: &WeightMapping,
    config: &BacktestConfig,
) -> BTreeMap<Timeframe, BacktestResult> {
    config
        .timeframes
        .iter()
        .map(|&tf| (tf, run_backtest(series, tf, weights, config)))
        .collect()
}

pub fn run_multi_timeframe(
    series: &PriceSeries,
    weights: &WeightMapping,
    config: &BacktestConfig,
) -> BTreeMap<Timeframe, PerformanceReport> {
    run_multi_timeframe_detailed(series, weights, config)
        .into_iter()
        .map(|(tf, result)| (tf, result.report))
        .collect()
}
