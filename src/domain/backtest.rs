//! Walk-forward backtest engine.
//!
//! Replays a series bar by bar from `warmup_bars`. Each bar sees only the
//! history up to and including itself. State per bar:
//!
//! 1. Open position: stop hit → close at stop; else target hit → close at
//!    target; else classifier says Sell with confidence above
//!    `exit_confidence` → close at the bar's close.
//! 2. Flat (including just closed): classifier says Buy with confidence above
//!    `entry_confidence` → open at the bar's close with stop/target from the
//!    risk manager, using `momentum_period` momentum as trend strength.
//!
//! A position still open after the last bar closes at the last close.

use tracing::{debug, info};

use super::indicator::calculate_momentum;
use super::metrics::PerformanceReport;
use super::position::{ExitReason, Position, PositionState, Trade};
use super::price_series::PriceSeries;
use super::risk::{compute_stop_target, DEFAULT_RISK_PERCENT};
use super::signal::{classify, confidence, Signal};
use super::timeframe::Timeframe;
use super::weights::WeightMapping;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub warmup_bars: usize,
    pub risk_percent: f64,
    pub entry_confidence: f64,
    pub exit_confidence: f64,
    pub momentum_period: usize,
    pub timeframes: Vec<Timeframe>,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            warmup_bars: 50,
            risk_percent: DEFAULT_RISK_PERCENT,
            entry_confidence: 40.0,
            exit_confidence: 30.0,
            momentum_period: 10,
            timeframes: Timeframe::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub timeframe: Timeframe,
    pub trades: Vec<Trade>,
    /// Starts at 1.0; one multiplicative step per closed trade.
    pub equity_curve: Vec<f64>,
    pub report: PerformanceReport,
}

struct TradeLog {
    trades: Vec<Trade>,
    equity_curve: Vec<f64>,
}

impl TradeLog {
    fn new() -> Self {
        TradeLog {
            trades: Vec::new(),
            equity_curve: vec![1.0],
        }
    }

    fn record(&mut self, trade: Trade) {
        let last = self.equity_curve.last().copied().unwrap_or(1.0);
        self.equity_curve.push(last * (1.0 + trade.pnl_ratio));
        debug!(
            entry_index = trade.entry_index,
            exit_index = trade.exit_index,
            entry_price = trade.entry_price,
            exit_price = trade.exit_price,
            pnl_ratio = trade.pnl_ratio,
            reason = %trade.reason,
            "position closed"
        );
        self.trades.push(trade);
    }
}

pub fn run_backtest(
    series: &PriceSeries,
    timeframe: Timeframe,
    weights: &WeightMapping,
    config: &BacktestConfig,
) -> BacktestResult {
    let closes = series.closes();
    let volumes = series.volumes();

    let mut state = PositionState::Flat;
    let mut log = TradeLog::new();

    for (i, &price) in closes.iter().enumerate().skip(config.warmup_bars) {
        let history = &closes[..=i];
        let volume_history = &volumes[..volumes.len().min(i + 1)];

        let signal = classify(history, volume_history, timeframe, weights);
        let overall = confidence(history, volume_history, timeframe, weights).overall;

        if let Some(position) = state.position() {
            let exit = if position.should_stop_loss(price) {
                Some((position.stop_loss, ExitReason::StopLoss))
            } else if position.should_take_profit(price) {
                position
                    .take_profit
                    .map(|target| (target, ExitReason::TakeProfit))
            } else if signal == Signal::Sell && overall > config.exit_confidence {
                Some((price, ExitReason::SignalExit))
            } else {
                None
            };

            if let Some((exit_price, reason)) = exit {
                if let Some(trade) = state.close(exit_price, i, reason) {
                    log.record(trade);
                }
            }
        }

        if state.is_flat() && signal == Signal::Buy && overall > config.entry_confidence {
            let trend_strength = calculate_momentum(history, config.momentum_period);
            let levels = compute_stop_target(price, timeframe, config.risk_percent, trend_strength);
            debug!(
                index = i,
                price,
                stop_loss = levels.stop_loss,
                take_profit = ?levels.take_profit,
                confidence = overall,
                "position opened"
            );
            state.open(Position {
                entry_price: price,
                stop_loss: levels.stop_loss,
                take_profit: levels.take_profit,
                entry_index: i,
                confidence: overall,
            });
        }
    }

    if let Some(last_price) = series.last_close() {
        if let Some(trade) = state.close(last_price, closes.len() - 1, ExitReason::EndOfPeriod) {
            log.record(trade);
        }
    }

    let report = PerformanceReport::compute(&log.trades, &log.equity_curve);
    info!(
        timeframe = %timeframe,
        bars = closes.len(),
        trades = report.trade_count,
        roi = report.roi,
        sharpe = report.sharpe,
        "backtest complete"
    );

    BacktestResult {
        timeframe,
        trades: log.trades,
        equity_curve: log.equity_curve,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sawtooth_uptrend(len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| 100.0 + i as f64 + if i % 2 == 1 { 3.0 } else { 0.0 })
            .collect()
    }

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::from_columns(closes, &vec![1000.0; closes.len()])
    }

    #[test]
    fn default_config() {
        let c = BacktestConfig::default();
        assert_eq!(c.warmup_bars, 50);
        assert!((c.risk_percent - 0.02).abs() < f64::EPSILON);
        assert!((c.entry_confidence - 40.0).abs() < f64::EPSILON);
        assert!((c.exit_confidence - 30.0).abs() < f64::EPSILON);
        assert_eq!(c.momentum_period, 10);
        assert_eq!(c.timeframes.len(), 5);
    }

    #[test]
    fn series_shorter_than_warmup_has_no_trades() {
        let result = run_backtest(
            &series(&sawtooth_uptrend(40)),
            Timeframe::Daily,
            &WeightMapping::new(),
            &BacktestConfig::default(),
        );
        assert!(result.trades.is_empty());
        assert_eq!(result.equity_curve, vec![1.0]);
        assert_eq!(result.report.trade_count, 0);
    }

    #[test]
    fn uptrend_daily_holds_until_end() {
        let closes = sawtooth_uptrend(80);
        let result = run_backtest(
            &series(&closes),
            Timeframe::Daily,
            &WeightMapping::new(),
            &BacktestConfig::default(),
        );

        assert_eq!(result.trades.len(), 1);
        let trade = &result.trades[0];
        assert_eq!(trade.entry_index, 50);
        assert_eq!(trade.exit_index, 79);
        assert_eq!(trade.reason, ExitReason::EndOfPeriod);
        assert_relative_eq!(trade.entry_price, closes[50], epsilon = 1e-12);
        assert_relative_eq!(trade.exit_price, closes[79], epsilon = 1e-12);
        assert!(trade.pnl_ratio > 0.0);
        assert_relative_eq!(result.equity_curve[1], 1.0 + trade.pnl_ratio, epsilon = 1e-12);
    }

    #[test]
    fn crash_hits_stop_at_stop_price() {
        let mut closes = sawtooth_uptrend(56);
        let crash = closes[55] * 0.8;
        closes.push(crash);
        closes.extend(std::iter::repeat_n(crash, 5));

        let result = run_backtest(
            &series(&closes),
            Timeframe::Daily,
            &WeightMapping::new(),
            &BacktestConfig::default(),
        );

        let first = &result.trades[0];
        assert_eq!(first.entry_index, 50);
        assert_eq!(first.exit_index, 56);
        assert_eq!(first.reason, ExitReason::StopLoss);
        assert_relative_eq!(first.exit_price, closes[50] * 0.94, epsilon = 1e-9);
        assert_relative_eq!(first.pnl_ratio, -0.06, epsilon = 1e-9);
    }

    #[test]
    fn steep_uptrend_takes_profit_on_short_timeframe() {
        let closes = sawtooth_uptrend(80);
        let result = run_backtest(
            &series(&closes),
            Timeframe::FourHour,
            &WeightMapping::new(),
            &BacktestConfig {
                entry_confidence: 10.0,
                ..BacktestConfig::default()
            },
        );

        assert!(!result.trades.is_empty());
        let targets: Vec<&Trade> = result
            .trades
            .iter()
            .filter(|t| t.reason == ExitReason::TakeProfit)
            .collect();
        assert!(!targets.is_empty());
        for t in targets {
            assert!(t.exit_price > t.entry_price);
            assert!(closes[t.exit_index] >= t.exit_price);
        }
    }

    /// Sawtooth rise for 60 bars, then a 0.5% drop every other bar.
    fn rise_then_drift_down() -> Vec<f64> {
        let mut closes = sawtooth_uptrend(60);
        for k in 0..60 {
            let last = closes[closes.len() - 1];
            closes.push(if k % 2 == 0 { last * 0.995 } else { last });
        }
        closes
    }

    #[test]
    fn confident_sell_exits_at_close() {
        let closes = rise_then_drift_down();
        let config = BacktestConfig::default();
        let result = run_backtest(
            &series(&closes),
            Timeframe::Daily,
            &WeightMapping::new(),
            &config,
        );

        assert_eq!(result.trades.len(), 1);
        let trade = &result.trades[0];
        assert_eq!(trade.entry_index, 50);
        assert_eq!(trade.exit_index, 92);
        assert_eq!(trade.reason, ExitReason::SignalExit);
        assert_relative_eq!(trade.exit_price, closes[trade.exit_index], epsilon = 1e-12);
        assert_relative_eq!(trade.exit_price, 148.767_267_873, epsilon = 1e-6);
    }

    #[test]
    fn weak_sell_keeps_position_open() {
        let closes = rise_then_drift_down();
        let volumes = vec![1000.0; closes.len()];
        let weights = WeightMapping::new();
        let config = BacktestConfig::default();

        // The first Sell after entry is below the exit threshold.
        let history = &closes[..=86];
        let volume_history = &volumes[..=86];
        assert_eq!(
            classify(history, volume_history, Timeframe::Daily, &weights),
            Signal::Sell
        );
        let overall = confidence(history, volume_history, Timeframe::Daily, &weights).overall;
        assert!(overall <= config.exit_confidence);

        let result = run_backtest(&series(&closes), Timeframe::Daily, &weights, &config);
        assert!(result.trades[0].exit_index > 86);

        // Raising the threshold out of reach leaves every Sell ignored.
        let strict = BacktestConfig {
            exit_confidence: 100.0,
            ..BacktestConfig::default()
        };
        let result = run_backtest(&series(&closes), Timeframe::Daily, &weights, &strict);
        assert!(result
            .trades
            .iter()
            .all(|t| t.reason != ExitReason::SignalExit));
        let trade = &result.trades[0];
        assert_eq!(trade.entry_index, 50);
        assert_eq!(trade.exit_index, 114);
        assert_eq!(trade.reason, ExitReason::StopLoss);
        assert_relative_eq!(trade.exit_price, closes[50] * 0.94, epsilon = 1e-9);
    }

    #[test]
    fn flat_series_never_trades() {
        let result = run_backtest(
            &series(&[300.0; 120]),
            Timeframe::Scalping,
            &WeightMapping::new(),
            &BacktestConfig::default(),
        );
        assert!(result.trades.is_empty());
    }

    #[test]
    fn equity_curve_tracks_trades() {
        let mut closes = sawtooth_uptrend(56);
        let crash = closes[55] * 0.8;
        closes.push(crash);
        closes.extend((1..40).map(|i| crash + i as f64 * 2.0));

        let result = run_backtest(
            &series(&closes),
            Timeframe::Daily,
            &WeightMapping::new(),
            &BacktestConfig::default(),
        );

        assert_eq!(result.trades.len(), result.equity_curve.len() - 1);
        for (i, trade) in result.trades.iter().enumerate() {
            let expected = result.equity_curve[i] * (1.0 + trade.pnl_ratio);
            assert_relative_eq!(result.equity_curve[i + 1], expected, epsilon = 1e-12);
        }
        for pair in result.trades.windows(2) {
            assert!(pair[0].entry_index < pair[1].entry_index);
            assert!(pair[0].exit_index <= pair[1].entry_index);
        }
    }

    #[test]
    fn deterministic() {
        let closes: Vec<f64> = (0..150)
            .map(|i| 100.0 + (i as f64 / 6.0).sin() * 12.0 + i as f64 * 0.2)
            .collect();
        let s = series(&closes);
        let weights = WeightMapping::new();
        let config = BacktestConfig::default();
        let a = run_backtest(&s, Timeframe::OneHour, &weights, &config);
        let b = run_backtest(&s, Timeframe::OneHour, &weights, &config);
        assert_eq!(a, b);
    }
}
