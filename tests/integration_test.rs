//! Integration tests for the analysis pipeline.
//!
//! Tests cover:
//! - Walk-forward backtests driven through mock ports
//! - Multi-timeframe reports and signal summaries
//! - Behavioural scenarios for classification and risk levels

mod common;

use common::*;
use mtftrader::adapters::json_report_adapter::JsonReportAdapter;
use mtftrader::adapters::markdown_report_adapter::MarkdownReportAdapter;
use mtftrader::cli::{backtest_pipeline, quality_pipeline, signals_pipeline};
use mtftrader::domain::backtest::BacktestConfig;
use mtftrader::domain::error::MtftraderError;
use mtftrader::domain::indicator::{calculate_momentum, calculate_rsi, DEFAULT_RSI_PERIOD};
use mtftrader::domain::metrics::PerformanceReport;
use mtftrader::domain::multi_timeframe::{multi_timeframe_signals, run_multi_timeframe, summarize};
use mtftrader::domain::price_series::PriceSeries;
use mtftrader::domain::risk::{compute_stop_target, DEFAULT_RISK_PERCENT};
use mtftrader::domain::signal::{classify, Signal};
use mtftrader::domain::timeframe::Timeframe;
use mtftrader::domain::weights::WeightMapping;

mod pipeline {
    use super::*;

    #[test]
    fn backtest_pipeline_renders_every_configured_timeframe() {
        let closes = sawtooth_uptrend(120);
        let data = MockDataPort::new(dated_series(&closes, &constant_volume(120)));
        let weights = MockWeightPort::empty();

        let md = backtest_pipeline(
            &data,
            &weights,
            &MarkdownReportAdapter::new(),
            &BacktestConfig::default(),
            None,
            (None, None),
        )
        .unwrap();

        for tf in Timeframe::ALL {
            assert!(md.contains(&format!("| {} |", tf)), "missing row for {}", tf);
        }
        assert_eq!(data.calls.get(), 1);
    }

    #[test]
    fn backtest_pipeline_single_timeframe() {
        let closes = sawtooth_uptrend(90);
        let data = MockDataPort::new(dated_series(&closes, &constant_volume(90)));

        let json = backtest_pipeline(
            &data,
            &MockWeightPort::empty(),
            &JsonReportAdapter,
            &BacktestConfig::default(),
            Some(Timeframe::Daily),
            (None, None),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let timeframes = value["timeframes"].as_object().unwrap();
        assert_eq!(timeframes.len(), 1);
        assert_eq!(value["timeframes"]["daily"]["report"]["trade_count"], 1);
    }

    #[test]
    fn date_range_trims_history_before_simulation() {
        let closes = sawtooth_uptrend(90);
        let data = MockDataPort::new(dated_series(&closes, &constant_volume(90)));

        // Only 40 bars remain, fewer than the warm-up.
        let json = backtest_pipeline(
            &data,
            &MockWeightPort::empty(),
            &JsonReportAdapter,
            &BacktestConfig::default(),
            Some(Timeframe::Daily),
            (Some(date(2024, 2, 20)), None),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["timeframes"]["daily"]["report"]["trade_count"], 0);
    }

    #[test]
    fn data_error_propagates() {
        let err = backtest_pipeline(
            &MockDataPort::failing("disk on fire"),
            &MockWeightPort::empty(),
            &MarkdownReportAdapter::new(),
            &BacktestConfig::default(),
            None,
            (None, None),
        )
        .unwrap_err();
        assert!(matches!(err, MtftraderError::DataSource { .. }));
    }

    #[test]
    fn weight_error_propagates() {
        let closes = sawtooth_uptrend(60);
        let err = signals_pipeline(
            &MockDataPort::new(PriceSeries::from_columns(&closes, &constant_volume(60))),
            &MockWeightPort::failing("bad json"),
            &MarkdownReportAdapter::new(),
            &BacktestConfig::default(),
            (None, None),
        )
        .unwrap_err();
        assert!(matches!(err, MtftraderError::WeightSource { .. }));
    }

    #[test]
    fn signals_pipeline_reports_summary() {
        let closes = sawtooth_uptrend(120);
        let md = signals_pipeline(
            &MockDataPort::new(PriceSeries::from_columns(&closes, &constant_volume(120))),
            &MockWeightPort::empty(),
            &MarkdownReportAdapter::new(),
            &BacktestConfig::default(),
            (None, None),
        )
        .unwrap();
        assert!(md.contains("Primary:"));
        assert!(md.contains("| weekly |"));
    }

    #[test]
    fn quality_pipeline_rejects_short_history() {
        let closes = sawtooth_uptrend(30);
        let err = quality_pipeline(
            &MockDataPort::new(PriceSeries::from_columns(&closes, &constant_volume(30))),
            &MockWeightPort::empty(),
            &MarkdownReportAdapter::new(),
            Timeframe::Daily,
            (None, None),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MtftraderError::InsufficientHistory { bars: 30, .. }
        ));
    }
}

mod scenarios {
    use super::*;

    #[test]
    fn linear_rise_never_sells() {
        let closes = linear(100, 60000.0, 10000.0 / 99.0);
        let volumes = constant_volume(100);
        let weights = WeightMapping::new();
        for end in 1..=closes.len() {
            let signal = classify(&closes[..end], &volumes[..end], Timeframe::Daily, &weights);
            assert_ne!(signal, Signal::Sell, "sold at bar {}", end - 1);
        }
    }

    #[test]
    fn confirmed_uptrend_buys_past_warmup() {
        let closes = sawtooth_uptrend(100);
        let volumes = constant_volume(100);
        let weights = WeightMapping::new();
        for end in 50..=closes.len() {
            assert_eq!(
                classify(&closes[..end], &volumes[..end], Timeframe::Daily, &weights),
                Signal::Buy,
                "bar {}",
                end - 1
            );
        }
    }

    #[test]
    fn flat_series_is_neutral() {
        let closes = vec![250.0; 80];
        let volumes = constant_volume(80);
        assert_eq!(calculate_momentum(&closes, 10), 0.0);
        assert_eq!(calculate_rsi(&closes, DEFAULT_RSI_PERIOD), 50.0);
        for end in 50..=closes.len() {
            assert_eq!(
                classify(&closes[..end], &volumes[..end], Timeframe::Daily, &WeightMapping::new()),
                Signal::Hold
            );
        }
    }

    #[test]
    fn daily_stop_and_open_target() {
        let levels = compute_stop_target(100.0, Timeframe::Daily, DEFAULT_RISK_PERCENT, 0.0);
        assert!((levels.stop_loss - 94.0).abs() < 1e-9);
        assert_eq!(levels.take_profit, None);
    }

    #[test]
    fn scalping_stop_and_target() {
        let levels = compute_stop_target(100.0, Timeframe::Scalping, DEFAULT_RISK_PERCENT, 0.0);
        assert!((levels.stop_loss - 98.0).abs() < 1e-9);
        assert!((levels.take_profit.unwrap() - 103.0).abs() < 1e-9);
    }

    #[test]
    fn empty_trade_log_metrics_are_zero() {
        let report = PerformanceReport::from_returns(&[]);
        assert_eq!(report.roi, 0.0);
        assert_eq!(report.sharpe, 0.0);
        assert_eq!(report.max_drawdown, 0.0);
        assert_eq!(report.win_rate, 0.0);
        assert_eq!(report.trade_count, 0);
        assert_eq!(report.profit_factor, 0.0);
        assert_eq!(report.recovery_factor, 0.0);
        assert_eq!(report.calmar_ratio, 0.0);
    }

    #[test]
    fn multi_timeframe_runs_are_order_independent() {
        let closes = sawtooth_uptrend(150);
        let series = PriceSeries::from_columns(&closes, &constant_volume(150));
        let weights = WeightMapping::new();

        let forward = run_multi_timeframe(&series, &weights, &BacktestConfig::default());
        let mut reversed_config = BacktestConfig::default();
        reversed_config.timeframes.reverse();
        let reversed = run_multi_timeframe(&series, &weights, &reversed_config);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn summary_agrees_with_snapshots() {
        let closes = sawtooth_uptrend(120);
        let volumes = constant_volume(120);
        let signals = multi_timeframe_signals(
            &closes,
            &volumes,
            &Timeframe::ALL,
            &WeightMapping::new(),
            DEFAULT_RISK_PERCENT,
        );
        let summary = summarize(&signals).unwrap();
        let best = signals
            .values()
            .map(|s| s.confidence.overall)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(summary.confidence, best);
        assert_eq!(summary.distribution.values().sum::<usize>(), 5);
    }
}
