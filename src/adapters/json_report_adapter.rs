//! JSON report adapter implementing ReportPort.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::MtftraderError;
use crate::domain::metrics::{aggregate_sharpe, PerformanceReport};
use crate::domain::multi_timeframe::{SignalSummary, TimeframeSignal};
use crate::domain::position::Trade;
use crate::domain::quality::SignalQuality;
use crate::domain::timeframe::Timeframe;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Clone, Default)]
pub struct JsonReportAdapter;

#[derive(Serialize)]
struct TimeframeEntry<'a> {
    report: &'a PerformanceReport,
    trades: &'a [Trade],
}

#[derive(Serialize)]
struct BacktestDocument<'a> {
    timeframes: BTreeMap<Timeframe, TimeframeEntry<'a>>,
    aggregate_sharpe: f64,
}

#[derive(Serialize)]
struct SignalDocument<'a> {
    signals: &'a BTreeMap<Timeframe, TimeframeSignal>,
    summary: Option<&'a SignalSummary>,
}

impl ReportPort for JsonReportAdapter {
    fn render_backtests(
        &self,
        results: &BTreeMap<Timeframe, BacktestResult>,
    ) -> Result<String, MtftraderError> {
        let document = BacktestDocument {
            timeframes: results
                .iter()
                .map(|(tf, r)| {
                    (
                        *tf,
                        TimeframeEntry {
                            report: &r.report,
                            trades: &r.trades,
                        },
                    )
                })
                .collect(),
            aggregate_sharpe: aggregate_sharpe(results.values().map(|r| &r.report)),
        };
        to_json(&document)
    }

    fn render_signals(
        &self,
        signals: &BTreeMap<Timeframe, TimeframeSignal>,
        summary: Option<&SignalSummary>,
    ) -> Result<String, MtftraderError> {
        to_json(&SignalDocument { signals, summary })
    }

    fn render_quality(&self, quality: &SignalQuality) -> Result<String, MtftraderError> {
        to_json(quality)
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, MtftraderError> {
    serde_json::to_string_pretty(value).map_err(|e| MtftraderError::Report {
        reason: format!("JSON serialization failed: {}", e),
    })
}
