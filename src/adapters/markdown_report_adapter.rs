//! Markdown report adapter implementing ReportPort.
//!
//! Renders GitHub-flavoured tables for terminal or file output.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::MtftraderError;
use crate::domain::metrics::aggregate_sharpe;
use crate::domain::multi_timeframe::{SignalSummary, TimeframeSignal};
use crate::domain::position::Trade;
use crate::domain::quality::SignalQuality;
use crate::domain::signal::Signal;
use crate::domain::timeframe::Timeframe;
use crate::ports::report_port::ReportPort;

/// Renders reports as markdown. `include_trades` appends a trade log per
/// timeframe to backtest reports.
#[derive(Debug, Clone, Default)]
pub struct MarkdownReportAdapter {
    include_trades: bool,
}

impl MarkdownReportAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trades(mut self, include_trades: bool) -> Self {
        self.include_trades = include_trades;
        self
    }
}

impl ReportPort for MarkdownReportAdapter {
    fn render_backtests(
        &self,
        results: &BTreeMap<Timeframe, BacktestResult>,
    ) -> Result<String, MtftraderError> {
        let mut out = String::from("# Walk-forward backtest\n\n");
        if results.is_empty() {
            out.push_str("No timeframes were run.\n");
            return Ok(out);
        }

        out.push_str("| Timeframe | ROI | Sharpe | Max DD | Win Rate | Trades ");
        out.push_str("| Profit Factor | Final Equity |\n");
        out.push_str("|---|---:|---:|---:|---:|---:|---:|---:|\n");
        for (tf, result) in results {
            let r = &result.report;
            writeln!(
                out,
                "| {} | {:.2}% | {:.2} | {:.2}% | {:.1}% | {} | {:.2} | {:.4} |",
                tf,
                r.roi,
                r.sharpe,
                r.max_drawdown,
                r.win_rate,
                r.trade_count,
                r.profit_factor,
                r.final_equity,
            )
            .map_err(fmt_error)?;
        }

        let aggregate = aggregate_sharpe(results.values().map(|r| &r.report));
        writeln!(out, "\nAggregate Sharpe (positive timeframes): {:.2}", aggregate)
            .map_err(fmt_error)?;

        if self.include_trades {
            for (tf, result) in results {
                format_trade_log(&mut out, *tf, &result.trades)?;
            }
        }
        Ok(out)
    }

    fn render_signals(
        &self,
        signals: &BTreeMap<Timeframe, TimeframeSignal>,
        summary: Option<&SignalSummary>,
    ) -> Result<String, MtftraderError> {
        let mut out = String::from("# Multi-timeframe signals\n\n");
        if signals.is_empty() {
            out.push_str("No price history available.\n");
            return Ok(out);
        }

        out.push_str(
            "| Timeframe | Signal | Confidence | Entry | Stop Loss | Take Profit | Momentum |\n",
        );
        out.push_str("|---|---|---:|---:|---:|---:|---:|\n");
        for (tf, s) in signals {
            let target = match s.risk.take_profit {
                Some(tp) => format!("{:.4}", tp),
                None => "Open".to_string(),
            };
            writeln!(
                out,
                "| {} | {} | {:.1} | {:.4} | {:.4} | {} | {:.2}% |",
                tf,
                s.signal,
                s.confidence.overall,
                s.entry_price,
                s.risk.stop_loss,
                target,
                s.momentum,
            )
            .map_err(fmt_error)?;
        }

        if let Some(summary) = summary {
            writeln!(
                out,
                "\nPrimary: {} on {} ({:.1} confidence, {:.0}% agreement)",
                summary.primary_signal,
                summary.primary_timeframe,
                summary.confidence,
                summary.agreement_percent,
            )
            .map_err(fmt_error)?;
            let counts: Vec<String> = [Signal::Buy, Signal::Sell, Signal::Hold]
                .iter()
                .map(|sig| {
                    format!(
                        "{} {}",
                        sig,
                        summary.distribution.get(sig).copied().unwrap_or(0)
                    )
                })
                .collect();
            writeln!(out, "Distribution: {}", counts.join(", ")).map_err(fmt_error)?;
        }
        Ok(out)
    }

    fn render_quality(&self, quality: &SignalQuality) -> Result<String, MtftraderError> {
        let mut out = String::new();
        writeln!(out, "# Signal quality ({})\n", quality.timeframe).map_err(fmt_error)?;
        out.push_str("| Measure | Value |\n|---|---|\n");
        let rows = [
            ("Signal", quality.signal.to_string()),
            ("Valid", yes_no(quality.is_valid).to_string()),
            ("Confidence", format!("{:.1}", quality.confidence_score)),
            ("Volatility", format!("{:.2}%", quality.volatility)),
            ("Trend coherence", format!("{:.1}%", quality.trend_coherence)),
            ("MA aligned", yes_no(quality.ma_aligned).to_string()),
            ("RSI aligned", yes_no(quality.rsi_aligned).to_string()),
            ("Volume aligned", yes_no(quality.volume_aligned).to_string()),
            ("Risk level", quality.risk_level.to_string()),
            ("Recommended", quality.recommended_action.to_string()),
        ];
        for (label, value) in rows {
            writeln!(out, "| {} | {} |", label, value).map_err(fmt_error)?;
        }
        Ok(out)
    }
}

fn format_trade_log(
    out: &mut String,
    tf: Timeframe,
    trades: &[Trade],
) -> Result<(), MtftraderError> {
    writeln!(out, "\n## Trades ({})\n", tf).map_err(fmt_error)?;
    if trades.is_empty() {
        out.push_str("No trades.\n");
        return Ok(());
    }
    out.push_str("| Entry Bar | Exit Bar | Entry | Exit | Return | Reason | Confidence |\n");
    out.push_str("|---:|---:|---:|---:|---:|---|---:|\n");
    for t in trades {
        writeln!(
            out,
            "| {} | {} | {:.4} | {:.4} | {:.2}% | {} | {:.1} |",
            t.entry_index,
            t.exit_index,
            t.entry_price,
            t.exit_price,
            t.pnl_ratio * 100.0,
            t.reason,
            t.confidence,
        )
        .map_err(fmt_error)?;
    }
    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn fmt_error(e: std::fmt::Error) -> MtftraderError {
    MtftraderError::Report {
        reason: e.to_string(),
    }
}
