//! Performance metrics over a trade log.
//!
//! Returns are per-trade ratios, not a time series, so Sharpe scales by the
//! number of trades rather than by trading days and drawdown is measured on
//! the running sum of returns.

use serde::{Deserialize, Serialize};

use super::position::Trade;

/// Reported in place of an infinite profit factor (wins, no losses).
pub const PROFIT_FACTOR_CAP: f64 = 999.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Sum of trade returns, in percent.
    pub roi: f64,
    pub sharpe: f64,
    /// Worst fall of cumulative return below its running peak, in percent (≤ 0).
    pub max_drawdown: f64,
    pub win_rate: f64,
    pub trade_count: usize,
    pub profit_factor: f64,
    pub recovery_factor: f64,
    pub calmar_ratio: f64,
    pub avg_confidence: f64,
    pub final_equity: f64,
}

impl Default for PerformanceReport {
    fn default() -> Self {
        PerformanceReport {
            roi: 0.0,
            sharpe: 0.0,
            max_drawdown: 0.0,
            win_rate: 0.0,
            trade_count: 0,
            profit_factor: 0.0,
            recovery_factor: 0.0,
            calmar_ratio: 0.0,
            avg_confidence: 0.0,
            final_equity: 1.0,
        }
    }
}

impl PerformanceReport {
    pub fn compute(trades: &[Trade], equity_curve: &[f64]) -> Self {
        let returns: Vec<f64> = trades.iter().map(|t| t.pnl_ratio).collect();
        let mut report = Self::from_returns(&returns);

        if !trades.is_empty() {
            report.avg_confidence =
                trades.iter().map(|t| t.confidence).sum::<f64>() / trades.len() as f64;
        }
        report.final_equity = equity_curve.last().copied().unwrap_or(1.0);
        report
    }

    /// Statistics that depend only on the return sequence. `avg_confidence`
    /// is left at zero and `final_equity` is the compounded return.
    pub fn from_returns(returns: &[f64]) -> Self {
        if returns.is_empty() {
            return Self::default();
        }

        let n = returns.len() as f64;
        let roi = returns.iter().sum::<f64>() * 100.0;
        let wins = returns.iter().filter(|&&r| r > 0.0).count();
        let win_rate = wins as f64 / n * 100.0;
        let sharpe = compute_sharpe(returns);
        let max_drawdown = compute_drawdown(returns) * 100.0;
        let profit_factor = compute_profit_factor(returns);

        let recovery_factor = if max_drawdown < 0.0 {
            roi / max_drawdown.abs()
        } else {
            0.0
        };

        PerformanceReport {
            roi,
            sharpe,
            max_drawdown,
            win_rate,
            trade_count: returns.len(),
            profit_factor,
            recovery_factor,
            calmar_ratio: recovery_factor,
            avg_confidence: 0.0,
            final_equity: returns.iter().fold(1.0, |equity, r| equity * (1.0 + r)),
        }
    }
}

/// Mean over population standard deviation, scaled by sqrt(trade count).
fn compute_sharpe(returns: &[f64]) -> f64 {
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    if stddev > 0.0 {
        mean / stddev * n.sqrt()
    } else {
        0.0
    }
}

/// Most negative gap between cumulative return and its running maximum.
/// The running maximum starts at the first cumulative value, not at zero.
fn compute_drawdown(returns: &[f64]) -> f64 {
    let mut cumulative = 0.0;
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;

    for r in returns {
        cumulative += r;
        peak = peak.max(cumulative);
        max_dd = max_dd.min(cumulative - peak);
    }

    max_dd
}

fn compute_profit_factor(returns: &[f64]) -> f64 {
    let total_wins: f64 = returns.iter().filter(|&&r| r > 0.0).sum();
    let total_losses: f64 = returns.iter().filter(|&&r| r < 0.0).map(|r| r.abs()).sum();

    if total_losses > 0.0 {
        total_wins / total_losses
    } else if total_wins > 0.0 {
        PROFIT_FACTOR_CAP
    } else {
        0.0
    }
}

/// Mean Sharpe over the reports with a strictly positive Sharpe; 0 when none.
pub fn aggregate_sharpe<'a, I>(reports: I) -> f64
where
    I: IntoIterator<Item = &'a PerformanceReport>,
{
    let positive: Vec<f64> = reports
        .into_iter()
        .map(|r| r.sharpe)
        .filter(|&s| s > 0.0)
        .collect();
    if positive.is_empty() {
        0.0
    } else {
        positive.iter().sum::<f64>() / positive.len() as f64
    }
}
