//! Stop-loss and take-profit levels for a long entry.

use serde::{Deserialize, Serialize};

use crate::domain::timeframe::Timeframe;

pub const DEFAULT_RISK_PERCENT: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskLevels {
    pub stop_loss: f64,
    /// `None` on trend-following timeframes: the exit is left to the classifier.
    pub take_profit: Option<f64>,
}

/// Stop = entry * (1 - risk * factor).
/// Target = entry * (1 + (1.5 + trend/100 * 0.5) * risk * factor), except on
/// daily and weekly where no target is set.
///
/// `trend_strength` is a momentum percent; positive trends widen the target.
pub fn compute_stop_target(
    entry_price: f64,
    timeframe: Timeframe,
    risk_percent: f64,
    trend_strength: f64,
) -> RiskLevels {
    let factor = timeframe.profile().risk_factor;
    let stop_loss = entry_price * (1.0 - risk_percent * factor);

    let take_profit = if timeframe.has_open_target() {
        None
    } else {
        let multiplier = 1.5 + (trend_strength / 100.0) * 0.5;
        Some(entry_price * (1.0 + multiplier * risk_percent * factor))
    };

    RiskLevels {
        stop_loss,
        take_profit,
    }
}
