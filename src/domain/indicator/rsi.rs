//! RSI (Relative Strength Index) with Wilder's smoothing.
//!
//! - First average: simple mean of gains/losses over the first n changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//!
//! Degenerate cases:
//! - fewer than n+1 closes: RSI = 50
//! - avg_loss == 0 with gains: RS is pinned to 100 (RSI ≈ 99.01)
//! - no movement at all: RSI = 50

use super::NEUTRAL_RSI;

/// RS used when the average loss is zero. A heuristic ceiling, not a limit
/// of the formula.
pub const ZERO_LOSS_RS: f64 = 100.0;

pub fn calculate_rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period + 1 {
        return NEUTRAL_RSI;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for (i, pair) in prices.windows(2).enumerate() {
        let change = pair[1] - pair[0];
        let gain = if change > 0.0 { change } else { 0.0 };
        let loss = if change < 0.0 { -change } else { 0.0 };

        if i < period {
            avg_gain += gain;
            avg_loss += loss;
            if i == period - 1 {
                avg_gain /= period as f64;
                avg_loss /= period as f64;
            }
        } else {
            avg_gain = (avg_gain * (period - 1) as f64 + gain) / period as f64;
            avg_loss = (avg_loss * (period - 1) as f64 + loss) / period as f64;
        }
    }

    rsi_from_averages(avg_gain, avg_loss)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain == 0.0 && avg_loss == 0.0 {
        return NEUTRAL_RSI;
    }
    let rs = if avg_loss == 0.0 {
        ZERO_LOSS_RS
    } else {
        avg_gain / avg_loss
    };
    100.0 - (100.0 / (1.0 + rs))
}
