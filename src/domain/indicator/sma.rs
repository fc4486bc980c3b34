//! Simple moving average of the trailing `period` closes.

use super::trailing_mean;

pub fn calculate_sma(prices: &[f64], period: usize) -> Option<f64> {
    trailing_mean(prices, period)
}
