//! Technical indicators over a close-price history.
//!
//! Every function reads the whole slice it is given and reports the value at
//! the last element, so a walk-forward caller passes `&closes[..=i]` and can
//! never see bars after `i`.
//!
//! Short histories are not errors:
//! - [`sma::calculate_sma`] and [`ema::calculate_ema`] return `None`
//! - [`rsi::calculate_rsi`] returns [`NEUTRAL_RSI`]
//! - [`momentum::calculate_momentum`] returns `0.0`

pub mod ema;
pub mod momentum;
pub mod rsi;
pub mod sma;

pub use ema::calculate_ema;
pub use momentum::calculate_momentum;
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;

pub const DEFAULT_RSI_PERIOD: usize = 14;
pub const DEFAULT_MOMENTUM_PERIOD: usize = 10;

/// RSI reported when there is not enough history (or no movement at all).
pub const NEUTRAL_RSI: f64 = 50.0;

/// Mean of the last `period` values, or `None` when fewer are available.
pub(crate) fn trailing_mean(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_mean_uses_last_window() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(trailing_mean(&v, 2), Some(3.5));
        assert_eq!(trailing_mean(&v, 4), Some(2.5));
    }

    #[test]
    fn trailing_mean_short_or_zero_period() {
        assert_eq!(trailing_mean(&[1.0], 2), None);
        assert_eq!(trailing_mean(&[1.0, 2.0], 0), None);
    }
}
