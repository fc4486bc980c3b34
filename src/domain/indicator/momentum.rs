//! Momentum as a percent rate of change.
//!
//! MOM(n) = ((C[last] - C[last-n]) / C[last-n]) * 100
//! Fewer than n+1 closes, or C[last-n] == 0: MOM = 0

pub fn calculate_momentum(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() <= period {
        return 0.0;
    }

    let curr_close = prices[prices.len() - 1];
    let prev_close = prices[prices.len() - 1 - period];

    if prev_close == 0.0 {
        0.0
    } else {
        ((curr_close - prev_close) / prev_close) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn momentum_basic_calculation() {
        let prices = [100.0, 105.0, 110.0, 115.0];
        let v = calculate_momentum(&prices, 2);
        let expected = ((115.0 - 105.0) / 105.0) * 100.0;
        assert!((v - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn momentum_negative_change() {
        let v = calculate_momentum(&[100.0, 90.0, 80.0], 2);
        assert!((v - (-20.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn momentum_insufficient_history() {
        assert_eq!(calculate_momentum(&[100.0, 105.0], 2), 0.0);
        assert_eq!(calculate_momentum(&[], 10), 0.0);
    }

    #[test]
    fn momentum_zero_division() {
        assert_eq!(calculate_momentum(&[0.0, 100.0, 110.0], 2), 0.0);
    }

    #[test]
    fn momentum_flat_series_is_zero() {
        assert_eq!(calculate_momentum(&[42.0; 20], 10), 0.0);
    }
}
