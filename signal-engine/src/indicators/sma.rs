/// Calculate the moving average at the latest point
///
/// Falls back to the mean of everything available when the series is
/// shorter than `period`.
///
/// # Arguments
/// * `prices` - Slice of prices
/// * `period` - MA period
///
/// # Returns
/// Mean of the trailing `period` prices, 0.0 for an empty slice
pub fn calculate_ma(prices: &[f64], period: usize) -> f64 {
    if prices.is_empty() {
        return 0.0;
    }

    let window = if prices.len() < period || period == 0 {
        prices
    } else {
        &prices[prices.len() - period..]
    };

    window.iter().sum::<f64>() / window.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ma_period_exceeds_length() {
        let prices = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(calculate_ma(&prices, 20), 3.0);
    }

    #[test]
    fn test_ma_trailing_window() {
        let prices = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        assert_eq!(calculate_ma(&prices, 5), 5.0); // (3+4+5+6+7)/5
    }

    #[test]
    fn test_ma_constant_series() {
        let prices = vec![50.0; 25];
        assert_eq!(calculate_ma(&prices, 20), 50.0);
        assert_eq!(calculate_ma(&prices, 5), 50.0);
    }

    #[test]
    fn test_ma_empty() {
        assert_eq!(calculate_ma(&[], 5), 0.0);
    }
}
