use common::BollingerBand;

/// Bollinger Bands result, `None` until the window is filled
#[derive(Debug, Clone)]
pub struct BollingerBands {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

fn band(window: &[f64], std_dev: f64) -> BollingerBand {
    let period = window.len() as f64;

    let mean: f64 = window.iter().sum::<f64>() / period;

    // Population standard deviation
    let variance: f64 = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period;
    let std = variance.sqrt();

    BollingerBand {
        upper: mean + std * std_dev,
        middle: mean,
        lower: mean - std * std_dev,
    }
}

/// Calculate Bollinger Bands at the latest point
///
/// # Arguments
/// * `prices` - Slice of closing prices
/// * `period` - Period for moving average (typically 20)
/// * `std_dev` - Number of standard deviations (typically 2.0)
///
/// # Returns
/// Bands over the trailing `period` prices, or None if fewer are available
pub fn calculate_bollinger(prices: &[f64], period: usize, std_dev: f64) -> Option<BollingerBand> {
    if prices.len() < period || period == 0 {
        return None;
    }
    Some(band(&prices[prices.len() - period..], std_dev))
}

/// Calculate Bollinger Bands over a rolling window
pub fn calculate_bollinger_bands(prices: &[f64], period: usize, std_dev: f64) -> BollingerBands {
    let n = prices.len();
    let mut bb = BollingerBands {
        upper: vec![None; n],
        middle: vec![None; n],
        lower: vec![None; n],
    };

    if n < period || period == 0 {
        return bb;
    }

    for i in (period - 1)..n {
        let b = band(&prices[i + 1 - period..=i], std_dev);
        bb.upper[i] = Some(b.upper);
        bb.middle[i] = Some(b.middle);
        bb.lower[i] = Some(b.lower);
    }

    bb
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const PRICES: [f64; 20] = [
        22.27, 22.19, 22.08, 22.17, 22.18, 22.13, 22.23, 22.43, 22.24, 22.29, 22.15, 22.39, 22.38,
        22.61, 23.36, 24.05, 23.75, 23.83, 23.95, 23.63,
    ];

    #[test]
    fn test_bollinger_short_history_undefined() {
        assert!(calculate_bollinger(&PRICES[..19], 20, 2.0).is_none());
    }

    #[test]
    fn test_bollinger_basic() {
        let bb = calculate_bollinger(&PRICES, 20, 2.0).unwrap();

        assert!(bb.upper > bb.middle);
        assert!(bb.lower < bb.middle);
        assert_relative_eq!(bb.upper - bb.middle, bb.middle - bb.lower, epsilon = 1e-9);
    }

    #[test]
    fn test_bollinger_uses_population_std() {
        let prices: Vec<f64> = (1..=20).map(f64::from).collect();
        let bb = calculate_bollinger(&prices, 20, 2.0).unwrap();

        // Population variance of 1..=20 is (20^2 - 1) / 12 = 33.25
        let std = 33.25_f64.sqrt();
        assert_relative_eq!(bb.middle, 10.5, epsilon = 1e-12);
        assert_relative_eq!(bb.upper, 10.5 + 2.0 * std, epsilon = 1e-12);
        assert_relative_eq!(bb.lower, 10.5 - 2.0 * std, epsilon = 1e-12);
    }

    #[test]
    fn test_bollinger_constant_collapses() {
        let bb = calculate_bollinger(&[50.0; 25], 20, 2.0).unwrap();

        assert_eq!(bb.upper, 50.0);
        assert_eq!(bb.middle, 50.0);
        assert_eq!(bb.lower, 50.0);
    }

    #[test]
    fn test_bollinger_series_matches_point() {
        let mut prices = PRICES.to_vec();
        prices.extend([23.82, 23.87, 23.65]);
        let bb = calculate_bollinger_bands(&prices, 20, 2.0);

        assert_eq!(bb.middle.len(), prices.len());
        assert!(bb.middle[..19].iter().all(|v| v.is_none()));
        for i in 19..prices.len() {
            let point = calculate_bollinger(&prices[..=i], 20, 2.0).unwrap();
            assert_relative_eq!(bb.upper[i].unwrap(), point.upper, epsilon = 1e-12);
            assert_relative_eq!(bb.lower[i].unwrap(), point.lower, epsilon = 1e-12);
        }
    }
}
