/// Calculate Exponential Moving Average
///
/// Seeded with the first price, then `ema = (price - prev) * m + prev`
/// with `m = 2 / (period + 1)`. One output per input.
///
/// # Arguments
/// * `prices` - Slice of prices
/// * `period` - EMA period
///
/// # Returns
/// Vector of EMA values
pub fn calculate_ema(prices: &[f64], period: usize) -> Vec<f64> {
    let n = prices.len();
    if n == 0 || period == 0 {
        return vec![];
    }

    let mut ema = vec![0.0; n];
    let multiplier = 2.0 / (period as f64 + 1.0);

    // Initialize with first price
    ema[0] = prices[0];

    for i in 1..n {
        ema[i] = (prices[i] - ema[i - 1]) * multiplier + ema[i - 1];
    }

    ema
}

/// Final value of [`calculate_ema`] without keeping the series
pub fn ema_last(values: &[f64], period: usize) -> Option<f64> {
    let (first, rest) = values.split_first()?;
    if period == 0 {
        return None;
    }
    let multiplier = 2.0 / (period as f64 + 1.0);

    Some(
        rest.iter()
            .fold(*first, |prev, value| (value - prev) * multiplier + prev),
    )
}
