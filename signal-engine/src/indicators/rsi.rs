use super::ema::{calculate_ema, ema_last};

/// Value reported while the lookback window is not yet filled
pub const NEUTRAL_RSI: f64 = 50.0;

fn gains_and_losses(prices: &[f64]) -> (Vec<f64>, Vec<f64>) {
    prices
        .windows(2)
        .map(|w| {
            let delta = w[1] - w[0];
            (delta.max(0.0), (-delta).max(0.0))
        })
        .unzip()
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Calculate RSI at the latest point
///
/// Gains and losses are smoothed with the first-element-seeded EMA over
/// their full length. Returns [`NEUTRAL_RSI`] when fewer than `period + 1`
/// prices are available and exactly 100.0 when there are no losses.
///
/// # Arguments
/// * `prices` - Slice of closing prices
/// * `period` - RSI period (typically 14)
pub fn calculate_rsi(prices: &[f64], period: usize) -> f64 {
    if prices.len() < period + 1 || period == 0 {
        return NEUTRAL_RSI;
    }

    let (gains, losses) = gains_and_losses(prices);
    match (ema_last(&gains, period), ema_last(&losses, period)) {
        (Some(avg_gain), Some(avg_loss)) => rsi_from_averages(avg_gain, avg_loss),
        _ => NEUTRAL_RSI,
    }
}

/// Calculate RSI for every point of a series
///
/// Entry `i` equals [`calculate_rsi`] applied to `prices[..=i]`; entries
/// before the window is filled are `None`.
pub fn calculate_rsi_series(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = prices.len();
    let mut rsi = vec![None; n];
    if n < period + 1 || period == 0 {
        return rsi;
    }

    let (gains, losses) = gains_and_losses(prices);
    let avg_gains = calculate_ema(&gains, period);
    let avg_losses = calculate_ema(&losses, period);

    // Delta i-1 is the last one seen at price index i
    for i in period..n {
        rsi[i] = Some(rsi_from_averages(avg_gains[i - 1], avg_losses[i - 1]));
    }

    rsi
}
