use super::ema::calculate_ema;

pub const MACD_FAST_PERIOD: usize = 12;
pub const MACD_SLOW_PERIOD: usize = 26;
pub const MACD_SIGNAL_PERIOD: usize = 9;

/// MACD line, signal line and histogram, aligned with the input
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Calculate the MACD line value at the latest point
///
/// Needs at least 26 prices, otherwise 0.0. Only the line (EMA12 - EMA26)
/// is returned; no signal smoothing is applied.
pub fn calculate_macd(prices: &[f64]) -> f64 {
    if prices.len() < MACD_SLOW_PERIOD {
        return 0.0;
    }

    let fast = calculate_ema(prices, MACD_FAST_PERIOD);
    let slow = calculate_ema(prices, MACD_SLOW_PERIOD);

    match (fast.last(), slow.last()) {
        (Some(f), Some(s)) => f - s,
        _ => 0.0,
    }
}

/// Calculate MACD (12, 26, 9) over a whole series
///
/// # Returns
/// MacdSeries with one entry per price in each of the three lines
pub fn calculate_macd_series(prices: &[f64]) -> MacdSeries {
    let fast = calculate_ema(prices, MACD_FAST_PERIOD);
    let slow = calculate_ema(prices, MACD_SLOW_PERIOD);

    let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal = calculate_ema(&macd, MACD_SIGNAL_PERIOD);
    let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

    MacdSeries {
        macd,
        signal,
        histogram,
    }
}
