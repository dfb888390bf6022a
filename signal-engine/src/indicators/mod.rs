pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{calculate_bollinger, calculate_bollinger_bands, BollingerBands};
pub use ema::{calculate_ema, ema_last};
pub use macd::{
    calculate_macd, calculate_macd_series, MacdSeries, MACD_FAST_PERIOD, MACD_SIGNAL_PERIOD,
    MACD_SLOW_PERIOD,
};
pub use rsi::{calculate_rsi, calculate_rsi_series, NEUTRAL_RSI};
pub use sma::calculate_ma;

use common::IndicatorSnapshot;

pub const MA_SHORT_PERIOD: usize = 5;
pub const MA_LONG_PERIOD: usize = 20;
pub const RSI_PERIOD: usize = 14;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_STD_DEV: f64 = 2.0;

/// Calculate all snapshot indicators for the latest price
pub fn calculate_snapshot(closes: &[f64]) -> IndicatorSnapshot {
    let price_change = match (closes.first(), closes.last()) {
        (Some(first), Some(last)) if closes.len() > 1 => last - first,
        _ => 0.0,
    };

    IndicatorSnapshot {
        ma_5: calculate_ma(closes, MA_SHORT_PERIOD),
        ma_20: calculate_ma(closes, MA_LONG_PERIOD),
        rsi: calculate_rsi(closes, RSI_PERIOD),
        macd: calculate_macd(closes),
        price_change,
        bollinger: calculate_bollinger(closes, BOLLINGER_PERIOD, BOLLINGER_STD_DEV),
    }
}
