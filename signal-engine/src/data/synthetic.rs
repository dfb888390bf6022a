use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;

use super::record::RawRecord;

fn daily_record(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> RawRecord {
    RawRecord::new()
        .with("date", date.format("%Y-%m-%d").to_string())
        .with("open", open)
        .with("high", high)
        .with("low", low)
        .with("close", close)
        .with("volume", volume as f64)
}

/// Generate random-walk daily records ending today, for demos
pub fn generate_synthetic_records(days: usize, initial_price: f64) -> Vec<RawRecord> {
    let mut rng = rand::thread_rng();
    let mut records = Vec::with_capacity(days);

    let mut price = initial_price;
    let start_date = Utc::now().date_naive() - Duration::days(days as i64);

    let daily_volatility = 0.015;
    let drift = 0.0003;

    for i in 0..days {
        let date = start_date + Duration::days(i as i64);

        let random_return: f64 = rng.gen_range(-1.0..1.0);
        let daily_return = drift + daily_volatility * random_return;
        let new_price = price * (1.0 + daily_return);

        let intraday_range = price * rng.gen_range(0.005..0.02);
        let open = price + rng.gen_range(-intraday_range / 2.0..intraday_range / 2.0);
        let close = new_price;
        let high = open.max(close) + rng.gen_range(0.0..intraday_range / 2.0);
        let low = open.min(close) - rng.gen_range(0.0..intraday_range / 2.0);

        // Higher volume on volatile days
        let base_volume = 200_000u64;
        let volume_multiplier = 1.0 + daily_return.abs() * 10.0;
        let volume = (base_volume as f64 * volume_multiplier * rng.gen_range(0.8..1.2)) as u64;

        records.push(daily_record(date, open, high, low, close, volume));

        price = new_price;
    }

    records
}

/// Generate daily records whose close moves by a fixed step each day
pub fn generate_trending_records(days: usize, start_price: f64, step: f64) -> Vec<RawRecord> {
    let start_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();

    (0..days)
        .map(|i| {
            let close = start_price + step * i as f64;
            let open = close - step / 2.0;
            daily_record(
                start_date + Duration::days(i as i64),
                open,
                open.max(close) + 0.5,
                open.min(close) - 0.5,
                close,
                100_000,
            )
        })
        .collect()
}
