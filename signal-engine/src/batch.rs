use chrono::{DateTime, Utc};
use common::{AnalysisError, IndicatorRecord, PriceSeries, Result};
use rayon::prelude::*;
use tracing::{error, info, warn};

use crate::data::RawRecord;
use crate::indicators::{
    calculate_bollinger_bands, calculate_ema, calculate_macd_series, calculate_rsi_series,
    BOLLINGER_PERIOD, BOLLINGER_STD_DEV, MACD_FAST_PERIOD, MACD_SLOW_PERIOD, RSI_PERIOD,
};
use crate::normalizer::PriceSeriesNormalizer;

/// Columns of the historical indicator table, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorColumn {
    Ema12,
    Ema26,
    Rsi14,
    Macd,
    MacdSignal,
    MacdHist,
    BbUpper,
    BbMiddle,
    BbLower,
}

impl IndicatorColumn {
    pub const ALL: [IndicatorColumn; 9] = [
        IndicatorColumn::Ema12,
        IndicatorColumn::Ema26,
        IndicatorColumn::Rsi14,
        IndicatorColumn::Macd,
        IndicatorColumn::MacdSignal,
        IndicatorColumn::MacdHist,
        IndicatorColumn::BbUpper,
        IndicatorColumn::BbMiddle,
        IndicatorColumn::BbLower,
    ];

    /// Name stored in `index_name`
    pub fn name(self) -> &'static str {
        match self {
            IndicatorColumn::Ema12 => "EMA_12",
            IndicatorColumn::Ema26 => "EMA_26",
            IndicatorColumn::Rsi14 => "RSI_14",
            IndicatorColumn::Macd => "MACD",
            IndicatorColumn::MacdSignal => "MACD_Signal",
            IndicatorColumn::MacdHist => "MACD_Hist",
            IndicatorColumn::BbUpper => "BB_Upper",
            IndicatorColumn::BbMiddle => "BB_Middle",
            IndicatorColumn::BbLower => "BB_Lower",
        }
    }
}

/// One date of the wide table; `None` where the lookback is not satisfied
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub timestamp: DateTime<Utc>,
    pub values: [Option<f64>; 9],
}

impl IndicatorRow {
    pub fn is_complete(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }

    pub fn get(&self, column: IndicatorColumn) -> Option<f64> {
        IndicatorColumn::ALL
            .iter()
            .position(|c| *c == column)
            .and_then(|i| self.values[i])
    }
}

/// Wide indicator table aligned one-to-one with a price series
#[derive(Debug, Clone)]
pub struct IndicatorTable {
    pub symbol: String,
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorTable {
    pub fn calculate(series: &PriceSeries) -> Self {
        let closes = series.closes();

        let ema_fast = calculate_ema(&closes, MACD_FAST_PERIOD);
        let ema_slow = calculate_ema(&closes, MACD_SLOW_PERIOD);
        let rsi = calculate_rsi_series(&closes, RSI_PERIOD);
        let macd = calculate_macd_series(&closes);
        let bb = calculate_bollinger_bands(&closes, BOLLINGER_PERIOD, BOLLINGER_STD_DEV);

        let rows = series
            .points()
            .iter()
            .enumerate()
            .map(|(i, point)| IndicatorRow {
                timestamp: point.timestamp,
                values: [
                    ema_fast.get(i).copied(),
                    ema_slow.get(i).copied(),
                    rsi[i],
                    macd.macd.get(i).copied(),
                    macd.signal.get(i).copied(),
                    macd.histogram.get(i).copied(),
                    bb.upper[i],
                    bb.middle[i],
                    bb.lower[i],
                ],
            })
            .collect();

        Self {
            symbol: series.symbol().to_string(),
            rows,
        }
    }

    pub fn complete_rows(&self) -> impl Iterator<Item = &IndicatorRow> {
        self.rows.iter().filter(|row| row.is_complete())
    }
}

/// Pivot one complete row into one record per column
pub fn pivot_row(symbol: &str, row: &IndicatorRow) -> Result<Vec<IndicatorRecord>> {
    IndicatorColumn::ALL
        .iter()
        .zip(row.values.iter())
        .map(|(column, value)| match value {
            Some(v) if v.is_finite() => Ok(IndicatorRecord {
                symbol: symbol.to_string(),
                index_date: row.timestamp,
                index_name: column.name().to_string(),
                index_value: *v,
            }),
            other => Err(AnalysisError::ConversionFailure {
                field: column.name().to_string(),
                value: format!("{:?}", other),
            }),
        })
        .collect()
}

/// Drop incomplete rows, then pivot the rest from wide to long.
///
/// A row that fails to convert is logged and skipped; the rest of the
/// table is still returned.
pub fn pivot(table: &IndicatorTable) -> Vec<IndicatorRecord> {
    let mut records = Vec::new();

    for row in table.complete_rows() {
        match pivot_row(&table.symbol, row) {
            Ok(mut row_records) => records.append(&mut row_records),
            Err(e) => {
                warn!(
                    symbol = %table.symbol,
                    date = %row.timestamp,
                    error = %e,
                    "indicator row skipped"
                );
            }
        }
    }

    records
}

/// Computes the full historical indicator table and pivots it for storage
#[derive(Debug, Clone, Default)]
pub struct BatchIndexComputer;

impl BatchIndexComputer {
    pub fn new() -> Self {
        Self
    }

    /// Long-form indicator records for every date with a full lookback
    pub fn compute(&self, series: &PriceSeries) -> Vec<IndicatorRecord> {
        let table = IndicatorTable::calculate(series);
        let records = pivot(&table);

        info!(
            symbol = series.symbol(),
            points = series.len(),
            records = records.len(),
            "indicator table computed"
        );

        records
    }

    /// Normalise raw rows for one symbol and compute its records
    pub fn compute_records(&self, symbol: &str, raw: &[RawRecord]) -> Result<Vec<IndicatorRecord>> {
        let outcome = PriceSeriesNormalizer::extract(symbol, raw).map(|series| self.compute(&series));

        if let Err(e) = &outcome {
            error!(symbol, error = %e, "indicator computation failed");
        }
        outcome
    }

    /// Compute many symbols in parallel, one outcome per input in input order
    pub fn compute_many(
        &self,
        inputs: &[(String, Vec<RawRecord>)],
    ) -> Vec<(String, Result<Vec<IndicatorRecord>>)> {
        inputs
            .par_iter()
            .map(|(symbol, raw)| (symbol.clone(), self.compute_records(symbol, raw)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone};
    use common::PricePoint;

    fn make_series(closes: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, c)| PricePoint::new(start + Duration::days(i as i64), *c))
            .collect();
        PriceSeries::new("RB", points).unwrap()
    }

    fn wave(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i as f64 * 0.4).sin() * 5.0).collect()
    }

    #[test]
    fn test_short_series_yields_nothing() {
        let computer = BatchIndexComputer::new();
        assert!(computer.compute(&make_series(&wave(19))).is_empty());
    }

    #[test]
    fn test_record_count() {
        let computer = BatchIndexComputer::new();
        for n in [20, 21, 45] {
            let records = computer.compute(&make_series(&wave(n)));
            assert_eq!(records.len(), (n - 19) * 9);
        }
    }

    #[test]
    fn test_record_layout() {
        let series = make_series(&wave(22));
        let records = BatchIndexComputer::new().compute(&series);

        let names: Vec<&str> = records[..9].iter().map(|r| r.index_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "EMA_12",
                "EMA_26",
                "RSI_14",
                "MACD",
                "MACD_Signal",
                "MACD_Hist",
                "BB_Upper",
                "BB_Middle",
                "BB_Lower"
            ]
        );
        // First complete row is the 20th point
        assert!(records[..9]
            .iter()
            .all(|r| r.index_date == series.points()[19].timestamp && r.symbol == "RB"));
        assert_eq!(records.last().unwrap().index_date, series.points()[21].timestamp);
    }

    #[test]
    fn test_table_leading_rows_are_incomplete() {
        let table = IndicatorTable::calculate(&make_series(&wave(30)));

        assert_eq!(table.rows.len(), 30);
        assert!(table.rows[..19].iter().all(|r| !r.is_complete()));
        assert!(table.rows[19..].iter().all(|r| r.is_complete()));
        // RSI is defined from the 15th point, bands from the 20th
        assert!(table.rows[14].get(IndicatorColumn::Rsi14).is_some());
        assert!(table.rows[13].get(IndicatorColumn::Rsi14).is_none());
        assert!(table.rows[18].get(IndicatorColumn::BbMiddle).is_none());
    }

    #[test]
    fn test_macd_columns_consistent() {
        let table = IndicatorTable::calculate(&make_series(&wave(40)));

        let line: Vec<f64> = table
            .rows
            .iter()
            .map(|r| r.get(IndicatorColumn::Macd).unwrap())
            .collect();
        let signal = calculate_ema(&line, crate::indicators::MACD_SIGNAL_PERIOD);
        for (row, want) in table.rows.iter().zip(&signal) {
            assert_relative_eq!(
                row.get(IndicatorColumn::MacdSignal).unwrap(),
                *want,
                epsilon = 1e-12
            );
        }

        for row in table.complete_rows() {
            let ema12 = row.get(IndicatorColumn::Ema12).unwrap();
            let ema26 = row.get(IndicatorColumn::Ema26).unwrap();
            let macd = row.get(IndicatorColumn::Macd).unwrap();
            let signal = row.get(IndicatorColumn::MacdSignal).unwrap();
            let hist = row.get(IndicatorColumn::MacdHist).unwrap();
            assert_relative_eq!(macd, ema12 - ema26, epsilon = 1e-12);
            assert_relative_eq!(hist, macd - signal, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_conversion_failure_skips_only_that_row() {
        let mut table = IndicatorTable::calculate(&make_series(&wave(25)));
        table.rows[21].values[2] = Some(f64::NAN);

        let records = pivot(&table);

        assert_eq!(records.len(), (25 - 19 - 1) * 9);
        assert!(records
            .iter()
            .all(|r| r.index_date != table.rows[21].timestamp));
    }

    #[test]
    fn test_pivot_row_rejects_non_finite() {
        let table = IndicatorTable::calculate(&make_series(&wave(20)));
        let mut row = table.rows[19].clone();
        row.values[6] = Some(f64::INFINITY);

        let err = pivot_row("RB", &row).unwrap_err();
        assert!(matches!(err, AnalysisError::ConversionFailure { ref field, .. } if field == "BB_Upper"));
    }

    #[test]
    fn test_constant_series_bands_collapse() {
        let records = BatchIndexComputer::new().compute(&make_series(&[50.0; 20]));

        assert_eq!(records.len(), 9);
        for record in &records {
            let expected = match record.index_name.as_str() {
                "RSI_14" => 100.0,
                "MACD" | "MACD_Signal" | "MACD_Hist" => 0.0,
                _ => 50.0,
            };
            assert_eq!(record.index_value, expected, "{}", record.index_name);
        }
    }

    #[test]
    fn test_compute_records_empty_is_no_data() {
        let err = BatchIndexComputer::new().compute_records("RB", &[]).unwrap_err();
        assert!(matches!(err, AnalysisError::NoData { .. }));
    }

    #[test]
    fn test_compute_many() {
        let inputs = vec![
            (
                "A".to_string(),
                crate::data::generate_trending_records(25, 100.0, 1.0),
            ),
            ("B".to_string(), crate::data::generate_trending_records(10, 100.0, 1.0)),
        ];
        let outcomes = BatchIndexComputer::new().compute_many(&inputs);

        assert_eq!(outcomes[0].1.as_ref().unwrap().len(), 6 * 9);
        assert!(outcomes[1].1.as_ref().unwrap().is_empty());
    }
}
