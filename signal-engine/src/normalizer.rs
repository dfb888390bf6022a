use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use common::{AnalysisError, PricePoint, PriceSeries, Result};
use tracing::{debug, info, warn};

use crate::data::{RawRecord, RawValue};

/// Columns the normalizer understands, with every accepted spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    Timestamp,
    Open,
    High,
    Low,
    Close,
    Volume,
    Turnover,
    OpenInterest,
}

impl PriceField {
    /// Accepted column names, in lookup priority order
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            PriceField::Timestamp => &["date", "trade_date", "timestamp", "time", "日期", "时间"],
            PriceField::Open => &["开盘", "open", "open_price"],
            PriceField::High => &["最高", "high", "high_price"],
            PriceField::Low => &["最低", "low", "low_price"],
            PriceField::Close => &["收盘", "close", "close_price"],
            PriceField::Volume => &["成交量", "volume"],
            PriceField::Turnover => &["成交额", "turnover"],
            PriceField::OpenInterest => &["持仓量", "open_interest"],
        }
    }

    /// First alias present in any record of the set
    pub fn resolve(self, records: &[RawRecord]) -> Option<&'static str> {
        self.aliases()
            .iter()
            .copied()
            .find(|name| records.iter().any(|record| record.get(name).is_some()))
    }
}

/// First column, in order of appearance, whose non-missing cells are all numeric
fn first_numeric_column(records: &[RawRecord], skip: &str) -> Option<String> {
    let mut names: Vec<&str> = Vec::new();
    for record in records {
        for (name, _) in record.fields() {
            if name != skip && !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
    }

    names
        .into_iter()
        .find(|name| {
            let mut seen = false;
            for record in records {
                match record.get(name) {
                    None | Some(RawValue::Missing) => {}
                    Some(value) if value.is_numeric() => seen = true,
                    Some(_) => return false,
                }
            }
            seen
        })
        .map(str::to_string)
}

/// Column names resolved once over the whole record set
#[derive(Debug, Clone)]
struct ColumnMap {
    timestamp: &'static str,
    close: String,
    open: Option<&'static str>,
    high: Option<&'static str>,
    low: Option<&'static str>,
    volume: Option<&'static str>,
    turnover: Option<&'static str>,
    open_interest: Option<&'static str>,
}

impl ColumnMap {
    fn resolve(records: &[RawRecord]) -> Result<Self> {
        let timestamp = PriceField::Timestamp.resolve(records).ok_or_else(|| {
            AnalysisError::DataLoadError("no recognised date column".to_string())
        })?;

        // Fall back to the first numeric column that is not the date
        let close = match PriceField::Close.resolve(records) {
            Some(name) => name.to_string(),
            None => first_numeric_column(records, timestamp).ok_or_else(|| {
                AnalysisError::DataLoadError("no close or numeric column".to_string())
            })?,
        };

        Ok(Self {
            timestamp,
            close,
            open: PriceField::Open.resolve(records),
            high: PriceField::High.resolve(records),
            low: PriceField::Low.resolve(records),
            volume: PriceField::Volume.resolve(records),
            turnover: PriceField::Turnover.resolve(records),
            open_interest: PriceField::OpenInterest.resolve(records),
        })
    }
}

/// Turns heterogeneous raw rows into a validated [`PriceSeries`]
pub struct PriceSeriesNormalizer;

impl PriceSeriesNormalizer {
    /// Extract an ordered series of valid closes.
    ///
    /// Rows whose close is missing, non-finite or not positive are dropped.
    /// Rows that cannot be converted, or whose timestamp does not move
    /// forward, are logged and skipped. An empty input or an input with no
    /// valid rows yields `NoData`.
    pub fn extract(symbol: &str, records: &[RawRecord]) -> Result<PriceSeries> {
        if records.is_empty() {
            return Err(AnalysisError::NoData {
                symbol: symbol.to_string(),
            });
        }
        let columns = ColumnMap::resolve(records)?;

        let mut points: Vec<PricePoint> = Vec::with_capacity(records.len());
        let mut skipped = 0usize;

        for (row, record) in records.iter().enumerate() {
            match Self::convert_row(record, &columns) {
                Ok(Some(point)) => {
                    if let Some(prev) = points.last() {
                        if point.timestamp <= prev.timestamp {
                            warn!(
                                symbol,
                                row,
                                timestamp = %point.timestamp,
                                "timestamp does not advance, row skipped"
                            );
                            skipped += 1;
                            continue;
                        }
                    }
                    points.push(point);
                }
                Ok(None) => {
                    debug!(symbol, row, "no valid close, row dropped");
                }
                Err(e) if e.is_row_level() => {
                    warn!(symbol, row, error = %e, "row skipped");
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        if points.is_empty() {
            return Err(AnalysisError::NoData {
                symbol: symbol.to_string(),
            });
        }

        info!(
            symbol,
            rows = records.len(),
            kept = points.len(),
            skipped,
            close_column = %columns.close,
            "price series extracted"
        );

        PriceSeries::new(symbol, points)
    }

    /// Extract and require at least `min_points` valid closes
    pub fn extract_min(symbol: &str, records: &[RawRecord], min_points: usize) -> Result<PriceSeries> {
        let series = Self::extract(symbol, records)?;
        series.require_len(min_points)?;
        Ok(series)
    }

    fn convert_row(record: &RawRecord, columns: &ColumnMap) -> Result<Option<PricePoint>> {
        let close = match Self::number(record, &columns.close)? {
            Some(c) if c.is_finite() && c > 0.0 => c,
            _ => return Ok(None),
        };

        let timestamp = match record.get(columns.timestamp) {
            Some(value) => parse_timestamp_value(value)?,
            None => {
                return Err(AnalysisError::ConversionFailure {
                    field: columns.timestamp.to_string(),
                    value: "missing".to_string(),
                })
            }
        };

        // Optional columns never cost the row its close
        let optional = |name: Option<&'static str>| -> Option<f64> {
            match Self::number(record, name?) {
                Ok(value) => value.filter(|v| v.is_finite()),
                Err(e) => {
                    debug!(error = %e, "optional column ignored");
                    None
                }
            }
        };

        let mut point = PricePoint::new(timestamp, close);
        point.open = optional(columns.open);
        point.high = optional(columns.high);
        point.low = optional(columns.low);
        point.volume = optional(columns.volume).map(|v| v.max(0.0) as u64);
        point.turnover = optional(columns.turnover);
        point.open_interest = optional(columns.open_interest).map(|v| v.max(0.0) as u64);

        Ok(Some(point))
    }

    fn number(record: &RawRecord, name: &str) -> Result<Option<f64>> {
        match record.get(name) {
            None | Some(RawValue::Missing) => Ok(None),
            Some(RawValue::Number(n)) => Ok(Some(*n)),
            Some(RawValue::Text(s)) => s.trim().parse::<f64>().map(Some).map_err(|_| {
                AnalysisError::ConversionFailure {
                    field: name.to_string(),
                    value: s.clone(),
                }
            }),
        }
    }
}

fn parse_timestamp_value(value: &RawValue) -> Result<DateTime<Utc>> {
    let parsed = match value {
        RawValue::Text(s) => parse_timestamp(s),
        // Whole numbers are YYYYMMDD when they read as one, else Unix seconds
        RawValue::Number(n) if n.fract() == 0.0 => parse_timestamp(&(*n as i64).to_string()),
        _ => None,
    };

    parsed.ok_or_else(|| AnalysisError::ConversionFailure {
        field: "timestamp".to_string(),
        value: match value {
            RawValue::Text(s) => s.clone(),
            RawValue::Number(n) => n.to_string(),
            RawValue::Missing => "missing".to_string(),
        },
    })
}

/// Parse timestamp from various formats
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
    ];
    for fmt in &datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }

    for fmt in &["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|dt| Utc.from_utc_datetime(&dt));
        }
    }

    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y%m%d") {
            return date.and_hms_opt(0, 0, 0).map(|dt| Utc.from_utc_datetime(&dt));
        }
    }

    // Unix timestamp (seconds)
    s.parse::<i64>()
        .ok()
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
}
