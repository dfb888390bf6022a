use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// One daily observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turnover: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_interest: Option<u64>,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, close: f64) -> Self {
        Self {
            timestamp,
            close,
            open: None,
            high: None,
            low: None,
            volume: None,
            turnover: None,
            open_interest: None,
        }
    }
}

/// Ordered close series for one symbol.
///
/// Timestamps are strictly increasing and every close is finite and positive.
/// The only way to build one is [`PriceSeries::new`], which checks both.
#[derive(Debug, Clone, Serialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self> {
        for (i, point) in points.iter().enumerate() {
            if !point.close.is_finite() || point.close <= 0.0 {
                return Err(AnalysisError::InvalidSeries(format!(
                    "close at index {} is not positive: {}",
                    i, point.close
                )));
            }
            if i > 0 && point.timestamp <= points[i - 1].timestamp {
                return Err(AnalysisError::InvalidSeries(format!(
                    "timestamp at index {} ({}) does not follow {}",
                    i,
                    point.timestamp,
                    points[i - 1].timestamp
                )));
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            points,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Fail with `InsufficientHistory` unless at least `required` points are present
    pub fn require_len(&self, required: usize) -> Result<()> {
        if self.points.len() < required {
            return Err(AnalysisError::InsufficientHistory {
                required,
                actual: self.points.len(),
            });
        }
        Ok(())
    }
}

/// Trend classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendClassification {
    Bullish,
    Bearish,
    Range,
}

impl TrendClassification {
    /// Integer code used by the storage schema (1 up, 2 range, 3 down)
    pub fn legacy_code(self) -> u8 {
        match self {
            TrendClassification::Bullish => 1,
            TrendClassification::Range => 2,
            TrendClassification::Bearish => 3,
        }
    }

    pub fn from_legacy_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(TrendClassification::Bullish),
            2 => Some(TrendClassification::Range),
            3 => Some(TrendClassification::Bearish),
            _ => None,
        }
    }
}

impl fmt::Display for TrendClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrendClassification::Bullish => "bullish",
            TrendClassification::Bearish => "bearish",
            TrendClassification::Range => "range",
        };
        f.pad(name)
    }
}

/// Trading suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suggestion {
    Buy,
    Sell,
    Hold,
}

impl Suggestion {
    pub fn as_str(self) -> &'static str {
        match self {
            Suggestion::Buy => "buy",
            Suggestion::Sell => "sell",
            Suggestion::Hold => "hold",
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Bollinger band values at one point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBand {
    #[serde(rename = "bollinger_upper")]
    pub upper: f64,
    #[serde(rename = "bollinger_middle")]
    pub middle: f64,
    #[serde(rename = "bollinger_lower")]
    pub lower: f64,
}

/// Indicator values for the most recent point of a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub ma_5: f64,
    pub ma_20: f64,
    pub rsi: f64,
    pub macd: f64,
    pub price_change: f64,
    /// Absent when the series is shorter than the band window
    #[serde(flatten)]
    pub bollinger: Option<BollingerBand>,
}

impl IndicatorSnapshot {
    /// Name/value pairs in a stable order, bands included only when defined
    pub fn values(&self) -> Vec<(&'static str, f64)> {
        let mut values = vec![
            ("ma_5", self.ma_5),
            ("ma_20", self.ma_20),
            ("rsi", self.rsi),
            ("macd", self.macd),
            ("price_change", self.price_change),
        ];
        if let Some(bb) = self.bollinger {
            values.push(("bollinger_upper", bb.upper));
            values.push(("bollinger_middle", bb.middle));
            values.push(("bollinger_lower", bb.lower));
        }
        values
    }

    pub fn is_finite(&self) -> bool {
        self.values().iter().all(|(_, v)| v.is_finite())
    }
}

/// One (symbol, date, indicator) row as persisted by the storage layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRecord {
    pub symbol: String,
    pub index_date: DateTime<Utc>,
    pub index_name: String,
    pub index_value: f64,
}

/// Single-snapshot analysis output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub symbol: String,
    pub trend: TrendClassification,
    pub suggestion: Suggestion,
    pub confidence: f64,
    pub current_price: f64,
    pub indicators: IndicatorSnapshot,
}

/// Entry, target and stop levels for an actionable suggestion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradePlan {
    pub entry_price: f64,
    pub target_price: f64,
    pub stop_loss_price: f64,
    pub risk_reward_ratio: f64,
}

/// Risk bucket derived from confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.8 {
            RiskLevel::Low
        } else if confidence >= 0.6 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        };
        f.pad(name)
    }
}

/// Flat analysis row handed to the storage layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub symbol: String,
    pub trend_type: u8,
    pub suggestion: Suggestion,
    pub confidence_score: f64,
    pub current_price: f64,
    pub ma_5: f64,
    pub ma_20: f64,
    pub rsi: f64,
    pub macd: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bollinger_upper: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bollinger_lower: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_reward_ratio: Option<f64>,
    pub risk_level: RiskLevel,
}

impl AnalysisRecord {
    pub fn new(result: &AnalysisResult, plan: Option<TradePlan>) -> Self {
        let ind = &result.indicators;
        Self {
            symbol: result.symbol.clone(),
            trend_type: result.trend.legacy_code(),
            suggestion: result.suggestion,
            confidence_score: result.confidence,
            current_price: result.current_price,
            ma_5: ind.ma_5,
            ma_20: ind.ma_20,
            rsi: ind.rsi,
            macd: ind.macd,
            bollinger_upper: ind.bollinger.map(|bb| bb.upper),
            bollinger_lower: ind.bollinger.map(|bb| bb.lower),
            entry_price: plan.map(|p| p.entry_price),
            target_price: plan.map(|p| p.target_price),
            stop_loss_price: plan.map(|p| p.stop_loss_price),
            risk_reward_ratio: plan.map(|p| p.risk_reward_ratio),
            risk_level: RiskLevel::from_confidence(result.confidence),
        }
    }
}

/// Aggregate view over a batch of analysis results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total: usize,
    pub buy_count: usize,
    pub sell_count: usize,
    pub hold_count: usize,
    pub bullish_count: usize,
    pub bearish_count: usize,
    pub range_count: usize,
    pub avg_confidence: f64,
    /// Share of results at or above the configured minimum confidence
    pub high_confidence_ratio: f64,
    pub risk_level: RiskLevel,
}

impl Default for AnalysisSummary {
    fn default() -> Self {
        Self {
            total: 0,
            buy_count: 0,
            sell_count: 0,
            hold_count: 0,
            bullish_count: 0,
            bearish_count: 0,
            range_count: 0,
            avg_confidence: 0.0,
            high_confidence_ratio: 0.0,
            risk_level: RiskLevel::Low,
        }
    }
}
