use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Trade plan settings applied to buy/sell suggestions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TradingParameters {
    /// Stop distance from entry (0.02 = 2%)
    pub stop_loss_pct: f64,
    /// Target distance from entry (0.05 = 5%)
    pub take_profit_pct: f64,
}

impl Default for TradingParameters {
    fn default() -> Self {
        Self {
            stop_loss_pct: 0.02,
            take_profit_pct: 0.05,
        }
    }
}

/// Analysis parameters. Missing fields in a config file take the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParameters {
    /// Minimum valid closes for single-snapshot analysis
    pub min_points: usize,
    // RSI vote thresholds
    pub bullish_rsi: f64,
    pub bearish_rsi: f64,
    // Suggestion guards
    pub overbought_rsi: f64,
    pub oversold_rsi: f64,
    /// Threshold used when filtering and summarising results
    pub min_confidence: f64,
    pub trading: TradingParameters,
}

impl Default for AnalysisParameters {
    fn default() -> Self {
        Self {
            min_points: 5,
            bullish_rsi: 60.0,
            bearish_rsi: 40.0,
            overbought_rsi: 70.0,
            oversold_rsi: 30.0,
            min_confidence: 0.7,
            trading: TradingParameters::default(),
        }
    }
}

impl AnalysisParameters {
    pub fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }

    pub fn with_trend_thresholds(mut self, bearish: f64, bullish: f64) -> Self {
        self.bearish_rsi = bearish;
        self.bullish_rsi = bullish;
        self
    }

    pub fn with_rsi_guards(mut self, oversold: f64, overbought: f64) -> Self {
        self.oversold_rsi = oversold;
        self.overbought_rsi = overbought;
        self
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn with_trading(mut self, stop_loss_pct: f64, take_profit_pct: f64) -> Self {
        self.trading = TradingParameters {
            stop_loss_pct,
            take_profit_pct,
        };
        self
    }

    /// Reject parameter sets the analyzer cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.min_points == 0 {
            return Err(AnalysisError::InvalidParameter(
                "min_points must be at least 1".to_string(),
            ));
        }
        if self.bearish_rsi > self.bullish_rsi {
            return Err(AnalysisError::InvalidParameter(format!(
                "bearish_rsi ({}) above bullish_rsi ({})",
                self.bearish_rsi, self.bullish_rsi
            )));
        }
        if self.oversold_rsi > self.overbought_rsi {
            return Err(AnalysisError::InvalidParameter(format!(
                "oversold_rsi ({}) above overbought_rsi ({})",
                self.oversold_rsi, self.overbought_rsi
            )));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(AnalysisError::InvalidParameter(format!(
                "min_confidence must be within [0, 1], got {}",
                self.min_confidence
            )));
        }
        if self.trading.stop_loss_pct <= 0.0 || self.trading.take_profit_pct <= 0.0 {
            return Err(AnalysisError::InvalidParameter(
                "stop_loss_pct and take_profit_pct must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
