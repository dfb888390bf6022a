use common::{AnalysisParameters, Suggestion, TrendClassification};

/// Maps a trend and RSI to buy/sell/hold, refusing to chase extended moves
#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    overbought_rsi: f64,
    oversold_rsi: f64,
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new(&AnalysisParameters::default())
    }
}

impl SuggestionEngine {
    pub fn new(params: &AnalysisParameters) -> Self {
        Self {
            overbought_rsi: params.overbought_rsi,
            oversold_rsi: params.oversold_rsi,
        }
    }

    pub fn suggest(&self, trend: TrendClassification, rsi: f64) -> Suggestion {
        match trend {
            TrendClassification::Bullish if rsi < self.overbought_rsi => Suggestion::Buy,
            TrendClassification::Bearish if rsi > self.oversold_rsi => Suggestion::Sell,
            _ => Suggestion::Hold,
        }
    }
}
