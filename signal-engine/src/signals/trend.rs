use common::{AnalysisParameters, IndicatorSnapshot, TrendClassification};

/// Bullish and bearish vote counts behind a classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrendVotes {
    pub bullish: u8,
    pub bearish: u8,
}

/// Rule-based trend classifier.
///
/// Three signals vote independently: MA ordering, RSI level and MACD sign.
/// A direction needs two votes and no opposing vote, anything else is
/// `Range`.
#[derive(Debug, Clone)]
pub struct TrendClassifier {
    bullish_rsi: f64,
    bearish_rsi: f64,
}

impl Default for TrendClassifier {
    fn default() -> Self {
        Self::new(&AnalysisParameters::default())
    }
}

impl TrendClassifier {
    pub fn new(params: &AnalysisParameters) -> Self {
        Self {
            bullish_rsi: params.bullish_rsi,
            bearish_rsi: params.bearish_rsi,
        }
    }

    pub fn votes(&self, indicators: &IndicatorSnapshot, current_price: f64) -> TrendVotes {
        let mut votes = TrendVotes::default();

        // MA ordering, strict chain
        if current_price > indicators.ma_5 && indicators.ma_5 > indicators.ma_20 {
            votes.bullish += 1;
        } else if current_price < indicators.ma_5 && indicators.ma_5 < indicators.ma_20 {
            votes.bearish += 1;
        }

        if indicators.rsi > self.bullish_rsi {
            votes.bullish += 1;
        } else if indicators.rsi < self.bearish_rsi {
            votes.bearish += 1;
        }

        if indicators.macd > 0.0 {
            votes.bullish += 1;
        } else if indicators.macd < 0.0 {
            votes.bearish += 1;
        }

        votes
    }

    pub fn classify(&self, indicators: &IndicatorSnapshot, current_price: f64) -> TrendClassification {
        let votes = self.votes(indicators, current_price);

        if votes.bullish >= 2 && votes.bearish == 0 {
            TrendClassification::Bullish
        } else if votes.bearish >= 2 && votes.bullish == 0 {
            TrendClassification::Bearish
        } else {
            TrendClassification::Range
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_indicators(ma_5: f64, ma_20: f64, rsi: f64, macd: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            ma_5,
            ma_20,
            rsi,
            macd,
            price_change: 0.0,
            bollinger: None,
        }
    }

    #[test]
    fn test_all_bullish() {
        let classifier = TrendClassifier::default();
        let ind = make_indicators(105.0, 100.0, 65.0, 1.2);

        assert_eq!(classifier.classify(&ind, 110.0), TrendClassification::Bullish);
        assert_eq!(
            classifier.votes(&ind, 110.0),
            TrendVotes {
                bullish: 3,
                bearish: 0
            }
        );
    }

    #[test]
    fn test_two_bearish_votes() {
        let classifier = TrendClassifier::default();
        // MA chain broken, RSI and MACD bearish
        let ind = make_indicators(95.0, 100.0, 35.0, -0.8);

        assert_eq!(classifier.classify(&ind, 97.0), TrendClassification::Bearish);
    }

    #[test]
    fn test_opposing_vote_forces_range() {
        let classifier = TrendClassifier::default();
        // MA and RSI bullish, MACD bearish
        let ind = make_indicators(105.0, 100.0, 65.0, -0.1);

        assert_eq!(classifier.classify(&ind, 110.0), TrendClassification::Range);
    }

    #[test]
    fn test_single_vote_is_range() {
        let classifier = TrendClassifier::default();
        let ind = make_indicators(100.0, 100.0, 50.0, 0.5);

        assert_eq!(classifier.classify(&ind, 100.0), TrendClassification::Range);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let classifier = TrendClassifier::default();
        // RSI exactly 60 and MACD exactly 0 cast no vote
        let ind = make_indicators(105.0, 100.0, 60.0, 0.0);

        assert_eq!(classifier.votes(&ind, 110.0).bullish, 1);
        assert_eq!(classifier.classify(&ind, 110.0), TrendClassification::Range);
    }

    #[test]
    fn test_flat_market_is_range() {
        let classifier = TrendClassifier::default();
        let ind = make_indicators(50.0, 50.0, 50.0, 0.0);

        assert_eq!(classifier.votes(&ind, 50.0), TrendVotes::default());
        assert_eq!(classifier.classify(&ind, 50.0), TrendClassification::Range);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = TrendClassifier::default();
        let ind = make_indicators(95.0, 100.0, 35.0, -0.8);

        let first = classifier.classify(&ind, 90.0);
        for _ in 0..10 {
            assert_eq!(classifier.classify(&ind, 90.0), first);
        }
    }
}
