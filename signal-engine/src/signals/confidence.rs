use common::{AnalysisParameters, IndicatorSnapshot, TrendClassification};

const RSI_AGREES: f64 = 0.8;
const RSI_DISAGREES: f64 = 0.3;
const MACD_AGREES: f64 = 0.7;
const MACD_DISAGREES: f64 = 0.2;
const MA_AGREES: f64 = 0.6;

/// Averages per-indicator agreement factors into a confidence in [0, 1]
#[derive(Debug, Clone)]
pub struct ConfidenceScorer {
    bullish_rsi: f64,
    bearish_rsi: f64,
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new(&AnalysisParameters::default())
    }
}

impl ConfidenceScorer {
    pub fn new(params: &AnalysisParameters) -> Self {
        Self {
            bullish_rsi: params.bullish_rsi,
            bearish_rsi: params.bearish_rsi,
        }
    }

    /// Agreement factors in order: RSI, MACD, then MA ordering if it agrees.
    ///
    /// The MA factor is only appended on agreement, so the average runs over
    /// two or three terms. Kept as-is pending product review.
    pub fn factors(&self, trend: TrendClassification, indicators: &IndicatorSnapshot) -> Vec<f64> {
        let bullish = trend == TrendClassification::Bullish;
        let bearish = trend == TrendClassification::Bearish;

        let mut factors = Vec::with_capacity(3);

        let rsi_agrees = (bullish && indicators.rsi > self.bullish_rsi)
            || (bearish && indicators.rsi < self.bearish_rsi);
        factors.push(if rsi_agrees { RSI_AGREES } else { RSI_DISAGREES });

        let macd_agrees = (bullish && indicators.macd > 0.0) || (bearish && indicators.macd < 0.0);
        factors.push(if macd_agrees { MACD_AGREES } else { MACD_DISAGREES });

        let ma_agrees = (bullish && indicators.ma_5 > indicators.ma_20)
            || (bearish && indicators.ma_5 < indicators.ma_20);
        if ma_agrees {
            factors.push(MA_AGREES);
        }

        factors
    }

    pub fn score(&self, trend: TrendClassification, indicators: &IndicatorSnapshot) -> f64 {
        let factors = self.factors(trend, indicators);
        if factors.is_empty() {
            return 0.0;
        }
        let mean = factors.iter().sum::<f64>() / factors.len() as f64;
        mean.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

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
    fn test_full_bullish_agreement() {
        let scorer = ConfidenceScorer::default();
        let ind = make_indicators(105.0, 100.0, 65.0, 1.0);

        assert_eq!(scorer.factors(TrendClassification::Bullish, &ind).len(), 3);
        assert_relative_eq!(
            scorer.score(TrendClassification::Bullish, &ind),
            (0.8 + 0.7 + 0.6) / 3.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_bearish_without_ma_factor_averages_two_terms() {
        let scorer = ConfidenceScorer::default();
        // MA ordering disagrees with the bearish trend
        let ind = make_indicators(105.0, 100.0, 35.0, -1.0);

        assert_eq!(scorer.factors(TrendClassification::Bearish, &ind), vec![0.8, 0.7]);
        assert_relative_eq!(
            scorer.score(TrendClassification::Bearish, &ind),
            0.75,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_range_scores_low() {
        let scorer = ConfidenceScorer::default();
        let ind = make_indicators(105.0, 100.0, 65.0, 1.0);

        assert_relative_eq!(
            scorer.score(TrendClassification::Range, &ind),
            0.25,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_score_bounded() {
        let scorer = ConfidenceScorer::default();
        let trends = [
            TrendClassification::Bullish,
            TrendClassification::Bearish,
            TrendClassification::Range,
        ];
        for trend in trends {
            for rsi in [0.0, 35.0, 50.0, 65.0, 100.0] {
                for macd in [-1.0, 0.0, 1.0] {
                    for (ma_5, ma_20) in [(90.0, 100.0), (100.0, 100.0), (110.0, 100.0)] {
                        let ind = make_indicators(ma_5, ma_20, rsi, macd);
                        let score = scorer.score(trend, &ind);
                        assert!((0.0..=1.0).contains(&score));
                    }
                }
            }
        }
    }
}
