use common::{AnalysisResult, AnalysisSummary, RiskLevel, Suggestion, TrendClassification};

/// Aggregates a batch of analysis results
pub struct SummaryCalculator;

impl SummaryCalculator {
    pub fn calculate(results: &[AnalysisResult], min_confidence: f64) -> AnalysisSummary {
        if results.is_empty() {
            return AnalysisSummary::default();
        }

        let count_suggestion =
            |s: Suggestion| results.iter().filter(|r| r.suggestion == s).count();
        let count_trend =
            |t: TrendClassification| results.iter().filter(|r| r.trend == t).count();

        let total = results.len();
        let avg_confidence = results.iter().map(|r| r.confidence).sum::<f64>() / total as f64;
        let high_confidence = results
            .iter()
            .filter(|r| r.confidence >= min_confidence)
            .count();

        AnalysisSummary {
            total,
            buy_count: count_suggestion(Suggestion::Buy),
            sell_count: count_suggestion(Suggestion::Sell),
            hold_count: count_suggestion(Suggestion::Hold),
            bullish_count: count_trend(TrendClassification::Bullish),
            bearish_count: count_trend(TrendClassification::Bearish),
            range_count: count_trend(TrendClassification::Range),
            avg_confidence,
            high_confidence_ratio: high_confidence as f64 / total as f64,
            risk_level: RiskLevel::from_confidence(avg_confidence),
        }
    }
}

/// Results with the given suggestion at or above `min_confidence`, most confident first
pub fn filter_suggestions(
    results: &[AnalysisResult],
    suggestion: Suggestion,
    min_confidence: f64,
) -> Vec<&AnalysisResult> {
    let mut matching: Vec<&AnalysisResult> = results
        .iter()
        .filter(|r| r.suggestion == suggestion && r.confidence >= min_confidence)
        .collect();
    matching.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    matching
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use common::IndicatorSnapshot;

    fn make_result(
        symbol: &str,
        trend: TrendClassification,
        suggestion: Suggestion,
        confidence: f64,
    ) -> AnalysisResult {
        AnalysisResult {
            symbol: symbol.to_string(),
            trend,
            suggestion,
            confidence,
            current_price: 100.0,
            indicators: IndicatorSnapshot {
                ma_5: 100.0,
                ma_20: 100.0,
                rsi: 50.0,
                macd: 0.0,
                price_change: 0.0,
                bollinger: None,
            },
        }
    }

    fn sample() -> Vec<AnalysisResult> {
        vec![
            make_result("A", TrendClassification::Bullish, Suggestion::Buy, 0.7),
            make_result("B", TrendClassification::Bullish, Suggestion::Buy, 0.9),
            make_result("C", TrendClassification::Bearish, Suggestion::Sell, 0.75),
            make_result("D", TrendClassification::Range, Suggestion::Hold, 0.25),
        ]
    }

    #[test]
    fn test_summary_counts() {
        let summary = SummaryCalculator::calculate(&sample(), 0.7);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.buy_count, 2);
        assert_eq!(summary.sell_count, 1);
        assert_eq!(summary.hold_count, 1);
        assert_eq!(summary.bullish_count, 2);
        assert_eq!(summary.range_count, 1);
        assert_relative_eq!(summary.avg_confidence, 0.65, epsilon = 1e-9);
        assert_relative_eq!(summary.high_confidence_ratio, 0.75, epsilon = 1e-9);
        assert_eq!(summary.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_summary_empty() {
        let summary = SummaryCalculator::calculate(&[], 0.7);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.avg_confidence, 0.0);
    }

    #[test]
    fn test_filter_suggestions_sorted() {
        let results = sample();
        let buys = filter_suggestions(&results, Suggestion::Buy, 0.7);

        let symbols: Vec<&str> = buys.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["B", "A"]);

        assert!(filter_suggestions(&results, Suggestion::Hold, 0.7).is_empty());
        assert_eq!(filter_suggestions(&results, Suggestion::Sell, 0.8).len(), 0);
    }
}
