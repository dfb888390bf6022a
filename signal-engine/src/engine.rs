use common::{
    AnalysisError, AnalysisParameters, AnalysisRecord, AnalysisResult, PriceSeries, Result,
};
use rayon::prelude::*;
use tracing::{error, info};

use crate::data::RawRecord;
use crate::indicators::calculate_snapshot;
use crate::normalizer::PriceSeriesNormalizer;
use crate::signals::{ConfidenceScorer, SuggestionEngine, TradePlanner, TrendClassifier};

/// Single-snapshot technical analysis engine.
///
/// Holds only configuration; every call works on its own series, so one
/// engine can be shared across threads.
#[derive(Debug, Clone)]
pub struct AnalysisEngine {
    params: AnalysisParameters,
    classifier: TrendClassifier,
    suggestions: SuggestionEngine,
    scorer: ConfidenceScorer,
    planner: TradePlanner,
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new(AnalysisParameters::default())
    }
}

impl AnalysisEngine {
    pub fn new(params: AnalysisParameters) -> Self {
        Self {
            classifier: TrendClassifier::new(&params),
            suggestions: SuggestionEngine::new(&params),
            scorer: ConfidenceScorer::new(&params),
            planner: TradePlanner::new(&params.trading),
            params,
        }
    }

    pub fn params(&self) -> &AnalysisParameters {
        &self.params
    }

    /// Analyse raw rows for one symbol
    pub fn analyze(&self, symbol: &str, records: &[RawRecord]) -> Result<AnalysisResult> {
        let outcome = PriceSeriesNormalizer::extract_min(symbol, records, self.params.min_points)
            .and_then(|series| self.analyze_series(&series));

        if let Err(e) = &outcome {
            error!(symbol, error = %e, "analysis failed");
        }
        outcome
    }

    /// Analyse an already validated series
    pub fn analyze_series(&self, series: &PriceSeries) -> Result<AnalysisResult> {
        series.require_len(self.params.min_points)?;

        let current_price = series
            .last()
            .map(|p| p.close)
            .ok_or_else(|| AnalysisError::NoData {
                symbol: series.symbol().to_string(),
            })?;

        let closes = series.closes();
        let indicators = calculate_snapshot(&closes);
        if !indicators.is_finite() {
            return Err(AnalysisError::ComputationError(format!(
                "non-finite indicator value for {}: {:?}",
                series.symbol(),
                indicators
            )));
        }

        let trend = self.classifier.classify(&indicators, current_price);
        let suggestion = self.suggestions.suggest(trend, indicators.rsi);
        let confidence = self.scorer.score(trend, &indicators);

        info!(
            symbol = series.symbol(),
            points = series.len(),
            %trend,
            %suggestion,
            confidence,
            "analysis completed"
        );

        Ok(AnalysisResult {
            symbol: series.symbol().to_string(),
            trend,
            suggestion,
            confidence,
            current_price,
            indicators,
        })
    }

    /// Analyse many symbols in parallel, one outcome per input in input order
    pub fn analyze_many(
        &self,
        inputs: &[(String, Vec<RawRecord>)],
    ) -> Vec<(String, Result<AnalysisResult>)> {
        inputs
            .par_iter()
            .map(|(symbol, records)| (symbol.clone(), self.analyze(symbol, records)))
            .collect()
    }

    /// Storage row for a result, with a trade plan for buy/sell
    pub fn to_record(&self, result: &AnalysisResult) -> AnalysisRecord {
        AnalysisRecord::new(result, self.planner.plan_for(result))
    }
}
