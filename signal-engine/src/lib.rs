pub mod batch;
pub mod data;
pub mod engine;
pub mod indicators;
pub mod normalizer;
pub mod signals;
pub mod summary;

pub use batch::{pivot, BatchIndexComputer, IndicatorColumn, IndicatorRow, IndicatorTable};
pub use data::{
    generate_synthetic_records, generate_trending_records, load_file, RawRecord, RawValue,
};
pub use engine::AnalysisEngine;
pub use normalizer::{PriceField, PriceSeriesNormalizer};
pub use signals::{ConfidenceScorer, SuggestionEngine, TradePlanner, TrendClassifier};
pub use summary::{filter_suggestions, SummaryCalculator};

// Re-export common types
pub use common::{
    AnalysisError, AnalysisParameters, AnalysisRecord, AnalysisResult, AnalysisSummary,
    BollingerBand, IndicatorRecord, IndicatorSnapshot, PricePoint, PriceSeries, Result, RiskLevel,
    Suggestion, TradePlan, TradingParameters, TrendClassification,
};
