pub mod confidence;
pub mod plan;
pub mod suggestion;
pub mod trend;

pub use confidence::ConfidenceScorer;
pub use plan::TradePlanner;
pub use suggestion::SuggestionEngine;
pub use trend::{TrendClassifier, TrendVotes};
