pub mod config;
pub mod error;
pub mod types;

pub use config::{AnalysisParameters, TradingParameters};
pub use error::{AnalysisError, Result};
pub use types::*;
