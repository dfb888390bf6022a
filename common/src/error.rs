use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No data available for {symbol}")]
    NoData { symbol: String },

    #[error("Insufficient history: need at least {required} points, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },

    #[error("Cannot convert {field} value {value:?} to a number")]
    ConversionFailure { field: String, value: String },

    #[error("Computation error: {0}")]
    ComputationError(String),

    #[error("Invalid price series: {0}")]
    InvalidSeries(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Data loading error: {0}")]
    DataLoadError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    CsvError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl AnalysisError {
    /// Row-level failures are skipped by callers; everything else ends the call.
    pub fn is_row_level(&self) -> bool {
        matches!(self, AnalysisError::ConversionFailure { .. })
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
