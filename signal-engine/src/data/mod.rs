pub mod loader;
pub mod record;
pub mod synthetic;

pub use loader::{load_csv, load_json, read_csv, read_json};
pub use record::{RawRecord, RawValue};
pub use synthetic::{generate_synthetic_records, generate_trending_records};

use std::path::Path;

use common::{AnalysisError, Result};

/// Load raw records from file, detecting format from extension
pub fn load_file(path: &Path) -> Result<Vec<RawRecord>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        _ => Err(AnalysisError::DataLoadError(format!(
            "Unsupported file format: {}",
            ext
        ))),
    }
}
