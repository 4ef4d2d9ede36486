use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("No price history found for symbol '{symbol}' at {path}")]
    NotFound { symbol: String, path: PathBuf },

    #[error("Failed to read price history file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse price history: {0}")]
    Parse(#[from] csv::Error),

    #[error("Invalid data format for '{0}': {1}")]
    InvalidData(String, String),

    #[error("Price history is malformed: {0}")]
    Series(#[from] core_types::CoreError),
}
