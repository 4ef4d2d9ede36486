use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Not enough data: {available} common observations, at least {required} required")]
    InsufficientData { required: usize, available: usize },

    #[error("Degenerate input for '{symbol}': non-positive close {close} on {date}")]
    DegenerateInput {
        symbol: String,
        date: chrono::NaiveDate,
        close: f64,
    },

    #[error("Benchmark series '{0}' is empty")]
    MissingBenchmark(String),

    #[error("Invalid series: {0}")]
    Series(#[from] CoreError),
}
