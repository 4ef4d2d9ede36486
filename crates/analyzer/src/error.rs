use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyzerError {
    #[error("No reports to compare")]
    NoReports,

    #[error("An internal calculation error occurred: {0}")]
    Calculation(String),
}
