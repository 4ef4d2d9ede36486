use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalError {
    #[error("Scorer received invalid parameters: {0}")]
    InvalidParameters(String),
}
