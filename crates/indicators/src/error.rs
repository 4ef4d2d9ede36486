use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Invalid period {period} for {indicator}: must be at least {minimum}")]
    InvalidPeriod {
        indicator: &'static str,
        period: usize,
        minimum: usize,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Rejects periods below `minimum`.
pub(crate) fn check_period(
    indicator: &'static str,
    period: usize,
    minimum: usize,
) -> Result<(), IndicatorError> {
    if period < minimum {
        return Err(IndicatorError::InvalidPeriod {
            indicator,
            period,
            minimum,
        });
    }
    Ok(())
}
