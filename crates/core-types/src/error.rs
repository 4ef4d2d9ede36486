use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Dates for {symbol} are not strictly increasing at {date}")]
    UnorderedDates { symbol: String, date: NaiveDate },

    #[error("Series are not aligned: {0}")]
    Misaligned(String),
}
