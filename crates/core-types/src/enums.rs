use serde::{Deserialize, Serialize};

/// The side of the market a vote, rule or signal argues for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketSide {
    Bullish,
    Bearish,
}
