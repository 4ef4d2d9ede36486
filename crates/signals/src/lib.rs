//! # Meridian Signal Library
//!
//! Heuristic classifiers over computed indicators and company fundamentals. Each scorer is
//! an explicitly ordered list of rules, and every rule is a plain function that can be
//! tested on its own.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It depends only on `core-types`,
//!   `configuration` and `indicators`.
//! - **Stateless:** Scorers hold only their rule lists; scoring never mutates them.
//!
//! ## Public API
//!
//! - `TrendScorer`: BULLISH / BEARISH / SIDEWAYS with a confidence from 0 to 100.
//! - `FundamentalsScorer`: An additive 0-100 quality score from valuation, growth,
//!   profitability, leverage and liquidity bands.
//! - `technical_signals`: Buy/sell hints from RSI, MACD and Bollinger Bands.
//! - `Rule`: The ordered-rule building block shared by the scorers.

pub mod error;
pub mod fundamentals;
pub mod rule;
pub mod technical;
pub mod trend;

pub use error::SignalError;
pub use fundamentals::{
    BandRule, FundamentalAssessment, FundamentalMetric, FundamentalScore, FundamentalSnapshot,
    FundamentalsScorer, fundamental_rules,
};
pub use rule::{Rule, RuleOutcome, tally};
pub use technical::{
    SignalAction, SignalStrength, SignalSummary, TechnicalSignal, TechnicalSignals,
    technical_signals,
};
pub use trend::{TrendInputs, TrendLabel, TrendScorer, TrendSignal, trend_rules};
