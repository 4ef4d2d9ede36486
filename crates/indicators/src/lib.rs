//! # Meridian Technical Indicators
//!
//! Pure per-bar transforms of a single price series: RSI, MACD, Bollinger Bands, simple
//! and exponential moving averages. No benchmark is involved.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** No I/O. Depends only on `core-types` and `configuration`.
//! - **One Window:** Every windowed indicator is built on `rolling::RollingWindow`.
//! - **Short Is Not Wrong:** An indicator that needs more history than the series holds
//!   yields `None` rows. Only invalid parameters are errors.
//!
//! ## Public API
//!
//! - `IndicatorFrame`: The series plus one column per indicator.
//! - `IndicatorSnapshot`: One row of the frame, e.g. the latest bar.
//! - `sma`, `ema`, `rsi`, `macd`, `bollinger`: The individual transforms.
//! - `IndicatorError`: The specific error types that can be returned from this crate.

pub mod bollinger;
pub mod error;
pub mod frame;
pub mod macd;
pub mod moving_average;
pub mod rolling;
pub mod rsi;

pub use bollinger::{BollingerBands, bollinger};
pub use error::IndicatorError;
pub use frame::{IndicatorFrame, IndicatorSnapshot};
pub use macd::{Crossover, Macd, crossover_at, macd};
pub use moving_average::{ema, sma};
pub use rolling::RollingWindow;
pub use rsi::rsi;
