pub mod enums;
pub mod error;
pub mod series;

// Re-export the core types to provide a clean public API.
pub use enums::MarketSide;
pub use error::CoreError;
pub use series::{AlignedPair, PriceBar, PriceSeries, RawBar, ReturnPoint, ReturnSeries};
