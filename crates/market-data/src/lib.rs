//! # Meridian Market Data
//!
//! The adapters that feed price history into the analytics crates. The analytics code
//! never performs I/O itself; the host fetches everything through these traits first.
//!
//! ## Public API
//!
//! - `PriceHistoryProvider`: returns daily OHLCV for a symbol over a date range.
//! - `BenchmarkResolver`: decides which index a symbol is measured against.
//! - `CsvHistoryProvider`: a provider backed by one CSV file per symbol.

use chrono::NaiveDate;
use core_types::PriceSeries;
use std::collections::HashMap;

pub mod csv_provider;
pub mod error;

pub use csv_provider::CsvHistoryProvider;
pub use error::DataError;

/// The abstract interface for anything that can supply daily price history.
///
/// Implementations return bars dated within `[from, to]`, oldest first, with rows
/// lacking a close already dropped.
pub trait PriceHistoryProvider {
    fn fetch_history(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<PriceSeries, DataError>;
}

/// Maps an asset to the index it should be compared with.
pub trait BenchmarkResolver {
    fn benchmark_symbol(&self, asset: &str) -> String;

    /// Fetches the benchmark history for `asset` through the given provider.
    fn fetch_benchmark(
        &self,
        provider: &dyn PriceHistoryProvider,
        asset: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let symbol = self.benchmark_symbol(asset);
        tracing::debug!("Resolved benchmark {} for {}", symbol, asset);
        provider.fetch_history(&symbol, from, to)
    }
}

/// Every asset is measured against the same index.
#[derive(Debug, Clone)]
pub struct FixedBenchmark {
    symbol: String,
}

impl FixedBenchmark {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }
}

impl BenchmarkResolver for FixedBenchmark {
    fn benchmark_symbol(&self, _asset: &str) -> String {
        self.symbol.clone()
    }
}

/// Per-symbol overrides on top of a default index, e.g. a Mexican listing measured
/// against the IPC instead of the S&P 500.
#[derive(Debug, Clone)]
pub struct MappedBenchmark {
    default: String,
    overrides: HashMap<String, String>,
}

impl MappedBenchmark {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            overrides: HashMap::new(),
        }
    }

    pub fn with_override(mut self, asset: impl Into<String>, benchmark: impl Into<String>) -> Self {
        self.overrides.insert(asset.into(), benchmark.into());
        self
    }
}

impl BenchmarkResolver for MappedBenchmark {
    fn benchmark_symbol(&self, asset: &str) -> String {
        self.overrides
            .get(asset)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapped_benchmark_falls_back_to_default() {
        let resolver = MappedBenchmark::new("^GSPC").with_override("WALMEX.MX", "^MXX");
        assert_eq!(resolver.benchmark_symbol("WALMEX.MX"), "^MXX");
        assert_eq!(resolver.benchmark_symbol("AAPL"), "^GSPC");
        assert_eq!(FixedBenchmark::new("^IXIC").benchmark_symbol("AAPL"), "^IXIC");
    }
}
