use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A daily bar exactly as a history provider delivered it.
///
/// Any field except the date may be missing. Bars without a close are dropped when
/// the raw history is turned into a [`PriceSeries`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub close: Option<Decimal>,
    pub volume: Option<Decimal>,
}

/// A single validated daily OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

impl PriceBar {
    /// A bar whose open, high and low all equal the close. Handy for close-only data.
    pub fn from_close(date: NaiveDate, close: Decimal) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: Decimal::ZERO,
        }
    }

    /// The close as `f64`, the representation all statistical code works in.
    pub fn close_f64(&self) -> f64 {
        self.close.to_f64().unwrap_or(f64::NAN)
    }
}

/// An ordered daily price history for one symbol.
///
/// Invariant: dates are strictly increasing, so there are no duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Builds a series, rejecting out-of-order or duplicated dates.
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, CoreError> {
        let symbol = symbol.into();
        if let Some(pair) = bars.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(CoreError::UnorderedDates {
                symbol,
                date: pair[1].date,
            });
        }
        Ok(Self { symbol, bars })
    }

    /// Builds a series from raw provider rows, dropping rows with a missing close.
    ///
    /// Missing open/high/low fall back to the close and a missing volume to zero.
    pub fn from_raw(symbol: impl Into<String>, raw: Vec<RawBar>) -> Result<Self, CoreError> {
        let symbol = symbol.into();
        let total = raw.len();
        let bars: Vec<PriceBar> = raw
            .into_iter()
            .filter_map(|row| {
                let close = row.close?;
                Some(PriceBar {
                    date: row.date,
                    open: row.open.unwrap_or(close),
                    high: row.high.unwrap_or(close),
                    low: row.low.unwrap_or(close),
                    close,
                    volume: row.volume.unwrap_or(Decimal::ZERO),
                })
            })
            .collect();

        if bars.len() < total {
            tracing::debug!(
                "{}: dropped {} of {} rows with a missing close",
                symbol,
                total - bars.len(),
                total
            );
        }
        Self::new(symbol, bars)
    }

    /// Builds a close-only series. Used heavily by tests and by close-only providers.
    pub fn from_closes(
        symbol: impl Into<String>,
        closes: &[(NaiveDate, Decimal)],
    ) -> Result<Self, CoreError> {
        let bars = closes
            .iter()
            .map(|&(date, close)| PriceBar::from_close(date, close))
            .collect();
        Self::new(symbol, bars)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(PriceBar::close_f64).collect()
    }

    /// Restricts the series to bars dated on or after `start`.
    pub fn since(&self, start: NaiveDate) -> Self {
        Self {
            symbol: self.symbol.clone(),
            bars: self.bars.iter().filter(|b| b.date >= start).cloned().collect(),
        }
    }

    /// `last_close / first_close - 1`, or `None` when the series cannot produce one.
    pub fn total_return(&self) -> Option<f64> {
        let first = self.first()?.close_f64();
        let last = self.last()?.close_f64();
        if first == 0.0 || !first.is_finite() || !last.is_finite() {
            return None;
        }
        Some(last / first - 1.0)
    }
}

/// One simple return, dated by the later of the two closes it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Simple daily returns for one symbol.
///
/// `base_date` is the date of the close the first return was measured against; it is
/// the origin (wealth = 1) of any cumulative curve built from the series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    symbol: String,
    base_date: NaiveDate,
    points: Vec<ReturnPoint>,
}

impl ReturnSeries {
    pub fn new(
        symbol: impl Into<String>,
        base_date: NaiveDate,
        points: Vec<ReturnPoint>,
    ) -> Result<Self, CoreError> {
        let symbol = symbol.into();
        let mut previous = base_date;
        for point in &points {
            if point.date <= previous {
                return Err(CoreError::UnorderedDates {
                    symbol,
                    date: point.date,
                });
            }
            previous = point.date;
        }
        Ok(Self {
            symbol,
            base_date,
            points,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn base_date(&self) -> NaiveDate {
        self.base_date
    }

    pub fn points(&self) -> &[ReturnPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }
}

/// Asset and benchmark returns restricted to their common dates.
///
/// Both series have the same length and the same date at every index. The total
/// returns are measured on the underlying price series, not compounded from the
/// aligned returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedPair {
    asset: ReturnSeries,
    benchmark: ReturnSeries,
    asset_total_return: f64,
    benchmark_total_return: f64,
}

impl AlignedPair {
    pub fn new(
        asset: ReturnSeries,
        benchmark: ReturnSeries,
        asset_total_return: f64,
        benchmark_total_return: f64,
    ) -> Result<Self, CoreError> {
        if asset.len() != benchmark.len() {
            return Err(CoreError::Misaligned(format!(
                "{} has {} returns but {} has {}",
                asset.symbol(),
                asset.len(),
                benchmark.symbol(),
                benchmark.len()
            )));
        }
        if let Some((a, _)) = asset
            .points()
            .iter()
            .zip(benchmark.points())
            .find(|(a, b)| a.date != b.date)
        {
            return Err(CoreError::Misaligned(format!(
                "date {} has no matching benchmark return",
                a.date
            )));
        }
        Ok(Self {
            asset,
            benchmark,
            asset_total_return,
            benchmark_total_return,
        })
    }

    pub fn asset(&self) -> &ReturnSeries {
        &self.asset
    }

    pub fn benchmark(&self) -> &ReturnSeries {
        &self.benchmark
    }

    pub fn asset_total_return(&self) -> f64 {
        self.asset_total_return
    }

    pub fn benchmark_total_return(&self) -> f64 {
        self.benchmark_total_return
    }

    /// Number of matched observations.
    pub fn len(&self) -> usize {
        self.asset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asset.is_empty()
    }
}
