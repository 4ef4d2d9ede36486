use crate::error::AnalyticsError;
use chrono::{Duration, NaiveDate};
use core_types::{AlignedPair, PriceSeries, ReturnPoint, ReturnSeries};
use serde::{Deserialize, Serialize};

/// A trailing window of whole years, anchored at the most recent date of the inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookbackWindow {
    pub years: u32,
}

impl LookbackWindow {
    pub fn years(years: u32) -> Self {
        Self { years }
    }

    /// Human-readable period, e.g. "5 years".
    pub fn label(&self) -> String {
        match self.years {
            1 => "1 year".to_string(),
            n => format!("{n} years"),
        }
    }

    /// First calendar date inside the window ending at `anchor`. Saturates at
    /// `NaiveDate::MIN` when the window reaches past the calendar.
    pub fn start_for(&self, anchor: NaiveDate) -> NaiveDate {
        anchor
            .checked_sub_signed(Duration::days(365 * i64::from(self.years)))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl Default for LookbackWindow {
    fn default() -> Self {
        Self::years(5)
    }
}

/// Simple daily returns `close[t] / close[t-1] - 1`, dated at `t`.
///
/// Fails with `DegenerateInput` if any close used as a denominator is not positive,
/// and with `InsufficientData` if the series has fewer than two bars.
pub fn simple_returns(series: &PriceSeries) -> Result<ReturnSeries, AnalyticsError> {
    let bars = series.bars();
    let Some(first) = bars.first() else {
        return Err(AnalyticsError::InsufficientData {
            required: 2,
            available: 0,
        });
    };
    if bars.len() < 2 {
        return Err(AnalyticsError::InsufficientData {
            required: 2,
            available: bars.len(),
        });
    }

    let mut points = Vec::with_capacity(bars.len() - 1);
    for pair in bars.windows(2) {
        let previous = pair[0].close_f64();
        if previous <= 0.0 {
            return Err(AnalyticsError::DegenerateInput {
                symbol: series.symbol().to_string(),
                date: pair[0].date,
                close: previous,
            });
        }
        points.push(ReturnPoint {
            date: pair[1].date,
            value: pair[1].close_f64() / previous - 1.0,
        });
    }

    Ok(ReturnSeries::new(series.symbol(), first.date, points)?)
}

/// Turns an asset and a benchmark price history into an [`AlignedPair`].
#[derive(Debug, Clone, Copy)]
pub struct ReturnSeriesBuilder {
    min_observations: usize,
    lookback: LookbackWindow,
}

impl ReturnSeriesBuilder {
    pub fn new(min_observations: usize, lookback: LookbackWindow) -> Self {
        Self {
            min_observations,
            lookback,
        }
    }

    pub fn min_observations(&self) -> usize {
        self.min_observations
    }

    pub fn lookback(&self) -> LookbackWindow {
        self.lookback
    }

    /// Restricts both histories to the lookback window, computes their returns and
    /// keeps only the dates present in both.
    ///
    /// The total returns stored in the pair are measured on the windowed price series.
    pub fn build(
        &self,
        asset: &PriceSeries,
        benchmark: &PriceSeries,
    ) -> Result<AlignedPair, AnalyticsError> {
        if benchmark.is_empty() {
            return Err(AnalyticsError::MissingBenchmark(benchmark.symbol().to_string()));
        }
        let anchor = match (asset.last(), benchmark.last()) {
            (Some(a), Some(b)) => a.date.max(b.date),
            _ => {
                return Err(AnalyticsError::InsufficientData {
                    required: self.min_observations,
                    available: 0,
                });
            }
        };

        let start = self.lookback.start_for(anchor);
        let asset = asset.since(start);
        let benchmark = benchmark.since(start);
        if benchmark.is_empty() {
            return Err(AnalyticsError::MissingBenchmark(benchmark.symbol().to_string()));
        }
        if asset.len() < 2 || benchmark.len() < 2 {
            return Err(AnalyticsError::InsufficientData {
                required: self.min_observations,
                available: 0,
            });
        }

        let asset_returns = simple_returns(&asset)?;
        let benchmark_returns = simple_returns(&benchmark)?;
        let (asset_aligned, benchmark_aligned) = intersect(&asset_returns, &benchmark_returns)?;

        tracing::debug!(
            "Aligned {} ({} returns) with {} ({} returns): {} common dates since {}",
            asset.symbol(),
            asset_returns.len(),
            benchmark.symbol(),
            benchmark_returns.len(),
            asset_aligned.len(),
            start
        );

        if asset_aligned.len() < self.min_observations {
            return Err(AnalyticsError::InsufficientData {
                required: self.min_observations,
                available: asset_aligned.len(),
            });
        }

        let asset_total = total_return(&asset)?;
        let benchmark_total = total_return(&benchmark)?;

        Ok(AlignedPair::new(
            asset_aligned,
            benchmark_aligned,
            asset_total,
            benchmark_total,
        )?)
    }
}

fn total_return(series: &PriceSeries) -> Result<f64, AnalyticsError> {
    series.total_return().ok_or_else(|| {
        let (date, close) = series
            .first()
            .map(|b| (b.date, b.close_f64()))
            .unwrap_or((NaiveDate::MIN, f64::NAN));
        AnalyticsError::DegenerateInput {
            symbol: series.symbol().to_string(),
            date,
            close,
        }
    })
}

/// Merge-walks two date-sorted return series and keeps the common dates.
///
/// Each output keeps its own base date: the date preceding its first kept return.
fn intersect(
    left: &ReturnSeries,
    right: &ReturnSeries,
) -> Result<(ReturnSeries, ReturnSeries), AnalyticsError> {
    let (lp, rp) = (left.points(), right.points());
    let mut kept_left = Vec::new();
    let mut kept_right = Vec::new();
    let mut first_match: Option<(usize, usize)> = None;
    let (mut i, mut j) = (0, 0);

    while i < lp.len() && j < rp.len() {
        match lp[i].date.cmp(&rp[j].date) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                first_match.get_or_insert((i, j));
                kept_left.push(lp[i]);
                kept_right.push(rp[j]);
                i += 1;
                j += 1;
            }
        }
    }

    let base = |series: &ReturnSeries, index: usize| {
        if index == 0 {
            series.base_date()
        } else {
            series.points()[index - 1].date
        }
    };
    let (left_base, right_base) = match first_match {
        Some((i, j)) => (base(left, i), base(right, j)),
        None => (left.base_date(), right.base_date()),
    };

    Ok((
        ReturnSeries::new(left.symbol(), left_base, kept_left)?,
        ReturnSeries::new(right.symbol(), right_base, kept_right)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn series(symbol: &str, closes: &[(u32, Decimal)]) -> PriceSeries {
        let closes: Vec<_> = closes.iter().map(|&(d, c)| (day(d), c)).collect();
        PriceSeries::from_closes(symbol, &closes).unwrap()
    }

    #[test]
    fn test_simple_returns_have_one_fewer_point() {
        let prices = series("AAA", &[(1, dec!(100)), (4, dec!(110)), (5, dec!(99))]);
        let returns = simple_returns(&prices).unwrap();

        assert_eq!(returns.len(), 2);
        assert_eq!(returns.base_date(), day(1));
        assert_eq!(returns.dates(), vec![day(4), day(5)]);
        assert_abs_diff_eq!(returns.values()[0], 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(returns.values()[1], -0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_close_is_degenerate() {
        let prices = series("AAA", &[(1, dec!(100)), (2, dec!(0)), (3, dec!(5))]);
        assert!(matches!(
            simple_returns(&prices),
            Err(AnalyticsError::DegenerateInput { date, .. }) if date == day(2)
        ));
    }

    #[test]
    fn test_build_keeps_only_common_dates() {
        let asset = series(
            "AAA",
            &[(1, dec!(10)), (2, dec!(11)), (3, dec!(12)), (5, dec!(13)), (6, dec!(14))],
        );
        let benchmark = series(
            "IDX",
            &[(1, dec!(100)), (2, dec!(101)), (4, dec!(102)), (5, dec!(103)), (6, dec!(104))],
        );

        let pair = ReturnSeriesBuilder::new(2, LookbackWindow::years(1))
            .build(&asset, &benchmark)
            .unwrap();

        assert_eq!(pair.len(), 3);
        assert_eq!(pair.asset().dates(), vec![day(2), day(5), day(6)]);
        assert_eq!(pair.benchmark().dates(), pair.asset().dates());
        assert_eq!(pair.asset().base_date(), day(1));
        assert_abs_diff_eq!(pair.asset_total_return(), 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(pair.benchmark_total_return(), 0.04, epsilon = 1e-12);
    }

    #[test]
    fn test_build_is_deterministic() {
        let asset = series("AAA", &[(1, dec!(10)), (2, dec!(11)), (3, dec!(10.5))]);
        let benchmark = series("IDX", &[(1, dec!(50)), (2, dec!(51)), (3, dec!(52))]);
        let builder = ReturnSeriesBuilder::new(2, LookbackWindow::default());

        assert_eq!(
            builder.build(&asset, &benchmark).unwrap(),
            builder.build(&asset, &benchmark).unwrap()
        );
    }

    #[test]
    fn test_build_reports_insufficient_overlap() {
        let asset = series("AAA", &[(1, dec!(10)), (2, dec!(11)), (3, dec!(12))]);
        let benchmark = series("IDX", &[(1, dec!(100)), (2, dec!(101)), (3, dec!(102))]);

        let builder = ReturnSeriesBuilder::new(50, LookbackWindow::default());
        let result = builder.build(&asset, &benchmark);
        assert_eq!(
            result,
            Err(AnalyticsError::InsufficientData {
                required: 50,
                available: 2
            })
        );
    }

    #[test]
    fn test_empty_benchmark_is_missing() {
        let asset = series("AAA", &[(1, dec!(10)), (2, dec!(11))]);
        let benchmark = PriceSeries::new("IDX", Vec::new()).unwrap();

        let builder = ReturnSeriesBuilder::new(1, LookbackWindow::default());
        let result = builder.build(&asset, &benchmark);
        assert_eq!(result, Err(AnalyticsError::MissingBenchmark("IDX".to_string())));
    }

    #[test]
    fn test_lookback_trims_old_history() {
        let old = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        let mut closes = vec![(old, dec!(1))];
        closes.extend([(day(1), dec!(10)), (day(2), dec!(11)), (day(3), dec!(12))]);
        let asset = PriceSeries::from_closes("AAA", &closes).unwrap();
        let benchmark = PriceSeries::from_closes("IDX", &closes).unwrap();

        let pair = ReturnSeriesBuilder::new(2, LookbackWindow::years(1))
            .build(&asset, &benchmark)
            .unwrap();
        assert_eq!(pair.len(), 2);
        assert_abs_diff_eq!(pair.asset_total_return(), 0.2, epsilon = 1e-12);
        assert_eq!(LookbackWindow::years(1).label(), "1 year");
        assert_eq!(LookbackWindow::years(3).label(), "3 years");
    }

    #[test]
    fn test_oversized_lookback_keeps_full_history() {
        let asset = series("AAA", &[(1, dec!(10)), (2, dec!(11)), (3, dec!(12))]);
        let benchmark = series("IDX", &[(1, dec!(100)), (2, dec!(101)), (3, dec!(102))]);

        let window = LookbackWindow::years(300_000);
        assert_eq!(window.start_for(day(3)), NaiveDate::MIN);

        let pair = ReturnSeriesBuilder::new(2, window).build(&asset, &benchmark).unwrap();
        assert_eq!(pair.len(), 2);
        assert_abs_diff_eq!(pair.asset_total_return(), 0.2, epsilon = 1e-12);
    }
}
