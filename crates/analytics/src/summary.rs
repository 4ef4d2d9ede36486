use crate::stats;
use chrono::NaiveDate;
use core_types::PriceSeries;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Headline figures of a price history, as shown above the detailed metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub symbol: String,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub first_close: Decimal,
    pub last_close: Decimal,
    pub min_close: Decimal,
    pub max_close: Decimal,
    pub total_variation_pct: f64,
    /// Change of the last bar against the one before it.
    pub last_day_variation_pct: Option<f64>,
    /// Sample standard deviation of daily returns, in percent.
    pub daily_volatility_pct: Option<f64>,
}

impl PriceSummary {
    /// `None` for an empty series.
    pub fn from_series(series: &PriceSeries) -> Option<Self> {
        let first = series.first()?;
        let last = series.last()?;
        let closes = series.closes();

        let min_close = series.bars().iter().map(|b| b.close).min()?;
        let max_close = series.bars().iter().map(|b| b.close).max()?;

        let change_pct = |from: f64, to: f64| (from != 0.0).then(|| (to / from - 1.0) * 100.0);

        let returns: Vec<f64> = closes
            .windows(2)
            .filter(|w| w[0] != 0.0)
            .map(|w| w[1] / w[0] - 1.0)
            .collect();
        let daily_volatility_pct =
            (returns.len() >= 2).then(|| stats::sample_std_dev(&returns) * 100.0);

        let last_day_variation_pct = match closes.as_slice() {
            [.., previous, latest] => change_pct(*previous, *latest),
            _ => None,
        };

        Some(Self {
            symbol: series.symbol().to_string(),
            first_date: first.date,
            last_date: last.date,
            first_close: first.close,
            last_close: last.close,
            min_close,
            max_close,
            total_variation_pct: change_pct(first.close_f64(), last.close_f64()).unwrap_or(0.0),
            last_day_variation_pct,
            daily_volatility_pct,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_summary_of_short_series() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 2, d).unwrap();
        let series = PriceSeries::from_closes(
            "AAA",
            &[(day(1), dec!(50)), (day(2), dec!(40)), (day(5), dec!(60)), (day(6), dec!(66))],
        )
        .unwrap();

        let summary = PriceSummary::from_series(&series).unwrap();
        assert_eq!(summary.min_close, dec!(40));
        assert_eq!(summary.max_close, dec!(66));
        assert_abs_diff_eq!(summary.total_variation_pct, 32.0, epsilon = 1e-9);
        assert_abs_diff_eq!(summary.last_day_variation_pct.unwrap(), 10.0, epsilon = 1e-9);
        assert!(summary.daily_volatility_pct.unwrap() > 0.0);

        let empty = PriceSeries::new("AAA", Vec::new()).unwrap();
        assert!(PriceSummary::from_series(&empty).is_none());
    }
}
