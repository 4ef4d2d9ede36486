//! # Meridian Analyzer
//!
//! Cross-symbol comparison. Everything here is an explicit reduction over a slice of
//! `MetricsReport`s produced by the analytics engine; nothing is fetched or cached.
//!
//! ## Public API
//!
//! - `ComparisonSummary`: Best performer, best Sharpe, lowest volatility and shallowest
//!   drawdown of a set of reports.
//! - `Analyzer`: Filters, normalizes and ranks reports with configurable weights.
//! - `AnalyzerError`: The specific error types that can be returned from this crate.

use crate::error::AnalyzerError;
use analytics::MetricsReport;
use configuration::RankingSettings;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub mod error;

/// The symbol that won a reduction, and the value it won with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leader {
    pub symbol: String,
    pub value: f64,
}

/// Headline comparisons across a set of reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub best_performer: Option<Leader>,
    /// Best performer's total return minus its benchmark's.
    pub excess_over_benchmark: Option<f64>,
    pub best_sharpe: Option<Leader>,
    pub lowest_volatility: Option<Leader>,
    pub shallowest_drawdown: Option<Leader>,
}

impl ComparisonSummary {
    pub fn from_reports(reports: &[MetricsReport]) -> Self {
        let best = best_performer(reports);
        Self {
            excess_over_benchmark: best.map(|r| r.total_return - r.benchmark_total_return),
            best_performer: best.map(|r| leader(r, r.total_return)),
            best_sharpe: best_sharpe(reports)
                .and_then(|r| r.sharpe_ratio.value().map(|v| leader(r, v))),
            lowest_volatility: lowest_volatility(reports).map(|r| leader(r, r.volatility_annual)),
            shallowest_drawdown: shallowest_drawdown(reports).map(|r| leader(r, r.max_drawdown)),
        }
    }
}

fn leader(report: &MetricsReport, value: f64) -> Leader {
    Leader {
        symbol: report.symbol.clone(),
        value,
    }
}

fn max_by<F>(reports: &[MetricsReport], key: F) -> Option<&MetricsReport>
where
    F: Fn(&MetricsReport) -> Option<f64>,
{
    reports
        .iter()
        .filter_map(|r| key(r).filter(|v| v.is_finite()).map(|v| (r, v)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(r, _)| r)
}

/// Highest total return.
pub fn best_performer(reports: &[MetricsReport]) -> Option<&MetricsReport> {
    max_by(reports, |r| Some(r.total_return))
}

/// Highest Sharpe ratio among reports where it is defined.
pub fn best_sharpe(reports: &[MetricsReport]) -> Option<&MetricsReport> {
    max_by(reports, |r| r.sharpe_ratio.value())
}

pub fn lowest_volatility(reports: &[MetricsReport]) -> Option<&MetricsReport> {
    max_by(reports, |r| Some(-r.volatility_annual))
}

/// Max drawdown closest to zero.
pub fn shallowest_drawdown(reports: &[MetricsReport]) -> Option<&MetricsReport> {
    max_by(reports, |r| Some(r.max_drawdown))
}

/// A report with its weighted ranking score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedReport {
    pub score: f64,
    pub report: MetricsReport,
}

/// The ranking engine.
pub struct Analyzer {
    config: RankingSettings,
}

impl Analyzer {
    pub fn new(config: RankingSettings) -> Self {
        Self { config }
    }

    /// Filters, scores and ranks reports, best first.
    pub fn rank(&self, reports: Vec<MetricsReport>) -> Result<Vec<RankedReport>, AnalyzerError> {
        if reports.is_empty() {
            return Err(AnalyzerError::NoReports);
        }

        // 1. Filter
        let total = reports.len();
        let filtered = self.filter_reports(reports)?;
        if filtered.len() < total {
            tracing::info!("{} of {} reports removed by filters", total - filtered.len(), total);
        }
        if filtered.is_empty() {
            return Ok(vec![]);
        }

        // 2. Score
        let mut ranked = self.score_reports(filtered)?;

        // 3. Rank
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        Ok(ranked)
    }

    /// Applies hard filters to remove unacceptable reports.
    fn filter_reports(
        &self,
        reports: Vec<MetricsReport>,
    ) -> Result<Vec<MetricsReport>, AnalyzerError> {
        let filters = &self.config.filters;
        let max_drawdown = to_f64(filters.max_drawdown, "max_drawdown")?;
        Ok(reports
            .into_iter()
            .filter(|r| {
                let passes_days = r.days_analyzed >= filters.min_days_analyzed;
                let passes_drawdown = r.max_drawdown.abs() <= max_drawdown;
                passes_days && passes_drawdown
            })
            .collect())
    }

    /// Normalizes and applies the weighted scoring function to each report.
    fn score_reports(
        &self,
        reports: Vec<MetricsReport>,
    ) -> Result<Vec<RankedReport>, AnalyzerError> {
        let w = &self.config.weights;
        let weight_sharpe = to_f64(w.weight_sharpe, "weight_sharpe")?;
        let weight_sortino = to_f64(w.weight_sortino, "weight_sortino")?;
        let weight_drawdown = to_f64(w.weight_drawdown, "weight_drawdown")?;

        let (min_sh, max_sh) = find_min_max(&reports, |r| r.sharpe_ratio.value());
        let (min_so, max_so) = find_min_max(&reports, |r| r.sortino_ratio.value());
        let (min_dd, max_dd) = find_min_max(&reports, |r| Some(r.max_drawdown));

        Ok(reports
            .into_iter()
            .map(|r| {
                let neutral = MetricsReport::NEUTRAL_RATIO;
                let norm_sh = normalize(r.sharpe_ratio.or(neutral), min_sh, max_sh);
                let norm_so = normalize(r.sortino_ratio.or(neutral), min_so, max_so);
                let norm_dd = normalize(r.max_drawdown, min_dd, max_dd);

                let score =
                    norm_sh * weight_sharpe + norm_so * weight_sortino + norm_dd * weight_drawdown;
                RankedReport { score, report: r }
            })
            .collect())
    }
}

fn to_f64(value: Decimal, name: &str) -> Result<f64, AnalyzerError> {
    value
        .to_f64()
        .ok_or_else(|| AnalyzerError::Calculation(format!("{name} = {value} is not representable")))
}

/// Min and max of a metric over the reports where it is defined.
fn find_min_max<F>(reports: &[MetricsReport], accessor: F) -> (f64, f64)
where
    F: Fn(&MetricsReport) -> Option<f64>,
{
    reports
        .iter()
        .filter_map(accessor)
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), val| {
            (min.min(val), max.max(val))
        })
}

/// Normalizes a value to a 0.0-1.0 scale, clamping values outside `[min, max]`.
fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if !(max > min) {
        return 1.0;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::{MetricValue, UndefinedReason};
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;
    use configuration::{Filters, Weights};
    use rust_decimal_macros::dec;

    fn report(symbol: &str, total_return: f64, sharpe: f64, vol: f64, dd: f64) -> MetricsReport {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        MetricsReport {
            symbol: symbol.to_string(),
            benchmark: "^GSPC".to_string(),
            period_label: "1 year".to_string(),
            days_analyzed: 250,
            start_date: date,
            end_date: date,
            total_return,
            benchmark_total_return: 0.10,
            mean_daily_return: total_return / 250.0,
            beta: MetricValue::Value(1.0),
            alpha: MetricValue::Value(total_return - 0.10),
            correlation: MetricValue::Value(0.8),
            tracking_error: 0.05,
            information_ratio: MetricValue::Value(0.5),
            r_squared: MetricValue::Value(0.64),
            capm_expected_return: 0.08,
            sharpe_ratio: MetricValue::Value(sharpe),
            sortino_ratio: MetricValue::Value(sharpe * 1.5),
            treynor_ratio: MetricValue::Value(0.1),
            var_95_daily: -0.02,
            var_95_annual: -0.3,
            var_99_daily: -0.03,
            var_99_annual: -0.45,
            cvar_95_daily: -0.025,
            cvar_95_annual: -0.4,
            max_drawdown: dd,
            max_drawdown_duration_days: 30,
            max_drawdown_peak_date: None,
            max_drawdown_trough_date: None,
            volatility_annual: vol,
            skewness: MetricValue::Value(0.0),
            kurtosis: MetricValue::Value(0.0),
            max_consecutive_gains: 5,
            max_consecutive_losses: 4,
            probability_of_loss_pct: 45.0,
        }
    }

    fn reports() -> Vec<MetricsReport> {
        vec![
            report("AAA", 0.35, 1.2, 0.30, -0.25),
            report("BBB", 0.15, 1.5, 0.18, -0.10),
            report("CCC", -0.05, 0.2, 0.40, -0.45),
        ]
    }

    #[test]
    fn test_comparison_summary() {
        let summary = ComparisonSummary::from_reports(&reports());

        assert_eq!(summary.best_performer.unwrap().symbol, "AAA");
        assert_abs_diff_eq!(summary.excess_over_benchmark.unwrap(), 0.25, epsilon = 1e-12);
        assert_eq!(summary.best_sharpe.unwrap().symbol, "BBB");
        assert_eq!(summary.lowest_volatility.unwrap().symbol, "BBB");
        assert_eq!(summary.shallowest_drawdown.unwrap().symbol, "BBB");

        let empty = ComparisonSummary::from_reports(&[]);
        assert!(empty.best_performer.is_none());
    }

    #[test]
    fn test_undefined_sharpe_is_ignored_by_best_sharpe() {
        let mut list = reports();
        list[1].sharpe_ratio = MetricValue::Undefined(UndefinedReason::ZeroVariance);
        assert_eq!(best_sharpe(&list).unwrap().symbol, "AAA");
    }

    #[test]
    fn test_rank_orders_by_weighted_score() {
        let ranked = Analyzer::new(RankingSettings::default()).rank(reports()).unwrap();

        let order: Vec<&str> = ranked.iter().map(|r| r.report.symbol.as_str()).collect();
        assert_eq!(order, vec!["BBB", "AAA", "CCC"]);
        // BBB is best and CCC worst on every normalized metric.
        assert_abs_diff_eq!(ranked[0].score, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ranked[2].score, 0.0, epsilon = 1e-12);
        // Sharpe and Sortino at 1.0/1.3 of the range, drawdown at 0.20/0.35.
        let expected = (1.0 / 1.3) * 0.7 + (0.20 / 0.35) * 0.3;
        assert_abs_diff_eq!(ranked[1].score, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_filters_remove_short_and_deep_reports() {
        let settings = RankingSettings {
            filters: Filters {
                min_days_analyzed: 100,
                max_drawdown: dec!(0.3),
            },
            weights: Weights::default(),
        };
        let mut list = reports();
        list[1].days_analyzed = 20;

        let ranked = Analyzer::new(settings).rank(list).unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].report.symbol, "AAA");
        assert_abs_diff_eq!(ranked[0].score, 1.0, epsilon = 1e-12);

        assert_eq!(
            Analyzer::new(RankingSettings::default()).rank(vec![]),
            Err(AnalyzerError::NoReports)
        );
    }
}
