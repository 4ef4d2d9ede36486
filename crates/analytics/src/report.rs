use crate::metric::MetricValue;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// All risk and performance metrics for one (symbol, benchmark, lookback) request.
///
/// This struct is the final output of the `AnalyticsEngine`. It is built once and never
/// mutated; ratios that may be undefined carry a [`MetricValue`] so a neutral default
/// can be told apart from a computed zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    // I. Metadata
    pub symbol: String,
    pub benchmark: String,
    pub period_label: String,
    pub days_analyzed: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    // II. Returns
    pub total_return: f64,
    pub benchmark_total_return: f64,
    /// Arithmetic mean of the aligned daily returns.
    pub mean_daily_return: f64,

    // III. Benchmark-relative
    pub beta: MetricValue,
    pub alpha: MetricValue,
    pub correlation: MetricValue,
    pub tracking_error: f64,
    pub information_ratio: MetricValue,
    /// Share of the asset's variance explained by the benchmark: the squared correlation.
    pub r_squared: MetricValue,
    /// CAPM cost of equity, `rf + beta * market_risk_premium`. Uses the neutral beta
    /// when beta is undefined.
    pub capm_expected_return: f64,

    // IV. Risk-adjusted
    pub sharpe_ratio: MetricValue,
    pub sortino_ratio: MetricValue,
    pub treynor_ratio: MetricValue,

    // V. Tail risk
    pub var_95_daily: f64,
    pub var_95_annual: f64,
    pub var_99_daily: f64,
    pub var_99_annual: f64,
    pub cvar_95_daily: f64,
    pub cvar_95_annual: f64,

    // VI. Drawdown and volatility
    pub max_drawdown: f64,
    pub max_drawdown_duration_days: i64,
    pub max_drawdown_peak_date: Option<NaiveDate>,
    pub max_drawdown_trough_date: Option<NaiveDate>,
    pub volatility_annual: f64,

    // VII. Distribution shape and streaks
    /// Population skewness of the daily returns.
    pub skewness: MetricValue,
    /// Population excess kurtosis. [`crate::ReturnDistribution`] reports the
    /// bias-adjusted sample estimators instead.
    pub kurtosis: MetricValue,
    pub max_consecutive_gains: usize,
    pub max_consecutive_losses: usize,
    pub probability_of_loss_pct: f64,
}

impl MetricsReport {
    /// Neutral value substituted for an undefined beta.
    pub const NEUTRAL_BETA: f64 = 1.0;
    /// Neutral value substituted for every other undefined metric.
    pub const NEUTRAL_RATIO: f64 = 0.0;

    fn optional_metrics(&self) -> [(&'static str, MetricValue); 10] {
        [
            ("beta", self.beta),
            ("alpha", self.alpha),
            ("correlation", self.correlation),
            ("r_squared", self.r_squared),
            ("information_ratio", self.information_ratio),
            ("sharpe_ratio", self.sharpe_ratio),
            ("sortino_ratio", self.sortino_ratio),
            ("treynor_ratio", self.treynor_ratio),
            ("skewness", self.skewness),
            ("kurtosis", self.kurtosis),
        ]
    }

    /// A flat metric-name to number mapping, with neutral defaults in place of
    /// undefined metrics.
    pub fn to_flat_map(&self) -> BTreeMap<String, f64> {
        let mut map = BTreeMap::new();
        for (name, metric) in self.optional_metrics() {
            let neutral = if name == "beta" {
                Self::NEUTRAL_BETA
            } else {
                Self::NEUTRAL_RATIO
            };
            map.insert(name.to_string(), metric.or(neutral));
        }

        let plain = [
            ("total_return", self.total_return),
            ("benchmark_total_return", self.benchmark_total_return),
            ("mean_daily_return", self.mean_daily_return),
            ("capm_expected_return", self.capm_expected_return),
            ("tracking_error", self.tracking_error),
            ("var_95_daily", self.var_95_daily),
            ("var_95_annual", self.var_95_annual),
            ("var_99_daily", self.var_99_daily),
            ("var_99_annual", self.var_99_annual),
            ("cvar_95_daily", self.cvar_95_daily),
            ("cvar_95_annual", self.cvar_95_annual),
            ("max_drawdown", self.max_drawdown),
            ("max_drawdown_duration_days", self.max_drawdown_duration_days as f64),
            ("volatility_annual", self.volatility_annual),
            ("max_consecutive_gains", self.max_consecutive_gains as f64),
            ("max_consecutive_losses", self.max_consecutive_losses as f64),
            ("probability_of_loss_pct", self.probability_of_loss_pct),
            ("days_analyzed", self.days_analyzed as f64),
        ];
        map.extend(plain.into_iter().map(|(k, v)| (k.to_string(), v)));
        map
    }

    /// Names of the metrics that could not be computed.
    pub fn undefined_metrics(&self) -> Vec<&'static str> {
        self.optional_metrics()
            .into_iter()
            .filter(|(_, m)| !m.is_defined())
            .map(|(name, _)| name)
            .collect()
    }
}
