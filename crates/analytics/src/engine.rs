use crate::drawdown::DrawdownProfile;
use crate::error::AnalyticsError;
use crate::metric::{MetricValue, UndefinedReason};
use crate::report::MetricsReport;
use crate::returns::{LookbackWindow, ReturnSeriesBuilder};
use crate::stats;
use configuration::AnalysisSettings;
use core_types::{AlignedPair, PriceSeries};
use rust_decimal::prelude::ToPrimitive;

/// Floor used as the downside deviation when a series has no negative returns.
pub const SORTINO_DOWNSIDE_FLOOR: f64 = 0.001;

/// The numeric parameters every metric is computed with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineParams {
    pub risk_free_rate: f64,
    pub market_risk_premium: f64,
    pub trading_days_per_year: u32,
    pub min_observations: usize,
    pub lookback: LookbackWindow,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.02,
            market_risk_premium: 0.06,
            trading_days_per_year: 252,
            min_observations: 50,
            lookback: LookbackWindow::default(),
        }
    }
}

impl EngineParams {
    pub fn from_settings(settings: &AnalysisSettings) -> Self {
        Self {
            risk_free_rate: settings.risk_free_rate.to_f64().unwrap_or(0.0),
            market_risk_premium: settings.market_risk_premium.to_f64().unwrap_or(0.0),
            trading_days_per_year: settings.trading_days_per_year,
            min_observations: settings.min_observations,
            lookback: LookbackWindow::years(settings.lookback_years),
        }
    }
}

/// A stateless calculator for deriving risk and performance metrics from price history.
#[derive(Debug, Default, Clone)]
pub struct AnalyticsEngine {
    params: EngineParams,
}

impl AnalyticsEngine {
    pub fn new(params: EngineParams) -> Self {
        Self { params }
    }

    pub fn return_builder(&self) -> ReturnSeriesBuilder {
        ReturnSeriesBuilder::new(self.params.min_observations, self.params.lookback)
    }

    /// Aligns the two histories and computes every metric over the lookback window.
    pub fn analyze(
        &self,
        asset: &PriceSeries,
        benchmark: &PriceSeries,
    ) -> Result<MetricsReport, AnalyticsError> {
        let pair = self.return_builder().build(asset, benchmark)?;
        self.calculate(&pair)
    }

    /// The main entry point for calculating metrics from an already aligned pair.
    ///
    /// Only fails when the pair is too short for any statistic at all; every
    /// zero-denominator case yields an `Undefined` metric instead.
    pub fn calculate(&self, pair: &AlignedPair) -> Result<MetricsReport, AnalyticsError> {
        if pair.len() < 2 {
            return Err(AnalyticsError::InsufficientData {
                required: 2,
                available: pair.len(),
            });
        }

        let asset = pair.asset().values();
        let benchmark = pair.benchmark().values();
        let periods = f64::from(self.params.trading_days_per_year);
        let annualizer = periods.sqrt();

        let total_return = pair.asset_total_return();
        let benchmark_total_return = pair.benchmark_total_return();

        // --- Benchmark-relative ---
        let beta = self.beta(&asset, &benchmark);
        let neutral_beta = beta.or(MetricsReport::NEUTRAL_BETA);
        let alpha = MetricValue::from_f64(
            total_return - neutral_beta * benchmark_total_return,
            UndefinedReason::ZeroVariance,
        );
        let correlation = match stats::correlation(&asset, &benchmark) {
            Some(c) => MetricValue::Value(c),
            None => MetricValue::Undefined(UndefinedReason::ZeroVariance),
        };
        let r_squared = correlation.map(|c| c * c);
        let capm_expected_return =
            self.params.risk_free_rate + neutral_beta * self.params.market_risk_premium;
        let active: Vec<f64> = asset.iter().zip(&benchmark).map(|(a, b)| a - b).collect();
        let tracking_error = stats::std_dev(&active) * annualizer;
        let information_ratio = MetricValue::ratio(
            total_return - benchmark_total_return,
            tracking_error,
            UndefinedReason::ZeroTrackingError,
        );

        // --- Risk-adjusted ---
        let (sharpe_ratio, sortino_ratio) = self.sharpe_and_sortino(&asset, annualizer);
        let treynor_ratio = MetricValue::ratio(
            total_return - self.params.risk_free_rate,
            neutral_beta,
            UndefinedReason::ZeroBeta,
        );

        // --- Tail risk ---
        let mut sorted = asset.clone();
        sorted.sort_by(f64::total_cmp);
        let var_95 = stats::percentile_of_sorted(&sorted, 5.0);
        let var_99 = stats::percentile_of_sorted(&sorted, 1.0);
        let tail: Vec<f64> = sorted.iter().copied().filter(|r| *r <= var_95).collect();
        let cvar_95 = stats::mean(&tail);

        // --- Drawdown ---
        let drawdown = DrawdownProfile::from_returns(pair.asset());

        // --- Shape and streaks ---
        let (skewness, kurtosis) = match stats::skew_and_excess_kurtosis(&asset) {
            Some((s, k)) => (MetricValue::Value(s), MetricValue::Value(k)),
            None => {
                let reason = if asset.len() < 4 {
                    UndefinedReason::InsufficientObservations
                } else {
                    UndefinedReason::ZeroVariance
                };
                (MetricValue::Undefined(reason), MetricValue::Undefined(reason))
            }
        };
        let (max_consecutive_gains, max_consecutive_losses) = longest_streaks(&asset);
        let losses = asset.iter().filter(|r| **r < 0.0).count();

        let dates = pair.asset().dates();
        let report = MetricsReport {
            symbol: pair.asset().symbol().to_string(),
            benchmark: pair.benchmark().symbol().to_string(),
            period_label: self.params.lookback.label(),
            days_analyzed: pair.len(),
            start_date: dates[0],
            end_date: dates[dates.len() - 1],
            total_return,
            benchmark_total_return,
            mean_daily_return: stats::mean(&asset),
            beta,
            alpha,
            correlation,
            tracking_error,
            information_ratio,
            r_squared,
            capm_expected_return,
            sharpe_ratio,
            sortino_ratio,
            treynor_ratio,
            var_95_daily: var_95,
            var_95_annual: var_95 * annualizer,
            var_99_daily: var_99,
            var_99_annual: var_99 * annualizer,
            cvar_95_daily: cvar_95,
            cvar_95_annual: cvar_95 * annualizer,
            max_drawdown: drawdown.max_drawdown,
            max_drawdown_duration_days: drawdown.duration_days,
            max_drawdown_peak_date: drawdown.peak_date,
            max_drawdown_trough_date: drawdown.trough_date,
            volatility_annual: stats::std_dev(&asset) * annualizer,
            skewness,
            kurtosis,
            max_consecutive_gains,
            max_consecutive_losses,
            probability_of_loss_pct: losses as f64 / asset.len() as f64 * 100.0,
        };

        let undefined = report.undefined_metrics();
        if !undefined.is_empty() {
            tracing::debug!(
                "{} vs {}: undefined metrics {:?}, neutral defaults apply",
                report.symbol,
                report.benchmark,
                undefined
            );
        }
        Ok(report)
    }

    /// `Cov(asset, benchmark) / Var(benchmark)`, both population moments.
    fn beta(&self, asset: &[f64], benchmark: &[f64]) -> MetricValue {
        let variance = stats::variance(benchmark);
        if variance.sqrt() <= stats::EPSILON {
            return MetricValue::Undefined(UndefinedReason::ZeroVariance);
        }
        MetricValue::from_f64(
            stats::covariance(asset, benchmark) / variance,
            UndefinedReason::ZeroVariance,
        )
    }

    /// Sharpe and Sortino over the same daily excess-return series.
    fn sharpe_and_sortino(&self, asset: &[f64], annualizer: f64) -> (MetricValue, MetricValue) {
        let daily_rf = self.params.risk_free_rate / f64::from(self.params.trading_days_per_year);
        let excess: Vec<f64> = asset.iter().map(|r| r - daily_rf).collect();
        let numerator = stats::mean(&excess) * annualizer;

        let sharpe = MetricValue::ratio(
            numerator,
            stats::std_dev(asset),
            UndefinedReason::ZeroVariance,
        );

        let negatives: Vec<f64> = asset.iter().copied().filter(|r| *r < 0.0).collect();
        let downside = if negatives.is_empty() {
            SORTINO_DOWNSIDE_FLOOR
        } else {
            stats::std_dev(&negatives)
        };
        let sortino =
            MetricValue::ratio(numerator, downside, UndefinedReason::ZeroDownsideDeviation);

        (sharpe, sortino)
    }
}

/// Longest runs of strictly positive and strictly negative returns.
///
/// A sign change resets the opposite run; a zero return neither extends nor breaks
/// either run.
pub fn longest_streaks(returns: &[f64]) -> (usize, usize) {
    let (mut gains, mut losses) = (0usize, 0usize);
    let (mut max_gains, mut max_losses) = (0usize, 0usize);
    for &r in returns {
        if r > 0.0 {
            gains += 1;
            losses = 0;
            max_gains = max_gains.max(gains);
        } else if r < 0.0 {
            losses += 1;
            gains = 0;
            max_losses = max_losses.max(losses);
        }
    }
    (max_gains, max_losses)
}
