use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `config.toml`; omitted sections fall back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisSettings,
    pub indicators: IndicatorSettings,
    pub ranking: RankingSettings,
    pub logging: LoggingConfig,
    pub data: DataSettings,
}

/// Parameters for the risk and performance metrics.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// The annual risk-free rate. 0.02 corresponds to 2%.
    pub risk_free_rate: Decimal,
    /// Expected market return over the risk-free rate, used for the CAPM cost of equity.
    pub market_risk_premium: Decimal,
    /// Used for annualizing daily statistics.
    pub trading_days_per_year: u32,
    /// How many years of history to analyze, counted back from the latest bar.
    pub lookback_years: u32,
    /// The minimum number of aligned asset/benchmark returns required for a report.
    pub min_observations: usize,
    /// The benchmark symbol used when a request does not name one.
    pub benchmark: String,
}

/// Periods and thresholds for the technical indicators and the signals built on them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndicatorSettings {
    pub rsi_period: usize,
    pub rsi_oversold: Decimal,
    pub rsi_overbought: Decimal,
    pub macd_fast_period: usize,
    pub macd_slow_period: usize,
    pub macd_signal_period: usize,
    pub bb_period: usize,
    pub bb_std_dev: Decimal,
    /// Simple moving averages added to every frame. The trend scorer reads the first three.
    pub sma_periods: Vec<usize>,
    pub ema_periods: Vec<usize>,
}

/// Configuration for ranking several reports against each other.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RankingSettings {
    /// Hard filters to discard unusable reports before scoring.
    pub filters: Filters,
    /// Weights for the multi-objective scoring function. Must sum to 1.0.
    pub weights: Weights,
}

/// Hard filters to apply to a set of metrics reports.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Filters {
    pub min_days_analyzed: usize,
    /// Reports with a deeper drawdown than this (as a positive fraction) are dropped.
    pub max_drawdown: Decimal,
}

/// Weights for the ranking score.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub weight_sharpe: Decimal,
    pub weight_sortino: Decimal,
    pub weight_drawdown: Decimal,
}

/// Where and how the application writes its logs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive, e.g. "info" or "analytics=debug,info".
    pub level: String,
    pub format: LogFormat,
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Full,
    Compact,
}

/// Location of the price history files read by the CSV provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub directory: PathBuf,
}

// --- Default Implementations ---
// These let a user omit any section from their toml and still get sensible values.

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            risk_free_rate: dec!(0.02),
            market_risk_premium: dec!(0.06),
            trading_days_per_year: 252,
            lookback_years: 5,
            min_observations: 50,
            benchmark: "^GSPC".to_string(),
        }
    }
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            rsi_oversold: dec!(30),
            rsi_overbought: dec!(70),
            macd_fast_period: 12,
            macd_slow_period: 26,
            macd_signal_period: 9,
            bb_period: 20,
            bb_std_dev: dec!(2),
            sma_periods: vec![20, 50, 200],
            ema_periods: vec![12, 26],
        }
    }
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            min_days_analyzed: 50,
            max_drawdown: dec!(0.6),
        }
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            weight_sharpe: dec!(0.4),
            weight_sortino: dec!(0.3),
            weight_drawdown: dec!(0.3),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            directory: None,
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("data"),
        }
    }
}

/// Longest accepted lookback. Daily histories do not reach further back.
pub const MAX_LOOKBACK_YEARS: u32 = 100;

impl Config {
    /// Checks the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), crate::error::ConfigError> {
        use crate::error::ConfigError::ValidationError;

        let analysis = &self.analysis;
        if analysis.trading_days_per_year == 0 {
            return Err(ValidationError("trading_days_per_year must be positive".to_string()));
        }
        if analysis.risk_free_rate <= dec!(-1) || analysis.risk_free_rate >= dec!(1) {
            return Err(ValidationError("risk_free_rate must be between -1 and 1".to_string()));
        }
        if analysis.market_risk_premium < Decimal::ZERO || analysis.market_risk_premium >= dec!(1) {
            return Err(ValidationError(
                "market_risk_premium must be between 0 and 1".to_string(),
            ));
        }
        if analysis.lookback_years == 0 || analysis.lookback_years > MAX_LOOKBACK_YEARS {
            return Err(ValidationError(format!(
                "lookback_years must be between 1 and {MAX_LOOKBACK_YEARS}"
            )));
        }
        if analysis.min_observations < 2 {
            return Err(ValidationError("min_observations must be at least 2".to_string()));
        }

        let ind = &self.indicators;
        let periods = [
            ind.rsi_period,
            ind.macd_fast_period,
            ind.macd_slow_period,
            ind.macd_signal_period,
            ind.bb_period,
        ];
        if periods
            .iter()
            .chain(&ind.sma_periods)
            .chain(&ind.ema_periods)
            .any(|&p| p == 0)
        {
            return Err(ValidationError("Indicator periods cannot be zero".to_string()));
        }
        if ind.macd_fast_period >= ind.macd_slow_period {
            return Err(ValidationError(
                "MACD fast period must be less than the slow period".to_string(),
            ));
        }
        if ind.rsi_oversold >= ind.rsi_overbought {
            return Err(ValidationError(
                "rsi_oversold must be below rsi_overbought".to_string(),
            ));
        }
        if ind.sma_periods.len() < 3 {
            return Err(ValidationError(
                "sma_periods needs the three trend averages (short, medium, long)".to_string(),
            ));
        }

        let w = &self.ranking.weights;
        if w.weight_sharpe + w.weight_sortino + w.weight_drawdown != Decimal::ONE {
            return Err(ValidationError("Ranking weights must sum to 1.0".to_string()));
        }
        Ok(())
    }
}
