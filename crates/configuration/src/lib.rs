use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    AnalysisSettings, Config, DataSettings, Filters, IndicatorSettings, LogFormat, LoggingConfig,
    MAX_LOOKBACK_YEARS, RankingSettings, Weights,
};

/// Environment variables with this prefix override file values,
/// e.g. `MERIDIAN_ANALYSIS__RISK_FREE_RATE=0.04`.
const ENV_PREFIX: &str = "MERIDIAN";

/// Loads the application configuration from an optional `config.toml` in the working
/// directory, layered with `MERIDIAN_*` environment variables.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(environment());
    finish(builder)
}

/// Same as [`load_config`], but reads the given file, which must exist.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(environment());
    finish(builder)
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn finish(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<Config, ConfigError> {
    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.build()?.try_deserialize::<Config>()?;
    config.validate()?;
    tracing::debug!("Loaded configuration: {:?}", config.analysis);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};
    use rust_decimal_macros::dec;

    fn from_toml(toml: &str) -> Result<Config, ConfigError> {
        finish(config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = from_toml("").unwrap();
        assert_eq!(config.analysis.risk_free_rate, dec!(0.02));
        assert_eq!(config.analysis.market_risk_premium, dec!(0.06));
        assert_eq!(config.analysis.trading_days_per_year, 252);
        assert_eq!(config.indicators.sma_periods, vec![20, 50, 200]);
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_partial_section_overrides() {
        let config = from_toml(
            r#"
            [analysis]
            risk_free_rate = 0.045
            min_observations = 100

            [logging]
            level = "debug"
            format = "full"
            "#,
        )
        .unwrap();

        assert_eq!(config.analysis.risk_free_rate, dec!(0.045));
        assert_eq!(config.analysis.min_observations, 100);
        assert_eq!(config.analysis.lookback_years, 5);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Full);
    }

    #[test]
    fn test_rejects_inverted_macd_periods() {
        let result = from_toml(
            r#"
            [indicators]
            macd_fast_period = 26
            macd_slow_period = 12
            "#,
        );
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_rejects_weights_not_summing_to_one() {
        let result = from_toml(
            r#"
            [ranking.weights]
            weight_sharpe = 0.5
            weight_sortino = 0.5
            weight_drawdown = 0.5
            "#,
        );
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_rejects_lookback_outside_bounds() {
        for years in [0, 101, 300_000] {
            let result = from_toml(&format!("[analysis]\nlookback_years = {years}\n"));
            assert!(matches!(result, Err(ConfigError::ValidationError(_))), "{years}");
        }
        let config = from_toml("[analysis]\nlookback_years = 100\n").unwrap();
        assert_eq!(config.analysis.lookback_years, MAX_LOOKBACK_YEARS);
    }

    #[test]
    fn test_rejects_negative_market_risk_premium() {
        let result = from_toml("[analysis]\nmarket_risk_premium = -0.01\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
