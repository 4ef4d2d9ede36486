use crate::bollinger::bollinger;
use crate::error::IndicatorError;
use crate::macd::{Crossover, crossover_at, macd};
use crate::moving_average::{ema, sma};
use crate::rsi::rsi;
use chrono::NaiveDate;
use configuration::IndicatorSettings;
use core_types::PriceSeries;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A price series with one column per indicator, one row per trading date.
///
/// Every column has the same length as `dates`. Rows an indicator cannot fill yet
/// (warm-up) hold `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorFrame {
    pub symbol: String,
    pub dates: Vec<NaiveDate>,
    pub close: Vec<f64>,
    pub sma: BTreeMap<usize, Vec<Option<f64>>>,
    pub ema: BTreeMap<usize, Vec<Option<f64>>>,
    pub rsi: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
    pub macd_histogram: Vec<Option<f64>>,
    pub bb_upper: Vec<Option<f64>>,
    pub bb_middle: Vec<Option<f64>>,
    pub bb_lower: Vec<Option<f64>>,
    pub bb_width: Vec<Option<f64>>,
}

/// All indicator values of a single row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub date: NaiveDate,
    pub close: f64,
    pub sma: BTreeMap<usize, Option<f64>>,
    pub ema: BTreeMap<usize, Option<f64>>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    /// Set when MACD crossed its signal line on this very row.
    pub macd_crossover: Option<Crossover>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub bb_width: Option<f64>,
}

impl IndicatorSnapshot {
    pub fn sma(&self, period: usize) -> Option<f64> {
        self.sma.get(&period).copied().flatten()
    }

    pub fn ema(&self, period: usize) -> Option<f64> {
        self.ema.get(&period).copied().flatten()
    }
}

impl IndicatorFrame {
    /// Computes every configured indicator over the full series.
    ///
    /// Fails only on invalid periods. A series too short for an indicator yields
    /// `None` rows for that indicator.
    pub fn compute(
        series: &PriceSeries,
        settings: &IndicatorSettings,
    ) -> Result<Self, IndicatorError> {
        let closes = series.closes();
        let std_devs = settings.bb_std_dev.to_f64().ok_or_else(|| {
            IndicatorError::InvalidParameter(format!(
                "Bollinger multiplier {} is not representable",
                settings.bb_std_dev
            ))
        })?;

        let mut sma_columns = BTreeMap::new();
        for &period in &settings.sma_periods {
            sma_columns.insert(period, sma(&closes, period)?);
        }
        let mut ema_columns: BTreeMap<usize, Vec<Option<f64>>> = BTreeMap::new();
        for &period in &settings.ema_periods {
            ema_columns.insert(period, ema(&closes, period)?.into_iter().map(Some).collect());
        }

        let macd = macd(
            &closes,
            settings.macd_fast_period,
            settings.macd_slow_period,
            settings.macd_signal_period,
        )?;
        let bands = bollinger(&closes, settings.bb_period, std_devs)?;
        let some = |column: Vec<f64>| column.into_iter().map(Some).collect::<Vec<_>>();

        tracing::debug!(
            "{}: computed indicators over {} bars",
            series.symbol(),
            closes.len()
        );

        Ok(Self {
            symbol: series.symbol().to_string(),
            dates: series.dates(),
            rsi: rsi(&closes, settings.rsi_period)?,
            close: closes,
            sma: sma_columns,
            ema: ema_columns,
            macd: some(macd.macd),
            macd_signal: some(macd.signal),
            macd_histogram: some(macd.histogram),
            bb_upper: bands.upper,
            bb_middle: bands.middle,
            bb_lower: bands.lower,
            bb_width: bands.width,
        })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The values of row `index`, or `None` past the end.
    pub fn row(&self, index: usize) -> Option<IndicatorSnapshot> {
        let date = *self.dates.get(index)?;
        let at = |column: &Vec<Option<f64>>| column.get(index).copied().flatten();
        let macd: Vec<f64> = self.macd.iter().map(|v| v.unwrap_or(f64::NAN)).collect();
        let signal: Vec<f64> = self.macd_signal.iter().map(|v| v.unwrap_or(f64::NAN)).collect();

        Some(IndicatorSnapshot {
            date,
            close: self.close[index],
            sma: self.sma.iter().map(|(p, c)| (*p, at(c))).collect(),
            ema: self.ema.iter().map(|(p, c)| (*p, at(c))).collect(),
            rsi: at(&self.rsi),
            macd: at(&self.macd),
            macd_signal: at(&self.macd_signal),
            macd_histogram: at(&self.macd_histogram),
            macd_crossover: crossover_at(&macd, &signal, index),
            bb_upper: at(&self.bb_upper),
            bb_middle: at(&self.bb_middle),
            bb_lower: at(&self.bb_lower),
            bb_width: at(&self.bb_width),
        })
    }

    /// The most recent row.
    pub fn latest(&self) -> Option<IndicatorSnapshot> {
        self.row(self.len().checked_sub(1)?)
    }
}
