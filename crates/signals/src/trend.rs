use crate::error::SignalError;
use crate::rule::{Rule, RuleOutcome, tally};
use configuration::IndicatorSettings;
use core_types::MarketSide;
use indicators::IndicatorSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendLabel {
    Bullish,
    Bearish,
    Sideways,
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TrendLabel::Bullish => "BULLISH",
            TrendLabel::Bearish => "BEARISH",
            TrendLabel::Sideways => "SIDEWAYS",
        };
        f.write_str(text)
    }
}

/// The trend classification of the most recent bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSignal {
    pub label: TrendLabel,
    /// Share of the awarded points that went to the winning side, 0-100. This is
    /// not the raw winning point total: 40 points against 20 reads as 66.7, not 40.
    /// A tie reads as 50.
    pub confidence: f64,
    pub bullish_points: u32,
    pub bearish_points: u32,
    pub factors: Vec<RuleOutcome>,
}

/// The values the trend rules look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendInputs {
    pub close: f64,
    pub sma_short: Option<f64>,
    pub sma_medium: Option<f64>,
    pub sma_long: Option<f64>,
    pub rsi: Option<f64>,
}

fn side_of(close: f64, average: Option<f64>) -> Option<MarketSide> {
    let average = average?;
    Some(if close > average {
        MarketSide::Bullish
    } else {
        MarketSide::Bearish
    })
}

fn moving_average_alignment(i: &TrendInputs) -> Option<MarketSide> {
    let (s, m, l) = (i.sma_short?, i.sma_medium?, i.sma_long?);
    if i.close > s && s > m && m > l {
        Some(MarketSide::Bullish)
    } else if i.close < s && s < m && m < l {
        Some(MarketSide::Bearish)
    } else {
        None
    }
}

fn price_vs_short(i: &TrendInputs) -> Option<MarketSide> {
    side_of(i.close, i.sma_short)
}

fn price_vs_medium(i: &TrendInputs) -> Option<MarketSide> {
    side_of(i.close, i.sma_medium)
}

fn price_vs_long(i: &TrendInputs) -> Option<MarketSide> {
    side_of(i.close, i.sma_long)
}

fn rsi_momentum(i: &TrendInputs) -> Option<MarketSide> {
    let rsi = i.rsi?;
    Some(if rsi > 50.0 {
        MarketSide::Bullish
    } else {
        MarketSide::Bearish
    })
}

/// The trend rules, in evaluation order. Points total 100.
pub fn trend_rules() -> Vec<Rule<TrendInputs>> {
    vec![
        Rule {
            name: "moving_average_alignment",
            points: 40,
            vote: moving_average_alignment,
        },
        Rule {
            name: "price_vs_sma_short",
            points: 10,
            vote: price_vs_short,
        },
        Rule {
            name: "price_vs_sma_medium",
            points: 10,
            vote: price_vs_medium,
        },
        Rule {
            name: "price_vs_sma_long",
            points: 10,
            vote: price_vs_long,
        },
        Rule {
            name: "rsi_momentum",
            points: 30,
            vote: rsi_momentum,
        },
    ]
}

/// Classifies the trend from moving-average structure and RSI momentum.
#[derive(Debug, Clone)]
pub struct TrendScorer {
    sma_periods: [usize; 3],
    rules: Vec<Rule<TrendInputs>>,
}

impl TrendScorer {
    /// Uses the three shortest configured SMA periods as short, medium and long.
    pub fn from_settings(settings: &IndicatorSettings) -> Result<Self, SignalError> {
        let mut periods = settings.sma_periods.clone();
        periods.sort_unstable();
        periods.dedup();
        match periods.as_slice() {
            [short, medium, long, ..] => Ok(Self {
                sma_periods: [*short, *medium, *long],
                rules: trend_rules(),
            }),
            _ => Err(SignalError::InvalidParameters(format!(
                "trend scoring needs three distinct SMA periods, got {:?}",
                settings.sma_periods
            ))),
        }
    }

    pub fn inputs(&self, snapshot: &IndicatorSnapshot) -> TrendInputs {
        let [short, medium, long] = self.sma_periods;
        TrendInputs {
            close: snapshot.close,
            sma_short: snapshot.sma(short),
            sma_medium: snapshot.sma(medium),
            sma_long: snapshot.sma(long),
            rsi: snapshot.rsi,
        }
    }

    pub fn score_snapshot(&self, snapshot: &IndicatorSnapshot) -> TrendSignal {
        self.score(&self.inputs(snapshot))
    }

    pub fn score(&self, inputs: &TrendInputs) -> TrendSignal {
        let (bullish_points, bearish_points, factors) = tally(&self.rules, inputs);

        let skipped: Vec<&str> = factors
            .iter()
            .filter(|f| f.side.is_none())
            .map(|f| f.rule.as_str())
            .collect();
        if !skipped.is_empty() {
            tracing::debug!("Trend rules without a vote: {:?}", skipped);
        }

        let total = bullish_points + bearish_points;
        let (label, winner) = if bullish_points > bearish_points {
            (TrendLabel::Bullish, bullish_points)
        } else if bearish_points > bullish_points {
            (TrendLabel::Bearish, bearish_points)
        } else {
            (TrendLabel::Sideways, 0)
        };
        let confidence = match label {
            TrendLabel::Sideways => 50.0,
            _ => f64::from(winner) / f64::from(total) * 100.0,
        };

        TrendSignal {
            label,
            confidence,
            bullish_points,
            bearish_points,
            factors,
        }
    }
}
