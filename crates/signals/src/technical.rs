use configuration::IndicatorSettings;
use indicators::{Crossover, IndicatorSnapshot};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalAction {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalStrength {
    Medium,
    Strong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalSummary {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSignal {
    pub indicator: String,
    pub action: SignalAction,
    pub strength: SignalStrength,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSignals {
    pub signals: Vec<TechnicalSignal>,
    pub summary: SignalSummary,
}

impl TechnicalSignals {
    pub fn count(&self, action: SignalAction) -> usize {
        self.signals.iter().filter(|s| s.action == action).count()
    }
}

fn signal(
    indicator: &str,
    action: SignalAction,
    strength: SignalStrength,
    reason: String,
) -> TechnicalSignal {
    TechnicalSignal {
        indicator: indicator.to_string(),
        action,
        strength,
        reason,
    }
}

/// Buy/sell hints from RSI extremes, MACD crossings and Bollinger band touches on the
/// given row.
pub fn technical_signals(
    snapshot: &IndicatorSnapshot,
    settings: &IndicatorSettings,
) -> TechnicalSignals {
    let oversold = settings.rsi_oversold.to_f64().unwrap_or(30.0);
    let overbought = settings.rsi_overbought.to_f64().unwrap_or(70.0);
    let mut signals = Vec::new();

    if let Some(rsi) = snapshot.rsi {
        if rsi < oversold {
            signals.push(signal(
                "RSI",
                SignalAction::Buy,
                SignalStrength::Strong,
                format!("RSI {rsi:.1} is oversold (below {oversold})"),
            ));
        } else if rsi > overbought {
            signals.push(signal(
                "RSI",
                SignalAction::Sell,
                SignalStrength::Strong,
                format!("RSI {rsi:.1} is overbought (above {overbought})"),
            ));
        }
    }

    match snapshot.macd_crossover {
        Some(Crossover::Above) => signals.push(signal(
            "MACD",
            SignalAction::Buy,
            SignalStrength::Medium,
            "MACD crossed above its signal line".to_string(),
        )),
        Some(Crossover::Below) => signals.push(signal(
            "MACD",
            SignalAction::Sell,
            SignalStrength::Medium,
            "MACD crossed below its signal line".to_string(),
        )),
        None => {}
    }

    if let Some(lower) = snapshot.bb_lower.filter(|l| snapshot.close <= *l) {
        signals.push(signal(
            "Bollinger",
            SignalAction::Buy,
            SignalStrength::Medium,
            format!("Close {:.2} at or below the lower band {lower:.2}", snapshot.close),
        ));
    } else if let Some(upper) = snapshot.bb_upper.filter(|u| snapshot.close >= *u) {
        signals.push(signal(
            "Bollinger",
            SignalAction::Sell,
            SignalStrength::Medium,
            format!("Close {:.2} at or above the upper band {upper:.2}", snapshot.close),
        ));
    }

    let buys = signals.iter().filter(|s| s.action == SignalAction::Buy).count();
    let sells = signals.len() - buys;
    let summary = match buys.cmp(&sells) {
        std::cmp::Ordering::Greater => SignalSummary::Bullish,
        std::cmp::Ordering::Less => SignalSummary::Bearish,
        std::cmp::Ordering::Equal => SignalSummary::Neutral,
    };

    TechnicalSignals { signals, summary }
}
