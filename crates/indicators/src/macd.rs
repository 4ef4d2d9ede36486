use crate::error::{IndicatorError, check_period};
use crate::moving_average::ema;
use serde::{Deserialize, Serialize};

/// MACD line, its signal line and the histogram between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Macd {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// `EMA(fast) - EMA(slow)`, its `EMA(signal)` and the difference of the two.
pub fn macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Result<Macd, IndicatorError> {
    check_period("MACD signal", signal, 1)?;
    if fast >= slow {
        return Err(IndicatorError::InvalidParameter(format!(
            "MACD fast period {fast} must be below slow period {slow}"
        )));
    }

    let fast_ema = ema(closes, fast)?;
    let slow_ema = ema(closes, slow)?;
    let line: Vec<f64> = fast_ema.iter().zip(&slow_ema).map(|(f, s)| f - s).collect();
    let signal_line = ema(&line, signal)?;
    let histogram = line.iter().zip(&signal_line).map(|(m, s)| m - s).collect();

    Ok(Macd {
        macd: line,
        signal: signal_line,
        histogram,
    })
}

/// Direction of a crossing between two lines on a given bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crossover {
    Above,
    Below,
}

/// Whether `line` crossed `reference` between bar `index - 1` and bar `index`.
pub fn crossover_at(line: &[f64], reference: &[f64], index: usize) -> Option<Crossover> {
    if index == 0 || index >= line.len() || index >= reference.len() {
        return None;
    }
    let (prev, curr) = (line[index - 1] - reference[index - 1], line[index] - reference[index]);
    if prev <= 0.0 && curr > 0.0 {
        Some(Crossover::Above)
    } else if prev >= 0.0 && curr < 0.0 {
        Some(Crossover::Below)
    } else {
        None
    }
}
