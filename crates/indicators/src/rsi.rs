use crate::error::{IndicatorError, check_period};
use crate::rolling::rolling_mean;

/// Relative Strength Index with simple rolling means of gains and losses.
///
/// Row `t` needs `period` price changes, so the first `period` rows are absent. A
/// window with no losses and some gains reads 100; a window with no movement at all
/// is absent.
pub fn rsi(closes: &[f64], period: usize) -> Result<Vec<Option<f64>>, IndicatorError> {
    check_period("RSI", period, 1)?;
    if closes.is_empty() {
        return Ok(Vec::new());
    }

    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());
    gains.push(None);
    losses.push(None);
    for pair in closes.windows(2) {
        let change = pair[1] - pair[0];
        gains.push(Some(change.max(0.0)));
        losses.push(Some((-change).max(0.0)));
    }

    let avg_gain = rolling_mean(&gains, period);
    let avg_loss = rolling_mean(&losses, period);

    Ok(avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|(gain, loss)| match (gain?, loss?) {
            (g, l) if l == 0.0 && g == 0.0 => None,
            (_, l) if l == 0.0 => Some(100.0),
            (g, l) => Some(100.0 - 100.0 / (1.0 + g / l)),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rsi_of_steady_rise_is_100() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let out = rsi(&closes, 14).unwrap();
        assert!(out[..14].iter().all(Option::is_none));
        assert!(out[14..].iter().all(|v| *v == Some(100.0)));
    }

    #[test]
    fn test_rsi_known_value() {
        // gains: 2, 0 ; losses: 0, 1 => RS = 1 / 0.5 = 2 => RSI = 66.67
        let out = rsi(&[10.0, 12.0, 11.0], 2).unwrap();
        assert_abs_diff_eq!(out[2].unwrap(), 200.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_flat_prices_have_no_rsi() {
        let out = rsi(&[5.0; 6], 3).unwrap();
        assert!(out.iter().all(Option::is_none));
    }
}
