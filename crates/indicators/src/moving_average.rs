use crate::error::{IndicatorError, check_period};
use crate::rolling::rolling_mean;
use ta::Next;
use ta::indicators::ExponentialMovingAverage as Ema;

/// Simple moving average. The first `period - 1` rows are absent.
pub fn sma(closes: &[f64], period: usize) -> Result<Vec<Option<f64>>, IndicatorError> {
    check_period("SMA", period, 1)?;
    let values: Vec<Option<f64>> = closes.iter().copied().map(Some).collect();
    Ok(rolling_mean(&values, period))
}

/// Exponential moving average with `alpha = 2 / (period + 1)`, seeded with the first
/// value, so every row has a value.
pub fn ema(values: &[f64], period: usize) -> Result<Vec<f64>, IndicatorError> {
    check_period("EMA", period, 1)?;
    let mut ema = Ema::new(period)
        .map_err(|e| IndicatorError::InvalidParameter(format!("EMA({period}): {e:?}")))?;
    Ok(values.iter().map(|v| ema.next(*v)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_sma_warm_up_is_absent() {
        let out = sma(&[1.0, 2.0, 3.0, 4.0], 3).unwrap();
        assert_eq!(out, vec![None, None, Some(2.0), Some(3.0)]);
        assert!(sma(&[1.0], 0).is_err());
    }

    #[test]
    fn test_ema_is_seeded_with_first_value() {
        // alpha = 2 / (3 + 1) = 0.5
        let out = ema(&[10.0, 20.0, 20.0], 3).unwrap();
        assert_abs_diff_eq!(out[0], 10.0);
        assert_abs_diff_eq!(out[1], 15.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[2], 17.5, epsilon = 1e-12);
    }
}
