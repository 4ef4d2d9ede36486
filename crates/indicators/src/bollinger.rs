use crate::error::{IndicatorError, check_period};
use crate::rolling::{rolling_mean, rolling_sample_std};
use serde::{Deserialize, Serialize};

/// Bollinger Bands around a simple moving average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
    /// `(upper - lower) / middle`.
    pub width: Vec<Option<f64>>,
}

/// Middle = SMA(period); upper/lower = middle ± `std_devs` sample standard deviations.
pub fn bollinger(
    closes: &[f64],
    period: usize,
    std_devs: f64,
) -> Result<BollingerBands, IndicatorError> {
    check_period("Bollinger", period, 2)?;
    if !(std_devs.is_finite() && std_devs > 0.0) {
        return Err(IndicatorError::InvalidParameter(format!(
            "Bollinger multiplier must be positive, got {std_devs}"
        )));
    }

    let values: Vec<Option<f64>> = closes.iter().copied().map(Some).collect();
    let middle = rolling_mean(&values, period);
    let deviation = rolling_sample_std(&values, period);

    let mut upper = Vec::with_capacity(closes.len());
    let mut lower = Vec::with_capacity(closes.len());
    let mut width = Vec::with_capacity(closes.len());
    for (m, sd) in middle.iter().zip(&deviation) {
        match (m, sd) {
            (Some(m), Some(sd)) => {
                let (u, l) = (m + std_devs * sd, m - std_devs * sd);
                upper.push(Some(u));
                lower.push(Some(l));
                width.push((*m != 0.0).then(|| (u - l) / m));
            }
            _ => {
                upper.push(None);
                lower.push(None);
                width.push(None);
            }
        }
    }

    Ok(BollingerBands {
        upper,
        middle,
        lower,
        width,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_bands_use_sample_std() {
        // mean 2, sample std 1
        let bands = bollinger(&[1.0, 2.0, 3.0], 3, 2.0).unwrap();
        assert_eq!(bands.middle[1], None);
        assert_abs_diff_eq!(bands.middle[2].unwrap(), 2.0);
        assert_abs_diff_eq!(bands.upper[2].unwrap(), 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bands.lower[2].unwrap(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bands.width[2].unwrap(), 2.0, epsilon = 1e-12);
    }
}
