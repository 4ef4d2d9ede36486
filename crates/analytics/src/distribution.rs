use crate::stats;
use serde::{Deserialize, Serialize};

/// Percentiles reported for a daily-return distribution.
pub const REPORTED_PERCENTILES: [f64; 6] = [1.0, 5.0, 25.0, 75.0, 95.0, 99.0];

/// Summary statistics of a daily-return distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnDistribution {
    pub observations: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation.
    pub std_dev: f64,
    /// Bias-adjusted sample skewness, `0.0` when fewer than four observations or a
    /// flat series.
    pub skewness: f64,
    /// Bias-adjusted excess kurtosis, `0.0` under the same conditions as `skewness`.
    pub kurtosis: f64,
    /// `(percentile, value)` pairs in ascending percentile order.
    pub percentiles: Vec<(f64, f64)>,
    /// False when `|skewness| > 1` or `|kurtosis| > 3`.
    pub is_normal: bool,
}

impl ReturnDistribution {
    /// `None` for fewer than two returns.
    pub fn from_returns(returns: &[f64]) -> Option<Self> {
        if returns.len() < 2 {
            return None;
        }
        let mut sorted = returns.to_vec();
        sorted.sort_by(f64::total_cmp);

        let (skewness, kurtosis) =
            stats::sample_skew_and_excess_kurtosis(returns).unwrap_or((0.0, 0.0));
        let percentiles = REPORTED_PERCENTILES
            .iter()
            .map(|&p| (p, stats::percentile_of_sorted(&sorted, p)))
            .collect();

        Some(Self {
            observations: returns.len(),
            mean: stats::mean(returns),
            median: stats::percentile_of_sorted(&sorted, 50.0),
            std_dev: stats::sample_std_dev(returns),
            skewness,
            kurtosis,
            percentiles,
            is_normal: skewness.abs() <= 1.0 && kurtosis.abs() <= 3.0,
        })
    }

    pub fn percentile(&self, p: f64) -> Option<f64> {
        self.percentiles
            .iter()
            .find(|(q, _)| (*q - p).abs() < f64::EPSILON)
            .map(|(_, v)| *v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_distribution_of_symmetric_returns() {
        let returns = [-0.02, -0.01, 0.0, 0.01, 0.02];
        let dist = ReturnDistribution::from_returns(&returns).unwrap();

        assert_eq!(dist.observations, 5);
        assert_abs_diff_eq!(dist.mean, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(dist.median, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(dist.skewness, 0.0, epsilon = 1e-9);
        assert!(dist.is_normal);
        assert_abs_diff_eq!(dist.percentile(25.0).unwrap(), -0.01, epsilon = 1e-12);
        assert!(dist.percentile(50.0).is_none());
    }

    #[test]
    fn test_fat_tail_is_not_normal() {
        let mut returns = vec![0.0; 40];
        returns.push(0.5);
        let dist = ReturnDistribution::from_returns(&returns).unwrap();
        assert!(dist.skewness > 1.0);
        assert!(!dist.is_normal);
        let (skew, kurt) = stats::sample_skew_and_excess_kurtosis(&returns).unwrap();
        assert_abs_diff_eq!(dist.skewness, skew, epsilon = 1e-12);
        assert_abs_diff_eq!(dist.kurtosis, kurt, epsilon = 1e-12);
        assert!(ReturnDistribution::from_returns(&[0.1]).is_none());
    }
}
