//! Descriptive statistics over plain `f64` slices.
//!
//! Variances and standard deviations are population (divide by `n`) unless the name
//! says otherwise. Empty input yields `NaN`; callers check lengths first.

/// Standard deviations below this are treated as zero.
pub const EPSILON: f64 = 1e-12;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population covariance of two equally long slices.
pub fn covariance(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    if x.is_empty() {
        return f64::NAN;
    }
    let mean_x = mean(x);
    let mean_y = mean(y);
    x.iter()
        .zip(y)
        .map(|(a, b)| (a - mean_x) * (b - mean_y))
        .sum::<f64>()
        / x.len() as f64
}

/// Population variance. Computed as `covariance(x, x)` so that `cov(x, x) / var(x)`
/// is exactly one.
pub fn variance(values: &[f64]) -> f64 {
    covariance(values, values)
}

pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Sample standard deviation (divide by `n - 1`).
pub fn sample_std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    (variance(values) * n as f64 / (n - 1) as f64).sqrt()
}

/// Pearson correlation, or `None` when either side has no variance.
pub fn correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    let sx = std_dev(x);
    let sy = std_dev(y);
    if !(sx > EPSILON && sy > EPSILON) {
        return None;
    }
    Some(covariance(x, y) / (sx * sy))
}

/// The `p`-th percentile (0..=100) with linear interpolation between the two nearest
/// order statistics.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile_of_sorted(&sorted, p)
}

pub fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Population skewness and excess kurtosis.
///
/// `None` for fewer than four observations or a flat series.
pub fn skew_and_excess_kurtosis(values: &[f64]) -> Option<(f64, f64)> {
    let n = values.len();
    if n < 4 {
        return None;
    }
    let m = mean(values);
    let sd = std_dev(values);
    if sd <= EPSILON {
        return None;
    }
    let (m3, m4) = values.iter().fold((0.0, 0.0), |(s3, s4), v| {
        let d = v - m;
        (s3 + d.powi(3), s4 + d.powi(4))
    });
    let n = n as f64;
    Some((m3 / (n * sd.powi(3)), m4 / (n * sd.powi(4)) - 3.0))
}

/// Bias-adjusted skewness `G1` and excess kurtosis `G2`, the sample estimators that
/// spreadsheet and dataframe libraries report.
///
/// `None` under the same conditions as [`skew_and_excess_kurtosis`].
pub fn sample_skew_and_excess_kurtosis(values: &[f64]) -> Option<(f64, f64)> {
    let (g1, g2) = skew_and_excess_kurtosis(values)?;
    let n = values.len() as f64;
    let skew = g1 * (n * (n - 1.0)).sqrt() / (n - 2.0);
    let kurt = ((n + 1.0) * g2 + 6.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0));
    Some((skew, kurt))
}
