use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a metric could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedReason {
    /// A variance or standard deviation in the denominator is zero.
    ZeroVariance,
    /// The negative returns exist but do not vary.
    ZeroDownsideDeviation,
    /// Asset and benchmark returns move identically.
    ZeroTrackingError,
    /// Beta is zero, so a per-unit-of-beta ratio does not exist.
    ZeroBeta,
    /// Too few observations for the statistic.
    InsufficientObservations,
}

impl fmt::Display for UndefinedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            UndefinedReason::ZeroVariance => "zero variance",
            UndefinedReason::ZeroDownsideDeviation => "zero downside deviation",
            UndefinedReason::ZeroTrackingError => "zero tracking error",
            UndefinedReason::ZeroBeta => "zero beta",
            UndefinedReason::InsufficientObservations => "insufficient observations",
        };
        f.write_str(text)
    }
}

/// A metric that was either computed or could not be.
///
/// Keeps "computed as zero" apart from "could not compute". Consumers that need a
/// plain number call [`MetricValue::or`] with the metric's documented neutral default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum MetricValue {
    Value(f64),
    Undefined(UndefinedReason),
}

impl MetricValue {
    /// `numerator / denominator`, or `Undefined(reason)` when the denominator is
    /// (numerically) zero or the result is not finite.
    pub fn ratio(numerator: f64, denominator: f64, reason: UndefinedReason) -> Self {
        if denominator.abs() <= crate::stats::EPSILON {
            return MetricValue::Undefined(reason);
        }
        MetricValue::from_f64(numerator / denominator, reason)
    }

    /// Wraps a value, mapping `NaN`/infinite results to `Undefined(reason)`.
    pub fn from_f64(value: f64, reason: UndefinedReason) -> Self {
        if value.is_finite() {
            MetricValue::Value(value)
        } else {
            MetricValue::Undefined(reason)
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            MetricValue::Value(v) => Some(*v),
            MetricValue::Undefined(_) => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, MetricValue::Value(_))
    }

    /// The computed value, or `neutral` if the metric is undefined.
    pub fn or(&self, neutral: f64) -> f64 {
        self.value().unwrap_or(neutral)
    }

    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            MetricValue::Value(v) => MetricValue::Value(f(v)),
            undefined => undefined,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Value(v) => write!(f, "{v:.4}"),
            MetricValue::Undefined(reason) => write!(f, "n/a ({reason})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_with_zero_denominator_is_undefined() {
        let v = MetricValue::ratio(1.0, 0.0, UndefinedReason::ZeroVariance);
        assert_eq!(v, MetricValue::Undefined(UndefinedReason::ZeroVariance));
        assert_eq!(v.or(0.0), 0.0);
        assert!(!v.is_defined());
    }

    #[test]
    fn test_computed_zero_stays_a_value() {
        let v = MetricValue::ratio(0.0, 2.0, UndefinedReason::ZeroVariance);
        assert_eq!(v, MetricValue::Value(0.0));
        assert_eq!(v.map(|x| x + 1.0), MetricValue::Value(1.0));
    }

    #[test]
    fn test_serializes_with_status_tag() {
        let json = serde_json::to_string(&MetricValue::Value(1.5)).unwrap();
        assert_eq!(json, r#"{"status":"value","value":1.5}"#);
        let json =
            serde_json::to_string(&MetricValue::Undefined(UndefinedReason::ZeroBeta)).unwrap();
        assert_eq!(json, r#"{"status":"undefined","value":"zero_beta"}"#);
    }
}
