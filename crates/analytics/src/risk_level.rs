use crate::report::MetricsReport;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Moderate,
    ModerateHigh,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Moderate => "MODERATE",
            RiskLevel::ModerateHigh => "MODERATE_HIGH",
            RiskLevel::High => "HIGH",
        };
        f.write_str(text)
    }
}

/// A coarse 0-8 risk score built from drawdown depth, volatility and beta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: u8,
    pub level: RiskLevel,
}

impl RiskAssessment {
    pub fn from_report(report: &MetricsReport) -> Self {
        Self::from_components(
            report.max_drawdown,
            report.volatility_annual,
            report.beta.or(MetricsReport::NEUTRAL_BETA),
        )
    }

    pub fn from_components(max_drawdown: f64, volatility: f64, beta: f64) -> Self {
        let depth = max_drawdown.abs();
        let drawdown_points = match depth {
            d if d > 0.40 => 3,
            d if d > 0.25 => 2,
            d if d > 0.15 => 1,
            _ => 0,
        };
        let volatility_points = match volatility {
            v if v > 0.50 => 3,
            v if v > 0.30 => 2,
            v if v > 0.20 => 1,
            _ => 0,
        };
        let beta_points = match beta {
            b if b > 1.5 => 2,
            b if b > 1.2 => 1,
            _ => 0,
        };

        let score = drawdown_points + volatility_points + beta_points;
        let level = match score {
            s if s >= 5 => RiskLevel::High,
            s if s >= 3 => RiskLevel::ModerateHigh,
            s if s >= 1 => RiskLevel::Moderate,
            _ => RiskLevel::Low,
        };
        Self { score, level }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_levels() {
        assert_eq!(
            RiskAssessment::from_components(-0.05, 0.10, 0.8),
            RiskAssessment { score: 0, level: RiskLevel::Low }
        );
        assert_eq!(RiskAssessment::from_components(-0.20, 0.10, 1.0).level, RiskLevel::Moderate);
        assert_eq!(
            RiskAssessment::from_components(-0.30, 0.25, 1.0).level,
            RiskLevel::ModerateHigh
        );
        let worst = RiskAssessment::from_components(-0.55, 0.60, 1.8);
        assert_eq!(worst.score, 8);
        assert_eq!(worst.level, RiskLevel::High);
    }
}
