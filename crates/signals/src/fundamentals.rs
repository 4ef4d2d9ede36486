use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Company fundamentals as reported by a data vendor. Any figure may be missing.
///
/// Ratios are plain fractions: a 15% ROE is `0.15`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FundamentalSnapshot {
    pub pe_ratio: Option<Decimal>,
    pub revenue_growth: Option<Decimal>,
    pub return_on_equity: Option<Decimal>,
    pub debt_to_equity: Option<Decimal>,
    pub profit_margin: Option<Decimal>,
    pub current_ratio: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundamentalMetric {
    PeRatio,
    RevenueGrowth,
    ReturnOnEquity,
    DebtToEquity,
    ProfitMargin,
    CurrentRatio,
}

impl FundamentalMetric {
    pub fn value_in(&self, snapshot: &FundamentalSnapshot) -> Option<Decimal> {
        match self {
            FundamentalMetric::PeRatio => snapshot.pe_ratio,
            FundamentalMetric::RevenueGrowth => snapshot.revenue_growth,
            FundamentalMetric::ReturnOnEquity => snapshot.return_on_equity,
            FundamentalMetric::DebtToEquity => snapshot.debt_to_equity,
            FundamentalMetric::ProfitMargin => snapshot.profit_margin,
            FundamentalMetric::CurrentRatio => snapshot.current_ratio,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Better {
    Lower,
    Higher,
}

/// A point ladder for one metric.
///
/// Bands are checked in order; the first threshold the value beats (strictly below for
/// `Better::Lower`, strictly above for `Better::Higher`) gives the points, otherwise
/// `fallback` applies. Non-positive and missing values score nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct BandRule {
    pub metric: FundamentalMetric,
    pub better: Better,
    pub bands: Vec<(Decimal, u32)>,
    pub fallback: u32,
}

impl BandRule {
    pub fn max_points(&self) -> u32 {
        self.bands
            .iter()
            .map(|(_, p)| *p)
            .chain(std::iter::once(self.fallback))
            .max()
            .unwrap_or(0)
    }

    /// Points for `snapshot`, or `None` if the metric is missing or not positive.
    pub fn points(&self, snapshot: &FundamentalSnapshot) -> Option<u32> {
        let value = self.metric.value_in(snapshot)?;
        if value <= Decimal::ZERO {
            return None;
        }
        let beats = |threshold: &Decimal| match self.better {
            Better::Lower => value < *threshold,
            Better::Higher => value > *threshold,
        };
        Some(
            self.bands
                .iter()
                .find(|(threshold, _)| beats(threshold))
                .map(|(_, points)| *points)
                .unwrap_or(self.fallback),
        )
    }
}

/// The fundamentals rules, in evaluation order. Maximum points total 100.
pub fn fundamental_rules() -> Vec<BandRule> {
    vec![
        BandRule {
            metric: FundamentalMetric::PeRatio,
            better: Better::Lower,
            bands: vec![(dec!(12), 25), (dec!(18), 20), (dec!(25), 15)],
            fallback: 5,
        },
        BandRule {
            metric: FundamentalMetric::RevenueGrowth,
            better: Better::Higher,
            bands: vec![(dec!(0.20), 20), (dec!(0.10), 15), (dec!(0.05), 10)],
            fallback: 5,
        },
        BandRule {
            metric: FundamentalMetric::ReturnOnEquity,
            better: Better::Higher,
            bands: vec![(dec!(0.20), 20), (dec!(0.15), 15), (dec!(0.08), 10)],
            fallback: 5,
        },
        BandRule {
            metric: FundamentalMetric::DebtToEquity,
            better: Better::Lower,
            bands: vec![(dec!(0.5), 15), (dec!(1.0), 12), (dec!(2.0), 8)],
            fallback: 3,
        },
        BandRule {
            metric: FundamentalMetric::ProfitMargin,
            better: Better::Higher,
            bands: vec![(dec!(0.20), 10), (dec!(0.10), 8), (dec!(0.05), 5)],
            fallback: 2,
        },
        BandRule {
            metric: FundamentalMetric::CurrentRatio,
            better: Better::Higher,
            bands: vec![(dec!(2.0), 10), (dec!(1.5), 8), (dec!(1.0), 5)],
            fallback: 2,
        },
    ]
}

/// How one metric scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalAssessment {
    pub metric: FundamentalMetric,
    pub value: Option<Decimal>,
    /// `None` when the metric was missing or not positive.
    pub points: Option<u32>,
    pub max_points: u32,
}

/// A 0-100 quality score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalScore {
    pub score: u32,
    pub assessments: Vec<FundamentalAssessment>,
}

#[derive(Debug, Clone)]
pub struct FundamentalsScorer {
    rules: Vec<BandRule>,
}

impl Default for FundamentalsScorer {
    fn default() -> Self {
        Self {
            rules: fundamental_rules(),
        }
    }
}

impl FundamentalsScorer {
    pub const MAX_SCORE: u32 = 100;

    /// Adds up the points of every rule, capped at [`Self::MAX_SCORE`].
    pub fn score(&self, snapshot: &FundamentalSnapshot) -> FundamentalScore {
        let assessments: Vec<FundamentalAssessment> = self
            .rules
            .iter()
            .map(|rule| FundamentalAssessment {
                metric: rule.metric,
                value: rule.metric.value_in(snapshot),
                points: rule.points(snapshot),
                max_points: rule.max_points(),
            })
            .collect();
        let total: u32 = assessments.iter().filter_map(|a| a.points).sum();

        FundamentalScore {
            score: total.min(Self::MAX_SCORE),
            assessments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(metric: FundamentalMetric) -> BandRule {
        fundamental_rules()
            .into_iter()
            .find(|r| r.metric == metric)
            .unwrap()
    }

    fn pe(value: Decimal) -> FundamentalSnapshot {
        FundamentalSnapshot {
            pe_ratio: Some(value),
            ..FundamentalSnapshot::default()
        }
    }

    #[test]
    fn test_pe_bands() {
        let rule = rule(FundamentalMetric::PeRatio);
        assert_eq!(rule.points(&pe(dec!(10))), Some(25));
        assert_eq!(rule.points(&pe(dec!(12))), Some(20));
        assert_eq!(rule.points(&pe(dec!(20))), Some(15));
        assert_eq!(rule.points(&pe(dec!(40))), Some(5));
        assert_eq!(rule.points(&pe(dec!(-3))), None);
        assert_eq!(rule.points(&FundamentalSnapshot::default()), None);
    }

    #[test]
    fn test_higher_is_better_bands() {
        let rule = rule(FundamentalMetric::CurrentRatio);
        let snapshot = |v| FundamentalSnapshot {
            current_ratio: Some(v),
            ..FundamentalSnapshot::default()
        };
        assert_eq!(rule.points(&snapshot(dec!(2.5))), Some(10));
        assert_eq!(rule.points(&snapshot(dec!(1.6))), Some(8));
        assert_eq!(rule.points(&snapshot(dec!(1.0))), Some(2));
    }

    #[test]
    fn test_rule_maxima_sum_to_100() {
        let total: u32 = fundamental_rules().iter().map(BandRule::max_points).sum();
        assert_eq!(total, FundamentalsScorer::MAX_SCORE);
    }

    #[test]
    fn test_best_in_class_company_scores_100() {
        let snapshot = FundamentalSnapshot {
            pe_ratio: Some(dec!(10)),
            revenue_growth: Some(dec!(0.25)),
            return_on_equity: Some(dec!(0.30)),
            debt_to_equity: Some(dec!(0.2)),
            profit_margin: Some(dec!(0.25)),
            current_ratio: Some(dec!(3)),
        };
        let score = FundamentalsScorer::default().score(&snapshot);
        assert_eq!(score.score, 100);
        assert!(score.assessments.iter().all(|a| a.points == Some(a.max_points)));
    }

    #[test]
    fn test_missing_metrics_score_nothing() {
        let snapshot = FundamentalSnapshot {
            pe_ratio: Some(dec!(30)),
            debt_to_equity: Some(dec!(1.5)),
            ..FundamentalSnapshot::default()
        };
        let score = FundamentalsScorer::default().score(&snapshot);
        assert_eq!(score.score, 5 + 8);
        assert_eq!(score.assessments.iter().filter(|a| a.points.is_none()).count(), 4);
    }
}
