use core_types::MarketSide;
use serde::{Deserialize, Serialize};

/// One entry of an ordered scoring rule list.
///
/// `vote` inspects the context and names the side that receives `points`, or returns
/// `None` when the rule does not apply (for example because an input is missing).
#[derive(Debug, Clone, Copy)]
pub struct Rule<C> {
    pub name: &'static str,
    pub points: u32,
    pub vote: fn(&C) -> Option<MarketSide>,
}

/// What a single rule contributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule: String,
    pub points: u32,
    /// `None` when the rule was skipped or awarded nothing.
    pub side: Option<MarketSide>,
}

impl<C> Rule<C> {
    pub fn evaluate(&self, context: &C) -> RuleOutcome {
        RuleOutcome {
            rule: self.name.to_string(),
            points: self.points,
            side: (self.vote)(context),
        }
    }
}

/// Applies every rule in order and sums the points per side.
pub fn tally<C>(rules: &[Rule<C>], context: &C) -> (u32, u32, Vec<RuleOutcome>) {
    let outcomes: Vec<RuleOutcome> = rules.iter().map(|r| r.evaluate(context)).collect();
    let points_for = |side| {
        outcomes
            .iter()
            .filter(|o| o.side == Some(side))
            .map(|o| o.points)
            .sum::<u32>()
    };
    (
        points_for(MarketSide::Bullish),
        points_for(MarketSide::Bearish),
        outcomes,
    )
}
