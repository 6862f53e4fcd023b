use crate::config::{RuleSet, SignalToggles};

use super::domain::RunnerRecord;

const OPTIMAL_REST: std::ops::RangeInclusive<f64> = 7.0..=21.0;
const HEALTHY_ODDS: std::ops::RangeInclusive<f64> = 3.0..=12.0;

/// Pass/fail domain flags and the structural score of one runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DomainVerdict {
    pub by_activity: bool,
    pub by_rest: bool,
    pub by_odds: bool,
    pub structural_score: u8,
}

pub(crate) fn classify(
    record: &RunnerRecord,
    rules: &RuleSet,
    toggles: &SignalToggles,
) -> DomainVerdict {
    let active = record.active == Some(true);

    let by_activity = !rules.active_only || active;
    let by_rest = record
        .rest_days
        .map(|days| days <= f64::from(rules.max_rest_days))
        .unwrap_or(true);
    let by_odds = !toggles.odds_rule
        || record
            .odds
            .map(|odds| odds >= rules.min_odds)
            .unwrap_or(true);

    let mut structural_score = 0;
    if let Some(days) = record.rest_days {
        structural_score += if OPTIMAL_REST.contains(&days) { 2 } else { 1 };
    }
    if active {
        structural_score += 1;
    }
    if toggles.odds_rule {
        if let Some(odds) = record.odds {
            structural_score += if HEALTHY_ODDS.contains(&odds) { 2 } else { 1 };
        }
    }

    DomainVerdict {
        by_activity,
        by_rest,
        by_odds,
        structural_score,
    }
}
