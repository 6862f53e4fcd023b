use crate::config::{SignalToggles, ThresholdSet};

use super::domain::{RunnerRecord, SignalState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunnerSignals {
    pub sigma: SignalState,
    pub ia: SignalState,
    pub elo: SignalState,
    pub value: SignalState,
}

pub(crate) fn evaluate_signals(
    record: &RunnerRecord,
    thresholds: &ThresholdSet,
    toggles: &SignalToggles,
) -> RunnerSignals {
    let value = if toggles.value_signal {
        SignalState::check(record.odds, |odds| odds >= thresholds.value_odds_min)
    } else {
        SignalState::Unknown
    };

    RunnerSignals {
        sigma: SignalState::check(record.sigma, |sigma| sigma >= thresholds.sigma_min),
        // lower IA rank is better
        ia: SignalState::check(record.ia_rank, |rank| rank <= thresholds.ia_rank_max),
        elo: SignalState::check(record.rating, |rating| rating >= thresholds.elo_min),
        value,
    }
}
