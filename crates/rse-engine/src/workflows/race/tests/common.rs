use crate::config::{EngineConfig, RuleBook, RuleSet, SignalToggles, ThresholdSet};
use crate::workflows::race::domain::{Candidate, RaceCard, RunnerRecord, SignalState};
use crate::workflows::race::driver::DriverTier;
use crate::workflows::race::RaceAnalyzer;

pub(super) fn analyzer() -> RaceAnalyzer {
    RaceAnalyzer::new(EngineConfig::canonical())
}

pub(super) fn legacy_analyzer() -> RaceAnalyzer {
    RaceAnalyzer::new(EngineConfig::legacy())
}

pub(super) fn trot_rules() -> RuleSet {
    RuleBook::standard()
        .lookup("trot")
        .expect("trot configured")
        .clone()
}

pub(super) fn obstacle_rules() -> RuleSet {
    RuleBook::standard()
        .lookup("obstacle")
        .expect("obstacle configured")
        .clone()
}

pub(super) fn thresholds() -> ThresholdSet {
    ThresholdSet::default()
}

pub(super) fn canonical_toggles() -> SignalToggles {
    SignalToggles::default()
}

pub(super) fn runner(number: u32, rest_days: Option<f64>, active: Option<bool>) -> RunnerRecord {
    RunnerRecord {
        rest_days,
        active,
        ..RunnerRecord::new(number, format!("Runner {number}"))
    }
}

/// Active runner with an optimal rest window: structural score 3.
pub(super) fn fit_runner(number: u32) -> RunnerRecord {
    runner(number, Some(14.0), Some(true))
}

pub(super) fn card(discipline: &str, runners: Vec<RunnerRecord>) -> RaceCard {
    RaceCard {
        source_id: "R1C1-2025-06-01".to_string(),
        venue: "vincennes".to_string(),
        discipline: discipline.to_string(),
        runners,
    }
}

/// Eligible candidate with the given score and tier and no known signals.
pub(super) fn candidate(number: u32, structural_score: u8, tier: DriverTier) -> Candidate {
    Candidate {
        number,
        name: format!("Runner {number}"),
        eligible_by_activity: true,
        eligible_by_rest: true,
        eligible_by_odds: true,
        structural_score,
        sigma_ok: SignalState::Unknown,
        ia_ok: SignalState::Unknown,
        elo_ok: SignalState::Unknown,
        value_ok: SignalState::Unknown,
        driver_name: None,
        driver_rating: None,
        driver_tier: tier,
    }
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
