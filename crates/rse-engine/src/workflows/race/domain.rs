use serde::{Deserialize, Serialize};

use super::driver::{driver_impact, DriverTier};

/// Normalized runner row handed over by the ingestion layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunnerRecord {
    pub number: u32,
    pub name: String,
    pub rest_days: Option<f64>,
    pub active: Option<bool>,
    pub sigma: Option<f64>,
    pub ia_rank: Option<f64>,
    pub rating: Option<f64>,
    pub odds: Option<f64>,
    pub driver_name: Option<String>,
    pub driver_rating: Option<f64>,
}

impl RunnerRecord {
    pub fn new(number: u32, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
            ..Self::default()
        }
    }
}

/// One race worth of runners plus the identifiers feeding the audit seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceCard {
    pub source_id: String,
    pub venue: String,
    pub discipline: String,
    pub runners: Vec<RunnerRecord>,
}

/// Three-valued outcome of a threshold check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalState {
    Pass,
    Fail,
    Unknown,
}

impl SignalState {
    pub fn check(value: Option<f64>, predicate: impl FnOnce(f64) -> bool) -> Self {
        match value {
            Some(value) if predicate(value) => SignalState::Pass,
            Some(_) => SignalState::Fail,
            None => SignalState::Unknown,
        }
    }

    pub const fn is_pass(self) -> bool {
        matches!(self, SignalState::Pass)
    }
}

/// Runner after domain classification, signal evaluation and driver grading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub number: u32,
    pub name: String,
    pub eligible_by_activity: bool,
    pub eligible_by_rest: bool,
    pub eligible_by_odds: bool,
    pub structural_score: u8,
    pub sigma_ok: SignalState,
    pub ia_ok: SignalState,
    pub elo_ok: SignalState,
    pub value_ok: SignalState,
    pub driver_name: Option<String>,
    pub driver_rating: Option<f64>,
    pub driver_tier: DriverTier,
}

impl Candidate {
    pub fn is_eligible(&self) -> bool {
        self.eligible_by_activity && self.eligible_by_rest && self.eligible_by_odds
    }

    pub fn signal_count(&self) -> u8 {
        [self.sigma_ok, self.ia_ok, self.elo_ok, self.value_ok]
            .into_iter()
            .filter(|signal| signal.is_pass())
            .count() as u8
    }

    pub fn driver_impact(&self) -> f64 {
        driver_impact(self.driver_rating)
    }

    /// Descending sort key used to build the schema.
    pub fn rank_key(&self) -> (u8, u8, u8) {
        (
            self.structural_score,
            self.driver_tier.rank_ordinal(),
            self.signal_count(),
        )
    }

    pub fn summary(&self) -> String {
        format!(
            "{} {} | RSE={} | DRIVER={} ({})",
            self.number,
            self.name,
            self.structural_score,
            self.driver_name.as_deref().unwrap_or("-"),
            self.driver_tier.label()
        )
    }
}
