use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{EngineConfig, RuleSet};
use crate::error::RaceError;

use super::classifier::classify;
use super::confidence::estimate_confidence;
use super::domain::{Candidate, RaceCard, RunnerRecord};
use super::driver::DriverTier;
use super::schema::rank_schema;
use super::selector::{select, Selection, SelectionContext};
use super::signals::evaluate_signals;

/// Stateless analyzer applying one engine configuration to race cards.
#[derive(Debug, Clone)]
pub struct RaceAnalyzer {
    config: EngineConfig,
}

impl RaceAnalyzer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build the candidate view of one runner under the given rule set.
    pub fn assess(&self, record: &RunnerRecord, rules: &RuleSet) -> Candidate {
        let verdict = classify(record, rules, &self.config.toggles);
        let signals = evaluate_signals(record, &self.config.thresholds, &self.config.toggles);

        Candidate {
            number: record.number,
            name: record.name.clone(),
            eligible_by_activity: verdict.by_activity,
            eligible_by_rest: verdict.by_rest,
            eligible_by_odds: verdict.by_odds,
            structural_score: verdict.structural_score,
            sigma_ok: signals.sigma,
            ia_ok: signals.ia,
            elo_ok: signals.elo,
            value_ok: signals.value,
            driver_name: record.driver_name.clone(),
            driver_rating: record.driver_rating,
            driver_tier: DriverTier::from_rating(record.driver_rating),
        }
    }

    pub fn analyze(&self, card: &RaceCard) -> Result<RaceAnalysis, RaceError> {
        let rules = self.config.rules.lookup(&card.discipline)?;
        reject_duplicates(card)?;

        let (eligible, excluded): (Vec<Candidate>, Vec<Candidate>) = card
            .runners
            .iter()
            .map(|record| self.assess(record, rules))
            .partition(Candidate::is_eligible);

        let schema = rank_schema(eligible);
        let signals_defined = self.config.toggles.signals_defined();
        let confidence = estimate_confidence(&schema, signals_defined);

        let selection = select(
            &schema,
            confidence,
            SelectionContext {
                source_id: &card.source_id,
                venue: &card.venue,
                discipline: &card.discipline,
                broad_tickets: rules.broad_tickets,
                venue_floors: &self.config.venue_floors,
            },
        )?;

        debug!(
            source = %card.source_id,
            venue = %card.venue,
            discipline = %card.discipline,
            schema_len = schema.len(),
            confidence,
            seed = selection.seed,
            face = selection.face,
            "race analyzed"
        );

        Ok(RaceAnalysis {
            source_id: card.source_id.clone(),
            venue: card.venue.clone(),
            discipline: card.discipline.clone(),
            signals_defined,
            schema,
            excluded,
            confidence,
            selection,
        })
    }
}

fn reject_duplicates(card: &RaceCard) -> Result<(), RaceError> {
    let mut seen = BTreeSet::new();
    for record in &card.runners {
        if !seen.insert(record.number) {
            warn!(
                source = %card.source_id,
                number = record.number,
                "duplicate runner number rejected"
            );
            return Err(RaceError::DuplicateCandidate(record.number));
        }
    }
    Ok(())
}

/// Full output of one race analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceAnalysis {
    pub source_id: String,
    pub venue: String,
    pub discipline: String,
    pub signals_defined: u8,
    pub schema: Vec<Candidate>,
    pub excluded: Vec<Candidate>,
    pub confidence: f64,
    pub selection: Selection,
}

impl RaceAnalysis {
    /// At least a base and a runner-up passed the domain filter.
    pub fn is_playable(&self) -> bool {
        self.schema.len() >= 2
    }

    pub fn base(&self) -> Option<&Candidate> {
        self.schema.first()
    }

    pub fn ticket(&self) -> &[u32] {
        &self.selection.ticket
    }
}
