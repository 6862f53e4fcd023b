use std::collections::BTreeMap;

use serde::Serialize;

use super::outcome::{MarketOutcome, TicketOutcome};
use crate::workflows::race::RaceAnalysis;

/// Race and hit tallies for one slice of a backtest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HitCounts {
    pub races: u32,
    pub playable: u32,
    pub base_won: u32,
    pub base_placed: u32,
    pub exacta_won: u32,
    pub exacta_placed: u32,
    pub trio: u32,
    /// Races with a winner and at least one priced runner.
    pub priced: u32,
    pub favourite_won: u32,
    pub favourite_placed: u32,
    pub top3_odds_won: u32,
}

impl HitCounts {
    fn record(&mut self, outcome: Option<&TicketOutcome>, market: Option<&MarketOutcome>) {
        self.races += 1;

        if let Some(market) = market {
            self.priced += 1;
            self.favourite_won += u32::from(market.favourite_won);
            self.favourite_placed += u32::from(market.favourite_placed);
            self.top3_odds_won += u32::from(market.winner_in_top3_odds);
        }

        let Some(outcome) = outcome else {
            return;
        };

        self.playable += 1;
        self.base_won += u32::from(outcome.base_won);
        self.base_placed += u32::from(outcome.base_placed);
        self.exacta_won += u32::from(outcome.exacta_won);
        self.exacta_placed += u32::from(outcome.exacta_placed);
        self.trio += u32::from(outcome.trio);
    }

    /// Share of analyzed races that produced a playable ticket.
    pub fn selection_rate(&self) -> f64 {
        ratio(self.playable, self.races)
    }

    /// Share of playable races where `hits` landed.
    pub fn hit_rate(&self, hits: u32) -> f64 {
        ratio(hits, self.playable)
    }

    /// Share of priced races where a market baseline counter landed.
    pub fn market_rate(&self, hits: u32) -> f64 {
        ratio(hits, self.priced)
    }
}

fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        f64::from(numerator) / f64::from(denominator)
    }
}

/// Aggregated backtest statistics, overall and per venue and discipline.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BacktestSummary {
    pub overall: HitCounts,
    pub by_venue: BTreeMap<String, HitCounts>,
    pub by_discipline: BTreeMap<String, HitCounts>,
}

impl BacktestSummary {
    /// Tally one analyzed race; unplayable races or missing outcomes count
    /// toward `races` only. The market baseline is tallied independently of
    /// whether the ticket was playable.
    pub fn record(
        &mut self,
        analysis: &RaceAnalysis,
        outcome: Option<&TicketOutcome>,
        market: Option<&MarketOutcome>,
    ) {
        let outcome = outcome.filter(|_| analysis.is_playable());

        self.overall.record(outcome, market);
        self.by_venue
            .entry(analysis.venue.trim().to_ascii_lowercase())
            .or_default()
            .record(outcome, market);
        self.by_discipline
            .entry(analysis.discipline.trim().to_ascii_lowercase())
            .or_default()
            .record(outcome, market);
    }
}
