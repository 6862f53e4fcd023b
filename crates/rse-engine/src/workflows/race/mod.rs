//! Race card classification, schema ranking and ticket selection.
//!
//! A card flows through the domain classifier, the signal checks and the
//! driver grading once per runner. Eligible runners form the schema, which
//! drives the confidence estimate and the seeded die that sizes the ticket.

mod analyzer;
mod classifier;
pub mod confidence;
pub mod domain;
pub mod driver;
pub mod schema;
pub mod selector;
mod signals;

#[cfg(test)]
mod tests;

pub use analyzer::{RaceAnalysis, RaceAnalyzer};
pub use confidence::{clamp01, estimate_confidence};
pub use domain::{Candidate, RaceCard, RunnerRecord, SignalState};
pub use driver::{driver_impact, DriverTier};
pub use schema::rank_schema;
pub use selector::{BetType, Selection};
