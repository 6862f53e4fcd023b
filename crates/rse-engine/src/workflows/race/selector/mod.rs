//! Reproducible ticket selection.
//!
//! The seed is a pure function of the race identifiers and the ordered
//! schema, and the generator lives only for the duration of one call, so two
//! analyses of the same card always roll the same faces.

mod die;
mod seed;
mod ticket;

pub use die::{face_weights, majority_face, roll, DRAW_COUNT, FACES};
pub use seed::{derive_seed, seed_key};
pub use ticket::{ticket_len, BetType};

use serde::Serialize;

use crate::config::VenueFloor;
use crate::error::RaceError;

use super::domain::Candidate;

/// Identifiers and rule switches that shape one selection.
#[derive(Debug, Clone, Copy)]
pub struct SelectionContext<'a> {
    pub source_id: &'a str,
    pub venue: &'a str,
    pub discipline: &'a str,
    pub broad_tickets: bool,
    pub venue_floors: &'a [VenueFloor],
}

/// Audit trail and outcome of the weighted die.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub seed: u64,
    pub draws: [u8; DRAW_COUNT],
    pub face: u8,
    pub ticket: Vec<u32>,
    pub bet_type: BetType,
}

pub fn select(
    schema: &[Candidate],
    confidence: f64,
    context: SelectionContext<'_>,
) -> Result<Selection, RaceError> {
    let schema_ids: Vec<u32> = schema.iter().map(|candidate| candidate.number).collect();
    let seed = derive_seed(
        context.source_id,
        context.venue,
        context.discipline,
        &schema_ids,
    );

    let weights = face_weights(confidence, context.broad_tickets);
    let draws = roll(seed, &weights)?;
    let mut face = majority_face(&draws).unwrap_or(FACES[0]);

    for floor in context.venue_floors {
        if floor.applies_to(context.venue, context.discipline, schema.len()) {
            face = face.max(floor.min_face.min(FACES[FACES.len() - 1]));
        }
    }

    let ticket = schema_ids[..ticket_len(face, schema_ids.len())].to_vec();

    Ok(Selection {
        seed,
        draws,
        face,
        ticket,
        bet_type: BetType::for_face(face, confidence),
    })
}
