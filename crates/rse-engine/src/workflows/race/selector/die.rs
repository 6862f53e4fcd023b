use rand::distributions::{Distribution, WeightedIndex};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::RaceError;

pub const FACES: [u8; 6] = [1, 2, 3, 4, 5, 6];
pub const DRAW_COUNT: usize = 5;

const HIGH_CONFIDENCE: [f64; 6] = [0.35, 0.30, 0.20, 0.10, 0.04, 0.01];
const MEDIUM_CONFIDENCE: [f64; 6] = [0.20, 0.28, 0.24, 0.18, 0.07, 0.03];
const LOW_CONFIDENCE: [f64; 6] = [0.06, 0.12, 0.22, 0.25, 0.22, 0.13];

const BROAD_DAMPING: f64 = 0.25;
const BROAD_TAIL_BOOST: [f64; 6] = [1.0, 1.0, 1.2, 1.5, 1.8, 2.2];

/// Normalized face weights for a confidence level.
pub fn face_weights(confidence: f64, broad_tickets: bool) -> [f64; 6] {
    let base = if confidence >= 0.75 {
        HIGH_CONFIDENCE
    } else if confidence >= 0.50 {
        MEDIUM_CONFIDENCE
    } else {
        LOW_CONFIDENCE
    };

    let mut weights = base;
    if broad_tickets {
        for (weight, boost) in weights.iter_mut().zip(BROAD_TAIL_BOOST) {
            *weight *= BROAD_DAMPING * boost;
        }
    }

    let total: f64 = weights.iter().sum();
    weights.map(|weight| weight / total)
}

/// Roll the weighted die `DRAW_COUNT` times from a generator local to this call.
pub fn roll(seed: u64, weights: &[f64; 6]) -> Result<[u8; DRAW_COUNT], RaceError> {
    let distribution = WeightedIndex::new(weights)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut draws = [0u8; DRAW_COUNT];
    for draw in draws.iter_mut() {
        *draw = FACES[distribution.sample(&mut rng)];
    }
    Ok(draws)
}

/// Most frequent face; among equally frequent faces the one drawn first wins.
pub fn majority_face(draws: &[u8]) -> Option<u8> {
    let count = |face: u8| draws.iter().filter(|&&other| other == face).count();
    let top = draws.iter().map(|&face| count(face)).max()?;
    draws.iter().copied().find(|&face| count(face) == top)
}
