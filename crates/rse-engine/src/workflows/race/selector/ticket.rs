use std::fmt;

use serde::Serialize;

/// Bet family recommended for a face and confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum BetType {
    SimpleWin,
    SimplePlace,
    ExactaWin,
    ExactaPlace,
    Trio,
    Multi(u8),
}

impl BetType {
    pub fn for_face(face: u8, confidence: f64) -> Self {
        match face {
            0 | 1 if confidence >= 0.70 => BetType::SimpleWin,
            0 | 1 => BetType::SimplePlace,
            2 if confidence >= 0.60 => BetType::ExactaWin,
            2 => BetType::ExactaPlace,
            3 => BetType::Trio,
            n => BetType::Multi(n),
        }
    }
}

impl fmt::Display for BetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetType::SimpleWin => write!(f, "Simple Win"),
            BetType::SimplePlace => write!(f, "Simple Place"),
            BetType::ExactaWin => write!(f, "Exacta Win"),
            BetType::ExactaPlace => write!(f, "Exacta Place"),
            BetType::Trio => write!(f, "Trio"),
            BetType::Multi(n) => write!(f, "Multi-{n}"),
        }
    }
}

impl From<BetType> for String {
    fn from(value: BetType) -> Self {
        value.to_string()
    }
}

/// Leading `face` runners of the schema, never fewer than the base when one exists.
pub fn ticket_len(face: u8, schema_len: usize) -> usize {
    usize::from(face.max(1)).min(schema_len)
}
