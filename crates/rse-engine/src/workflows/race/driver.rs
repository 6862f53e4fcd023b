use serde::{Deserialize, Serialize};

const STRONG_RATING: f64 = 1600.0;
const BONUS_RATING: f64 = 1500.0;
const AVERAGE_RATING: f64 = 1450.0;

/// Driver or jockey grade derived from their rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriverTier {
    Strong,
    #[default]
    Average,
    Weak,
}

impl DriverTier {
    /// Unknown ratings grade as average.
    pub fn from_rating(rating: Option<f64>) -> Self {
        match rating {
            None => DriverTier::Average,
            Some(rating) if rating >= STRONG_RATING => DriverTier::Strong,
            Some(rating) if rating >= AVERAGE_RATING => DriverTier::Average,
            Some(_) => DriverTier::Weak,
        }
    }

    pub const fn rank_ordinal(self) -> u8 {
        match self {
            DriverTier::Strong => 2,
            DriverTier::Average => 1,
            DriverTier::Weak => 0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DriverTier::Strong => "STRONG",
            DriverTier::Average => "AVERAGE",
            DriverTier::Weak => "WEAK",
        }
    }
}

/// Confidence adjustment contributed by the base runner's driver.
pub fn driver_impact(rating: Option<f64>) -> f64 {
    match rating {
        None => 0.0,
        Some(rating) if rating >= STRONG_RATING => 0.12,
        Some(rating) if rating >= BONUS_RATING => 0.05,
        Some(rating) if rating >= AVERAGE_RATING => 0.0,
        Some(_) => -0.10,
    }
}
