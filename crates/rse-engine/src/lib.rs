pub mod config;
pub mod error;
pub mod workflows;

pub use config::{EngineConfig, RuleBook, RuleSet, SignalToggles, ThresholdSet, VenueFloor};
pub use error::{EngineConfigError, RaceError};
