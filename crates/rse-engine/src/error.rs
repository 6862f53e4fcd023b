/// Fatal conditions raised while analyzing a race card.
#[derive(Debug, thiserror::Error)]
pub enum RaceError {
    #[error("no rule set configured for discipline '{0}'")]
    UnknownDiscipline(String),
    #[error("runner number {0} appears more than once in the race card")]
    DuplicateCandidate(u32),
    #[error("die weights cannot be sampled: {0}")]
    InvalidDieWeights(#[from] rand::distributions::WeightedError),
}

/// Errors raised while loading an engine configuration document.
#[derive(Debug, thiserror::Error)]
pub enum EngineConfigError {
    #[error("invalid engine configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("rule book must define at least one discipline")]
    EmptyRuleBook,
    #[error("threshold '{name}' must be finite (found {value})")]
    NonFiniteThreshold { name: &'static str, value: f64 },
}
