use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::{EngineConfigError, RaceError};

/// Domain rules applied to every runner of a discipline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub max_rest_days: u32,
    pub active_only: bool,
    /// Lower odds bound, only enforced when the odds rule is switched on.
    #[serde(default)]
    pub min_odds: f64,
    /// High-variance disciplines push the die towards wide tickets.
    #[serde(default)]
    pub broad_tickets: bool,
}

/// Immutable discipline lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleBook {
    rules: BTreeMap<String, RuleSet>,
}

impl RuleBook {
    pub fn new<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, RuleSet)>,
        K: AsRef<str>,
    {
        let rules = entries
            .into_iter()
            .map(|(key, rule)| (normalize_key(key.as_ref()), rule))
            .collect();
        Self { rules }
    }

    pub fn standard() -> Self {
        Self::new([
            (
                "trot",
                RuleSet {
                    max_rest_days: 30,
                    active_only: true,
                    min_odds: 3.0,
                    broad_tickets: false,
                },
            ),
            (
                "monte",
                RuleSet {
                    max_rest_days: 21,
                    active_only: true,
                    min_odds: 5.0,
                    broad_tickets: false,
                },
            ),
            (
                "plat",
                RuleSet {
                    max_rest_days: 25,
                    active_only: true,
                    min_odds: 4.0,
                    broad_tickets: false,
                },
            ),
            (
                "obstacle",
                RuleSet {
                    max_rest_days: 60,
                    active_only: false,
                    min_odds: 10.0,
                    broad_tickets: true,
                },
            ),
        ])
    }

    /// Resolve the rule set for a discipline key, ignoring case and padding.
    pub fn lookup(&self, discipline: &str) -> Result<&RuleSet, RaceError> {
        self.rules
            .get(&normalize_key(discipline))
            .ok_or_else(|| RaceError::UnknownDiscipline(discipline.trim().to_string()))
    }

    pub fn disciplines(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn normalized(self) -> Self {
        Self::new(self.rules)
    }
}

pub(crate) fn normalize_key(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Global thresholds backing the runner signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    pub sigma_min: f64,
    pub ia_rank_max: f64,
    pub elo_min: f64,
    pub value_odds_min: f64,
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            sigma_min: 55.0,
            ia_rank_max: 5.0,
            elo_min: 1400.0,
            value_odds_min: 6.0,
        }
    }
}

/// Switches for the odds-driven checks that only the legacy mode uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalToggles {
    #[serde(default)]
    pub value_signal: bool,
    #[serde(default)]
    pub odds_rule: bool,
}

impl SignalToggles {
    /// Number of runner signals that can contribute to the signal count.
    pub fn signals_defined(&self) -> u8 {
        if self.value_signal {
            4
        } else {
            3
        }
    }
}

/// Minimum ticket breadth enforced for a venue and discipline on large fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueFloor {
    pub venue: String,
    pub discipline: String,
    pub min_field: usize,
    pub min_face: u8,
}

impl VenueFloor {
    pub fn applies_to(&self, venue: &str, discipline: &str, field: usize) -> bool {
        normalize_key(&self.venue) == normalize_key(venue)
            && normalize_key(&self.discipline) == normalize_key(discipline)
            && field >= self.min_field
    }
}

/// Complete static configuration handed to the race analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub rules: RuleBook,
    #[serde(default)]
    pub thresholds: ThresholdSet,
    #[serde(default)]
    pub toggles: SignalToggles,
    #[serde(default)]
    pub venue_floors: Vec<VenueFloor>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::canonical()
    }
}

impl EngineConfig {
    /// Three signals, no odds checks, no venue floors.
    pub fn canonical() -> Self {
        Self {
            rules: RuleBook::standard(),
            thresholds: ThresholdSet::default(),
            toggles: SignalToggles::default(),
            venue_floors: Vec::new(),
        }
    }

    /// Value signal, odds domain rule and the Vincennes trot floor enabled.
    pub fn legacy() -> Self {
        Self {
            toggles: SignalToggles {
                value_signal: true,
                odds_rule: true,
            },
            venue_floors: vec![VenueFloor {
                venue: "vincennes".to_string(),
                discipline: "trot".to_string(),
                min_field: 6,
                min_face: 2,
            }],
            ..Self::canonical()
        }
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, EngineConfigError> {
        let config: EngineConfig = serde_json::from_reader(reader)?;
        config.validated()
    }

    pub fn from_json_str(raw: &str) -> Result<Self, EngineConfigError> {
        let config: EngineConfig = serde_json::from_str(raw)?;
        config.validated()
    }

    fn validated(mut self) -> Result<Self, EngineConfigError> {
        if self.rules.is_empty() {
            return Err(EngineConfigError::EmptyRuleBook);
        }

        let thresholds = [
            ("sigma_min", self.thresholds.sigma_min),
            ("ia_rank_max", self.thresholds.ia_rank_max),
            ("elo_min", self.thresholds.elo_min),
            ("value_odds_min", self.thresholds.value_odds_min),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() {
                return Err(EngineConfigError::NonFiniteThreshold { name, value });
            }
        }

        self.rules = self.rules.normalized();
        Ok(self)
    }
}
