//! Scoring configuration: location ranks, bonus location and jitter mode.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};

/// Best (most favoured) location rank.
pub const MIN_RANK: u8 = 1;
/// Worst location rank. Ranks map to multipliers `(5 - rank) / 4`.
pub const MAX_RANK: u8 = 4;

/// Exact-match location → rank table with a fallback rank.
///
/// Rank 1 yields a multiplier of 1.0, rank 4 yields 0.25.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRanks {
    /// Ranks keyed by the exact location string.
    pub ranks: HashMap<String, u8>,
    /// Rank for any location not in the table.
    pub default_rank: u8,
}

impl LocationRanks {
    /// Creates an empty table where every location gets `default_rank`.
    pub fn new(default_rank: u8) -> Self {
        Self {
            ranks: HashMap::new(),
            default_rank,
        }
    }

    /// Adds or replaces the rank for a location.
    pub fn with_rank(mut self, location: impl Into<String>, rank: u8) -> Self {
        self.ranks.insert(location.into(), rank);
        self
    }

    /// Rank for `location` (exact, case-sensitive match).
    pub fn rank_of(&self, location: &str) -> u8 {
        self.ranks.get(location).copied().unwrap_or(self.default_rank)
    }

    /// Score multiplier for `location`: 1.0 for rank 1 down to 0.25 for rank 4.
    pub fn multiplier(&self, location: &str) -> f64 {
        (5.0 - f64::from(self.rank_of(location))) / 4.0
    }
}

impl Default for LocationRanks {
    fn default() -> Self {
        LocationRanks::new(MAX_RANK)
            .with_rank("Jerusalem", 1)
            .with_rank("West Jerusalem", 2)
            .with_rank("East Jerusalem", 3)
    }
}

/// Source of the tie-breaking addend drawn from `[0, 2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Jitter {
    /// No jitter; scores are a pure function of the customer.
    Disabled,
    /// Jitter from a generator seeded with this value at the start of every
    /// sort pass, so repeated passes over the same input agree.
    Seeded(u64),
    /// Jitter from a freshly seeded generator on every pass.
    #[default]
    Entropy,
}

/// Configuration for the score calculator.
///
/// # Examples
///
/// ```
/// use u_triage::scoring::{Jitter, LocationRanks, ScoringConfig};
///
/// let config = ScoringConfig::default()
///     .with_location_ranks(LocationRanks::new(4).with_rank("Hebron", 1))
///     .with_bonus_location(None::<String>)
///     .with_jitter(Jitter::Disabled);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Location rank table.
    #[serde(default)]
    pub location_ranks: LocationRanks,
    /// Location that receives the flat +30 bonus (exact match only).
    #[serde(default = "default_bonus_location")]
    pub bonus_location: Option<String>,
    /// Tie-break jitter mode.
    #[serde(default)]
    pub jitter: Jitter,
}

fn default_bonus_location() -> Option<String> {
    Some("Jerusalem".to_string())
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            location_ranks: LocationRanks::default(),
            bonus_location: default_bonus_location(),
            jitter: Jitter::default(),
        }
    }
}

impl ScoringConfig {
    /// Default tables with jitter disabled.
    pub fn deterministic() -> Self {
        Self::default().with_jitter(Jitter::Disabled)
    }

    pub fn with_location_ranks(mut self, ranks: LocationRanks) -> Self {
        self.location_ranks = ranks;
        self
    }

    pub fn with_bonus_location(mut self, location: Option<impl Into<String>>) -> Self {
        self.bonus_location = location.map(Into::into);
        self
    }

    pub fn with_jitter(mut self, jitter: Jitter) -> Self {
        self.jitter = jitter;
        self
    }

    /// Validates the configuration.
    ///
    /// Every rank, including the fallback, must lie in `1..=4` so the
    /// multiplier stays within `[0.25, 1.0]`.
    pub fn validate(&self) -> Result<()> {
        let in_range = |rank: u8| (MIN_RANK..=MAX_RANK).contains(&rank);

        if !in_range(self.location_ranks.default_rank) {
            return Err(Error::InvalidConfig(format!(
                "default_rank must be in {MIN_RANK}..={MAX_RANK}, got {}",
                self.location_ranks.default_rank
            )));
        }

        let mut bad: Vec<String> = self
            .location_ranks
            .ranks
            .iter()
            .filter(|(_, &rank)| !in_range(rank))
            .map(|(location, rank)| format!("'{location}' = {rank}"))
            .collect();
        if !bad.is_empty() {
            bad.sort();
            return Err(Error::InvalidConfig(format!(
                "location ranks must be in {MIN_RANK}..={MAX_RANK}: {}",
                bad.join(", ")
            )));
        }

        Ok(())
    }
}
