//! Customer priority scoring.
//!
//! Maps a customer's attributes to a real-valued score used to order
//! customers *within* one emergency level. Higher score = served earlier.
//!
//! # Formula
//!
//! 1. `base = family_size * 20`
//! 2. `family_size >= 5`: `base += (family_size - 4)^2 * 10`
//! 3. `base *= (5 - rank(location)) / 4`
//! 4. location equals the bonus location: `base += 30`
//! 5. `family_size >= 7`: `base += 40`
//! 6. `base += jitter`, jitter in `[0, 2)`
//!
//! Only the exact bonus location string earns the +30; its ranked variants
//! ("West Jerusalem", "East Jerusalem") only get their multiplier.
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod config;

pub use config::{Jitter, LocationRanks, ScoringConfig, MAX_RANK, MIN_RANK};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::Customer;

/// Upper bound (exclusive) of the tie-breaking jitter.
pub const JITTER_SPAN: f64 = 2.0;

const PER_MEMBER: f64 = 20.0;
const LARGE_FAMILY_FROM: u32 = 5;
const LARGE_FAMILY_WEIGHT: f64 = 10.0;
const BONUS_LOCATION_POINTS: f64 = 30.0;
const VERY_LARGE_FAMILY_FROM: u32 = 7;
const VERY_LARGE_FAMILY_POINTS: f64 = 40.0;

/// Computes the score of a customer with an explicit jitter addend.
///
/// Pure: the same customer, config and `jitter` always give the same score.
pub fn score(customer: &Customer, config: &ScoringConfig, jitter: f64) -> f64 {
    let family = customer.family_size;
    let mut base = f64::from(family) * PER_MEMBER;

    if family >= LARGE_FAMILY_FROM {
        let excess = f64::from(family - 4);
        base += excess * excess * LARGE_FAMILY_WEIGHT;
    }

    base *= config.location_ranks.multiplier(&customer.location);

    if config.bonus_location.as_deref() == Some(customer.location.as_str()) {
        base += BONUS_LOCATION_POINTS;
    }

    if family >= VERY_LARGE_FAMILY_FROM {
        base += VERY_LARGE_FAMILY_POINTS;
    }

    base + jitter
}

/// Stateful score calculator for one sort pass.
///
/// Owns the jitter generator derived from [`ScoringConfig::jitter`]; the
/// config itself is borrowed.
#[derive(Debug)]
pub struct Scorer<'a> {
    config: &'a ScoringConfig,
    rng: Option<StdRng>,
}

impl<'a> Scorer<'a> {
    /// Creates a calculator, seeding the jitter generator per the config.
    pub fn new(config: &'a ScoringConfig) -> Self {
        let rng = match config.jitter {
            Jitter::Disabled => None,
            Jitter::Seeded(seed) => Some(StdRng::seed_from_u64(seed)),
            Jitter::Entropy => Some(StdRng::seed_from_u64(rand::random())),
        };
        Self { config, rng }
    }

    /// Scores a customer, drawing one jitter sample if jitter is enabled.
    pub fn score(&mut self, customer: &Customer) -> f64 {
        let jitter = match self.rng.as_mut() {
            Some(rng) => rng.random_range(0.0..JITTER_SPAN),
            None => 0.0,
        };
        score(customer, self.config, jitter)
    }

    /// The configuration this calculator scores with.
    pub fn config(&self) -> &ScoringConfig {
        self.config
    }
}
