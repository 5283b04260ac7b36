//! Sort driver: load a working set into an [`EmergencyQueue`] and drain it.
//!
//! # Algorithm
//!
//! 1. Build a fresh queue (and a fresh jitter generator) for the pass.
//! 2. Insert every customer in input order.
//! 3. Extract until empty.
//!
//! # Complexity
//! O(n * k) insertion where k is the target chain's length, O(n) extraction.
//! Degrades toward O(n^2) when most customers share one level.

use std::borrow::Borrow;

use tracing::debug;

use crate::error::Result;
use crate::models::Customer;
use crate::queue::{EmergencyQueue, QueuedCustomer, DEFAULT_REBALANCE_THRESHOLD};
use crate::scoring::{Scorer, ScoringConfig};

/// Orders customers by emergency level, then by score.
///
/// # Example
///
/// ```
/// use u_triage::models::Customer;
/// use u_triage::scoring::ScoringConfig;
/// use u_triage::sorter::CustomerSorter;
///
/// let sorter = CustomerSorter::new(ScoringConfig::deterministic());
/// let sorted = sorter.sort(vec![
///     Customer::new("A").with_family_size(3).with_emergency_level(1).with_location("Ramallah"),
///     Customer::new("B").with_family_size(8).with_emergency_level(1).with_location("Jerusalem"),
/// ]);
/// assert_eq!(sorted[0].id, "B");
/// ```
#[derive(Debug, Clone)]
pub struct CustomerSorter {
    config: ScoringConfig,
    rebalance_threshold: usize,
}

impl CustomerSorter {
    /// Creates a sorter with the given scoring configuration.
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            rebalance_threshold: DEFAULT_REBALANCE_THRESHOLD,
        }
    }

    /// Creates a sorter after validating the configuration.
    pub fn try_new(config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Sets the chain length above which a chain is rebalanced.
    pub fn with_rebalance_threshold(mut self, threshold: usize) -> Self {
        self.rebalance_threshold = threshold;
        self
    }

    /// The scoring configuration.
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Returns the customers in service order.
    ///
    /// Accepts owned records or references; hands back the same items.
    pub fn sort<C, I>(&self, customers: I) -> Vec<C>
    where
        C: Borrow<Customer>,
        I: IntoIterator<Item = C>,
    {
        self.sort_scored(customers)
            .into_iter()
            .map(|q| q.customer)
            .collect()
    }

    /// Like [`sort`](Self::sort), keeping each customer's level and score.
    pub fn sort_scored<C, I>(&self, customers: I) -> Vec<QueuedCustomer<C>>
    where
        C: Borrow<Customer>,
        I: IntoIterator<Item = C>,
    {
        let mut queue = EmergencyQueue::new(Scorer::new(&self.config))
            .with_rebalance_threshold(self.rebalance_threshold);

        for customer in customers {
            queue.insert(customer);
        }

        let mut sorted = Vec::with_capacity(queue.len());
        while let Some(entry) = queue.extract() {
            sorted.push(entry);
        }

        debug!(count = sorted.len(), "sorted customers");
        sorted
    }
}

impl Default for CustomerSorter {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

/// Sorts customers with the given configuration.
pub fn sort_customers(customers: Vec<Customer>, config: &ScoringConfig) -> Vec<Customer> {
    CustomerSorter::new(config.clone()).sort(customers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{score, Jitter};
    use proptest::prelude::*;

    fn customer(id: &str, family: u32, level: i32, location: &str) -> Customer {
        Customer::new(id)
            .with_family_size(family)
            .with_emergency_level(level)
            .with_location(location)
    }

    fn ids(customers: &[Customer]) -> Vec<&str> {
        customers.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_empty_input() {
        let sorted = sort_customers(Vec::new(), &ScoringConfig::default());
        assert!(sorted.is_empty());
    }

    #[test]
    fn test_score_breaks_ties_within_level() {
        let sorter = CustomerSorter::new(ScoringConfig::deterministic());
        let sorted = sorter.sort(vec![
            customer("A", 3, 1, "Ramallah"),
            customer("B", 8, 1, "Jerusalem"),
        ]);
        assert_eq!(ids(&sorted), vec!["B", "A"]);
    }

    #[test]
    fn test_level_beats_score() {
        let sorter = CustomerSorter::new(ScoringConfig::deterministic());
        let sorted = sorter.sort(vec![
            customer("C", 12, 2, "Jerusalem"),
            customer("D", 0, 1, "Nablus"),
        ]);
        assert_eq!(ids(&sorted), vec!["D", "C"]);
    }

    #[test]
    fn test_invalid_levels_sort_with_level_four() {
        let sorter = CustomerSorter::new(ScoringConfig::deterministic());
        let sorted = sorter.sort_scored(vec![
            customer("zero", 1, 0, "Jericho"),
            customer("three", 1, 3, "Jericho"),
            customer("five", 9, 5, "Jericho"),
            customer("neg", 4, -1, "Jericho"),
        ]);
        let order: Vec<_> = sorted.iter().map(|q| q.customer.id.as_str()).collect();
        assert_eq!(order, vec!["three", "five", "neg", "zero"]);
        assert!(sorted[1..].iter().all(|q| q.level.get() == 4));
    }

    #[test]
    fn test_sort_borrowed() {
        let records = vec![
            customer("a", 2, 4, "Jenin"),
            customer("b", 2, 1, "Jenin"),
            customer("c", 6, 4, "Jerusalem"),
        ];
        let sorter = CustomerSorter::new(ScoringConfig::deterministic());
        let sorted: Vec<&Customer> = sorter.sort(&records);
        let order: Vec<_> = sorted.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_seeded_passes_agree() {
        let sorter = CustomerSorter::new(ScoringConfig::default().with_jitter(Jitter::Seeded(11)));
        let input: Vec<Customer> = (0..30)
            .map(|i| customer(&format!("c{i}"), i % 3, (i % 2) as i32 + 1, "Ramallah"))
            .collect();
        let first = sorter.sort(input.clone());
        let second = sorter.sort(input);
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn test_try_new_rejects_bad_config() {
        let config = ScoringConfig::default().with_location_ranks(
            crate::scoring::LocationRanks::new(9),
        );
        assert!(CustomerSorter::try_new(config).is_err());
    }

    fn arb_customers() -> impl Strategy<Value = Vec<Customer>> {
        let location = prop::sample::select(vec![
            "Jerusalem",
            "West Jerusalem",
            "East Jerusalem",
            "Ramallah",
        ]);
        prop::collection::vec((0u32..12, -2i32..7, location), 0..40).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (family, level, location))| {
                    customer(&format!("c{i}"), family, level, location)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_levels_non_decreasing(input in arb_customers()) {
            let sorted = CustomerSorter::default().sort(input.clone());
            prop_assert_eq!(sorted.len(), input.len());
            for pair in sorted.windows(2) {
                prop_assert!(pair[0].level() <= pair[1].level());
            }
        }

        #[test]
        fn prop_scores_non_increasing_within_level(input in arb_customers()) {
            let config = ScoringConfig::deterministic();
            let sorted = CustomerSorter::new(config.clone()).sort(input);
            for pair in sorted.windows(2) {
                if pair[0].level() == pair[1].level() {
                    prop_assert!(score(&pair[0], &config, 0.0) >= score(&pair[1], &config, 0.0));
                }
            }
        }

        #[test]
        fn prop_stable_for_equal_keys(input in arb_customers()) {
            let config = ScoringConfig::deterministic();
            let sorted = CustomerSorter::new(config.clone()).sort(input.clone());
            let position = |id: &str| input.iter().position(|c| c.id == id).unwrap();
            for pair in sorted.windows(2) {
                let same_level = pair[0].level() == pair[1].level();
                let same_score = score(&pair[0], &config, 0.0) == score(&pair[1], &config, 0.0);
                if same_level && same_score {
                    prop_assert!(position(pair[0].id.as_str()) < position(pair[1].id.as_str()));
                }
            }
        }

        #[test]
        fn prop_deterministic_without_jitter(input in arb_customers()) {
            let sorter = CustomerSorter::new(ScoringConfig::deterministic());
            let first = sorter.sort(input.clone());
            let second = sorter.sort(input);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_output_is_permutation(input in arb_customers()) {
            let sorted = CustomerSorter::default().sort(input.clone());
            let mut a: Vec<_> = input.iter().map(|c| c.id.clone()).collect();
            let mut b: Vec<_> = sorted.iter().map(|c| c.id.clone()).collect();
            a.sort();
            b.sort();
            prop_assert_eq!(a, b);
        }
    }
}
