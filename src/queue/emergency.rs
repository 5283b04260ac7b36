//! Emergency priority queue: one chain per emergency level.

use std::borrow::Borrow;

use tracing::trace;

use super::{ChainEntry, PriorityChain};
use crate::models::{Customer, EmergencyLevel};
use crate::scoring::Scorer;

/// A chain is rebalanced as soon as its length exceeds this.
pub const DEFAULT_REBALANCE_THRESHOLD: usize = 8;

/// An entry handed back by [`EmergencyQueue::extract`].
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedCustomer<C> {
    /// The customer (owned or borrowed, as inserted).
    pub customer: C,
    /// Normalized level the customer was filed under.
    pub level: EmergencyLevel,
    /// Score computed at insertion.
    pub score: f64,
}

/// Four priority chains indexed by emergency level.
///
/// Generic over anything that borrows as a [`Customer`], so a sort pass can
/// queue owned records or references into the caller's collection.
#[derive(Debug)]
pub struct EmergencyQueue<'a, C> {
    chains: [PriorityChain<C>; EmergencyLevel::COUNT],
    total: usize,
    scorer: Scorer<'a>,
    rebalance_threshold: usize,
    rebalances: usize,
}

impl<'a, C: Borrow<Customer>> EmergencyQueue<'a, C> {
    /// Creates an empty queue scoring with `scorer`.
    pub fn new(scorer: Scorer<'a>) -> Self {
        Self {
            chains: std::array::from_fn(|_| PriorityChain::new()),
            total: 0,
            scorer,
            rebalance_threshold: DEFAULT_REBALANCE_THRESHOLD,
            rebalances: 0,
        }
    }

    /// Sets the chain length above which a chain is rebalanced.
    pub fn with_rebalance_threshold(mut self, threshold: usize) -> Self {
        self.rebalance_threshold = threshold;
        self
    }

    /// Scores and files a customer under its normalized level.
    ///
    /// Levels outside `1..=4` are filed under 4. If the target chain grows
    /// past the rebalance threshold it is rebalanced immediately.
    pub fn insert(&mut self, customer: C) {
        let (level, score) = {
            let c: &Customer = customer.borrow();
            let level = c.level();
            let score = self.scorer.score(c);
            trace!(id = %c.id, %level, score, "queueing customer");
            (level, score)
        };

        let chain = &mut self.chains[level.index()];
        chain.insert(ChainEntry::new(customer, score));
        if chain.len() > self.rebalance_threshold && chain.rebalance().is_some() {
            self.rebalances += 1;
        }

        self.total += 1;
    }

    /// Removes the head of the most urgent non-empty level.
    ///
    /// Returns `None` when every level is empty.
    pub fn extract(&mut self) -> Option<QueuedCustomer<C>> {
        for level in EmergencyLevel::ALL {
            if let Some(entry) = self.chains[level.index()].extract_head() {
                self.total -= 1;
                return Some(QueuedCustomer {
                    customer: entry.item,
                    level,
                    score: entry.score,
                });
            }
        }
        None
    }

    /// The entry [`extract`](Self::extract) would return next.
    pub fn peek(&self) -> Option<(EmergencyLevel, &ChainEntry<C>)> {
        EmergencyLevel::ALL
            .into_iter()
            .find_map(|level| self.chains[level.index()].peek().map(|e| (level, e)))
    }

    /// Total number of queued entries.
    pub fn len(&self) -> usize {
        self.total
    }

    /// Whether no entries are queued.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of chain rebalances performed since construction.
    pub fn rebalance_count(&self) -> usize {
        self.rebalances
    }

    /// The chain for one level.
    pub fn chain(&self, level: EmergencyLevel) -> &PriorityChain<C> {
        &self.chains[level.index()]
    }

    /// Number of entries queued at one level.
    pub fn level_len(&self, level: EmergencyLevel) -> usize {
        self.chains[level.index()].len()
    }
}
