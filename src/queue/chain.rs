//! Per-level priority chain.
//!
//! A singly linked sequence of `(item, score)` entries kept in
//! non-increasing score order from head to tail. Nodes live in an index
//! arena: links are slot indices, vacated slots are recycled through a free
//! list, so removing the head is O(1) and ordered insertion is O(k).
//!
//! Ties keep arrival order: a new entry is placed after every entry whose
//! score is greater than *or equal to* its own.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 10.2 (Linked Lists)
//! and Ch. 10.3 (Implementing Pointers and Objects)

use std::mem;

use tracing::debug;

/// Chains at or below this length are left alone by [`PriorityChain::rebalance`].
pub const MIN_REBALANCE_LEN: usize = 5;

/// One item paired with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainEntry<T> {
    /// The queued item.
    pub item: T,
    /// Priority score (higher = earlier).
    pub score: f64,
}

impl<T> ChainEntry<T> {
    /// Pairs an item with its score.
    pub fn new(item: T, score: f64) -> Self {
        Self { item, score }
    }
}

/// Outcome of a rebalance pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RebalanceSummary {
    /// Mean score the chain was partitioned on.
    pub mean: f64,
    /// Entries with score `>= mean`, reinserted first.
    pub at_or_above: usize,
    /// Entries with score `< mean`, reinserted second.
    pub below: usize,
}

#[derive(Debug, Clone)]
struct Node<T> {
    entry: ChainEntry<T>,
    next: Option<usize>,
}

#[derive(Debug, Clone)]
enum Slot<T> {
    Occupied(Node<T>),
    Vacant,
}

/// Score-ordered chain of entries for a single emergency level.
#[derive(Debug, Clone)]
pub struct PriorityChain<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> PriorityChain<T> {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the chain holds no entries.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Inserts an entry, keeping scores non-increasing from the head.
    ///
    /// An entry strictly above the head becomes the new head. Otherwise the
    /// walk advances past every entry scoring `>=` the new one and inserts
    /// before the first strictly lower entry, or at the tail.
    pub fn insert(&mut self, entry: ChainEntry<T>) {
        let score = entry.score;
        let head = match self.head {
            None => {
                let idx = self.alloc(entry, None);
                self.head = Some(idx);
                self.tail = Some(idx);
                self.len += 1;
                return;
            }
            Some(head) => head,
        };

        if score > self.node(head).entry.score {
            let idx = self.alloc(entry, Some(head));
            self.head = Some(idx);
            self.len += 1;
            return;
        }

        // head.score >= score, so the new entry goes somewhere after head.
        let mut prev = head;
        let mut cursor = self.node(head).next;
        while let Some(current) = cursor {
            let node = self.node(current);
            if node.entry.score < score {
                break;
            }
            prev = current;
            cursor = node.next;
        }

        let idx = self.alloc(entry, cursor);
        self.node_mut(prev).next = Some(idx);
        if cursor.is_none() {
            self.tail = Some(idx);
        }
        self.len += 1;
    }

    /// Removes and returns the highest-scoring entry, or `None` if empty.
    pub fn extract_head(&mut self) -> Option<ChainEntry<T>> {
        let head = self.head?;
        let node = match mem::replace(&mut self.slots[head], Slot::Vacant) {
            Slot::Occupied(node) => node,
            Slot::Vacant => unreachable!("chain head points at a vacant slot"),
        };

        self.head = node.next;
        self.len -= 1;
        if self.head.is_none() {
            self.tail = None;
            self.slots.clear();
            self.free.clear();
        } else {
            self.free.push(head);
        }

        Some(node.entry)
    }

    /// The highest-scoring entry without removing it.
    pub fn peek(&self) -> Option<&ChainEntry<T>> {
        self.head.map(|h| &self.node(h).entry)
    }

    /// The lowest-scoring entry without removing it.
    pub fn peek_tail(&self) -> Option<&ChainEntry<T>> {
        self.tail.map(|t| &self.node(t).entry)
    }

    /// Iterates entries from head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            chain: self,
            cursor: self.head,
        }
    }

    /// Whether scores are non-increasing from head to tail.
    pub fn is_ordered(&self) -> bool {
        let mut iter = self.iter();
        let Some(mut prev) = iter.next() else {
            return true;
        };
        for entry in iter {
            if entry.score > prev.score {
                return false;
            }
            prev = entry;
        }
        true
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Reorganizes the chain around its mean score.
    ///
    /// Entries are split into `score >= mean` and `score < mean` groups
    /// (each keeping chain order), the chain is cleared, and the two groups
    /// are reinserted in that order through [`insert`](Self::insert). The
    /// entry set and the sorted order are unchanged afterwards, including
    /// the relative order of equal scores.
    ///
    /// Chains of [`MIN_REBALANCE_LEN`] entries or fewer are left untouched
    /// and `None` is returned.
    pub fn rebalance(&mut self) -> Option<RebalanceSummary> {
        if self.len <= MIN_REBALANCE_LEN {
            return None;
        }

        let total: f64 = self.iter().map(|e| e.score).sum();
        let mean = total / self.len as f64;

        let mut at_or_above = Vec::with_capacity(self.len);
        let mut below = Vec::new();
        while let Some(entry) = self.extract_head() {
            if entry.score >= mean {
                at_or_above.push(entry);
            } else {
                below.push(entry);
            }
        }

        let summary = RebalanceSummary {
            mean,
            at_or_above: at_or_above.len(),
            below: below.len(),
        };

        for entry in at_or_above.into_iter().chain(below) {
            self.insert(entry);
        }

        debug!(
            mean = summary.mean,
            at_or_above = summary.at_or_above,
            below = summary.below,
            "rebalanced priority chain"
        );

        Some(summary)
    }

    fn alloc(&mut self, entry: ChainEntry<T>, next: Option<usize>) -> usize {
        let node = Slot::Occupied(Node { entry, next });
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = node;
                idx
            }
            None => {
                self.slots.push(node);
                self.slots.len() - 1
            }
        }
    }

    fn node(&self, idx: usize) -> &Node<T> {
        match &self.slots[idx] {
            Slot::Occupied(node) => node,
            Slot::Vacant => unreachable!("chain link points at a vacant slot"),
        }
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<T> {
        match &mut self.slots[idx] {
            Slot::Occupied(node) => node,
            Slot::Vacant => unreachable!("chain link points at a vacant slot"),
        }
    }
}

impl<T> Default for PriorityChain<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Head-to-tail iterator over a [`PriorityChain`].
#[derive(Debug)]
pub struct Iter<'a, T> {
    chain: &'a PriorityChain<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a ChainEntry<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.chain.node(self.cursor?);
        self.cursor = node.next;
        Some(&node.entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.chain.len))
    }
}

impl<'a, T> IntoIterator for &'a PriorityChain<T> {
    type Item = &'a ChainEntry<T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_of(scores: &[(&'static str, f64)]) -> PriorityChain<&'static str> {
        let mut chain = PriorityChain::new();
        for &(id, score) in scores {
            chain.insert(ChainEntry::new(id, score));
        }
        chain
    }

    fn ids(chain: &PriorityChain<&'static str>) -> Vec<&'static str> {
        chain.iter().map(|e| e.item).collect()
    }

    #[test]
    fn test_empty_chain() {
        let mut chain: PriorityChain<u32> = PriorityChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
        assert!(chain.peek().is_none());
        assert!(chain.extract_head().is_none());
        assert!(chain.is_ordered());
    }

    #[test]
    fn test_insert_orders_descending() {
        let chain = chain_of(&[("a", 10.0), ("b", 30.0), ("c", 20.0), ("d", 5.0)]);
        assert_eq!(ids(&chain), vec!["b", "c", "a", "d"]);
        assert_eq!(chain.len(), 4);
        assert_eq!(chain.peek().map(|e| e.item), Some("b"));
        assert_eq!(chain.peek_tail().map(|e| e.item), Some("d"));
        assert!(chain.is_ordered());
    }

    #[test]
    fn test_ties_keep_arrival_order() {
        let chain = chain_of(&[("a", 10.0), ("b", 10.0), ("c", 20.0), ("d", 10.0)]);
        assert_eq!(ids(&chain), vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_tie_with_head_goes_after_head() {
        let chain = chain_of(&[("a", 10.0), ("b", 10.0)]);
        assert_eq!(ids(&chain), vec!["a", "b"]);
    }

    #[test]
    fn test_tail_tracks_insertions() {
        let mut chain = chain_of(&[("a", 10.0), ("b", 5.0)]);
        chain.insert(ChainEntry::new("c", 1.0));
        assert_eq!(chain.peek_tail().map(|e| e.item), Some("c"));
        chain.insert(ChainEntry::new("d", 7.0));
        assert_eq!(chain.peek_tail().map(|e| e.item), Some("c"));
    }

    #[test]
    fn test_extract_in_score_order() {
        let mut chain = chain_of(&[("a", 1.0), ("b", 3.0), ("c", 2.0)]);
        let order: Vec<_> = std::iter::from_fn(|| chain.extract_head())
            .map(|e| e.item)
            .collect();
        assert_eq!(order, vec!["b", "c", "a"]);
        assert!(chain.is_empty());
        assert!(chain.peek_tail().is_none());
    }

    #[test]
    fn test_slots_are_reused() {
        let mut chain = chain_of(&[("a", 3.0), ("b", 2.0), ("c", 1.0)]);
        chain.extract_head();
        chain.insert(ChainEntry::new("d", 2.5));
        assert_eq!(chain.slots.len(), 3);
        assert_eq!(ids(&chain), vec!["d", "b", "c"]);
    }

    #[test]
    fn test_rebalance_small_chain_is_noop() {
        let mut chain = chain_of(&[("a", 1.0), ("b", 2.0), ("c", 3.0)]);
        assert!(chain.rebalance().is_none());
        assert_eq!(ids(&chain), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_rebalance_preserves_entries_and_order() {
        let input = [
            ("a", 12.0),
            ("b", 40.0),
            ("c", 3.0),
            ("d", 40.0),
            ("e", 27.5),
            ("f", 3.0),
            ("g", 19.0),
            ("h", 8.0),
            ("i", 40.0),
        ];
        let mut chain = chain_of(&input);
        let before: Vec<_> = chain.iter().cloned().collect();
        assert!(chain.is_ordered());

        let summary = chain.rebalance().unwrap();
        let total: f64 = input.iter().map(|(_, s)| s).sum();
        assert!((summary.mean - total / 9.0).abs() < 1e-9);
        assert_eq!(summary.at_or_above + summary.below, 9);

        let after: Vec<_> = chain.iter().cloned().collect();
        assert_eq!(before, after);
        assert!(chain.is_ordered());
        assert_eq!(chain.len(), 9);
    }

    #[test]
    fn test_rebalance_equal_scores() {
        let mut chain = chain_of(&[
            ("a", 5.0),
            ("b", 5.0),
            ("c", 5.0),
            ("d", 5.0),
            ("e", 5.0),
            ("f", 5.0),
            ("g", 5.0),
        ]);
        let summary = chain.rebalance().unwrap();
        assert_eq!(summary.at_or_above, 7);
        assert_eq!(summary.below, 0);
        assert_eq!(ids(&chain), vec!["a", "b", "c", "d", "e", "f", "g"]);
    }

    #[test]
    fn test_clear() {
        let mut chain = chain_of(&[("a", 1.0), ("b", 2.0)]);
        chain.clear();
        assert!(chain.is_empty());
        assert_eq!(chain.iter().count(), 0);
    }
}
