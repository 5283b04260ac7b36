//! Two-level priority queue.
//!
//! Emergency level is a hard partition: every entry at level 1 is extracted
//! before any entry at level 2, whatever the scores. Within a level, entries
//! leave in descending score order, ties in arrival order.
//!
//! # Structure
//!
//! - [`PriorityChain`]: one score-ordered chain, index-arena backed.
//! - [`EmergencyQueue`]: four chains, one per level, plus a total counter.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 6.5 (Priority Queues)

mod chain;
mod emergency;

pub use chain::{ChainEntry, Iter, PriorityChain, RebalanceSummary, MIN_REBALANCE_LEN};
pub use emergency::{EmergencyQueue, QueuedCustomer, DEFAULT_REBALANCE_THRESHOLD};
