//! Emergency-level priority ordering for service intake queues.
//!
//! Orders service requests ("customers") by a two-level rule: the
//! emergency level (1 = most urgent) is a hard partition, and a computed
//! score orders customers within a level. The queue is built from explicit
//! per-level chains rather than a library heap, so the ordering policy, the
//! scoring formula and the chain rebalancing step are all visible here.
//!
//! # Modules
//!
//! - **`models`**: `Customer`, `EmergencyLevel`
//! - **`scoring`**: score formula, location rank table, injectable jitter
//! - **`queue`**: `PriorityChain` (index-arena linked chain), `EmergencyQueue`
//! - **`sorter`**: `CustomerSorter`, the sort driver
//! - **`store`**: file-backed keyed store with backup and rollback
//! - **`notify`**: queue position notices
//! - **`intake`**: insert-and-resort plus notice in one step
//! - **`validation`**: record checks before persistence
//!
//! # Example
//!
//! ```
//! use u_triage::models::Customer;
//! use u_triage::scoring::ScoringConfig;
//! use u_triage::sorter::sort_customers;
//!
//! let customers = vec![
//!     Customer::new("C").with_family_size(10).with_emergency_level(2),
//!     Customer::new("D").with_family_size(0).with_emergency_level(1),
//! ];
//! let sorted = sort_customers(customers, &ScoringConfig::deterministic());
//! assert_eq!(sorted[0].id, "D");
//! ```

pub mod error;
pub mod intake;
pub mod models;
pub mod notify;
pub mod queue;
pub mod scoring;
pub mod sorter;
pub mod store;
pub mod validation;

pub use error::{Error, Result};
