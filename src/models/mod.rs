//! Intake domain models.
//!
//! The ordering engine consumes customers read-only: it never mutates a
//! record, it only decides the order in which records are handed back.
//!
//! # Domain Mappings
//!
//! | u-triage | Aid intake | Clinic | Support desk |
//! |----------|-----------|--------|--------------|
//! | Customer | Family request | Patient | Ticket |
//! | EmergencyLevel | Hardship class | Triage category | Severity |

mod customer;
mod level;

pub use customer::Customer;
pub use level::EmergencyLevel;
