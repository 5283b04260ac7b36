//! Customer (service request) model.
//!
//! A customer is one intake request waiting to be served. Identifiers are
//! assigned by the caller; the ordering engine only reads the attributes
//! that feed the score and the emergency level.

use serde::{Deserialize, Serialize};

use super::EmergencyLevel;

/// A service request to be ordered.
///
/// `emergency_level` holds the caller's raw value, which is not guaranteed
/// to be in `1..=4`. Use [`Customer::level`] for the normalized level the
/// queue actually files the customer under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier, assigned externally.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contact address for position notices.
    pub email: String,
    /// Number of people in the household.
    pub family_size: u32,
    /// Raw emergency level (1 = most urgent).
    pub emergency_level: i32,
    /// Free-text location, matched exactly against the rank table.
    pub location: String,
    /// Free-text notes, may be empty.
    #[serde(default)]
    pub notes: String,
}

impl Customer {
    /// Creates a customer with the given ID and least-urgent defaults.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            email: String::new(),
            family_size: 0,
            emergency_level: EmergencyLevel::LEAST_URGENT.get() as i32,
            location: String::new(),
            notes: String::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the contact address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets the household size.
    pub fn with_family_size(mut self, family_size: u32) -> Self {
        self.family_size = family_size;
        self
    }

    /// Sets the raw emergency level.
    pub fn with_emergency_level(mut self, level: i32) -> Self {
        self.emergency_level = level;
        self
    }

    /// Sets the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Sets the notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Normalized emergency level used for queue placement.
    pub fn level(&self) -> EmergencyLevel {
        EmergencyLevel::normalize(self.emergency_level)
    }

    /// Category description for the raw level, or "Unknown level".
    pub fn level_description(&self) -> &'static str {
        EmergencyLevel::from_raw(self.emergency_level)
            .map(EmergencyLevel::description)
            .unwrap_or("Unknown level")
    }
}
