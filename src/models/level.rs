//! Emergency level classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized emergency level in `1..=4`.
///
/// Level 1 is the most urgent and strictly outranks every other level,
/// regardless of score. Raw caller values outside the range are not errors;
/// they fold into the least urgent level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EmergencyLevel(u8);

impl EmergencyLevel {
    /// Most urgent level.
    pub const MOST_URGENT: EmergencyLevel = EmergencyLevel(1);
    /// Least urgent level, also the fallback for out-of-range input.
    pub const LEAST_URGENT: EmergencyLevel = EmergencyLevel(4);
    /// Number of distinct levels.
    pub const COUNT: usize = 4;
    /// All levels in extraction order (most urgent first).
    pub const ALL: [EmergencyLevel; 4] = [
        EmergencyLevel(1),
        EmergencyLevel(2),
        EmergencyLevel(3),
        EmergencyLevel(4),
    ];

    /// Maps a raw level to `1..=4`; anything else (0, negatives, 5+) becomes 4.
    pub fn normalize(raw: i32) -> Self {
        match raw {
            1..=4 => EmergencyLevel(raw as u8),
            _ => Self::LEAST_URGENT,
        }
    }

    /// Returns the level if `raw` is already in range.
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            1..=4 => Some(EmergencyLevel(raw as u8)),
            _ => None,
        }
    }

    /// Numeric level (1..=4).
    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based slot (0..=3) used for per-level storage.
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    /// Human-readable hardship category.
    pub fn description(self) -> &'static str {
        match self.0 {
            1 => "Displacement/Asylum",
            2 => "Disabled people-can't work",
            3 => "Elderly",
            _ => "Family without breadwinner/Unemployment",
        }
    }
}

impl Default for EmergencyLevel {
    fn default() -> Self {
        Self::LEAST_URGENT
    }
}

impl fmt::Display for EmergencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_in_range() {
        for raw in 1..=4 {
            assert_eq!(EmergencyLevel::normalize(raw).get() as i32, raw);
        }
    }

    #[test]
    fn test_normalize_out_of_range_falls_to_least_urgent() {
        for raw in [0, 5, -1, i32::MIN, i32::MAX] {
            assert_eq!(EmergencyLevel::normalize(raw), EmergencyLevel::LEAST_URGENT);
        }
    }

    #[test]
    fn test_from_raw_rejects_out_of_range() {
        assert_eq!(EmergencyLevel::from_raw(2), Some(EmergencyLevel::ALL[1]));
        assert_eq!(EmergencyLevel::from_raw(0), None);
        assert_eq!(EmergencyLevel::from_raw(7), None);
    }

    #[test]
    fn test_index_and_ordering() {
        let indices: Vec<usize> = EmergencyLevel::ALL.iter().map(|l| l.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert!(EmergencyLevel::MOST_URGENT < EmergencyLevel::LEAST_URGENT);
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(EmergencyLevel::MOST_URGENT.description(), "Displacement/Asylum");
        assert_eq!(EmergencyLevel::normalize(3).description(), "Elderly");
        assert_eq!(EmergencyLevel::MOST_URGENT.to_string(), "L1");
    }
}
