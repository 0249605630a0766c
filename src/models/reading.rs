// src/models/reading.rs

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// One observation of the remote service's capacity.
///
/// Values come from an untrusted source, so nothing is assumed about the
/// ordering of `current` and `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reading {
    /// Accounts currently registered
    pub current: u64,
    /// Maximum accounts the service allows
    pub limit: u64,
}

impl Reading {
    pub fn new(current: u64, limit: u64) -> Self {
        Self { current, limit }
    }

    /// Whether the counter shows room for another signup.
    ///
    /// Only used to word notifications.
    pub fn has_free_slots(&self) -> bool {
        self.current < self.limit
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.current, self.limit)
    }
}

/// Outcome of one decision cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No observable change
    None,
    /// No prior state existed; the reading becomes the baseline
    FirstObservation(Reading),
    /// The account count differs from the persisted one
    Changed { previous: Reading, current: Reading },
    /// The extractor could not produce a reading
    ExtractionFailed(ExtractionError),
}

impl Action {
    /// Short label for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Action::None => "unchanged",
            Action::FirstObservation(_) => "first observation",
            Action::Changed { .. } => "changed",
            Action::ExtractionFailed(_) => "extraction failed",
        }
    }
}

/// Human-readable alert handed to a notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Reading::new(8, 10).to_string(), "8 / 10");
    }

    #[test]
    fn test_free_slots() {
        assert!(Reading::new(8, 10).has_free_slots());
        assert!(!Reading::new(10, 10).has_free_slots());
        assert!(!Reading::new(12, 10).has_free_slots());
    }
}
