// src/pipeline/detect.rs

//! Change detection for counter readings.
//!
//! Compares a fresh reading against the last persisted one and decides
//! whether anything is worth reporting. Only the "accounts used" count is
//! compared: a freed slot shows up there, while a limit change on its own
//! does not open a slot for anyone.

use crate::models::{Action, Reading};

/// Output of [`decide`]: what happened, and what to persist (if anything).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    /// New baseline to store; `None` leaves the stored value untouched
    pub persist: Option<Reading>,
}

/// Decide the action for a freshly extracted reading.
///
/// Total and side-effect free; identical inputs always give identical output.
pub fn decide(current: Reading, previous: Option<Reading>) -> Decision {
    match previous {
        None => Decision {
            action: Action::FirstObservation(current),
            persist: Some(current),
        },
        Some(previous) if previous.current == current.current => Decision {
            action: Action::None,
            persist: None,
        },
        Some(previous) => Decision {
            action: Action::Changed { previous, current },
            persist: Some(current),
        },
    }
}
