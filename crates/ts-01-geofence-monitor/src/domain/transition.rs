//! Membership transition table
//!
//! The OS delivers enter/exit callbacks at least once and in no particular
//! order relative to polled fixes. Membership is derived only from these
//! signals, and a signal that does not change membership is debounced.
//!
//! ```text
//!            Enter                     Exit
//! [OUTSIDE] ───────→ [INSIDE]  [INSIDE] ─────→ [OUTSIDE]
//! [OUTSIDE] ── Exit ─→ [OUTSIDE]  (debounced)
//! [INSIDE]  ── Enter ─→ [INSIDE]  (debounced)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw geofence callback kind delivered by the location provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeofenceSignal {
    Enter,
    Exit,
}

impl fmt::Display for GeofenceSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enter => f.write_str("enter"),
            Self::Exit => f.write_str("exit"),
        }
    }
}

/// Result of applying a signal to the current membership.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Outside → inside.
    Entered,
    /// Inside → outside.
    Exited,
    /// Enter while already inside; no state change.
    DuplicateEnter,
    /// Exit while already outside; no state change.
    DuplicateExit,
}

impl Transition {
    /// Pure, deterministic transition function.
    #[must_use]
    pub fn next(inside: bool, signal: GeofenceSignal) -> Self {
        match (inside, signal) {
            (false, GeofenceSignal::Enter) => Self::Entered,
            (true, GeofenceSignal::Enter) => Self::DuplicateEnter,
            (true, GeofenceSignal::Exit) => Self::Exited,
            (false, GeofenceSignal::Exit) => Self::DuplicateExit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        assert_eq!(Transition::next(false, GeofenceSignal::Enter), Transition::Entered);
        assert_eq!(Transition::next(true, GeofenceSignal::Enter), Transition::DuplicateEnter);
        assert_eq!(Transition::next(true, GeofenceSignal::Exit), Transition::Exited);
        assert_eq!(Transition::next(false, GeofenceSignal::Exit), Transition::DuplicateExit);
    }

    #[test]
    fn test_signal_serde() {
        let signal: GeofenceSignal = serde_json::from_str("\"enter\"").unwrap();
        assert_eq!(signal, GeofenceSignal::Enter);
        assert_eq!(serde_json::to_string(&GeofenceSignal::Exit).unwrap(), "\"exit\"");
        assert_eq!(
            serde_json::to_string(&Transition::DuplicateEnter).unwrap(),
            "\"duplicate_enter\""
        );
    }
}
