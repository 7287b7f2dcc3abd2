//! Switch state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Not;

/// Electrical state of a switch: energized (`On`) or de-energized (`Off`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum State {
    On,
    Off,
}

impl State {
    pub fn is_on(self) -> bool {
        self == State::On
    }

    /// The state reached after one toggle.
    pub fn toggled(self) -> State {
        !self
    }
}

impl Not for State {
    type Output = State;

    fn not(self) -> State {
        match self {
            State::On => State::Off,
            State::Off => State::On,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::On => write!(f, "ON"),
            State::Off => write!(f, "OFF"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negation() {
        assert_eq!(!State::On, State::Off);
        assert_eq!(State::Off.toggled(), State::On);
        assert_eq!(State::On.toggled().toggled(), State::On);
    }

    #[test]
    fn test_display() {
        assert_eq!(State::On.to_string(), "ON");
        assert_eq!(State::Off.to_string(), "OFF");
        assert!(State::On.is_on());
        assert!(!State::Off.is_on());
    }
}
