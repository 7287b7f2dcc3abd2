//! Error taxonomy of the switching core.
//!
//! Link errors are raised once, when a link is constructed. Switching errors
//! are collected by the network validator and returned together, in the
//! order the checks run, so a caller sees every rule a toggle would break.

use serde::Serialize;
use std::fmt;

/// Reasons a link between two switches cannot be built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, thiserror::Error)]
pub enum LinkError {
    #[error("SELF_LINKING: a switch cannot be linked to itself")]
    SelfLinking,

    #[error("SUBSTATION_LINKING: two energized substation switches cannot be linked")]
    SubstationLinking,
}

/// Reasons a proposed toggle is refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, thiserror::Error)]
pub enum SwitchingError {
    /// The switch is not registered in any network
    #[error("SYSTEM_NOT_DEFINED")]
    SystemNotDefined,

    /// The energized topology would no longer be radial
    #[error("CAUSES_MESH")]
    CausesMesh,

    /// Two substations would end up in the same energized island
    #[error("CAUSES_SUBSTATIONS_INTERCONNECTION")]
    CausesSubstationsInterconnection,

    /// A non-load-breaking switch would be operated while fed by a substation
    #[error("OFFLOAD_SWITCHING_ON_LOAD")]
    OffloadSwitchingOnLoad,
}

/// A rejected toggle with every violated rule, in check order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchingRejected {
    reasons: Vec<SwitchingError>,
}

impl SwitchingRejected {
    /// Wrap the reasons returned by an evaluation. Returns `None` when there are
    /// no reasons, i.e. the toggle is allowed.
    pub fn from_reasons(reasons: Vec<SwitchingError>) -> Option<Self> {
        if reasons.is_empty() {
            None
        } else {
            Some(Self { reasons })
        }
    }

    pub fn system_not_defined() -> Self {
        Self {
            reasons: vec![SwitchingError::SystemNotDefined],
        }
    }

    pub fn reasons(&self) -> &[SwitchingError] {
        &self.reasons
    }

    pub fn contains(&self, reason: SwitchingError) -> bool {
        self.reasons.contains(&reason)
    }

    pub fn into_reasons(self) -> Vec<SwitchingError> {
        self.reasons
    }
}

impl fmt::Display for SwitchingRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "switching rejected: ")?;
        for (i, reason) in self.reasons.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for SwitchingRejected {}

/// Umbrella error for callers that drive both link construction and toggling
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchgError {
    #[error("link rejected: {0}")]
    Link(#[from] LinkError),

    #[error(transparent)]
    Switching(#[from] SwitchingRejected),

    #[error("unknown switch: {0}")]
    UnknownSwitch(String),
}
