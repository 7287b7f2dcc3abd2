//! Switch model.
//!
//! Two variants share one capability set: load-breaking switches (`OnLoad`)
//! may interrupt current and may sit on a substation, non-load-breaking
//! switches (`OffLoad`) may not do either. Identity is the name alone, so an
//! `OnLoad` and an `OffLoad` with the same name are the same switch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use super::errors::SwitchingRejected;
use super::state::State;
use super::system::NetworkId;

/// Closed set of switch variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwitchKind {
    /// Load-breaking switch, optionally a substation access point
    OnLoad { on_substation: bool },
    /// Non-load-breaking switch, never on a substation
    OffLoad,
}

impl SwitchKind {
    pub fn can_break_load(self) -> bool {
        match self {
            SwitchKind::OnLoad { .. } => true,
            SwitchKind::OffLoad => false,
        }
    }

    pub fn on_substation(self) -> bool {
        match self {
            SwitchKind::OnLoad { on_substation } => on_substation,
            SwitchKind::OffLoad => false,
        }
    }

    pub fn tag(self) -> SwitchTag {
        match self {
            SwitchKind::OnLoad { .. } => SwitchTag::OnLoad,
            SwitchKind::OffLoad => SwitchTag::OffLoad,
        }
    }
}

/// Variant tag without the substation payload, as written in definition files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchTag {
    OnLoad,
    OffLoad,
}

impl fmt::Display for SwitchTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchTag::OnLoad => write!(f, "onload"),
            SwitchTag::OffLoad => write!(f, "offload"),
        }
    }
}

/// A switch in the distribution network
#[derive(Debug, Clone)]
pub struct Switch {
    name: String,
    state: State,
    kind: SwitchKind,
    /// Set once, when the switch is registered into a network by a link
    network: Option<NetworkId>,
}

impl Switch {
    pub fn new(name: impl Into<String>, kind: SwitchKind, state: State) -> Self {
        Self {
            name: name.into(),
            state,
            kind,
            network: None,
        }
    }

    /// Load-breaking switch that is not on a substation
    pub fn on_load(name: impl Into<String>, state: State) -> Self {
        Self::new(name, SwitchKind::OnLoad { on_substation: false }, state)
    }

    /// Load-breaking switch acting as a substation access point
    pub fn on_load_substation(name: impl Into<String>, state: State) -> Self {
        Self::new(name, SwitchKind::OnLoad { on_substation: true }, state)
    }

    /// Non-load-breaking switch
    pub fn off_load(name: impl Into<String>, state: State) -> Self {
        Self::new(name, SwitchKind::OffLoad, state)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn kind(&self) -> SwitchKind {
        self.kind
    }

    pub fn is_on(&self) -> bool {
        self.state.is_on()
    }

    pub fn on_substation(&self) -> bool {
        self.kind.on_substation()
    }

    pub fn can_break_load(&self) -> bool {
        self.kind.can_break_load()
    }

    /// The network this switch was registered into, if any
    pub fn network(&self) -> Option<NetworkId> {
        self.network
    }

    /// Toggle a switch that lives outside any network.
    ///
    /// A switch value held by the caller has no network to validate against,
    /// so the request is always refused with `SYSTEM_NOT_DEFINED` and the
    /// state is left untouched. Registered switches are owned by their
    /// [`Network`](super::Network) and are toggled through
    /// [`Network::toggle`](super::Network::toggle).
    pub fn toggle(&mut self) -> Result<(), SwitchingRejected> {
        Err(SwitchingRejected::system_not_defined())
    }

    pub(crate) fn attach(&mut self, network: NetworkId) {
        if self.network.is_none() {
            self.network = Some(network);
        }
    }

    /// Raw state write. Only the speculation guard and the commit path use it.
    pub(crate) fn set_state(&mut self, state: State) {
        self.state = state;
    }

    pub(crate) fn commit_toggle(&mut self) {
        self.state = !self.state;
    }
}

impl PartialEq for Switch {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Switch {}

impl Hash for Switch {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SW({}, {})", self.name, self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(sw: &Switch) -> u64 {
        let mut hasher = DefaultHasher::new();
        sw.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_same_name_is_same_switch() {
        let a = Switch::on_load_substation("sw1", State::On);
        let b = Switch::off_load("sw1", State::Off);

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_variant_capabilities() {
        let on = Switch::on_load("a", State::On);
        let sub = Switch::on_load_substation("b", State::On);
        let off = Switch::off_load("c", State::On);

        assert!(on.can_break_load());
        assert!(!on.on_substation());
        assert!(sub.on_substation());
        assert!(!off.can_break_load());
        assert!(!off.on_substation());
        assert_eq!(off.kind().tag(), SwitchTag::OffLoad);
    }

    #[test]
    fn test_detached_toggle_is_refused() {
        let mut on = Switch::on_load("sw1", State::On);
        let mut off = Switch::off_load("sw2", State::Off);

        let err = on.toggle().unwrap_err();
        assert_eq!(err.reasons(), &[crate::network::SwitchingError::SystemNotDefined]);
        assert_eq!(on.state(), State::On);

        let err = off.toggle().unwrap_err();
        assert_eq!(err.reasons(), &[crate::network::SwitchingError::SystemNotDefined]);
        assert_eq!(off.state(), State::Off);
        assert!(off.network().is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(Switch::on_load("sw1", State::Off).to_string(), "SW(sw1, OFF)");
    }
}
