//! The network: registry of switches and links, and arbiter of every toggle.

use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use super::checks;
use super::errors::{LinkError, SwitchingError, SwitchingRejected};
use super::link::Link;
use super::speculation::Speculation;
use super::switch::Switch;

static NEXT_NETWORK_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque handle identifying one network instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkId(u64);

impl NetworkId {
    fn next() -> Self {
        NetworkId(NEXT_NETWORK_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A reconfigurable distribution network.
///
/// Switches enter the network when they are first linked and stay for the
/// life of the network; there is no unlink. Re-registering a name keeps the
/// switch already stored under it. Every toggle is validated against the
/// whole network before it is committed.
#[derive(Debug)]
pub struct Network {
    id: NetworkId,
    /// Switch arena; positions never change once assigned
    switches: Vec<Switch>,
    /// Name -> arena position
    index: HashMap<String, usize>,
    /// Link identity -> arena positions of its endpoints
    links: BTreeMap<Link, (usize, usize)>,
}

impl Network {
    pub fn new() -> Self {
        Self {
            id: NetworkId::next(),
            switches: Vec::new(),
            index: HashMap::new(),
            links: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> NetworkId {
        self.id
    }

    /// Link two switches, registering them if their names are new.
    ///
    /// The link is validated against the committed version of each switch
    /// when one is already registered. A rejected link leaves the network
    /// unchanged. Linking an existing pair again is a no-op.
    pub fn link(&mut self, a: Switch, b: Switch) -> Result<(), LinkError> {
        let link = {
            let a_ref = self.switch(a.name()).unwrap_or(&a);
            let b_ref = self.switch(b.name()).unwrap_or(&b);
            Link::new(a_ref, b_ref)?
        };

        let a_index = self.register(a);
        let b_index = self.register(b);

        if self.links.contains_key(&link) {
            debug!("{} already registered", link);
        } else {
            debug!("Registered {}", link);
            self.links.insert(link, (a_index, b_index));
        }

        Ok(())
    }

    fn register(&mut self, mut switch: Switch) -> usize {
        if let Some(&index) = self.index.get(switch.name()) {
            return index;
        }

        switch.attach(self.id);
        let index = self.switches.len();
        self.index.insert(switch.name().to_string(), index);
        self.switches.push(switch);
        index
    }

    pub fn switch(&self, name: &str) -> Option<&Switch> {
        self.position(name).map(|index| &self.switches[index])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All registered switches, sorted by name
    pub fn switches(&self) -> Vec<&Switch> {
        let mut switches: Vec<&Switch> = self.switches.iter().collect();
        switches.sort_by(|a, b| a.name().cmp(b.name()));
        switches
    }

    /// All links, sorted by identity
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.keys()
    }

    pub fn switch_count(&self) -> usize {
        self.switches.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.switches.is_empty()
    }

    /// A link is energized when both of its endpoints are
    pub fn is_link_energized(&self, link: &Link) -> bool {
        match self.links.get(link) {
            Some(&(a, b)) => self.switches[a].is_on() && self.switches[b].is_on(),
            None => false,
        }
    }

    pub fn energized_switches(&self) -> Vec<&Switch> {
        self.switches().into_iter().filter(|sw| sw.is_on()).collect()
    }

    pub fn energized_links(&self) -> Vec<&Link> {
        self.links
            .iter()
            .filter(|(_, ends)| {
                let (a, b) = **ends;
                self.switches[a].is_on() && self.switches[b].is_on()
            })
            .map(|(link, _)| link)
            .collect()
    }

    /// Energized switch name -> names of energized neighbors, both sorted
    pub fn energized_adjacency(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut adjacency: BTreeMap<&str, Vec<&str>> = self
            .switches
            .iter()
            .filter(|sw| sw.is_on())
            .map(|sw| (sw.name(), Vec::new()))
            .collect();

        for link in self.energized_links() {
            let (a, b) = link.switches();
            adjacency.entry(a).or_default().push(b);
            adjacency.entry(b).or_default().push(a);
        }

        for neighbors in adjacency.values_mut() {
            neighbors.sort_unstable();
        }

        adjacency
    }

    /// Whether the committed topology fails the radial count test
    pub fn is_meshed(&self) -> bool {
        checks::causes_mesh(self)
    }

    /// Whether two substations currently share an energized island
    pub fn substations_interconnected(&self) -> bool {
        checks::substations_interconnected(self)
    }

    /// Whether operating `name` now would switch a non-load-breaking device
    /// under load. Unregistered names report false.
    pub fn offload_switching_on_load(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => checks::offload_switching_on_load(self, index),
            None => false,
        }
    }

    /// Evaluate toggling `name` without committing it.
    ///
    /// Returns the violated rules in check order: mesh, substation
    /// interconnection, non-load-breaking hazard. An empty list means the
    /// toggle is safe. The network is left exactly as it was.
    pub fn evaluate(&mut self, name: &str) -> Vec<SwitchingError> {
        match self.position(name) {
            Some(index) => self.evaluate_at(index),
            None => vec![SwitchingError::SystemNotDefined],
        }
    }

    fn evaluate_at(&mut self, index: usize) -> Vec<SwitchingError> {
        let mut reasons = Vec::new();
        let mut speculative = Speculation::flip(self, index);

        if checks::causes_mesh(&speculative) {
            reasons.push(SwitchingError::CausesMesh);
        }

        if checks::substations_interconnected(&speculative) {
            reasons.push(SwitchingError::CausesSubstationsInterconnection);
        }

        if checks::offload_switching_on_load(&mut speculative, index) {
            reasons.push(SwitchingError::OffloadSwitchingOnLoad);
        }

        drop(speculative);
        debug!(
            "Evaluated toggle of {}: {:?}",
            self.switches[index].name(),
            reasons
        );
        reasons
    }

    /// Toggle `name` if the resulting network is safe.
    ///
    /// On rejection nothing changes and every violated rule is returned, in
    /// check order. A name that is not registered in this network is refused
    /// with `SYSTEM_NOT_DEFINED`.
    pub fn toggle(&mut self, name: &str) -> Result<(), SwitchingRejected> {
        let Some(index) = self.position(name) else {
            warn!("Toggle of {} refused: not registered in this network", name);
            return Err(SwitchingRejected::system_not_defined());
        };

        let reasons = self.evaluate_at(index);
        if let Some(rejected) = SwitchingRejected::from_reasons(reasons) {
            warn!("Toggle of {} refused: {:?}", name, rejected.reasons());
            return Err(rejected);
        }

        let switch = &mut self.switches[index];
        switch.commit_toggle();
        info!("Switch {} is now {}", switch.name(), switch.state());
        Ok(())
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub(crate) fn switch_slice(&self) -> &[Switch] {
        &self.switches
    }

    pub(crate) fn switch_at(&self, index: usize) -> &Switch {
        &self.switches[index]
    }

    pub(crate) fn switch_at_mut(&mut self, index: usize) -> &mut Switch {
        &mut self.switches[index]
    }

    pub(crate) fn link_ends(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.links.values().copied()
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}
