//! Assemble a network from definitions.

use log::{info, warn};
use std::collections::BTreeMap;
use std::path::Path;

use crate::network::{Network, SchgError, Switch};

use super::definition::{collect_definitions, create_switch, RawDefinition};
use super::dialect::Dialect;
use super::preprocess::read_commands;
use super::DefinitionError;

/// A network built from a definition source, addressable by switch name.
///
/// Switches that were declared but never linked stay outside the network;
/// they can be inspected but refuse every toggle with `SYSTEM_NOT_DEFINED`.
#[derive(Debug)]
pub struct LoadedNetwork {
    network: Network,
    unlinked: BTreeMap<String, Switch>,
}

impl LoadedNetwork {
    /// Load a definition file, picking the dialect from its extension when
    /// none is given.
    pub fn from_file(path: &Path, dialect: Option<Dialect>) -> Result<Self, DefinitionError> {
        let dialect = dialect.unwrap_or_else(|| Dialect::from_path(path));
        info!("Loading {:?} network definition from {:?}", dialect, path);

        let commands = read_commands(path)?;
        Self::from_commands(&commands, dialect)
    }

    /// Build from already preprocessed commands
    pub fn from_commands(commands: &[String], dialect: Dialect) -> Result<Self, DefinitionError> {
        let definitions = collect_definitions(commands, dialect)?;
        Self::from_definitions(&definitions)
    }

    pub fn from_definitions(definitions: &[RawDefinition]) -> Result<Self, DefinitionError> {
        let mut declared = BTreeMap::new();
        for definition in definitions {
            let switch = create_switch(
                &definition.name,
                definition.tag,
                definition.state,
                definition.on_substation,
            )?;
            declared.insert(definition.name.clone(), switch);
        }

        let mut network = Network::new();
        for definition in definitions {
            for peer in &definition.peers {
                let (Some(a), Some(b)) = (declared.get(&definition.name), declared.get(peer)) else {
                    return Err(DefinitionError::UnknownPeer {
                        peer: peer.clone(),
                        command: definition.command.clone(),
                    });
                };

                network
                    .link(a.clone(), b.clone())
                    .map_err(|source| DefinitionError::Link {
                        name: definition.name.clone(),
                        peer: peer.clone(),
                        source,
                    })?;
            }
        }

        let unlinked: BTreeMap<String, Switch> = declared
            .into_iter()
            .filter(|(name, _)| !network.contains(name))
            .collect();

        for name in unlinked.keys() {
            warn!("Switch {} is declared but not linked to anything", name);
        }

        info!(
            "Loaded {} switches and {} links",
            network.switch_count() + unlinked.len(),
            network.link_count()
        );

        Ok(Self { network, unlinked })
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    /// Look up a switch by name, case-insensitively
    pub fn switch(&self, name: &str) -> Option<&Switch> {
        let name = name.to_lowercase();
        self.network
            .switch(&name)
            .or_else(|| self.unlinked.get(&name))
    }

    /// Every declared switch, sorted by name
    pub fn switches(&self) -> Vec<&Switch> {
        let mut switches = self.network.switches();
        switches.extend(self.unlinked.values());
        switches.sort_by(|a, b| a.name().cmp(b.name()));
        switches
    }

    /// Switches declared without any link
    pub fn unlinked(&self) -> impl Iterator<Item = &Switch> {
        self.unlinked.values()
    }

    /// Toggle a switch by name, case-insensitively
    pub fn toggle(&mut self, name: &str) -> Result<(), SchgError> {
        let name = name.to_lowercase();

        if self.network.contains(&name) {
            return Ok(self.network.toggle(&name)?);
        }

        match self.unlinked.get_mut(&name) {
            Some(switch) => Ok(switch.toggle()?),
            None => Err(SchgError::UnknownSwitch(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{State, SwitchingError};

    fn commands(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn test_builds_links_from_peers() {
        let loaded = LoadedNetwork::from_commands(
            &commands(&[
                "sw1 onload on substation sw2",
                "sw2 offload on sw1 sw3",
                "sw3 onload off",
            ]),
            Dialect::Plain,
        )
        .unwrap();

        assert_eq!(loaded.network().switch_count(), 3);
        // sw1-sw2 is declared from both ends but stored once.
        assert_eq!(loaded.network().link_count(), 2);
        assert_eq!(loaded.unlinked().count(), 0);
    }

    #[test]
    fn test_unlinked_switch_refuses_toggle() {
        let mut loaded = LoadedNetwork::from_commands(
            &commands(&["sw1 onload on sw2", "sw2 onload on", "lonely onload on"]),
            Dialect::Plain,
        )
        .unwrap();

        assert_eq!(loaded.switches().len(), 3);
        assert_eq!(loaded.switch("LONELY").unwrap().state(), State::On);

        match loaded.toggle("lonely") {
            Err(SchgError::Switching(rejected)) => {
                assert_eq!(rejected.reasons(), &[SwitchingError::SystemNotDefined])
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_switch() {
        let mut loaded =
            LoadedNetwork::from_commands(&commands(&["a onload on b", "b onload on"]), Dialect::Plain)
                .unwrap();

        assert!(matches!(loaded.toggle("zzz"), Err(SchgError::UnknownSwitch(name)) if name == "zzz"));
    }

    #[test]
    fn test_self_peer_is_a_link_error() {
        let err = LoadedNetwork::from_commands(&commands(&["a onload on a"]), Dialect::Plain)
            .unwrap_err();
        assert!(matches!(err, DefinitionError::Link { .. }));
    }

    #[test]
    fn test_toggle_is_case_insensitive() {
        let mut loaded = LoadedNetwork::from_commands(
            &commands(&["sub onload on substation feeder", "feeder onload off"]),
            Dialect::Plain,
        )
        .unwrap();

        loaded.toggle("FEEDER").unwrap();
        assert_eq!(loaded.switch("feeder").unwrap().state(), State::On);
    }
}
