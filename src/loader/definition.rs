//! Switch definitions parsed from preprocessed commands.

use std::collections::HashSet;

use crate::network::{State, Switch, SwitchKind, SwitchTag};

use super::dialect::Dialect;
use super::DefinitionError;

const ON_LOAD_TAG: &str = "onload";
const OFF_LOAD_TAG: &str = "offload";
const ON_TAG: &str = "on";
const OFF_TAG: &str = "off";
const SUBSTATION_TAG: &str = "substation";
const END_TAG: &str = ";";

/// One declared switch and the peers it links to
#[derive(Debug, Clone, PartialEq)]
pub struct RawDefinition {
    pub name: String,
    pub tag: SwitchTag,
    pub state: State,
    pub on_substation: bool,
    pub peers: Vec<String>,
    /// The command the definition came from, for error messages
    pub command: String,
}

/// Parse one command. Commands that do not define a switch yield `Ok(None)`.
pub fn parse_definition(
    command: &str,
    dialect: Dialect,
) -> Result<Option<RawDefinition>, DefinitionError> {
    let folded = command.to_lowercase();
    let Some((name, tags)) = dialect.split(&folded) else {
        return Ok(None);
    };

    let malformed = || DefinitionError::Malformed {
        command: command.to_string(),
    };

    let tag = match tags.first().ok_or_else(malformed)?.as_str() {
        ON_LOAD_TAG => SwitchTag::OnLoad,
        OFF_LOAD_TAG => SwitchTag::OffLoad,
        other => {
            return Err(DefinitionError::UnknownSwitchType {
                tag: other.to_string(),
                command: command.to_string(),
            })
        }
    };

    // A terminator glued to the state ("on;") ends the definition there.
    let state_tag = tags.get(1).ok_or_else(malformed)?;
    let state = match state_tag.trim_end_matches(END_TAG) {
        ON_TAG => State::On,
        OFF_TAG => State::Off,
        other => {
            return Err(DefinitionError::UnknownState {
                tag: other.to_string(),
                command: command.to_string(),
            })
        }
    };

    let mut rest = if state_tag.ends_with(END_TAG) {
        &tags[tags.len()..]
    } else {
        &tags[2..]
    };

    let mut on_substation = false;
    if let Some(first) = rest.first() {
        if first.trim_end_matches(END_TAG) == SUBSTATION_TAG {
            if tag == SwitchTag::OffLoad {
                return Err(DefinitionError::OffLoadOnSubstation { name });
            }
            on_substation = true;
            rest = if first.ends_with(END_TAG) {
                &rest[rest.len()..]
            } else {
                &rest[1..]
            };
        }
    }

    let mut peers = Vec::new();
    for token in rest {
        if token == END_TAG {
            break;
        }
        if let Some(peer) = token.strip_suffix(END_TAG) {
            if !peer.is_empty() {
                peers.push(peer.to_string());
            }
            break;
        }
        peers.push(token.clone());
    }

    Ok(Some(RawDefinition {
        name,
        tag,
        state,
        on_substation,
        peers,
        command: command.to_string(),
    }))
}

/// Parse every command, keeping declaration order.
///
/// Names must be unique and every peer must be declared somewhere in the
/// same source.
pub fn collect_definitions(
    commands: &[String],
    dialect: Dialect,
) -> Result<Vec<RawDefinition>, DefinitionError> {
    let mut definitions = Vec::new();
    let mut names = HashSet::new();

    for command in commands {
        if let Some(definition) = parse_definition(command, dialect)? {
            if !names.insert(definition.name.clone()) {
                return Err(DefinitionError::DuplicateSwitch {
                    name: definition.name,
                });
            }
            definitions.push(definition);
        }
    }

    for definition in &definitions {
        if let Some(peer) = definition.peers.iter().find(|peer| !names.contains(*peer)) {
            return Err(DefinitionError::UnknownPeer {
                peer: peer.clone(),
                command: definition.command.clone(),
            });
        }
    }

    Ok(definitions)
}

/// Build a switch from its declared variant, state and substation flag.
///
/// Only load-breaking switches may be on a substation.
pub fn create_switch(
    name: &str,
    tag: SwitchTag,
    state: State,
    on_substation: bool,
) -> Result<Switch, DefinitionError> {
    let kind = match tag {
        SwitchTag::OnLoad => SwitchKind::OnLoad { on_substation },
        SwitchTag::OffLoad if on_substation => {
            return Err(DefinitionError::OffLoadOnSubstation {
                name: name.to_string(),
            })
        }
        SwitchTag::OffLoad => SwitchKind::OffLoad,
    };

    Ok(Switch::new(name, kind, state))
}
