//! Network definition loader.
//!
//! Builds a [`Network`](crate::network::Network) from text definitions.
//! Two dialects are supported:
//!
//! ```text
//! ! DSS dialect: the switch annotation rides on an OpenDSS line command
//! new line.sw1 phases=3 ! schg: onload on substation sw2;
//! new line.sw2 phases=3 ! schg: offload on sw1 sw3;
//!
//! // plain dialect: one switch per line
//! sw1 onload on substation sw2
//! sw2 offload on sw1 sw3
//! ```
//!
//! Both dialects share the same preprocessing: `!` and `//` line comments,
//! `/* ... */` block comments, `~` continuation lines and recursive
//! `redirect <file>` inclusion. Names, tags and peers are case-folded.

pub mod builder;
pub mod definition;
pub mod dialect;
pub mod preprocess;

use std::path::PathBuf;

use crate::network::LinkError;

pub use builder::LoadedNetwork;
pub use definition::{collect_definitions, create_switch, RawDefinition};
pub use dialect::Dialect;
pub use preprocess::read_commands;

/// Errors raised while reading or interpreting a definition source
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("Failed to read definition file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Redirect cycle through '{path}'")]
    RedirectCycle { path: PathBuf },

    #[error("Redirect without a target in '{path}'")]
    MissingRedirectTarget { path: PathBuf },

    #[error("Continuation line {line} in '{path}' has no command to continue")]
    DanglingContinuation { path: PathBuf, line: usize },

    #[error("Malformed switch definition: {command}")]
    Malformed { command: String },

    #[error("Switch type '{tag}' not recognised in: {command}")]
    UnknownSwitchType { tag: String, command: String },

    #[error("Switch state '{tag}' not recognised in: {command}")]
    UnknownState { tag: String, command: String },

    #[error("Switch {name} is offload and cannot be on a substation")]
    OffLoadOnSubstation { name: String },

    #[error("Switch {peer} not found in link: {command}")]
    UnknownPeer { peer: String, command: String },

    #[error("Switch {name} is defined more than once")]
    DuplicateSwitch { name: String },

    #[error("Cannot link {name} to {peer}: {source}")]
    Link {
        name: String,
        peer: String,
        #[source]
        source: LinkError,
    },
}
