//! # schg - Switching safety for reconfigurable distribution networks
//!
//! This library models the switches and links of an electrical distribution
//! network and decides whether toggling a switch is safe before letting it
//! happen.
//!
//! ## Overview
//!
//! A [`network::Network`] owns every switch and link. A toggle is proposed by
//! name; the network flips the switch speculatively, runs its safety checks on
//! the resulting topology, restores the switch, and commits only when no rule
//! is broken. A refused toggle reports every violated rule, in check order:
//!
//! - `CAUSES_MESH`: the energized topology stops being radial
//! - `CAUSES_SUBSTATIONS_INTERCONNECTION`: two substations share an island
//! - `OFFLOAD_SWITCHING_ON_LOAD`: a non-load-breaking switch would be
//!   operated while fed by a substation
//!
//! ## Architecture
//!
//! - `network`: switches, links, the network and its checks
//! - `loader`: definition files (DSS and plain dialects) to networks
//! - `config`: session configuration structures and validation
//! - `config_loader`: session configuration file loading
//! - `report`: text and JSON reports of a network's state
//!
//! ## Example Usage
//!
//! ```rust
//! use schg::network::{Network, State, Switch, SwitchingError};
//!
//! let mut network = Network::new();
//! network.link(
//!     Switch::on_load_substation("sub", State::On),
//!     Switch::off_load("blade", State::On),
//! )?;
//!
//! // The blade cannot interrupt current while the substation feeds it.
//! let rejected = network.toggle("blade").unwrap_err();
//! assert!(rejected.contains(SwitchingError::OffloadSwitchingOnLoad));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Definition Format
//!
//! ```text
//! new line.sub phases=3 ! schg: onload on substation blade;
//! new line.blade phases=3 ! schg: offload on sub;
//! ```
//!
//! ## Error Handling
//!
//! Domain errors are `thiserror` enums ([`network::LinkError`],
//! [`network::SwitchingRejected`], [`loader::DefinitionError`]); file-level
//! entry points return `color_eyre::Result` with context attached.

pub mod config;
pub mod config_loader;
pub mod loader;
pub mod network;
pub mod report;
