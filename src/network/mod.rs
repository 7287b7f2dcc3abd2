//! Switching core.
//!
//! This module models switches, the links between them, and the network
//! that arbitrates every state transition. A toggle is validated by
//! speculatively applying it, running the topology checks, and restoring
//! the previous state before the verdict is returned; only an accepted
//! toggle is then committed.

mod checks;
pub mod errors;
pub mod link;
mod speculation;
pub mod state;
pub mod switch;
pub mod system;

pub use errors::{LinkError, SchgError, SwitchingError, SwitchingRejected};
pub use link::Link;
pub use state::State;
pub use switch::{Switch, SwitchKind, SwitchTag};
pub use system::{Network, NetworkId};
