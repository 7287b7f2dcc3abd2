//! Scoped speculative state changes.
//!
//! The validator evaluates a hypothetical network by writing a switch state
//! in place, running the checks, and putting the old state back. The guard
//! below owns that bracket: the previous state is captured on creation and
//! written back on drop, so the network is restored on every exit path,
//! unwinding included.

use std::ops::{Deref, DerefMut};

use super::state::State;
use super::system::Network;

pub(crate) struct Speculation<'a> {
    network: &'a mut Network,
    index: usize,
    saved: State,
}

impl<'a> Speculation<'a> {
    /// Write `state` into the switch at `index` until the guard is dropped.
    pub(crate) fn set(network: &'a mut Network, index: usize, state: State) -> Self {
        let saved = network.switch_at(index).state();
        network.switch_at_mut(index).set_state(state);
        Self {
            network,
            index,
            saved,
        }
    }

    /// Flip the switch at `index` until the guard is dropped.
    pub(crate) fn flip(network: &'a mut Network, index: usize) -> Self {
        let state = !network.switch_at(index).state();
        Self::set(network, index, state)
    }
}

impl Deref for Speculation<'_> {
    type Target = Network;

    fn deref(&self) -> &Network {
        self.network
    }
}

impl DerefMut for Speculation<'_> {
    fn deref_mut(&mut self) -> &mut Network {
        self.network
    }
}

impl Drop for Speculation<'_> {
    fn drop(&mut self) {
        self.network.switch_at_mut(self.index).set_state(self.saved);
    }
}
