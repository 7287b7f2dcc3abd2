//! Topology checks run by the network validator.
//!
//! All three are pure predicates over the current switch states; the
//! validator is responsible for putting the network into the hypothetical
//! state first. Only links with both endpoints energized are traversed.

use super::speculation::Speculation;
use super::state::State;
use super::system::Network;

/// Adjacency over energized links, indexed like the network's switch arena.
/// Rebuilt on every call.
pub(crate) fn energized_neighbors(network: &Network) -> Vec<Vec<usize>> {
    let switches = network.switch_slice();
    let mut adjacency = vec![Vec::new(); switches.len()];

    for (a, b) in network.link_ends() {
        if switches[a].is_on() && switches[b].is_on() {
            adjacency[a].push(b);
            adjacency[b].push(a);
        }
    }

    adjacency
}

/// Edge/vertex count test for a radial topology.
///
/// A spanning tree over `E` energized switches has exactly `E - 1`
/// energized links; any other count is reported as a mesh. This does not
/// prove the energized switches form a single component.
pub fn causes_mesh(network: &Network) -> bool {
    let switches = network.switch_slice();
    let switches_on = switches.iter().filter(|sw| sw.is_on()).count() as i64;
    let links_on = network
        .link_ends()
        .filter(|&(a, b)| switches[a].is_on() && switches[b].is_on())
        .count() as i64;

    links_on != switches_on - 1
}

/// True if any energized island holds more than one substation switch.
pub fn substations_interconnected(network: &Network) -> bool {
    let adjacency = energized_neighbors(network);

    (0..adjacency.len()).any(|root| substations_exceed(network, &adjacency, root, 1))
}

/// True if `index` is a non-load-breaking switch that, forced energized, is
/// electrically continuous with at least one substation.
///
/// Forcing the switch on models the instant before the device is operated,
/// when it may still be carrying load.
pub fn offload_switching_on_load(network: &mut Network, index: usize) -> bool {
    if network.switch_at(index).can_break_load() {
        return false;
    }

    let forced = Speculation::set(network, index, State::On);
    let adjacency = energized_neighbors(&forced);
    substations_exceed(&forced, &adjacency, index, 0)
}

/// Depth-first search from `root`, counting substation switches reached.
/// Each root starts with its own empty visited set.
fn substations_exceed(
    network: &Network,
    adjacency: &[Vec<usize>],
    root: usize,
    allowed: usize,
) -> bool {
    let switches = network.switch_slice();
    let mut visited = vec![false; switches.len()];
    let mut stack = vec![root];
    let mut count = 0;

    while let Some(index) = stack.pop() {
        if visited[index] {
            continue;
        }
        visited[index] = true;

        if switches[index].on_substation() {
            count += 1;
            if count > allowed {
                return true;
            }
        }

        for &next in &adjacency[index] {
            if !visited[next] {
                stack.push(next);
            }
        }
    }

    false
}
