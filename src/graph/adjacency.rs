//! Same-frequency adjacency construction.

use log::{debug, info};
use std::fmt;

use super::registry::Registry;
use super::types::{Antenna, AntennaId};

/// Outcome of [`Registry::build_adjacency`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdjacencySummary {
    /// Undirected edges created.
    pub edges: usize,
    /// Antennas left without any neighbor.
    pub isolated: usize,
}

impl fmt::Display for AdjacencySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} edges, {} isolated antennas", self.edges, self.isolated)
    }
}

impl Registry {
    /// Connect every pair of antennas sharing a frequency.
    ///
    /// Existing adjacency is cleared first, so rebuilding never duplicates
    /// edges. Each unordered pair is considered once (`b` strictly after `a`
    /// in registry order) and new edges go to the front of both lists, so the
    /// most recently linked neighbor is iterated first.
    pub fn build_adjacency(&mut self) -> AdjacencySummary {
        self.clear_adjacency();

        let mut summary = AdjacencySummary::default();
        for (i, &a) in self.order.iter().enumerate() {
            for &b in &self.order[i + 1..] {
                let (Some(fa), Some(fb)) = (self.frequency_of(a), self.frequency_of(b)) else {
                    continue;
                };
                if fa != fb {
                    continue;
                }
                if let Some(antenna) = self.slots[a.0].as_mut() {
                    antenna.neighbors.push_front(b);
                }
                if let Some(antenna) = self.slots[b.0].as_mut() {
                    antenna.neighbors.push_front(a);
                }
                debug!("Linked {:?} <-> {:?} on frequency {}", a, b, fa);
                summary.edges += 1;
            }
        }

        summary.isolated = self.iter().filter(|a| a.degree() == 0).count();
        self.adjacency_built = true;
        info!("Adjacency built: {}", summary);
        summary
    }

    /// Drop every edge, keeping the antennas.
    pub fn clear_adjacency(&mut self) {
        for antenna in self.slots.iter_mut().flatten() {
            antenna.neighbors.clear();
        }
        self.adjacency_built = false;
    }

    /// Whether adjacency has been built (or decoded) for the current snapshot.
    pub fn has_adjacency(&self) -> bool {
        self.adjacency_built
    }

    /// Neighbors of `id` in adjacency order.
    pub fn neighbors(&self, id: AntennaId) -> impl Iterator<Item = &Antenna> + '_ {
        self.get(id)
            .into_iter()
            .flat_map(|a| a.neighbors.iter())
            .filter_map(|n| self.get(*n))
    }

    /// Total number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.iter().map(Antenna::degree).sum::<usize>() / 2
    }

    pub(crate) fn neighbor_at(&self, id: AntennaId, index: usize) -> Option<AntennaId> {
        self.get(id).and_then(|a| a.neighbors.get(index).copied())
    }

    /// Append a directed back-reference, used when decoding persisted edges.
    pub(crate) fn push_neighbor(&mut self, from: AntennaId, to: AntennaId) {
        if let Some(antenna) = self.slots.get_mut(from.0).and_then(Option::as_mut) {
            antenna.neighbors.push_back(to);
        }
    }

    pub(crate) fn mark_adjacency_built(&mut self) {
        self.adjacency_built = true;
    }

    fn frequency_of(&self, id: AntennaId) -> Option<super::types::Frequency> {
        self.get(id).map(Antenna::frequency)
    }
}
