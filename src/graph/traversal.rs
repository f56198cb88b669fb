//! Traversal engine: depth-first, breadth-first and all-simple-paths search.
//!
//! Visitation state lives in a [`VisitMarks`] bitset owned by a [`Traversal`]
//! rather than in the antennas, so two `Traversal` values over the same
//! registry never interfere. Every entry point resets the marks first.
//!
//! All searches run on explicit stacks/queues of [`AntennaId`]s, so depth is
//! bounded by heap memory instead of the call stack.

use log::debug;
use std::collections::VecDeque;

use super::registry::Registry;
use super::types::{Antenna, AntennaId, Coord};
use crate::error::GraphError;

/// Per-traversal visitation bitset keyed by antenna handle.
#[derive(Debug, Clone, Default)]
pub struct VisitMarks {
    bits: Vec<bool>,
}

impl VisitMarks {
    pub fn new(slots: usize) -> Self {
        Self { bits: vec![false; slots] }
    }

    /// Clear every mark, resizing to `slots` handles.
    pub fn reset(&mut self, slots: usize) {
        self.bits.clear();
        self.bits.resize(slots, false);
    }

    pub fn is_visited(&self, id: AntennaId) -> bool {
        self.bits.get(id.0).copied().unwrap_or(false)
    }

    fn mark(&mut self, id: AntennaId) {
        if let Some(bit) = self.bits.get_mut(id.0) {
            *bit = true;
        }
    }

    fn unmark(&mut self, id: AntennaId) {
        if let Some(bit) = self.bits.get_mut(id.0) {
            *bit = false;
        }
    }

    pub fn visited_count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }
}

/// Search frame: the antenna being expanded and the next neighbor slot to try.
#[derive(Debug, Clone, Copy)]
struct Frame {
    id: AntennaId,
    next: usize,
}

/// Traversal engine bound to one registry snapshot.
pub struct Traversal<'a> {
    registry: &'a Registry,
    marks: VisitMarks,
}

impl<'a> Traversal<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            marks: VisitMarks::new(registry.slot_count()),
        }
    }

    /// Clear all visitation marks.
    pub fn reset_visits(&mut self) {
        self.marks.reset(self.registry.slot_count());
    }

    pub fn marks(&self) -> &VisitMarks {
        &self.marks
    }

    pub fn is_visited(&self, x: i32, y: i32) -> bool {
        self.registry
            .find_id(Coord::new(x, y))
            .is_some_and(|id| self.marks.is_visited(id))
    }

    /// Depth-first traversal from `(x, y)` in pre-order.
    ///
    /// Neighbors are expanded in adjacency order, which gives the same
    /// sequence as the textbook recursive formulation.
    pub fn dfs(&mut self, x: i32, y: i32) -> Result<Vec<&'a Antenna>, GraphError> {
        let start = self.start(x, y)?;
        self.reset_visits();

        let registry = self.registry;
        let mut visited = Vec::new();
        let mut stack = vec![Frame { id: start, next: 0 }];
        self.marks.mark(start);
        visited.extend(registry.get(start));

        while let Some(&Frame { id, next }) = stack.last() {
            match registry.neighbor_at(id, next) {
                Some(neighbor) => {
                    if let Some(top) = stack.last_mut() {
                        top.next += 1;
                    }
                    if !self.marks.is_visited(neighbor) {
                        self.marks.mark(neighbor);
                        visited.extend(registry.get(neighbor));
                        stack.push(Frame { id: neighbor, next: 0 });
                    }
                }
                None => {
                    stack.pop();
                }
            }
        }

        debug!("DFS from ({}, {}) visited {} antennas", x, y, visited.len());
        Ok(visited)
    }

    /// Breadth-first traversal from `(x, y)`.
    ///
    /// The returned iterator is lazy and one-shot; antennas are marked when
    /// enqueued, so each reachable antenna is yielded exactly once, in
    /// non-decreasing distance from the start.
    pub fn bfs(&mut self, x: i32, y: i32) -> Result<Bfs<'_, 'a>, GraphError> {
        let start = self.start(x, y)?;
        self.reset_visits();

        let mut queue = VecDeque::new();
        queue.try_reserve(self.registry.count())?;
        self.marks.mark(start);
        queue.push_back(start);

        Ok(Bfs {
            registry: self.registry,
            marks: &mut self.marks,
            queue,
        })
    }

    /// Enumerate every simple path from `from` to `to`.
    ///
    /// Classic depth-first search with backtracking: a mark is cleared when
    /// its frame is popped, so the antenna stays available to other paths.
    /// Worst case is exponential in the registry size; the iterator is lazy
    /// so callers may stop early.
    pub fn all_paths(&mut self, from: (i32, i32), to: (i32, i32)) -> Result<SimplePaths<'_, 'a>, GraphError> {
        let source = self.start(from.0, from.1)?;
        let destination = self.start(to.0, to.1)?;
        self.reset_visits();

        let mut path = Vec::new();
        path.try_reserve(self.registry.count())?;

        Ok(SimplePaths {
            registry: self.registry,
            marks: &mut self.marks,
            destination,
            pending: Some(source),
            stack: Vec::new(),
            path,
        })
    }

    fn start(&self, x: i32, y: i32) -> Result<AntennaId, GraphError> {
        self.registry.find_id(Coord::new(x, y)).ok_or(GraphError::NotFound { x, y })
    }
}

/// Lazy breadth-first iterator returned by [`Traversal::bfs`].
pub struct Bfs<'t, 'a> {
    registry: &'a Registry,
    marks: &'t mut VisitMarks,
    queue: VecDeque<AntennaId>,
}

impl<'a> Iterator for Bfs<'_, 'a> {
    type Item = &'a Antenna;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.queue.pop_front()?;
        let antenna = self.registry.get(id)?;
        for neighbor in antenna.neighbors() {
            if !self.marks.is_visited(neighbor) {
                self.marks.mark(neighbor);
                self.queue.push_back(neighbor);
            }
        }
        Some(antenna)
    }
}

/// Lazy simple-path iterator returned by [`Traversal::all_paths`].
pub struct SimplePaths<'t, 'a> {
    registry: &'a Registry,
    marks: &'t mut VisitMarks,
    destination: AntennaId,
    /// Source antenna, entered on the first call to `next`.
    pending: Option<AntennaId>,
    stack: Vec<Frame>,
    path: Vec<AntennaId>,
}

impl SimplePaths<'_, '_> {
    /// Push `id` onto the current path. Returns the path if `id` is the
    /// destination; such a frame is never expanded further.
    fn enter(&mut self, id: AntennaId) -> Option<Vec<Coord>> {
        self.marks.mark(id);
        self.path.push(id);
        let arrived = id == self.destination;
        self.stack.push(Frame {
            id,
            next: if arrived { usize::MAX } else { 0 },
        });
        arrived.then(|| self.path.iter().map(|id| self.registry.coord_of(*id)).collect())
    }

    fn leave(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.marks.unmark(frame.id);
            self.path.pop();
        }
    }
}

impl Iterator for SimplePaths<'_, '_> {
    type Item = Vec<Coord>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(source) = self.pending.take() {
            if let Some(path) = self.enter(source) {
                return Some(path);
            }
        }

        while let Some(&Frame { id, next }) = self.stack.last() {
            match self.registry.neighbor_at(id, next) {
                Some(neighbor) => {
                    if let Some(top) = self.stack.last_mut() {
                        top.next += 1;
                    }
                    if !self.marks.is_visited(neighbor) {
                        if let Some(path) = self.enter(neighbor) {
                            return Some(path);
                        }
                    }
                }
                None => self.leave(),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::{HashMap, HashSet};

    fn sample() -> Registry {
        let mut registry = Registry::new();
        registry.insert(0, 0, 'A').unwrap();
        registry.insert(0, 1, 'A').unwrap();
        registry.insert(1, 0, 'B').unwrap();
        registry.build_adjacency();
        registry
    }

    /// Four 'A' antennas (fully connected) plus two isolated 'B's.
    fn clique() -> Registry {
        let mut registry = Registry::new();
        for (x, y) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            registry.insert(x, y, 'A').unwrap();
        }
        registry.insert(2, 0, 'B').unwrap();
        registry.insert(2, 1, 'C').unwrap();
        registry.build_adjacency();
        registry
    }

    fn coords<'a>(antennas: impl IntoIterator<Item = &'a Antenna>) -> Vec<(i32, i32)> {
        antennas.into_iter().map(|a| (a.x(), a.y())).collect()
    }

    #[test]
    fn dfs_sample_scenario() {
        let registry = sample();
        let mut traversal = Traversal::new(&registry);
        let visited = traversal.dfs(0, 0).unwrap();
        assert_eq!(coords(visited), vec![(0, 0), (0, 1)]);
        assert!(traversal.is_visited(0, 1));
        assert!(!traversal.is_visited(1, 0));
    }

    #[test]
    fn bfs_sample_scenario() {
        let registry = sample();
        let mut traversal = Traversal::new(&registry);
        let visited: Vec<_> = traversal.bfs(0, 0).unwrap().collect();
        assert_eq!(coords(visited), vec![(0, 0), (0, 1)]);
    }

    #[test]
    fn traversal_after_insert_remove_churn() {
        let mut registry = Registry::new();
        for _ in 0..50 {
            registry.insert(5, 5, 'A').unwrap();
            registry.remove(5, 5).unwrap();
        }
        registry.insert(0, 0, 'A').unwrap();
        registry.insert(0, 1, 'A').unwrap();
        registry.build_adjacency();

        let mut traversal = Traversal::new(&registry);
        assert_eq!(coords(traversal.dfs(0, 1).unwrap()), vec![(0, 1), (0, 0)]);
        assert_eq!(traversal.marks().visited_count(), 2);
    }

    #[test]
    fn missing_start_is_not_found() {
        let registry = sample();
        let mut traversal = Traversal::new(&registry);
        assert!(matches!(traversal.dfs(5, 5), Err(GraphError::NotFound { x: 5, y: 5 })));
        assert!(matches!(traversal.bfs(5, 5), Err(GraphError::NotFound { x: 5, y: 5 })));
        assert!(matches!(traversal.all_paths((0, 0), (9, 9)), Err(GraphError::NotFound { x: 9, y: 9 })));
    }

    #[test]
    fn dfs_follows_most_recent_first_order() {
        let registry = clique();
        let mut traversal = Traversal::new(&registry);
        // (0,0) neighbors: (1,1), (1,0), (0,1); (1,1) neighbors: (1,0), (0,1), (0,0)
        let visited = traversal.dfs(0, 0).unwrap();
        assert_eq!(coords(visited), vec![(0, 0), (1, 1), (1, 0), (0, 1)]);
    }

    #[test]
    fn marks_cover_exactly_reachable_antennas() {
        let registry = clique();
        let mut traversal = Traversal::new(&registry);
        traversal.dfs(1, 1).unwrap();
        for antenna in registry.iter() {
            assert_eq!(traversal.is_visited(antenna.x(), antenna.y()), antenna.frequency().as_char() == 'A');
        }

        // A second traversal starts from fresh marks.
        let _: Vec<_> = traversal.bfs(2, 0).unwrap().collect();
        assert_eq!(traversal.marks().visited_count(), 1);
        assert!(traversal.is_visited(2, 0));
        assert!(!traversal.is_visited(0, 0));
    }

    #[test]
    fn independent_traversals_do_not_share_marks() {
        let registry = clique();
        let mut first = Traversal::new(&registry);
        let mut second = Traversal::new(&registry);
        first.dfs(0, 0).unwrap();
        second.dfs(2, 1).unwrap();
        assert!(first.is_visited(1, 1));
        assert!(!second.is_visited(1, 1));
        assert!(second.is_visited(2, 1));
    }

    #[test]
    fn all_paths_without_connection_is_empty() {
        let registry = sample();
        let mut traversal = Traversal::new(&registry);
        assert_eq!(traversal.all_paths((0, 0), (1, 0)).unwrap().count(), 0);
    }

    #[test]
    fn all_paths_to_self_is_single_node_path() {
        let registry = sample();
        let mut traversal = Traversal::new(&registry);
        let paths: Vec<_> = traversal.all_paths((0, 0), (0, 0)).unwrap().collect();
        assert_eq!(paths, vec![vec![Coord::new(0, 0)]]);
    }

    #[test]
    fn all_paths_in_clique_are_simple_and_complete() {
        let registry = clique();
        let mut traversal = Traversal::new(&registry);
        let paths: Vec<_> = traversal.all_paths((0, 0), (1, 1)).unwrap().collect();

        // K4 between two fixed vertices: 1 direct + 2 via one + 2 via two.
        assert_eq!(paths.len(), 5);
        let unique: HashSet<_> = paths.iter().cloned().collect();
        assert_eq!(unique.len(), 5);
        for path in &paths {
            assert_eq!(path.first(), Some(&Coord::new(0, 0)));
            assert_eq!(path.last(), Some(&Coord::new(1, 1)));
            let distinct: HashSet<_> = path.iter().collect();
            assert_eq!(distinct.len(), path.len());
        }
        // Direct edge comes first: (1,1) is the most recent neighbor of (0,0).
        assert_eq!(paths[0], vec![Coord::new(0, 0), Coord::new(1, 1)]);
        assert_eq!(traversal.marks().visited_count(), 0);
    }

    #[test]
    fn bfs_yields_in_distance_order_once_each() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..15 {
            let mut registry = Registry::new();
            for _ in 0..30 {
                let f = if rng.gen_bool(0.7) { 'A' } else { 'B' };
                let _ = registry.insert(rng.gen_range(0..6), rng.gen_range(0..6), f);
            }
            registry.build_adjacency();
            // Sparsify so distances vary.
            let ids: Vec<_> = registry.iter().map(Antenna::coord).collect();
            for c in ids.iter().step_by(3) {
                registry.remove(c.x, c.y).unwrap();
            }
            let Some(start) = registry.iter().next().map(Antenna::coord) else {
                continue;
            };

            let distances = reference_distances(&registry, start);
            let mut traversal = Traversal::new(&registry);
            let order: Vec<_> = traversal.bfs(start.x, start.y).unwrap().map(Antenna::coord).collect();

            assert_eq!(order.len(), distances.len());
            let unique: HashSet<_> = order.iter().collect();
            assert_eq!(unique.len(), order.len());
            for pair in order.windows(2) {
                assert!(distances[&pair[0]] <= distances[&pair[1]]);
            }
            for antenna in registry.iter() {
                assert_eq!(traversal.is_visited(antenna.x(), antenna.y()), distances.contains_key(&antenna.coord()));
            }
        }
    }

    /// Shortest hop counts computed by repeated relaxation, independent of the
    /// engine under test.
    fn reference_distances(registry: &Registry, start: Coord) -> HashMap<Coord, usize> {
        let mut distances = HashMap::from([(start, 0usize)]);
        let mut changed = true;
        while changed {
            changed = false;
            for antenna in registry.iter() {
                let Some(&d) = distances.get(&antenna.coord()) else {
                    continue;
                };
                for neighbor in registry.neighbors(antenna.id()) {
                    let entry = distances.entry(neighbor.coord()).or_insert(usize::MAX);
                    if d + 1 < *entry {
                        *entry = d + 1;
                        changed = true;
                    }
                }
            }
        }
        distances
    }

    #[test]
    fn all_paths_terminates_on_cycles() {
        let mut registry = Registry::new();
        for y in 0..6 {
            registry.insert(0, y, 'A').unwrap();
        }
        registry.build_adjacency();
        let mut traversal = Traversal::new(&registry);
        let paths: Vec<_> = traversal.all_paths((0, 0), (0, 5)).unwrap().collect();
        // K6: sum over k=0..4 of 4!/(4-k)! intermediate orderings.
        assert_eq!(paths.len(), 1 + 4 + 12 + 24 + 24);
        for path in paths {
            let distinct: HashSet<_> = path.iter().collect();
            assert_eq!(distinct.len(), path.len());
        }
    }
}
