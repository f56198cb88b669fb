//! Ordered registry owning every antenna.
//!
//! Antennas are stored in an arena of slots addressed by [`AntennaId`]; a
//! separate `order` vector keeps the live handles sorted ascending by
//! coordinate. Adjacency lists store handles, never references, so removing
//! an antenna can find and excise every edge that points at it.

use log::{debug, info};

use super::types::{Antenna, AntennaId, Coord, Frequency};
use crate::error::GraphError;
use crate::loader::GridCell;

#[derive(Debug, Clone, Default)]
pub struct Registry {
    /// Arena slots. A removed antenna leaves `None` behind.
    pub(super) slots: Vec<Option<Antenna>>,
    /// Live handles sorted by `(x, y)`.
    pub(super) order: Vec<AntennaId>,
    /// Set once adjacency has been built for the current snapshot.
    pub(super) adjacency_built: bool,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new antenna, keeping the registry sorted by coordinate.
    ///
    /// Fails with [`GraphError::DuplicateKey`] if the coordinate is taken and
    /// with [`GraphError::InvalidFrequency`] if `frequency` does not fit the
    /// 8-bit frequency field. On failure nothing is modified.
    pub fn insert(&mut self, x: i32, y: i32, frequency: char) -> Result<&Antenna, GraphError> {
        let frequency = Frequency::try_from(frequency)?;
        let id = self.insert_record(Coord::new(x, y), frequency)?;
        self.get(id).ok_or(GraphError::NotFound { x, y })
    }

    pub(crate) fn insert_record(&mut self, coord: Coord, frequency: Frequency) -> Result<AntennaId, GraphError> {
        let position = self.order.partition_point(|id| self.coord_of(*id) < coord);
        if self.order.get(position).map(|id| self.coord_of(*id)) == Some(coord) {
            return Err(GraphError::DuplicateKey { x: coord.x, y: coord.y });
        }

        self.slots.try_reserve(1)?;
        self.order.try_reserve(1)?;

        let id = AntennaId(self.slots.len());
        self.slots.push(Some(Antenna::new(id, coord, frequency)));
        self.order.insert(position, id);
        Ok(id)
    }

    /// Look up an antenna by coordinate. A miss is an ordinary `None`.
    pub fn find(&self, x: i32, y: i32) -> Option<&Antenna> {
        self.find_id(Coord::new(x, y)).and_then(|id| self.get(id))
    }

    pub fn find_id(&self, coord: Coord) -> Option<AntennaId> {
        self.order.iter().copied().find(|id| self.coord_of(*id) == coord)
    }

    pub fn get(&self, id: AntennaId) -> Option<&Antenna> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Remove the antenna at `(x, y)` and return it.
    ///
    /// Every back-reference held by its former neighbors is removed as well,
    /// so the adjacency relation stays symmetric. The returned antenna keeps
    /// its own (now detached) neighbor list for inspection.
    pub fn remove(&mut self, x: i32, y: i32) -> Result<Antenna, GraphError> {
        let coord = Coord::new(x, y);
        let position = self
            .order
            .iter()
            .position(|id| self.coord_of(*id) == coord)
            .ok_or(GraphError::NotFound { x, y })?;
        let id = self.order.remove(position);
        let removed = self
            .slots
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(GraphError::NotFound { x, y })?;

        for neighbor in removed.neighbors() {
            if let Some(antenna) = self.slots.get_mut(neighbor.0).and_then(Option::as_mut) {
                antenna.neighbors.retain(|n| *n != id);
            }
        }
        debug!("Removed antenna {} and {} back-references", removed, removed.degree());
        Ok(removed)
    }

    pub fn count(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drop every antenna and edge.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.order.clear();
        self.adjacency_built = false;
    }

    /// Antennas in ascending `(x, y)` order.
    pub fn iter(&self) -> impl Iterator<Item = &Antenna> + '_ {
        self.order.iter().filter_map(|id| self.get(*id))
    }

    pub fn ids(&self) -> impl Iterator<Item = AntennaId> + '_ {
        self.order.iter().copied()
    }

    /// Number of arena slots ever handed out, live or removed.
    ///
    /// Slots are never reclaimed, since handles must stay unique for the life
    /// of the registry. This grows with every insert, including inserts that
    /// were later removed, and it sizes the visitation bitset and the binary
    /// encoder's position table. [`Registry::clear`] resets it to zero.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Bulk load grid cells. Duplicate coordinates are dropped and the
    /// earlier cell wins. Returns how many antennas were created.
    ///
    /// Every frequency is validated and storage for all cells is reserved
    /// before the first insert, so a failed load leaves the registry as it
    /// was.
    pub fn load_cells<I>(&mut self, cells: I) -> Result<usize, GraphError>
    where
        I: IntoIterator<Item = GridCell>,
    {
        let records = cells
            .into_iter()
            .map(|cell| Ok((Coord::new(cell.row, cell.column), Frequency::try_from(cell.frequency)?)))
            .collect::<Result<Vec<_>, GraphError>>()?;
        self.slots.try_reserve(records.len())?;
        self.order.try_reserve(records.len())?;

        let mut loaded = 0;
        for (coord, frequency) in records {
            match self.insert_record(coord, frequency) {
                Ok(_) => loaded += 1,
                Err(GraphError::DuplicateKey { x, y }) => {
                    debug!("Ignoring duplicate antenna at ({}, {})", x, y);
                }
                Err(e) => return Err(e),
            }
        }
        info!("Loaded {} antennas ({} total)", loaded, self.count());
        Ok(loaded)
    }

    pub(crate) fn coord_of(&self, id: AntennaId) -> Coord {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
            .map(|a| a.coord)
            .unwrap_or(Coord::new(i32::MAX, i32::MAX))
    }
}
