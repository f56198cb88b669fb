//! `ANTG` binary format.
//!
//! All integers are little-endian, with no padding:
//!
//! ```text
//! magic       4 bytes   "ANTG"
//! count       u32       N
//! records     N x { x: i32, y: i32, frequency: u8 }      registry order
//! adjacency   N x { degree: u32, degree x index: u32 }   same order
//! ```
//!
//! Each index is the 0-based position of the neighbor among the records.
//! There is no version field, footer or checksum.

use log::info;
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::mem::size_of;
use std::path::Path;

use crate::error::GraphError;
use crate::graph::{AntennaId, Coord, Frequency, Registry};

/// Magic bytes identifying an antenna graph file.
pub const MAGIC: &[u8; 4] = b"ANTG";

/// Header size in bytes (magic + count).
pub const HEADER_SIZE: usize = MAGIC.len() + size_of::<u32>();

/// Size of one packed antenna record.
pub const RECORD_SIZE: usize = 2 * size_of::<i32>() + size_of::<u8>();

/// True if `data` starts with the `ANTG` magic.
pub fn has_magic(data: &[u8]) -> bool {
    data.starts_with(MAGIC)
}

/// Encode the registry and its adjacency.
pub fn encode(registry: &Registry) -> Result<Vec<u8>, GraphError> {
    let mut out = Vec::new();
    out.try_reserve(HEADER_SIZE + registry.count() * (RECORD_SIZE + size_of::<u32>()))?;
    write_to(registry, &mut out)?;
    Ok(out)
}

/// Stream the encoding into `writer`.
pub fn write_to<W: Write>(registry: &Registry, writer: &mut W) -> Result<(), GraphError> {
    let count = to_u32(registry.count(), "antenna count")?;

    // Slot index -> serialization position.
    let mut positions: Vec<Option<u32>> = vec![None; registry.slot_count()];
    for (position, id) in registry.ids().enumerate() {
        positions[id.index()] = Some(to_u32(position, "antenna position")?);
    }

    writer.write_all(MAGIC)?;
    writer.write_all(&count.to_le_bytes())?;

    for antenna in registry.iter() {
        writer.write_all(&antenna.x().to_le_bytes())?;
        writer.write_all(&antenna.y().to_le_bytes())?;
        writer.write_all(&[antenna.frequency().as_byte()])?;
    }

    for antenna in registry.iter() {
        writer.write_all(&to_u32(antenna.degree(), "adjacency count")?.to_le_bytes())?;
        for neighbor in antenna.neighbors() {
            let index = positions
                .get(neighbor.index())
                .copied()
                .flatten()
                .ok_or_else(|| GraphError::FormatError(format!("{} references a removed antenna", antenna)))?;
            writer.write_all(&index.to_le_bytes())?;
        }
    }
    Ok(())
}

/// Write the encoding to `path`, replacing any existing file.
pub fn save(registry: &Registry, path: &Path) -> Result<(), GraphError> {
    let bytes = encode(registry)?;
    fs::write(path, &bytes)?;
    info!("Saved {} antennas ({} bytes) to {}", registry.count(), bytes.len(), path.display());
    Ok(())
}

/// Read and decode the file at `path`.
///
/// # Arguments
///
/// * `path` - `ANTG` file to read
///
/// # Returns
///
/// The decoded registry with its adjacency, see [`decode`].
pub fn load(path: &Path) -> Result<Registry, GraphError> {
    let data = fs::read(path)?;
    let registry = decode(&data)?;
    info!("Loaded {} antennas from {}", registry.count(), path.display());
    Ok(registry)
}

/// Decode a registry with its adjacency.
///
/// Beyond the layout itself, the decoded graph must satisfy the registry
/// invariants: records strictly ascending by coordinate, printable ASCII
/// frequencies, and a symmetric same-frequency relation without self-loops
/// or duplicate edges. Anything else is a [`GraphError::FormatError`].
///
/// # Arguments
///
/// * `data` - Complete file contents, magic included
///
/// # Returns
///
/// A fresh registry with adjacency marked as built. Short input fails with
/// [`GraphError::TruncatedData`] before any count-sized allocation.
pub fn decode(data: &[u8]) -> Result<Registry, GraphError> {
    let mut reader = Reader::new(data);

    if reader.take(MAGIC.len())? != MAGIC {
        return Err(GraphError::FormatError("bad magic, expected \"ANTG\"".to_string()));
    }
    let count = reader.u32()? as usize;
    reader.require(count.saturating_mul(RECORD_SIZE))?;

    let mut registry = Registry::new();
    let mut ids: Vec<AntennaId> = Vec::new();
    ids.try_reserve(count)?;
    let mut previous: Option<Coord> = None;

    for position in 0..count {
        let coord = Coord::new(reader.i32()?, reader.i32()?);
        let byte = reader.u8()?;
        let frequency = Frequency::try_from(byte)
            .map_err(|_| GraphError::FormatError(format!("record {} has invalid frequency byte {:#04x}", position, byte)))?;
        if previous.is_some_and(|p| p >= coord) {
            return Err(GraphError::FormatError(format!("record {} at {} is out of order or duplicated", position, coord)));
        }
        previous = Some(coord);
        ids.push(registry.insert_record(coord, frequency)?);
    }

    let mut edges: HashSet<(usize, usize)> = HashSet::new();
    for (position, &id) in ids.iter().enumerate() {
        let degree = reader.u32()? as usize;
        reader.require(degree.saturating_mul(size_of::<u32>()))?;
        for _ in 0..degree {
            let index = reader.u32()? as usize;
            let Some(&neighbor) = ids.get(index) else {
                return Err(GraphError::FormatError(format!("record {} references index {} of {}", position, index, count)));
            };
            if index == position {
                return Err(GraphError::FormatError(format!("record {} references itself", position)));
            }
            let same_frequency = registry.get(id).map(|a| a.frequency()) == registry.get(neighbor).map(|a| a.frequency());
            if !same_frequency {
                return Err(GraphError::FormatError(format!("edge {} -> {} joins different frequencies", position, index)));
            }
            if !edges.insert((position, index)) {
                return Err(GraphError::FormatError(format!("duplicate edge {} -> {}", position, index)));
            }
            registry.push_neighbor(id, neighbor);
        }
    }

    if let Some((a, b)) = edges.iter().find(|(a, b)| !edges.contains(&(*b, *a))) {
        return Err(GraphError::FormatError(format!("edge {} -> {} has no reverse edge", a, b)));
    }
    if reader.remaining() != 0 {
        return Err(GraphError::FormatError(format!("{} trailing bytes", reader.remaining())));
    }

    registry.mark_adjacency_built();
    Ok(registry)
}

fn to_u32(value: usize, what: &str) -> Result<u32, GraphError> {
    u32::try_from(value).map_err(|_| GraphError::FormatError(format!("{} {} does not fit in 32 bits", what, value)))
}

/// Bounds-checked little-endian cursor.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Fail early if fewer than `needed` bytes are left.
    fn require(&self, needed: usize) -> Result<(), GraphError> {
        if needed > self.remaining() {
            return Err(GraphError::TruncatedData {
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], GraphError> {
        self.require(n)?;
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], GraphError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, GraphError> {
        Ok(self.array::<1>()?[0])
    }

    fn u32(&mut self) -> Result<u32, GraphError> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    fn i32(&mut self) -> Result<i32, GraphError> {
        Ok(i32::from_le_bytes(self.array()?))
    }
}
