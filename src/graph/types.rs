//! Core value types of the antenna graph.

use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

use crate::error::GraphError;

/// Grid coordinate. `x` is the row, `y` the column.
///
/// The derived ordering compares `x` first, then `y`, which is the registry
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Frequency class of an antenna: one printable ASCII character.
///
/// Stored as a byte so it maps directly onto the 8-bit field of the binary
/// format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "char")]
pub struct Frequency(u8);

impl Frequency {
    pub fn as_char(self) -> char {
        self.0 as char
    }

    pub fn as_byte(self) -> u8 {
        self.0
    }
}

impl TryFrom<char> for Frequency {
    type Error = GraphError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        if c.is_ascii_graphic() {
            Ok(Frequency(c as u8))
        } else {
            Err(GraphError::InvalidFrequency(c))
        }
    }
}

impl TryFrom<u8> for Frequency {
    type Error = GraphError;

    fn try_from(b: u8) -> Result<Self, Self::Error> {
        Frequency::try_from(b as char)
    }
}

impl From<Frequency> for char {
    fn from(f: Frequency) -> Self {
        f.as_char()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Stable handle of an antenna inside one registry.
///
/// Handles are slot indices and are never reused after a removal, so a stale
/// handle resolves to nothing instead of to a different antenna.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AntennaId(pub(crate) usize);

impl AntennaId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// An antenna record owned by the registry.
#[derive(Debug, Clone)]
pub struct Antenna {
    pub(crate) id: AntennaId,
    pub(crate) coord: Coord,
    pub(crate) frequency: Frequency,
    /// Same-frequency neighbors, most recently linked first.
    pub(crate) neighbors: VecDeque<AntennaId>,
}

impl Antenna {
    pub(crate) fn new(id: AntennaId, coord: Coord, frequency: Frequency) -> Self {
        Self {
            id,
            coord,
            frequency,
            neighbors: VecDeque::new(),
        }
    }

    pub fn id(&self) -> AntennaId {
        self.id
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn x(&self) -> i32 {
        self.coord.x
    }

    pub fn y(&self) -> i32 {
        self.coord.y
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Neighbor handles in adjacency order.
    pub fn neighbors(&self) -> impl Iterator<Item = AntennaId> + '_ {
        self.neighbors.iter().copied()
    }

    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_linked_to(&self, other: AntennaId) -> bool {
        self.neighbors.contains(&other)
    }
}

impl fmt::Display for Antenna {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.coord, self.frequency)
    }
}

/// Serializable snapshot of an antenna, used for JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AntennaView {
    pub x: i32,
    pub y: i32,
    pub frequency: Frequency,
}

impl From<&Antenna> for AntennaView {
    fn from(a: &Antenna) -> Self {
        AntennaView {
            x: a.coord.x,
            y: a.coord.y,
            frequency: a.frequency,
        }
    }
}
