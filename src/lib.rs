//! Antenna graph engine.
//!
//! Antennas live on an integer grid and carry a single-character frequency.
//! Antennas sharing a frequency are connected by an undirected relation which
//! can be traversed (DFS, BFS, all simple paths), queried, and persisted in a
//! compact binary form or a dense text grid.
//!
//! ## Module Organization
//!
//! - `graph`: registry, adjacency builder, traversal engine and queries
//! - `codec`: the `ANTG` binary format and the text grid format
//! - `loader`: raw grid ingestion into `(row, column, frequency)` cells
//! - `report`: human-readable listing of the graph
//! - `config`: TOML configuration for the command runner

pub mod codec;
pub mod config;
pub mod error;
pub mod graph;
pub mod loader;
pub mod report;

pub use config::Config;
pub use error::GraphError;
pub use graph::{AdjacencySummary, Antenna, AntennaId, Coord, Frequency, Registry, Traversal};
