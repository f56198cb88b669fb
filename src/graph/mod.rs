//! Antenna graph core.
//!
//! - `types`: coordinates, frequencies, handles and the antenna record
//! - `registry`: ordered, coordinate-unique owner of all antennas
//! - `adjacency`: same-frequency relation builder
//! - `traversal`: DFS, BFS and all-simple-paths search
//! - `query`: frequency intersection query

pub mod adjacency;
pub mod query;
pub mod registry;
pub mod traversal;
pub mod types;

pub use adjacency::AdjacencySummary;
pub use query::frequency_intersections;
pub use registry::Registry;
pub use traversal::{Bfs, SimplePaths, Traversal, VisitMarks};
pub use types::{Antenna, AntennaId, AntennaView, Coord, Frequency};
