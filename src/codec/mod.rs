//! Persistence codecs.
//!
//! - `binary`: compact `ANTG` format carrying antennas and adjacency
//! - `text_grid`: dense, human-readable grid carrying antennas only

pub mod binary;
pub mod text_grid;

pub use text_grid::GridLayout;
