//! Error taxonomy shared by the registry, traversal engine, codecs and loader.

use std::collections::TryReserveError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    /// Insert onto an occupied coordinate. The registry is left unchanged.
    #[error("an antenna already exists at ({x}, {y})")]
    DuplicateKey { x: i32, y: i32 },

    /// No antenna at the requested coordinate.
    #[error("no antenna at ({x}, {y})")]
    NotFound { x: i32, y: i32 },

    #[error("invalid frequency {0:?}: expected a single printable ASCII character")]
    InvalidFrequency(char),

    #[error("allocation failed")]
    AllocationFailure,

    /// Malformed binary input (bad magic, inconsistent records or edges).
    #[error("format error: {0}")]
    FormatError(String),

    #[error("truncated data: needed {needed} bytes, {available} available")]
    TruncatedData { needed: usize, available: usize },

    #[error("empty source: {0}")]
    EmptySource(String),

    /// Coordinate cannot be placed on a zero-based text grid.
    #[error("antenna at ({x}, {y}) lies outside the text grid")]
    OutOfGrid { x: i32, y: i32 },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<TryReserveError> for GraphError {
    fn from(_: TryReserveError) -> Self {
        GraphError::AllocationFailure
    }
}
