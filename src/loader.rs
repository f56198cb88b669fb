//! Raw text grid ingestion.
//!
//! Turns lines of characters into `(row, column, frequency)` cells. Spaces and
//! the blank placeholder are skipped and do not advance the column counter:
//! the column of an antenna is the number of antennas seen before it on the
//! same line. This is NOT positionally compatible with the padded grid that
//! [`crate::codec::text_grid`] writes; see that module.

use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::GraphError;
use crate::graph::Registry;

/// Buffer size for reading grid files (8KB).
const BUFFER_SIZE: usize = 8 * 1024;

/// One non-blank grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub row: i32,
    pub column: i32,
    pub frequency: char,
}

/// Parse raw grid lines into cells.
///
/// Trailing `\n` / `\r\n` terminators are stripped. Every line is a row,
/// including empty ones. Fails with [`GraphError::EmptySource`] if there are
/// no lines or no non-space characters at all.
pub fn parse_lines<I, S>(lines: I, blank: char) -> Result<Vec<GridCell>, GraphError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut cells = Vec::new();
    let mut rows = 0usize;
    let mut max_columns = 0usize;

    for (row, line) in lines.into_iter().enumerate() {
        let line = line.as_ref().trim_end_matches(['\n', '\r']);
        rows += 1;

        let non_space = line.chars().filter(|c| *c != ' ').count();
        max_columns = max_columns.max(non_space);

        let mut column = 0i32;
        for c in line.chars().filter(|c| *c != ' ' && *c != blank) {
            cells.try_reserve(1)?;
            cells.push(GridCell {
                row: to_index(row)?,
                column,
                frequency: c,
            });
            column += 1;
        }
    }

    if rows == 0 || max_columns == 0 {
        return Err(GraphError::EmptySource("no rows or no usable columns found".to_string()));
    }
    if cells.is_empty() {
        warn!("Grid has {} rows but no antennas", rows);
    }
    Ok(cells)
}

/// Parse a whole grid held in memory.
pub fn parse_grid(text: &str, blank: char) -> Result<Vec<GridCell>, GraphError> {
    parse_lines(text.lines(), blank)
}

/// Load a grid file into a fresh registry.
///
/// Nothing is returned on failure, so a caller's existing registry is never
/// left half-replaced.
///
/// # Arguments
///
/// * `path` - Grid file to read
/// * `blank` - Placeholder character for empty cells
///
/// # Returns
///
/// A registry holding every antenna of the grid, with adjacency not yet
/// built. Fails with [`GraphError::EmptySource`] if the file has no usable
/// rows or columns.
pub fn load_grid_file(path: &Path, blank: char) -> Result<Registry, GraphError> {
    let file = File::open(path)?;
    let reader = BufReader::with_capacity(BUFFER_SIZE, file);
    let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;

    let cells = parse_lines(&lines, blank).map_err(|e| match e {
        GraphError::EmptySource(msg) => GraphError::EmptySource(format!("{}: {}", path.display(), msg)),
        other => other,
    })?;

    let mut registry = Registry::new();
    registry.load_cells(cells)?;
    info!("Imported {} antennas from {}", registry.count(), path.display());
    Ok(registry)
}

fn to_index(row: usize) -> Result<i32, GraphError> {
    i32::try_from(row).map_err(|_| GraphError::FormatError(format!("row index {} does not fit in 32 bits", row)))
}
