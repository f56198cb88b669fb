//! Dense text grid format.
//!
//! The grid spans rows `0..=max_x` and columns `0..=max_y`. Every cell is
//! written as one character followed by the separator, and every row ends with
//! `\n`. Empty cells hold the blank placeholder.
//!
//! The reader here is positional: cell `j` of a row is the `j`-th
//! separator-delimited token. The bulk loader in [`crate::loader`] instead
//! counts only antenna characters, so feeding a saved grid through the loader
//! packs every row to the left and does not reproduce the saved layout.
//! The two readers are separate contracts and are not interchangeable.

use log::info;
use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::GraphError;
use crate::graph::Registry;

/// Characters used for blank cells and cell separation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub blank: char,
    pub separator: char,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            blank: '.',
            separator: ' ',
        }
    }
}

impl From<&Config> for GridLayout {
    fn from(config: &Config) -> Self {
        Self {
            blank: config.blank_cell,
            separator: config.cell_separator,
        }
    }
}

/// Render the registry as a dense grid.
///
/// An empty registry renders as a single blank cell. Antennas with negative
/// coordinates cannot be placed and fail with [`GraphError::OutOfGrid`].
pub fn encode(registry: &Registry, layout: GridLayout) -> Result<String, GraphError> {
    if let Some(a) = registry.iter().find(|a| a.x() < 0 || a.y() < 0) {
        return Err(GraphError::OutOfGrid { x: a.x(), y: a.y() });
    }

    let rows = registry.iter().map(|a| a.x()).max().unwrap_or(0) as usize + 1;
    let columns = registry.iter().map(|a| a.y()).max().unwrap_or(0) as usize + 1;
    let cells = rows
        .checked_mul(columns)
        .ok_or(GraphError::AllocationFailure)?;

    let mut grid: Vec<char> = Vec::new();
    grid.try_reserve_exact(cells)?;
    grid.resize(cells, layout.blank);
    for antenna in registry.iter() {
        grid[antenna.x() as usize * columns + antenna.y() as usize] = antenna.frequency().as_char();
    }

    let mut out = String::new();
    out.try_reserve(cells * 2 + rows)?;
    for row in grid.chunks(columns) {
        for cell in row {
            out.push(*cell);
            out.push(layout.separator);
        }
        out.push('\n');
    }
    Ok(out)
}

/// Write the grid to `path`, replacing any existing file.
pub fn save(registry: &Registry, path: &Path, layout: GridLayout) -> Result<(), GraphError> {
    let text = encode(registry, layout)?;
    fs::write(path, text)?;
    info!("Saved {} antennas as text grid to {}", registry.count(), path.display());
    Ok(())
}

/// Read a grid written by [`encode`] back into a fresh registry, keeping each
/// antenna at its exact row and column. Adjacency is not stored in this
/// format and is left unbuilt.
pub fn decode(text: &str, layout: GridLayout) -> Result<Registry, GraphError> {
    let mut registry = Registry::new();
    for (row, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        let cells = line.split(layout.separator).filter(|token| !token.is_empty());
        for (column, token) in cells.enumerate() {
            let mut chars = token.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return Err(GraphError::FormatError(format!(
                    "row {} column {}: expected a single character, found {:?}",
                    row, column, token
                )));
            };
            if c == layout.blank {
                continue;
            }
            let (x, y) = (to_i32(row)?, to_i32(column)?);
            registry.insert(x, y, c)?;
        }
    }
    Ok(registry)
}

fn to_i32(value: usize) -> Result<i32, GraphError> {
    i32::try_from(value).map_err(|_| GraphError::FormatError(format!("grid index {} does not fit in 32 bits", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader;

    fn sample() -> Registry {
        let mut registry = Registry::new();
        registry.insert(0, 0, 'A').unwrap();
        registry.insert(0, 2, 'B').unwrap();
        registry.insert(1, 1, 'A').unwrap();
        registry
    }

    fn cells(registry: &Registry) -> Vec<(i32, i32, char)> {
        registry.iter().map(|a| (a.x(), a.y(), a.frequency().as_char())).collect()
    }

    #[test]
    fn encode_pads_every_cell() {
        let text = encode(&sample(), GridLayout::default()).unwrap();
        assert_eq!(text, "A . B \n. A . \n");
    }

    #[test]
    fn empty_registry_is_single_blank_cell() {
        assert_eq!(encode(&Registry::new(), GridLayout::default()).unwrap(), ". \n");
    }

    #[test]
    fn custom_layout() {
        let layout = GridLayout { blank: '#', separator: '|' };
        assert_eq!(encode(&sample(), layout).unwrap(), "A|#|B|\n#|A|#|\n");
    }

    #[test]
    fn negative_coordinates_are_out_of_grid() {
        let mut registry = sample();
        registry.insert(-1, 0, 'C').unwrap();
        assert!(matches!(encode(&registry, GridLayout::default()), Err(GraphError::OutOfGrid { x: -1, y: 0 })));
    }

    #[test]
    fn oversized_grid_is_allocation_failure() {
        let mut registry = Registry::new();
        registry.insert(i32::MAX, i32::MAX, 'A').unwrap();
        assert!(matches!(encode(&registry, GridLayout::default()), Err(GraphError::AllocationFailure)));
    }

    #[test]
    fn positional_decode_restores_layout() {
        let registry = sample();
        let layout = GridLayout::default();
        let decoded = decode(&encode(&registry, layout).unwrap(), layout).unwrap();
        assert_eq!(cells(&decoded), cells(&registry));
        assert!(!decoded.has_adjacency());
    }

    #[test]
    fn decode_rejects_multi_character_cells() {
        assert!(matches!(decode("AB .\n", GridLayout::default()), Err(GraphError::FormatError(_))));
    }

    #[test]
    fn bulk_loader_does_not_reproduce_saved_layout() {
        let registry = sample();
        let text = encode(&registry, GridLayout::default()).unwrap();
        let mut reloaded = Registry::new();
        reloaded.load_cells(loader::parse_grid(&text, '.').unwrap()).unwrap();

        // Blank cells are not counted, so (0,2) collapses to (0,1) and (1,1) to (1,0).
        assert_eq!(cells(&reloaded), vec![(0, 0, 'A'), (0, 1, 'B'), (1, 0, 'A')]);
        assert_ne!(cells(&reloaded), cells(&registry));
    }

    #[test]
    fn save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.txt");
        save(&sample(), &path, GridLayout::default()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "A . B \n. A . \n");
    }
}
