//! Human-readable graph listing.

use std::fmt::Write;

use crate::graph::Registry;

/// One line per antenna in registry order, followed by its neighbors in
/// adjacency order.
///
/// ```text
/// (0, 0) [A] -> (0, 1) [A]
/// (1, 0) [B]: no connections
/// ```
pub fn render_listing(registry: &Registry) -> String {
    if registry.is_empty() {
        return "empty graph\n".to_string();
    }

    let mut out = String::new();
    for antenna in registry.iter() {
        let _ = write!(out, "{}", antenna);
        let mut neighbors = registry.neighbors(antenna.id()).peekable();
        if neighbors.peek().is_none() {
            out.push_str(": no connections");
        }
        for neighbor in neighbors {
            let _ = write!(out, " -> {}", neighbor);
        }
        out.push('\n');
    }
    let _ = writeln!(out, "{} antennas, {} edges", registry.count(), registry.edge_count());
    out
}
