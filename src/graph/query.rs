//! Frequency intersection query.
//!
//! Reports coordinates where an antenna of one frequency sits exactly on an
//! antenna of another. The registry never holds two antennas on the same
//! coordinate, so with `f1 != f2` this is always empty and with `f1 == f2`
//! every antenna of that frequency matches itself. The literal semantics are
//! kept as-is; a geometric notion of crossing coverage is not provided.

use log::debug;

use super::registry::Registry;
use super::types::{Coord, Frequency};

/// Coordinates where an antenna of `f1` coincides with an antenna of `f2`,
/// in registry order.
///
/// # Arguments
///
/// * `registry` - Antennas to search
/// * `f1` - First frequency
/// * `f2` - Second frequency
///
/// # Returns
///
/// Matching coordinates. Empty when `f1 != f2`; every antenna of `f1` when
/// the two are equal.
pub fn frequency_intersections(registry: &Registry, f1: Frequency, f2: Frequency) -> Vec<Coord> {
    let mut hits = Vec::new();
    for a in registry.iter().filter(|a| a.frequency() == f1) {
        for b in registry.iter().filter(|b| b.frequency() == f2) {
            if a.coord() == b.coord() {
                hits.push(a.coord());
            }
        }
    }
    debug!("Intersections between {} and {}: {}", f1, f2, hits.len());
    hits
}
