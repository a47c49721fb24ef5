//! Coordinate index for node deduplication.

use crate::types::NodeId;
use std::collections::HashMap;

/// Hashable key for an (x, y) pair.
///
/// Built from the bit patterns of the two doubles, so equality is exact.
/// Negative zero is folded onto positive zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordKey {
    x: u64,
    y: u64,
}

impl CoordKey {
    /// Key for the exact coordinate.
    #[must_use]
    pub fn exact(x: f64, y: f64) -> Self {
        Self {
            x: normalized_bits(x),
            y: normalized_bits(y),
        }
    }

    /// Key for the coordinate rounded to `decimals` decimal places.
    #[must_use]
    pub fn rounded(x: f64, y: f64, decimals: u32) -> Self {
        Self::exact(round_to(x, decimals), round_to(y, decimals))
    }
}

fn normalized_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

/// Rounds `v` to `decimals` decimal places.
///
/// Values too large to scale are returned unchanged; at that magnitude the
/// fractional digits are not representable anyway.
#[must_use]
pub fn round_to(v: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    let scaled = v * scale;
    if !scaled.is_finite() {
        return v;
    }
    let r = scaled.round() / scale;
    if r.is_finite() {
        r
    } else {
        v
    }
}

#[derive(Debug, Clone, Copy)]
struct IndexedPoint {
    id: NodeId,
    x: f64,
    y: f64,
}

/// Maps coordinates to node identities.
///
/// The exact map is always current. Rounded maps are built the first time a
/// precision level is queried and are updated on every later insert.
#[derive(Debug, Clone, Default)]
pub struct CoordinateIndex {
    exact: HashMap<CoordKey, NodeId>,
    points: Vec<IndexedPoint>,
    levels: HashMap<u32, HashMap<CoordKey, Vec<usize>>>,
}

impl CoordinateIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node at its exact coordinate.
    ///
    /// A later node at the same exact coordinate shadows the earlier one.
    pub fn insert(&mut self, id: NodeId, x: f64, y: f64) {
        self.exact.insert(CoordKey::exact(x, y), id);
        let slot = self.points.len();
        self.points.push(IndexedPoint { id, x, y });
        for (decimals, level) in &mut self.levels {
            level
                .entry(CoordKey::rounded(x, y, *decimals))
                .or_default()
                .push(slot);
        }
    }

    /// Exact-match lookup.
    #[must_use]
    pub fn get_exact(&self, x: f64, y: f64) -> Option<NodeId> {
        self.exact.get(&CoordKey::exact(x, y)).copied()
    }

    /// Lookup after rounding both the query and the indexed coordinates.
    ///
    /// When several nodes fall into the same rounded cell, the one nearest to
    /// the unrounded query wins; the later registration wins a tie.
    pub fn get_rounded(&mut self, x: f64, y: f64, decimals: u32) -> Option<NodeId> {
        let points = &self.points;
        let level = self.levels.entry(decimals).or_insert_with(|| {
            let mut level: HashMap<CoordKey, Vec<usize>> = HashMap::new();
            for (slot, p) in points.iter().enumerate() {
                level
                    .entry(CoordKey::rounded(p.x, p.y, decimals))
                    .or_default()
                    .push(slot);
            }
            level
        });

        let candidates = level.get(&CoordKey::rounded(x, y, decimals))?;
        let mut best: Option<(f64, NodeId)> = None;
        for &slot in candidates {
            let p = points[slot];
            let dist = (p.x - x).hypot(p.y - y);
            match best {
                Some((best_dist, _)) if dist > best_dist => {}
                _ => best = Some((dist, p.id)),
            }
        }
        best.map(|(_, id)| id)
    }

    /// Number of indexed nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when no node is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Precision levels materialized so far.
    #[must_use]
    pub fn materialized_levels(&self) -> usize {
        self.levels.len()
    }
}
