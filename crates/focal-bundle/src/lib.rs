#![forbid(unsafe_code)]

//! MINGLE edge bundling.
//!
//! Each edge becomes a point in 4D (`x1, y1, x2, y2`). Edges are linked to their nearest
//! neighbors in that space and greedily merged into bundles that share a middle span whenever the
//! merge saves ink. Bundles are then unbundled at a smoothing factor into per-edge polylines.

mod arena;
mod geom;
mod ink;
mod mingle;

pub use geom::Vec2;
pub use mingle::{Bundler, MingleStats};

use focal_graphlib::{Edge, EdgeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flattened `[x, y, x, y, ...]` polyline per edge id.
pub type Polylines = BTreeMap<EdgeId, Vec<f64>>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BundleOptions {
    /// Neighbors per edge in the proximity graph (the edge itself included).
    pub k: usize,
    /// Weight of the turning-angle penalty; larger values tolerate sharper turns.
    pub angle_strength: f64,
    /// Unbundling factor in `[0, 1]`.
    pub delta: f64,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            k: 10,
            angle_strength: 1.0,
            delta: 0.8,
        }
    }
}

/// One edge with its laid-out endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub edge: EdgeId,
    pub start: Vec2,
    pub end: Vec2,
}

/// Bundles the segments and unbundles them at `options.delta`.
///
/// Segments with non-finite coordinates are left out of the result.
pub fn bundle(segments: &[Segment], options: &BundleOptions) -> Polylines {
    let finite: Vec<Segment> = segments
        .iter()
        .filter(|s| s.start.iter().chain(&s.end).all(|c| c.is_finite()))
        .copied()
        .collect();
    if finite.len() < segments.len() {
        tracing::warn!(
            skipped = segments.len() - finite.len(),
            "skipping edges with non-finite endpoints"
        );
    }
    if finite.is_empty() {
        return Polylines::new();
    }

    let mut bundler = Bundler::new(&finite, options);
    bundler.mingle();
    bundler.unbundle(options.delta.clamp(0.0, 1.0))
}

/// Bundles graph edges whose endpoints both have coordinates; other edges are skipped.
pub fn bundle_edges(edges: &[Edge], coords: &[Option<Vec2>], options: &BundleOptions) -> Polylines {
    let segments: Vec<Segment> = edges
        .iter()
        .filter_map(|e| {
            let start = coords.get(e.source).copied().flatten()?;
            let end = coords.get(e.target).copied().flatten()?;
            Some(Segment {
                edge: e.id,
                start,
                end,
            })
        })
        .collect();
    bundle(&segments, options)
}
