//! Space-filling spiral layout.
//!
//! Nodes are walked in tier order and placed on an Archimedean spiral whose parameter is the
//! accumulated neighbor distance, so similar consecutive nodes sit close together and each tier
//! boundary opens a visible gap.

use super::SpiralOptions;
use crate::error::Result;
use crate::geom::{Point, Rect, extents};
use crate::partition::Region;
use crate::request::{LayoutRequest, LayoutResult, remaining_edges};
use crate::state::LayoutState;
use crate::subgraph::Subgraph;

/// Spiral positions for nodes `0..tier_of.len()` walked in order.
///
/// `distance(prev, cur)` is floored at `min_step`; `tier_gap` is added whenever `tier_of`
/// changes. The first node sits at parameter 1.
pub fn spiral_positions(
    tier_of: &[usize],
    mut distance: impl FnMut(usize, usize) -> f64,
    options: &SpiralOptions,
    tier_gap: f64,
) -> Vec<Point> {
    let mut t = 1.0;
    let mut out = Vec::with_capacity(tier_of.len());
    for i in 0..tier_of.len() {
        if i > 0 {
            t += distance(i - 1, i).max(options.min_step);
            if tier_of[i] != tier_of[i - 1] {
                t += tier_gap;
            }
        }
        let r = options.radius_scale * t;
        out.push(Point::new(r * t.cos(), r * t.sin()));
    }
    out
}

pub fn layout(state: &LayoutState, request: &LayoutRequest, options: &SpiralOptions) -> Result<LayoutResult> {
    let padding = state.spec.padding;
    let subgraph = Subgraph::new(&state.graph, &request.groups, &request.neighbors_by_hop);
    let n = subgraph.len();
    let tier_of: Vec<usize> = (0..n).map(|l| subgraph.region_of(l)).collect();

    let mut positions = spiral_positions(
        &tier_of,
        |a, b| state.distance(subgraph.global(a), subgraph.global(b), request.use_global_mask),
        options,
        state.spec.gap_between_hop,
    );

    let (mut width, mut height) = (0.0, 0.0);
    if let Some(((x0, x1), (y0, y1))) = extents(positions.iter().copied()) {
        for p in &mut positions {
            p.x += padding - x0;
            p.y += padding - y0;
        }
        width = x1 - x0 + 2.0 * padding;
        height = y1 - y0 + 2.0 * padding;
    }

    let mut coordinates = vec![None; state.num_nodes()];
    for (local, p) in positions.iter().enumerate() {
        coordinates[subgraph.global(local)] = Some(*p);
    }

    let num_focal = request.groups.len();
    let regions = (0..num_focal + request.hops())
        .map(|r| {
            let members: Vec<Point> = (0..n)
                .filter(|&l| tier_of[l] == r)
                .map(|l| positions[l])
                .collect();
            let bounds = Rect::around(members.iter().copied(), padding).unwrap_or_default();
            if r < num_focal {
                Region::focal(r, bounds, members.len())
            } else {
                Region::hop(r - num_focal + 1, bounds, members.len())
            }
        })
        .collect();

    tracing::debug!(nodes = n, width, height, "spiral layout");

    Ok(LayoutResult {
        remaining_edges: remaining_edges(&state.graph, &coordinates),
        coordinates,
        regions,
        canvas_width: width,
        canvas_height: height,
        num_nodes: n,
        edge_bundles: None,
    })
}
