//! Grouped layout with separation constraints.
//!
//! Focal groups stack top to bottom and tiers run left to right: every focal group sits left of
//! hop 1, hop `h` sits left of hop `h + 1`, and consecutive focal groups keep a vertical gap.
//! Constraints are enforced on whole groups after each simulation tick by moving both sides
//! apart, in three phases of growing strictness. A final one-sided sweep in constraint order
//! leaves every separation satisfied exactly.

use super::ConstraintOptions;
use crate::error::Result;
use crate::geom::{Point, Rect, extents};
use crate::partition::Region;
use crate::request::{LayoutRequest, LayoutResult, remaining_edges};
use crate::scale::LinearScale;
use crate::sim::{CollideForce, Force, Link, LinkForce, ManyBodyForce, SimNode, Simulation};
use crate::state::LayoutState;
use crate::subgraph::Subgraph;

/// Margin kept inside the canvas when the y-coordinates are rescaled.
const Y_MARGIN: f64 = 2.0;
const PROJECTION_SWEEPS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// `left` must end at least `gap` before `right` starts along `axis`.
#[derive(Debug, Clone, Copy)]
struct Separation {
    axis: Axis,
    left: usize,
    right: usize,
    gap: f64,
}

pub fn layout(state: &LayoutState, request: &LayoutRequest, options: &ConstraintOptions) -> Result<LayoutResult> {
    let spec = &state.spec;
    let padding = spec.padding;
    let subgraph = Subgraph::new(&state.graph, &request.groups, &request.neighbors_by_hop);
    let n = subgraph.len();
    let size = state.canvas.size(n);
    let num_focal = request.groups.len();
    let hops = request.hops();

    let mut members: Vec<Vec<usize>> = vec![Vec::new(); num_focal + hops];
    for local in 0..n {
        members[subgraph.region_of(local)].push(local);
    }

    let y_gap = spec.gap_between_hop + 4.0 * padding;
    let x_gap = spec.gap_between_hop + 2.0 * padding;
    let mut separations = Vec::new();
    for j in 1..num_focal {
        separations.push(Separation {
            axis: Axis::Y,
            left: j - 1,
            right: j,
            gap: y_gap,
        });
    }
    if hops > 0 {
        for j in 0..num_focal {
            separations.push(Separation {
                axis: Axis::X,
                left: j,
                right: num_focal,
                gap: x_gap,
            });
        }
    }
    for h in 1..hops {
        separations.push(Separation {
            axis: Axis::X,
            left: num_focal + h - 1,
            right: num_focal + h,
            gap: x_gap,
        });
    }

    let links: Vec<Link> = subgraph
        .edges()
        .iter()
        .map(|e| {
            let d = state.distance(
                subgraph.global(e.source),
                subgraph.global(e.target),
                request.use_global_mask,
            );
            Link::new(e.source, e.target, options.link_length * d)
        })
        .collect();

    let mut sim = Simulation::new(n, options.random_seed)
        .with_force(Force::Link(LinkForce::new(links, n)))
        .with_force(Force::ManyBody(ManyBodyForce::new(-30.0)));
    for node in sim.nodes_mut() {
        node.x += size / 2.0;
        node.y += size / 2.0;
    }

    sim.tick_n(options.unconstrained_iterations);
    for _ in 0..options.constrained_iterations {
        sim.tick();
        enforce(&mut sim, &members, &separations, true);
    }
    let min_separation = 2.0 * request.node_size + padding;
    let mut sim = sim.with_force(Force::Collide(CollideForce::new(min_separation / 2.0)));
    for _ in 0..options.overlap_iterations {
        sim.tick();
        remove_overlaps(&mut sim, min_separation);
        enforce(&mut sim, &members, &separations, true);
    }
    enforce(&mut sim, &members, &separations, false);

    let mut positions = sim.positions();
    fit_y(&mut positions, size, padding);

    let mut coordinates = vec![None; state.num_nodes()];
    for (local, p) in positions.iter().enumerate() {
        coordinates[subgraph.global(local)] = Some(*p);
    }

    let regions = members
        .iter()
        .enumerate()
        .map(|(r, locals)| {
            let bounds = Rect::around(locals.iter().map(|&l| positions[l]), padding).unwrap_or_default();
            if r < num_focal {
                Region::focal(r, bounds, locals.len())
            } else {
                Region::hop(r - num_focal + 1, bounds, locals.len())
            }
        })
        .collect();

    tracing::debug!(nodes = n, constraints = separations.len(), size, "constraint layout");

    Ok(LayoutResult {
        remaining_edges: remaining_edges(&state.graph, &coordinates),
        coordinates,
        regions,
        canvas_width: size,
        canvas_height: size,
        num_nodes: n,
        edge_bundles: None,
    })
}

/// Shifts groups until no separation is violated. Symmetric mode splits each correction between
/// both sides; otherwise only the right side moves, which settles in one ordered sweep.
fn enforce(sim: &mut Simulation, members: &[Vec<usize>], separations: &[Separation], symmetric: bool) {
    for _ in 0..PROJECTION_SWEEPS {
        let mut moved = false;
        for s in separations {
            let (left, right) = (&members[s.left], &members[s.right]);
            if left.is_empty() || right.is_empty() {
                continue;
            }
            let nodes = sim.nodes_mut();
            let coord = |i: usize| match s.axis {
                Axis::X => nodes[i].x,
                Axis::Y => nodes[i].y,
            };
            let max_left = left.iter().map(|&i| coord(i)).fold(f64::MIN, f64::max);
            let min_right = right.iter().map(|&i| coord(i)).fold(f64::MAX, f64::min);
            let violation = max_left + s.gap - min_right;
            if violation <= 0.0 {
                continue;
            }
            moved = true;
            let shift = |nodes: &mut [SimNode], ids: &[usize], by: f64| {
                for &i in ids {
                    match s.axis {
                        Axis::X => nodes[i].x += by,
                        Axis::Y => nodes[i].y += by,
                    }
                }
            };
            if symmetric {
                shift(nodes, left, -violation / 2.0);
                shift(nodes, right, violation / 2.0);
            } else {
                shift(nodes, right, violation);
            }
        }
        if !moved {
            break;
        }
    }
}

/// Pushes apart any pair of nodes closer than `min_separation`.
fn remove_overlaps(sim: &mut Simulation, min_separation: f64) {
    let nodes = sim.nodes_mut();
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            let (dx, dy) = (nodes[j].x - nodes[i].x, nodes[j].y - nodes[i].y);
            let d = (dx * dx + dy * dy).sqrt();
            if d >= min_separation {
                continue;
            }
            let (ux, uy) = if d > 0.0 { (dx / d, dy / d) } else { (1.0, 0.0) };
            let push = (min_separation - d) / 2.0;
            nodes[i].x -= ux * push;
            nodes[i].y -= uy * push;
            nodes[j].x += ux * push;
            nodes[j].y += uy * push;
        }
    }
}

/// Rescales y into the canvas when the layout spills over its top or bottom.
fn fit_y(positions: &mut [Point], size: f64, padding: f64) {
    let Some((_, (y0, y1))) = extents(positions.iter().copied()) else {
        return;
    };
    if y0 > 0.0 && y1 < size {
        return;
    }
    let scale = LinearScale::new((y0, y1), (padding + Y_MARGIN, size - padding - Y_MARGIN));
    for p in positions {
        p.y = scale.apply(p.y);
    }
}
