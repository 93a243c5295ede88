//! Overview layout of the whole graph, computed once after loading.

use crate::geom::{Point, extents};
use crate::scale::{Log2Scale, SqrtScale};
use crate::sim::{CenterForce, Force, Link, LinkForce, ManyBodyForce, Simulation};
use focal_graphlib::Graph;
use serde::{Deserialize, Serialize};

const NODE_DOMAIN: (f64, f64) = (1.0, 10_000.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InitialOptions {
    /// Keep nodes inside the square canvas while simulating.
    pub bounded: bool,
    pub padding: f64,
    pub random_seed: u64,
}

impl Default for InitialOptions {
    fn default() -> Self {
        Self {
            bounded: false,
            padding: 10.0,
            random_seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialLayout {
    /// Indexed by node id.
    pub coordinates: Vec<Point>,
    pub width: f64,
    pub height: f64,
}

/// Link distance and repulsion shrink logarithmically as the graph grows, and the canvas grows
/// with its square root.
pub fn layout(graph: &Graph, options: &InitialOptions) -> InitialLayout {
    let n = graph.num_nodes();
    let count = n as f64;
    let size = SqrtScale::new(NODE_DOMAIN, (500.0, 1000.0)).apply(count);
    let link_distance = Log2Scale::new(NODE_DOMAIN, (100.0, 1.5)).apply(count);
    let repel = Log2Scale::new(NODE_DOMAIN, (-100.0, -1.5)).apply(count);
    let padding = options.padding;

    let links = graph
        .edges()
        .iter()
        .map(|e| Link::new(e.source, e.target, link_distance))
        .collect();
    let mut sim = Simulation::new(n, options.random_seed)
        .with_force(Force::Link(LinkForce::new(links, n)))
        .with_force(Force::ManyBody(
            ManyBodyForce::new(repel).distance_min(0.2).distance_max(100.0),
        ))
        .with_force(Force::Center(CenterForce::new(size / 2.0, size / 2.0)));

    let hi = (size - padding).max(padding);
    let clamp = |sim: &mut Simulation| {
        for node in sim.nodes_mut() {
            node.x = node.x.clamp(padding, hi);
            node.y = node.y.clamp(padding, hi);
        }
    };
    for _ in 0..sim.iterations() {
        if options.bounded {
            clamp(&mut sim);
        }
        sim.tick();
    }
    if options.bounded {
        clamp(&mut sim);
    }

    let mut coordinates = sim.positions();
    let (mut width, mut height) = (size, size);
    if let Some(((x0, x1), (y0, y1))) = extents(coordinates.iter().copied()) {
        let refit = |range: f64| !options.bounded || range + 2.0 * padding < 0.95 * size;
        if refit(x1 - x0) {
            coordinates.iter_mut().for_each(|p| p.x += padding - x0);
            width = x1 - x0 + 2.0 * padding;
        }
        if refit(y1 - y0) {
            coordinates.iter_mut().for_each(|p| p.y += padding - y0);
            height = y1 - y0 + 2.0 * padding;
        }
    }

    tracing::debug!(nodes = n, edges = graph.edge_count(), width, height, "initial layout");
    InitialLayout {
        coordinates,
        width,
        height,
    }
}
