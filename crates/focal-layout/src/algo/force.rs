//! Force-directed focal layout.
//!
//! Every ordered pair of distinct nodes gets a virtual link whose length grows with neighbor
//! distance, so topologically similar nodes attract even without an edge. A strong charge keeps
//! nodes apart, and each node is pulled towards the centre of its tier's region and hard-clamped
//! into that region before every tick.

use super::ForceOptions;
use crate::error::Result;
use crate::geom::{Point, Rect};
use crate::partition::{Partition, compute_group_positions};
use crate::request::{LayoutRequest, LayoutResult, remaining_edges};
use crate::resolve::nodes_by_hop;
use crate::sim::{Force, Link, LinkForce, ManyBodyForce, PositionForce, Simulation};
use crate::state::LayoutState;
use crate::subgraph::Subgraph;

/// A running force layout. Call [`ForceLayout::tick`] to animate or [`ForceLayout::run`] to
/// settle.
#[derive(Debug, Clone)]
pub struct ForceLayout {
    sim: Simulation,
    subgraph: Subgraph,
    partition: Partition,
    /// Region of each local node.
    bounds: Vec<Rect>,
    padding: f64,
    ticks: usize,
    iterations: usize,
}

impl ForceLayout {
    pub fn new(state: &LayoutState, request: &LayoutRequest, options: &ForceOptions) -> Result<Self> {
        let by_hop = nodes_by_hop(&request.groups, &request.neighbors_by_hop);
        let partition = compute_group_positions(&request.groups, &by_hop, &state.spec, &state.canvas)?;
        let subgraph = Subgraph::new(&state.graph, &request.groups, &request.neighbors_by_hop);
        let n = subgraph.len();

        let bounds: Vec<Rect> = (0..n)
            .map(|l| partition.regions[subgraph.region_of(l)].bounds)
            .collect();

        let strength = options.link_strength / n.max(1) as f64;
        let mut links = Vec::with_capacity(n * n.saturating_sub(1));
        for a in 0..n {
            for b in 0..n {
                if a == b {
                    continue;
                }
                let d = state.distance(subgraph.global(a), subgraph.global(b), request.use_global_mask);
                links.push(Link::new(a, b, d * options.link_distance).with_strength(strength));
            }
        }

        let centres: Vec<Point> = bounds.iter().map(Rect::center).collect();
        let sim = Simulation::new(n, options.random_seed)
            .with_force(Force::Link(LinkForce::new(links, n)))
            .with_force(Force::ManyBody(ManyBodyForce::new(options.charge)))
            .with_force(Force::X(PositionForce::new(
                centres.iter().map(|c| c.x).collect(),
                options.center_strength,
            )))
            .with_force(Force::Y(PositionForce::new(
                centres.iter().map(|c| c.y).collect(),
                options.center_strength,
            )));
        let iterations = sim.iterations();

        Ok(Self {
            sim,
            subgraph,
            partition,
            bounds,
            padding: state.spec.padding,
            ticks: 0,
            iterations,
        })
    }

    /// Clamps every node into its region, then advances the simulation once.
    pub fn tick(&mut self) {
        self.clamp();
        self.sim.tick();
        self.ticks += 1;
    }

    pub fn is_done(&self) -> bool {
        self.ticks >= self.iterations
    }

    /// Ticks until the simulation has cooled.
    pub fn run(&mut self) {
        while !self.is_done() {
            self.tick();
        }
        self.clamp();
    }

    /// Current positions as a layout result; valid between ticks.
    pub fn result(&self, state: &LayoutState) -> LayoutResult {
        let mut coordinates = vec![None; state.num_nodes()];
        for (local, p) in self.sim.positions().into_iter().enumerate() {
            coordinates[self.subgraph.global(local)] = Some(p);
        }
        LayoutResult {
            remaining_edges: remaining_edges(&state.graph, &coordinates),
            coordinates,
            regions: self.partition.regions.clone(),
            canvas_width: self.partition.canvas_width,
            canvas_height: self.partition.canvas_height,
            num_nodes: self.partition.num_nodes,
            edge_bundles: None,
        }
    }

    fn clamp(&mut self) {
        let padding = self.padding;
        for (node, b) in self.sim.nodes_mut().iter_mut().zip(&self.bounds) {
            let p = b.clamp_inside(Point::new(node.x, node.y), padding);
            node.x = p.x;
            node.y = p.y;
        }
    }
}

pub fn layout(state: &LayoutState, request: &LayoutRequest, options: &ForceOptions) -> Result<LayoutResult> {
    let mut force = ForceLayout::new(state, request, options)?;
    force.run();
    tracing::debug!(nodes = force.subgraph.len(), ticks = force.ticks, "force layout");
    Ok(force.result(state))
}
