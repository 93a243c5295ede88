//! 2D projection primitives applied to a single tier.

use super::pivot_mds;
use crate::geom::Point;
use crate::sim::{CollideForce, Force, Link, LinkForce, ManyBodyForce, Simulation};
use crate::state::LayoutState;
use focal_graphlib::NodeId;

/// Nodes of one tier plus the distance they should be projected by.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionInput<'a> {
    pub state: &'a LayoutState,
    pub nodes: &'a [NodeId],
    pub use_global_mask: bool,
    pub node_size: f64,
    pub random_seed: u64,
}

impl ProjectionInput<'_> {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Neighbor distance between the `i`-th and `j`-th input nodes.
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.state
            .distance(self.nodes[i], self.nodes[j], self.use_global_mask)
    }
}

/// Maps every input node to a point. Output order matches `input.nodes`; scale is arbitrary.
pub trait Projector {
    fn project(&self, input: &ProjectionInput<'_>) -> Vec<Point>;
}

/// Small simulation over all-pairs links whose length grows with neighbor distance.
#[derive(Debug, Clone, Copy)]
pub struct ForceProjector {
    pub link_distance: f64,
    pub charge: f64,
    pub ticks: usize,
}

impl Default for ForceProjector {
    fn default() -> Self {
        Self {
            link_distance: 20.0,
            charge: -30.0,
            ticks: 300,
        }
    }
}

impl Projector for ForceProjector {
    fn project(&self, input: &ProjectionInput<'_>) -> Vec<Point> {
        let n = input.len();
        let mut links = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = input.distance(i, j);
                links.push(Link::new(i, j, (1.0 + d) * self.link_distance));
            }
        }
        let mut sim = Simulation::new(n, input.random_seed)
            .with_force(Force::Link(LinkForce::new(links, n)))
            .with_force(Force::ManyBody(ManyBodyForce::new(self.charge)))
            .with_force(Force::Collide(CollideForce::new(input.node_size + 1.0)));
        sim.tick_n(self.ticks);
        sim.positions()
    }
}

/// Landmark MDS over neighbor distances; stands in for a manifold learner on larger tiers.
#[derive(Debug, Clone, Copy)]
pub struct PivotMds {
    pub pivots: usize,
}

impl Default for PivotMds {
    fn default() -> Self {
        Self { pivots: 25 }
    }
}

impl Projector for PivotMds {
    fn project(&self, input: &ProjectionInput<'_>) -> Vec<Point> {
        match pivot_mds::project(input, self.pivots) {
            Some(points) => points,
            None => {
                tracing::debug!(nodes = input.len(), "pivot MDS degenerate, using simulation");
                ForceProjector::default().project(input)
            }
        }
    }
}

/// Simulation below `fallback_threshold` nodes, pivot MDS above.
#[derive(Debug, Clone, Copy)]
pub struct DefaultProjector {
    pub fallback_threshold: usize,
    pub fallback: ForceProjector,
    pub main: PivotMds,
}

impl DefaultProjector {
    pub fn new(fallback_threshold: usize) -> Self {
        Self {
            fallback_threshold,
            fallback: ForceProjector::default(),
            main: PivotMds::default(),
        }
    }
}

impl Default for DefaultProjector {
    fn default() -> Self {
        Self::new(15)
    }
}

impl Projector for DefaultProjector {
    fn project(&self, input: &ProjectionInput<'_>) -> Vec<Point> {
        match input.len() {
            0 => Vec::new(),
            1 => vec![Point::default()],
            n if n <= self.fallback_threshold => self.fallback.project(input),
            _ => self.main.project(input),
        }
    }
}
