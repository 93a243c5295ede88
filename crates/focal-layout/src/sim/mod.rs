//! Velocity-Verlet force simulation shared by the force-directed layouts.
//!
//! Semantics follow the usual d3-force conventions: alpha cools geometrically towards
//! `alpha_target`, every force adds to node velocities scaled by alpha, and velocities lose a
//! `velocity_decay` fraction each tick before positions are integrated.

mod forces;
mod quadtree;

pub use forces::{CenterForce, CollideForce, Link, LinkForce, ManyBodyForce, PositionForce};

use crate::geom::Point;
use crate::rng::XorShift64Star;

const INITIAL_RADIUS: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimNode {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

#[derive(Debug, Clone)]
pub enum Force {
    Link(LinkForce),
    ManyBody(ManyBodyForce),
    Collide(CollideForce),
    X(PositionForce),
    Y(PositionForce),
    Center(CenterForce),
}

impl Force {
    fn apply(&self, nodes: &mut [SimNode], alpha: f64, rng: &mut XorShift64Star) {
        match self {
            Force::Link(f) => f.apply(nodes, alpha, rng),
            Force::ManyBody(f) => f.apply(nodes, alpha, rng),
            Force::Collide(f) => f.apply(nodes, rng),
            Force::X(f) => f.apply_x(nodes, alpha),
            Force::Y(f) => f.apply_y(nodes, alpha),
            Force::Center(f) => f.apply(nodes),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Simulation {
    nodes: Vec<SimNode>,
    forces: Vec<Force>,
    alpha: f64,
    alpha_min: f64,
    alpha_decay: f64,
    alpha_target: f64,
    velocity_decay: f64,
    rng: XorShift64Star,
}

impl Simulation {
    /// `n` nodes on a phyllotaxis spiral around the origin.
    pub fn new(n: usize, seed: u64) -> Self {
        let angle_step = std::f64::consts::PI * (3.0 - 5f64.sqrt());
        let nodes = (0..n)
            .map(|i| {
                let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
                let angle = i as f64 * angle_step;
                SimNode {
                    x: radius * angle.cos(),
                    y: radius * angle.sin(),
                    ..Default::default()
                }
            })
            .collect();
        Self::from_nodes(nodes, seed)
    }

    pub fn from_nodes(nodes: Vec<SimNode>, seed: u64) -> Self {
        let alpha_min: f64 = 0.001;
        Self {
            nodes,
            forces: Vec::new(),
            alpha: 1.0,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            alpha_target: 0.0,
            velocity_decay: 0.4,
            rng: XorShift64Star::new(seed),
        }
    }

    pub fn with_force(mut self, force: Force) -> Self {
        self.forces.push(force);
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Ticks needed for alpha to cool from 1 below `alpha_min`.
    pub fn iterations(&self) -> usize {
        (self.alpha_min.ln() / (1.0 - self.alpha_decay).ln()).ceil() as usize
    }

    pub fn is_cooled(&self) -> bool {
        self.alpha < self.alpha_min
    }

    pub fn tick(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        for force in &self.forces {
            force.apply(&mut self.nodes, self.alpha, &mut self.rng);
        }
        let keep = 1.0 - self.velocity_decay;
        for n in &mut self.nodes {
            n.vx *= keep;
            n.vy *= keep;
            n.x += n.vx;
            n.y += n.vy;
        }
    }

    pub fn tick_n(&mut self, n: usize) {
        for _ in 0..n {
            self.tick();
        }
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [SimNode] {
        &mut self.nodes
    }

    pub fn positions(&self) -> Vec<Point> {
        self.nodes.iter().map(|n| Point::new(n.x, n.y)).collect()
    }
}
