use super::SimNode;
use super::quadtree::QuadTree;
use crate::rng::XorShift64Star;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    pub distance: f64,
    /// Overrides the degree-based default strength.
    pub strength: Option<f64>,
}

impl Link {
    pub fn new(source: usize, target: usize, distance: f64) -> Self {
        Self {
            source,
            target,
            distance,
            strength: None,
        }
    }

    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = Some(strength);
        self
    }
}

/// Spring force along links.
///
/// Default strength is `1 / min(degree(source), degree(target))`; the displacement is split
/// between the endpoints by relative degree so hubs move less.
#[derive(Debug, Clone)]
pub struct LinkForce {
    links: Vec<Link>,
    strengths: Vec<f64>,
    bias: Vec<f64>,
}

impl LinkForce {
    pub fn new(links: Vec<Link>, num_nodes: usize) -> Self {
        let mut count = vec![0usize; num_nodes];
        for l in &links {
            count[l.source] += 1;
            count[l.target] += 1;
        }
        let strengths = links
            .iter()
            .map(|l| {
                l.strength
                    .unwrap_or_else(|| 1.0 / count[l.source].min(count[l.target]).max(1) as f64)
            })
            .collect();
        let bias = links
            .iter()
            .map(|l| {
                let (s, t) = (count[l.source] as f64, count[l.target] as f64);
                s / (s + t)
            })
            .collect();
        Self {
            links,
            strengths,
            bias,
        }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub(super) fn apply(&self, nodes: &mut [SimNode], alpha: f64, rng: &mut XorShift64Star) {
        for (i, link) in self.links.iter().enumerate() {
            let (s, t) = (nodes[link.source], nodes[link.target]);
            let mut x = t.x + t.vx - s.x - s.vx;
            let mut y = t.y + t.vy - s.y - s.vy;
            if x == 0.0 {
                x = rng.jiggle();
            }
            if y == 0.0 {
                y = rng.jiggle();
            }
            let mut l = (x * x + y * y).sqrt();
            l = (l - link.distance) / l * alpha * self.strengths[i];
            x *= l;
            y *= l;
            let b = self.bias[i];
            nodes[link.target].vx -= x * b;
            nodes[link.target].vy -= y * b;
            nodes[link.source].vx += x * (1.0 - b);
            nodes[link.source].vy += y * (1.0 - b);
        }
    }
}

/// Charge between every pair of nodes, approximated with a Barnes-Hut quadtree.
///
/// Negative strength repels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManyBodyForce {
    strength: f64,
    theta2: f64,
    distance_min2: f64,
    distance_max2: f64,
}

impl ManyBodyForce {
    pub fn new(strength: f64) -> Self {
        Self {
            strength,
            theta2: 0.81,
            distance_min2: 1.0,
            distance_max2: f64::INFINITY,
        }
    }

    pub fn distance_min(mut self, d: f64) -> Self {
        self.distance_min2 = d * d;
        self
    }

    pub fn distance_max(mut self, d: f64) -> Self {
        self.distance_max2 = d * d;
        self
    }

    pub(super) fn apply(&self, nodes: &mut [SimNode], alpha: f64, rng: &mut XorShift64Star) {
        let strengths = vec![self.strength; nodes.len()];
        let tree = QuadTree::build(nodes, &strengths);
        if tree.root().is_none() {
            return;
        }
        let mut stack = Vec::new();
        for i in 0..nodes.len() {
            let (nx, ny) = (nodes[i].x, nodes[i].y);
            let (mut vx, mut vy) = (0.0, 0.0);
            stack.clear();
            stack.push(0usize);
            while let Some(c) = stack.pop() {
                let cell = &tree.cells[c];
                if cell.strength == 0.0 {
                    continue;
                }
                let mut dx = cell.cx - nx;
                let mut dy = cell.cy - ny;
                let mut l = dx * dx + dy * dy;

                if cell.size * cell.size / self.theta2 < l {
                    if l < self.distance_max2 {
                        if dx == 0.0 {
                            dx = rng.jiggle();
                            l += dx * dx;
                        }
                        if dy == 0.0 {
                            dy = rng.jiggle();
                            l += dy * dy;
                        }
                        if l < self.distance_min2 {
                            l = (self.distance_min2 * l).sqrt();
                        }
                        vx += dx * cell.strength * alpha / l;
                        vy += dy * cell.strength * alpha / l;
                    }
                    continue;
                }

                if !cell.is_leaf() {
                    stack.extend(cell.children.iter().copied());
                    continue;
                }
                if l >= self.distance_max2 {
                    continue;
                }
                for &j in &cell.points {
                    if j == i {
                        continue;
                    }
                    let mut dx = nodes[j].x - nx;
                    let mut dy = nodes[j].y - ny;
                    if dx == 0.0 {
                        dx = rng.jiggle();
                    }
                    if dy == 0.0 {
                        dy = rng.jiggle();
                    }
                    let mut l = dx * dx + dy * dy;
                    if l < self.distance_min2 {
                        l = (self.distance_min2 * l).sqrt();
                    }
                    let w = strengths[j] * alpha / l;
                    vx += dx * w;
                    vy += dy * w;
                }
            }
            nodes[i].vx += vx;
            nodes[i].vy += vy;
        }
    }
}

/// Treats nodes as circles of `radius` and pushes overlapping pairs apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollideForce {
    radius: f64,
    strength: f64,
    iterations: usize,
}

impl CollideForce {
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            strength: 1.0,
            iterations: 1,
        }
    }

    pub fn strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    pub(super) fn apply(&self, nodes: &mut [SimNode], rng: &mut XorShift64Star) {
        // Equal radii split every push evenly between the pair.
        let reach = 2.0 * self.radius;
        for _ in 0..self.iterations {
            for i in 0..nodes.len() {
                let xi = nodes[i].x + nodes[i].vx;
                let yi = nodes[i].y + nodes[i].vy;
                for j in (i + 1)..nodes.len() {
                    let mut x = xi - nodes[j].x - nodes[j].vx;
                    let mut y = yi - nodes[j].y - nodes[j].vy;
                    let mut l = x * x + y * y;
                    if l >= reach * reach {
                        continue;
                    }
                    if x == 0.0 {
                        x = rng.jiggle();
                        l += x * x;
                    }
                    if y == 0.0 {
                        y = rng.jiggle();
                        l += y * y;
                    }
                    let d = l.sqrt();
                    let k = (reach - d) / d * self.strength;
                    x *= k;
                    y *= k;
                    nodes[i].vx += x * 0.5;
                    nodes[i].vy += y * 0.5;
                    nodes[j].vx -= x * 0.5;
                    nodes[j].vy -= y * 0.5;
                }
            }
        }
    }
}

/// Pulls each node towards its own target coordinate along one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionForce {
    targets: Vec<f64>,
    strengths: Vec<f64>,
}

impl PositionForce {
    pub fn new(targets: Vec<f64>, strength: f64) -> Self {
        let strengths = vec![strength; targets.len()];
        Self { targets, strengths }
    }

    pub fn uniform(target: f64, strength: f64, num_nodes: usize) -> Self {
        Self::new(vec![target; num_nodes], strength)
    }

    pub(super) fn apply_x(&self, nodes: &mut [SimNode], alpha: f64) {
        for ((n, t), s) in nodes.iter_mut().zip(&self.targets).zip(&self.strengths) {
            n.vx += (t - n.x) * s * alpha;
        }
    }

    pub(super) fn apply_y(&self, nodes: &mut [SimNode], alpha: f64) {
        for ((n, t), s) in nodes.iter_mut().zip(&self.targets).zip(&self.strengths) {
            n.vy += (t - n.y) * s * alpha;
        }
    }
}

/// Translates all nodes so their mean sits at `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterForce {
    x: f64,
    y: f64,
    strength: f64,
}

impl CenterForce {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            strength: 1.0,
        }
    }

    pub(super) fn apply(&self, nodes: &mut [SimNode]) {
        if nodes.is_empty() {
            return;
        }
        let n = nodes.len() as f64;
        let sx = nodes.iter().map(|p| p.x).sum::<f64>() / n;
        let sy = nodes.iter().map(|p| p.y).sum::<f64>() / n;
        let (dx, dy) = ((sx - self.x) * self.strength, (sy - self.y) * self.strength);
        for p in nodes {
            p.x -= dx;
            p.y -= dy;
        }
    }
}
