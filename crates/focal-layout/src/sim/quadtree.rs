//! Barnes-Hut quadtree over simulation nodes.

use super::SimNode;

const MAX_DEPTH: usize = 32;

#[derive(Debug, Clone)]
pub(super) struct Cell {
    pub x0: f64,
    pub y0: f64,
    pub size: f64,
    pub children: Vec<usize>,
    pub points: Vec<usize>,
    /// Summed charge of everything below this cell.
    pub strength: f64,
    /// Charge-weighted centre.
    pub cx: f64,
    pub cy: f64,
}

impl Cell {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub(super) struct QuadTree {
    pub cells: Vec<Cell>,
}

impl QuadTree {
    pub fn build(nodes: &[SimNode], strengths: &[f64]) -> Self {
        let mut tree = Self::default();
        if nodes.is_empty() {
            return tree;
        }
        let (mut x0, mut y0, mut x1, mut y1) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for n in nodes {
            x0 = x0.min(n.x);
            y0 = y0.min(n.y);
            x1 = x1.max(n.x);
            y1 = y1.max(n.y);
        }
        let size = (x1 - x0).max(y1 - y0).max(f64::EPSILON);
        let all: Vec<usize> = (0..nodes.len()).collect();
        tree.insert(nodes, strengths, all, x0, y0, size, 0);
        tree
    }

    pub fn root(&self) -> Option<&Cell> {
        self.cells.first()
    }

    #[allow(clippy::too_many_arguments)]
    fn insert(
        &mut self,
        nodes: &[SimNode],
        strengths: &[f64],
        points: Vec<usize>,
        x0: f64,
        y0: f64,
        size: f64,
        depth: usize,
    ) -> usize {
        let ix = self.cells.len();
        self.cells.push(Cell {
            x0,
            y0,
            size,
            children: Vec::new(),
            points: Vec::new(),
            strength: 0.0,
            cx: 0.0,
            cy: 0.0,
        });

        if points.len() <= 1 || depth >= MAX_DEPTH {
            let (strength, cx, cy) = weighted_centre(
                points
                    .iter()
                    .map(|&p| (strengths[p], nodes[p].x, nodes[p].y)),
            );
            let cell = &mut self.cells[ix];
            cell.points = points;
            (cell.strength, cell.cx, cell.cy) = (strength, cx, cy);
            return ix;
        }

        let half = size / 2.0;
        let (mx, my) = (x0 + half, y0 + half);
        let mut quads: [Vec<usize>; 4] = Default::default();
        for p in points {
            let q = usize::from(nodes[p].x >= mx) + 2 * usize::from(nodes[p].y >= my);
            quads[q].push(p);
        }

        let mut children = Vec::new();
        for (q, pts) in quads.into_iter().enumerate() {
            if pts.is_empty() {
                continue;
            }
            let qx = if q & 1 == 1 { mx } else { x0 };
            let qy = if q & 2 == 2 { my } else { y0 };
            children.push(self.insert(nodes, strengths, pts, qx, qy, half, depth + 1));
        }

        let (strength, cx, cy) = weighted_centre(children.iter().map(|&c| {
            let c = &self.cells[c];
            (c.strength, c.cx, c.cy)
        }));
        let cell = &mut self.cells[ix];
        cell.children = children;
        (cell.strength, cell.cx, cell.cy) = (strength, cx, cy);
        ix
    }
}

fn weighted_centre(items: impl Iterator<Item = (f64, f64, f64)>) -> (f64, f64, f64) {
    let (mut strength, mut weight, mut sx, mut sy, mut count) = (0.0, 0.0, 0.0, 0.0, 0usize);
    let (mut fx, mut fy) = (0.0, 0.0);
    for (s, x, y) in items {
        if count == 0 {
            (fx, fy) = (x, y);
        }
        count += 1;
        strength += s;
        weight += s.abs();
        sx += s.abs() * x;
        sy += s.abs() * y;
    }
    if weight > 0.0 {
        (strength, sx / weight, sy / weight)
    } else {
        (strength, fx, fy)
    }
}
