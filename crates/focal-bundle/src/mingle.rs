//! The MINGLE merge loop over a k-nearest-neighbor proximity graph of edges.

use crate::arena::{Arena, NodeIx};
use crate::geom::{self, Vec2};
use crate::ink::{self, Combined};
use crate::{BundleOptions, Polylines, Segment};
use focal_graphlib::EdgeId;
use rstar::RTree;
use rstar::primitives::GeomWithData;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Per-run statistics, mostly for logging and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MingleStats {
    pub passes: usize,
    pub merges: usize,
    /// Total ink after each pass, starting with the unbundled ink.
    pub ink_per_pass: Vec<f64>,
}

impl MingleStats {
    pub fn initial_ink(&self) -> f64 {
        self.ink_per_pass.first().copied().unwrap_or(0.0)
    }

    pub fn final_ink(&self) -> f64 {
        self.ink_per_pass.last().copied().unwrap_or(0.0)
    }
}

/// Transient bundling state: the node arena plus the live proximity graph.
#[derive(Debug, Clone)]
pub struct Bundler {
    arena: Arena,
    proximity: BTreeMap<NodeIx, BTreeSet<NodeIx>>,
    angle_strength: f64,
}

impl Bundler {
    /// Indexes the segments in 4D (`x1, y1, x2, y2`) and links each one to its `k` nearest
    /// neighbors. Links are symmetric.
    pub fn new(segments: &[Segment], options: &BundleOptions) -> Self {
        let mut arena = Arena::default();
        for s in segments {
            arena.push_leaf(s.edge, s.start, s.end);
        }

        let points: Vec<GeomWithData<[f64; 4], NodeIx>> = (0..arena.len())
            .map(|ix| GeomWithData::new(arena.get(ix).coords, ix))
            .collect();
        let tree = RTree::bulk_load(points);

        let mut proximity: BTreeMap<NodeIx, BTreeSet<NodeIx>> =
            (0..arena.len()).map(|ix| (ix, BTreeSet::new())).collect();
        for ix in 0..arena.len() {
            let query = arena.get(ix).coords;
            let near: Vec<NodeIx> = tree
                .nearest_neighbor_iter(&query)
                .take(options.k)
                .map(|p| p.data)
                .filter(|&other| other != ix)
                .collect();
            for other in near {
                link(&mut proximity, ix, other);
            }
        }

        Self {
            arena,
            proximity,
            angle_strength: options.angle_strength,
        }
    }

    pub fn total_ink(&self) -> f64 {
        self.proximity.keys().map(|&ix| self.arena.ink(ix)).sum()
    }

    pub fn live_nodes(&self) -> usize {
        self.proximity.len()
    }

    /// Runs merge passes until one makes no positive-savings merge.
    ///
    /// Every productive pass removes at least one live node, so the loop runs at most once per
    /// input segment.
    pub fn mingle(&mut self) -> MingleStats {
        let mut stats = MingleStats {
            ink_per_pass: vec![self.total_ink()],
            ..Default::default()
        };

        loop {
            let (gain, merges) = self.pass();
            stats.passes += 1;
            stats.merges += merges;
            stats.ink_per_pass.push(self.total_ink());
            tracing::trace!(
                pass = stats.passes,
                merges,
                gain,
                live = self.live_nodes(),
                "mingle pass"
            );
            if gain <= 0.0 {
                break;
            }
        }

        tracing::debug!(
            passes = stats.passes,
            merges = stats.merges,
            ink_before = stats.initial_ink(),
            ink_after = stats.final_ink(),
            "mingle converged"
        );
        stats
    }

    /// One greedy pass: every ungrouped node joins the neighbor (or the neighbor's bundle) that
    /// saves the most ink, then each group is coalesced into a single node.
    fn pass(&mut self) -> (f64, usize) {
        let mut group: BTreeMap<NodeIx, usize> = BTreeMap::new();
        let mut bundle_of: BTreeMap<NodeIx, usize> = BTreeMap::new();
        let mut bundles: Vec<Combined> = Vec::new();
        let mut next_group = 0usize;
        let mut gain = 0.0;
        let mut merges = 0usize;

        let live: Vec<NodeIx> = self.proximity.keys().copied().collect();
        for &u in &live {
            if group.contains_key(&u) {
                continue;
            }

            let ink_u = self.arena.ink(u);
            let mut best: Option<(f64, NodeIx, Combined)> = None;
            for &v in &self.proximity[&u] {
                let (ink_v, mut members) = match bundle_of.get(&v) {
                    Some(&b) => (bundles[b].ink, bundles[b].members.clone()),
                    None => (self.arena.ink(v), vec![v]),
                };
                members.insert(0, u);
                let combined = ink::combine(&self.arena, members, self.angle_strength);
                let delta = combined.ink - (ink_u + ink_v);
                if best.as_ref().is_none_or(|(d, _, _)| delta < *d) {
                    best = Some((delta, v, combined));
                }
            }

            // Isolated nodes stay as they are.
            let Some((delta, v, combined)) = best else {
                continue;
            };

            if -delta > 0.0 {
                gain += -delta;
                merges += 1;
                let b = bundles.len();
                for &m in &combined.members {
                    bundle_of.insert(m, b);
                }
                bundles.push(combined);
                match group.get(&v).copied() {
                    Some(g) => {
                        group.insert(u, g);
                    }
                    None => {
                        group.insert(u, next_group);
                        group.insert(v, next_group);
                    }
                }
            } else {
                group.insert(u, next_group);
            }
            next_group += 1;
        }

        let mut members_by_group: BTreeMap<usize, Vec<NodeIx>> = BTreeMap::new();
        for (&ix, &g) in &group {
            members_by_group.entry(g).or_default().push(ix);
        }
        for members in members_by_group.into_values() {
            let Some(&b) = members.first().and_then(|m| bundle_of.get(m)) else {
                continue;
            };
            let (m1, m2) = (bundles[b].m1, bundles[b].m2);
            self.coalesce(members, m1, m2);
        }

        (gain, merges)
    }

    /// Replaces `members` with one bundle node that inherits all of their outside links.
    fn coalesce(&mut self, members: Vec<NodeIx>, m1: Vec2, m2: Vec2) {
        let mut external: BTreeSet<NodeIx> = BTreeSet::new();
        for m in &members {
            if let Some(neigh) = self.proximity.remove(m) {
                external.extend(neigh);
            }
        }
        for m in &members {
            external.remove(m);
        }
        for other in &external {
            if let Some(neigh) = self.proximity.get_mut(other) {
                for m in &members {
                    neigh.remove(m);
                }
            }
        }

        let ix = self.arena.push_bundle(m1, m2, members);
        self.proximity.insert(ix, BTreeSet::new());
        for other in external {
            link(&mut self.proximity, ix, other);
        }
    }

    /// Control polylines for every input edge: each leaf's endpoints wrapped around the waypoints
    /// of every bundle it belongs to, with the innermost span's midpoint in the middle.
    pub fn expand(&self) -> Vec<(EdgeId, Vec<Vec2>)> {
        let mut out = Vec::new();
        for &ix in self.proximity.keys() {
            self.expand_into(ix, VecDeque::new(), &mut out);
        }
        out.sort_by_key(|(edge, _)| *edge);
        out
    }

    fn expand_into(&self, ix: NodeIx, mut path: VecDeque<Vec2>, out: &mut Vec<(EdgeId, Vec<Vec2>)>) {
        let node = self.arena.get(ix);
        if path.is_empty() {
            path.push_back(geom::midpoint(&node.coords));
        }
        path.push_front(node.start());
        path.push_back(node.end());

        match node.edge {
            Some(edge) if node.is_leaf() => out.push((edge, path.into())),
            _ => {
                for &p in &node.parents {
                    self.expand_into(p, path.clone(), out);
                }
            }
        }
    }

    /// Flattened `[x, y, x, y, ...]` polylines per edge at smoothing `delta`.
    ///
    /// `delta = 0` pulls every interior point onto the straight line between the edge's true
    /// endpoints; `delta = 1` keeps the full detour through the waypoints.
    pub fn unbundle(&self, delta: f64) -> Polylines {
        self.expand()
            .into_iter()
            .map(|(edge, path)| (edge, unbundle_path(&path, delta)))
            .collect()
    }
}

fn link(proximity: &mut BTreeMap<NodeIx, BTreeSet<NodeIx>>, a: NodeIx, b: NodeIx) {
    proximity.entry(a).or_default().insert(b);
    proximity.entry(b).or_default().insert(a);
}

fn unbundle_path(path: &[Vec2], delta: f64) -> Vec<f64> {
    let mut flat = Vec::with_capacity(path.len() * 2);
    let (Some(&x0), Some(&xk)) = (path.first(), path.last()) else {
        return flat;
    };
    let last = path.len() - 1;
    for (j, &xi) in path.iter().enumerate() {
        let p = if j == 0 || j == last {
            xi
        } else {
            geom::lerp(geom::project_onto_line(xi, x0, xk), xi, delta)
        };
        flat.extend_from_slice(&p);
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::unbundle_path;

    #[test]
    fn unbundle_with_coincident_endpoints_collapses_onto_the_start() {
        let flat = unbundle_path(&[[1.0, 1.0], [5.0, 5.0], [1.0, 1.0]], 0.0);
        assert_eq!(flat, vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
    }
}
