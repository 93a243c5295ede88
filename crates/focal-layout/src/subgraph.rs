//! Dense local ids for the nodes taking part in a focal layout.

use focal_graphlib::{EdgeId, Graph, NodeId};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalEdge {
    pub source: usize,
    pub target: usize,
    pub id: EdgeId,
}

/// Focal groups followed by hop tiers, renumbered `0..len` in that order.
#[derive(Debug, Clone, Default)]
pub struct Subgraph {
    to_local: FxHashMap<NodeId, usize>,
    to_global: Vec<NodeId>,
    /// Region index of each local node: group `j`, or `num_groups + h - 1` for hop `h`.
    region_of: Vec<usize>,
    edges: Vec<LocalEdge>,
}

impl Subgraph {
    pub fn new(graph: &Graph, groups: &[Vec<NodeId>], neighbors_by_hop: &[Vec<NodeId>]) -> Self {
        let mut sub = Self::default();
        let tiers = groups.iter().chain(neighbors_by_hop);
        for (region, tier) in tiers.enumerate() {
            for &n in tier {
                sub.to_local.insert(n, sub.to_global.len());
                sub.to_global.push(n);
                sub.region_of.push(region);
            }
        }
        sub.edges = graph
            .edges()
            .iter()
            .filter_map(|e| {
                Some(LocalEdge {
                    source: *sub.to_local.get(&e.source)?,
                    target: *sub.to_local.get(&e.target)?,
                    id: e.id,
                })
            })
            .collect();
        sub
    }

    pub fn len(&self) -> usize {
        self.to_global.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_global.is_empty()
    }

    pub fn local(&self, n: NodeId) -> Option<usize> {
        self.to_local.get(&n).copied()
    }

    pub fn global(&self, local: usize) -> NodeId {
        self.to_global[local]
    }

    pub fn globals(&self) -> &[NodeId] {
        &self.to_global
    }

    pub fn region_of(&self, local: usize) -> usize {
        self.region_of[local]
    }

    pub fn edges(&self) -> &[LocalEdge] {
        &self.edges
    }
}
