//! Compressed adjacency used by [`Graph`](super::Graph).
//!
//! Every undirected edge appears twice (once per endpoint). Each node's slice is sorted by
//! neighbor id so membership tests can binary search.

use super::{Edge, EdgeId, NodeId};

#[derive(Debug, Clone, Default)]
pub(in crate::graph) struct UndirectedAdjCache {
    pub(in crate::graph) offsets: Vec<usize>,
    pub(in crate::graph) neighbors: Vec<NodeId>,
    pub(in crate::graph) edge_ids: Vec<EdgeId>,
}

impl UndirectedAdjCache {
    pub(in crate::graph) fn build(num_nodes: usize, edges: &[Edge]) -> Self {
        let mut degree: Vec<usize> = vec![0; num_nodes];
        for e in edges {
            degree[e.source] += 1;
            degree[e.target] += 1;
        }

        let mut offsets: Vec<usize> = Vec::with_capacity(num_nodes + 1);
        offsets.push(0);
        for d in &degree {
            let last = offsets[offsets.len() - 1];
            offsets.push(last + d);
        }

        let total = offsets[num_nodes];
        let mut slots: Vec<(NodeId, EdgeId)> = vec![(0, 0); total];
        let mut cursor: Vec<usize> = offsets[..num_nodes].to_vec();
        for e in edges {
            slots[cursor[e.source]] = (e.target, e.id);
            cursor[e.source] += 1;
            slots[cursor[e.target]] = (e.source, e.id);
            cursor[e.target] += 1;
        }
        for v in 0..num_nodes {
            slots[offsets[v]..offsets[v + 1]].sort_unstable();
        }

        let (neighbors, edge_ids) = slots.into_iter().unzip();
        Self {
            offsets,
            neighbors,
            edge_ids,
        }
    }

    pub(in crate::graph) fn neighbors(&self, v: NodeId) -> &[NodeId] {
        let start = self.offsets[v];
        let end = self.offsets[v + 1];
        &self.neighbors[start..end]
    }

    pub(in crate::graph) fn edge_ids(&self, v: NodeId) -> &[EdgeId] {
        let start = self.offsets[v];
        let end = self.offsets[v + 1];
        &self.edge_ids[start..end]
    }
}
