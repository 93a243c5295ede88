//! Undirected graph container.
//!
//! The graph is immutable once built. Loading drops self loops and duplicate undirected edges,
//! assigns dense edge ids in input order and canonicalises every edge to `source < target`.

mod adj_cache;
pub mod alg;
mod edge_key;

pub use edge_key::{Edge, EdgeId, EdgeKey, NodeId};

use adj_cache::UndirectedAdjCache;
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};

type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

#[derive(Debug, Clone)]
pub struct Graph {
    num_nodes: usize,
    edges: Vec<Edge>,
    adj: UndirectedAdjCache,
}

impl Graph {
    /// Builds a graph from raw endpoint pairs.
    ///
    /// Panics if an endpoint is outside `[0, num_nodes)`; out-of-range ids are a loader bug.
    pub fn from_raw_edges<I>(num_nodes: usize, raw: I) -> Self
    where
        I: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let mut seen: HashSet<EdgeKey> = HashSet::default();
        let mut edges: Vec<Edge> = Vec::new();
        let mut dropped = 0usize;
        for (a, b) in raw {
            assert!(
                a < num_nodes && b < num_nodes,
                "edge ({a}, {b}) has an endpoint outside [0, {num_nodes})"
            );
            let key = EdgeKey::new(a, b);
            if key.is_self_loop() || !seen.insert(key) {
                dropped += 1;
                continue;
            }
            edges.push(Edge::new(a, b, edges.len()));
        }
        if dropped > 0 {
            tracing::debug!(dropped, kept = edges.len(), "filtered self loops and duplicate edges");
        }

        let adj = UndirectedAdjCache::build(num_nodes, &edges);
        Self {
            num_nodes,
            edges,
            adj,
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Sorted neighbor ids of `v`.
    pub fn neighbors(&self, v: NodeId) -> &[NodeId] {
        self.adj.neighbors(v)
    }

    /// `(neighbor, edge id)` pairs incident to `v`, sorted by neighbor id.
    pub fn incident_edges(&self, v: NodeId) -> impl Iterator<Item = (NodeId, EdgeId)> + '_ {
        self.adj
            .neighbors(v)
            .iter()
            .copied()
            .zip(self.adj.edge_ids(v).iter().copied())
    }

    pub fn degree(&self, v: NodeId) -> usize {
        self.adj.neighbors(v).len()
    }

    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.edge_between(u, v).is_some()
    }

    pub fn edge_between(&self, u: NodeId, v: NodeId) -> Option<EdgeId> {
        if u >= self.num_nodes || v >= self.num_nodes {
            return None;
        }
        let neigh = self.adj.neighbors(u);
        neigh
            .binary_search(&v)
            .ok()
            .map(|pos| self.adj.edge_ids(u)[pos])
    }
}

/// Serialized graph shape produced by loaders: a node count plus endpoint pairs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGraph {
    pub num_nodes: usize,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RawEdge {
    pub source: NodeId,
    pub target: NodeId,
}

impl RawGraph {
    pub fn into_graph(self) -> Graph {
        Graph::from_raw_edges(self.num_nodes, self.edges.into_iter().map(|e| (e.source, e.target)))
    }
}

#[cfg(test)]
mod tests {
    use super::Graph;

    #[test]
    fn adjacency_lists_are_sorted_and_symmetric() {
        let g = Graph::from_raw_edges(4, [(3, 0), (0, 1), (2, 0)]);
        assert_eq!(g.neighbors(0), &[1, 2, 3]);
        assert_eq!(g.neighbors(3), &[0]);
        let ids: Vec<_> = g.incident_edges(0).map(|(_, id)| id).collect();
        assert_eq!(ids, vec![1, 2, 0]);
    }
}
