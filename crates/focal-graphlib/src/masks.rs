//! Cumulative k-hop neighborhood bitsets for every node.

use crate::graph::{Graph, NodeId};
use crate::mask::NeighborMask;

/// Per-node neighborhood masks for hops `1..=H`.
///
/// `at_hop(h)[i]` marks every node reachable from `i` within `h` edges, `i` itself included.
/// Masks are cumulative: `at_hop(h)[i] ⊇ at_hop(h - 1)[i]`.
#[derive(Debug, Clone)]
pub struct NeighborMasks {
    by_hop: Vec<Vec<NeighborMask>>,
}

impl NeighborMasks {
    /// Builds masks for `hops` levels.
    ///
    /// Each level only expands the frontier added by the previous level, so the cost stays at
    /// one bitset OR per (node, frontier neighbor) pair.
    pub fn build(graph: &Graph, hops: usize) -> Self {
        assert!(hops >= 1, "neighbor masks need at least one hop");
        let n = graph.num_nodes();

        let one_hop: Vec<NeighborMask> = (0..n)
            .map(|i| {
                let mut m = NeighborMask::from_bits(n, graph.neighbors(i).iter().copied());
                m.insert(i);
                m
            })
            .collect();

        let mut by_hop: Vec<Vec<NeighborMask>> = Vec::with_capacity(hops);
        by_hop.push(one_hop);

        for h in 1..hops {
            let prev = &by_hop[h - 1];
            let next: Vec<NeighborMask> = (0..n)
                .map(|i| {
                    let mut m = prev[i].clone();
                    for j in &prev[i] {
                        let older = if h >= 2 {
                            by_hop[h - 2][i].contains(j)
                        } else {
                            j == i
                        };
                        if !older {
                            m.union_with(&by_hop[0][j]);
                        }
                    }
                    m
                })
                .collect();
            by_hop.push(next);
        }

        tracing::debug!(nodes = n, hops, "built neighbor masks");
        Self { by_hop }
    }

    pub fn hops(&self) -> usize {
        self.by_hop.len()
    }

    pub fn num_nodes(&self) -> usize {
        self.by_hop.first().map_or(0, Vec::len)
    }

    /// Masks for hop radius `hop` (1-based). `None` when `hop` is 0 or above [`Self::hops`].
    pub fn at_hop(&self, hop: usize) -> Option<&[NeighborMask]> {
        hop.checked_sub(1)
            .and_then(|i| self.by_hop.get(i))
            .map(Vec::as_slice)
    }

    /// Direct-adjacency masks (self bit included).
    pub fn one_hop(&self) -> &[NeighborMask] {
        &self.by_hop[0]
    }

    /// Masks at the largest configured radius.
    pub fn global(&self) -> &[NeighborMask] {
        &self.by_hop[self.by_hop.len() - 1]
    }

    /// The mask family used for distance computations.
    pub fn select(&self, use_global: bool) -> &[NeighborMask] {
        if use_global {
            self.global()
        } else {
            self.one_hop()
        }
    }

    pub fn mask(&self, hop: usize, node: NodeId) -> Option<&NeighborMask> {
        self.at_hop(hop).and_then(|m| m.get(node))
    }
}
