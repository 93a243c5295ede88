//! Relating every node of the graph to the current focal selection.

use crate::error::{Error, Result};
use focal_graphlib::{NeighborMasks, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Selected groups in display order. Groups are assumed disjoint.
pub type FocalGroups = Vec<Vec<NodeId>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborResolution {
    /// Selected node -> index of its group.
    pub is_selected: BTreeMap<NodeId, usize>,
    /// Node -> smallest hop distance at which any selected node reaches it.
    ///
    /// Selected nodes may appear here too when another selected node reaches them.
    pub is_neighbor: BTreeMap<NodeId, usize>,
    /// `neighbors_by_hop[h - 1]` holds the non-selected nodes whose nearest hop is `h`, ascending.
    pub neighbors_by_hop: Vec<Vec<NodeId>>,
}

impl NeighborResolution {
    pub fn hops(&self) -> usize {
        self.neighbors_by_hop.len()
    }

    /// Hop bucket of `node` (1-based), if it is a non-selected neighbor.
    pub fn hop_of(&self, node: NodeId) -> Option<usize> {
        if self.is_selected.contains_key(&node) {
            return None;
        }
        self.is_neighbor.get(&node).copied()
    }
}

/// Computes membership and nearest-hop buckets for `groups` within `hops` edges.
///
/// When a node is reachable from several selected nodes or at several radii, the smallest hop
/// wins regardless of group order.
pub fn resolve(groups: &[Vec<NodeId>], masks: &NeighborMasks, hops: usize) -> Result<NeighborResolution> {
    if hops > masks.hops() {
        return Err(Error::HopsExceedMasks {
            hops,
            available: masks.hops(),
        });
    }
    let num_nodes = masks.num_nodes();

    let mut is_selected: BTreeMap<NodeId, usize> = BTreeMap::new();
    let mut is_neighbor: BTreeMap<NodeId, usize> = BTreeMap::new();

    for (g, group) in groups.iter().enumerate() {
        for &n in group {
            if n >= num_nodes {
                return Err(Error::NodeOutOfRange { node: n, num_nodes });
            }
            is_selected.insert(n, g);
            for h in (1..=hops).rev() {
                let Some(mask) = masks.mask(h, n) else {
                    continue;
                };
                for id in mask {
                    if id == n {
                        continue;
                    }
                    is_neighbor
                        .entry(id)
                        .and_modify(|cur| *cur = (*cur).min(h))
                        .or_insert(h);
                }
            }
        }
    }

    let mut neighbors_by_hop: Vec<Vec<NodeId>> = vec![Vec::new(); hops];
    for (&id, &h) in &is_neighbor {
        if !is_selected.contains_key(&id) {
            neighbors_by_hop[h - 1].push(id);
        }
    }

    tracing::debug!(
        groups = groups.len(),
        selected = is_selected.len(),
        neighbors = is_neighbor.len(),
        hops,
        "resolved focal neighborhood"
    );

    Ok(NeighborResolution {
        is_selected,
        is_neighbor,
        neighbors_by_hop,
    })
}

/// Tier lists in layout order: the flattened selection first, then one list per hop.
pub fn nodes_by_hop(groups: &[Vec<NodeId>], neighbors_by_hop: &[Vec<NodeId>]) -> Vec<Vec<NodeId>> {
    let mut tiers = Vec::with_capacity(neighbors_by_hop.len() + 1);
    tiers.push(groups.iter().flatten().copied().collect());
    tiers.extend(neighbors_by_hop.iter().cloned());
    tiers
}
