use crate::algo::Algorithm;
use crate::error::{Error, Result};
use crate::geom::Point;
use crate::partition::{MAX_HOPS, Region};
use crate::resolve::FocalGroups;
use crate::state::LayoutState;
use focal_bundle::Polylines;
use focal_graphlib::{Edge, Graph, NodeId};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_node_size() -> f64 {
    3.0
}

/// One focal layout invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest {
    pub groups: FocalGroups,
    /// Output of [`crate::resolve`]; its length is the hop count.
    pub neighbors_by_hop: Vec<Vec<NodeId>>,
    #[serde(default)]
    pub algorithm: Algorithm,
    /// Distances from the k-hop masks when set, from the 1-hop masks otherwise.
    #[serde(default = "default_true")]
    pub use_global_mask: bool,
    #[serde(default = "default_node_size")]
    pub node_size: f64,
}

impl LayoutRequest {
    pub fn new(groups: FocalGroups, neighbors_by_hop: Vec<Vec<NodeId>>, algorithm: Algorithm) -> Self {
        Self {
            groups,
            neighbors_by_hop,
            algorithm,
            use_global_mask: true,
            node_size: default_node_size(),
        }
    }

    pub fn hops(&self) -> usize {
        self.neighbors_by_hop.len()
    }

    /// True when no node is selected.
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(Vec::is_empty)
    }

    /// Hop count and node ids against the graph and masks of `state`.
    pub fn validate(&self, state: &LayoutState) -> Result<()> {
        if self.hops() > MAX_HOPS {
            return Err(Error::TooManyHops {
                hops: self.hops(),
                max: MAX_HOPS,
            });
        }
        if self.hops() > state.hops() {
            return Err(Error::HopsExceedMasks {
                hops: self.hops(),
                available: state.hops(),
            });
        }
        let num_nodes = state.num_nodes();
        let all = self.groups.iter().chain(&self.neighbors_by_hop).flatten();
        if let Some(&node) = all.into_iter().find(|&&n| n >= num_nodes) {
            return Err(Error::NodeOutOfRange { node, num_nodes });
        }
        Ok(())
    }
}

/// Positions and decorations produced by one layout call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    /// Indexed by node id; `None` for nodes outside the laid-out subgraph.
    pub coordinates: Vec<Option<Point>>,
    pub regions: Vec<Region>,
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Number of nodes that received coordinates.
    pub num_nodes: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_bundles: Option<Polylines>,
    pub remaining_edges: Vec<Edge>,
}

impl LayoutResult {
    /// No coordinates at all; returned for an empty selection.
    pub fn empty(num_nodes: usize) -> Self {
        Self {
            coordinates: vec![None; num_nodes],
            ..Default::default()
        }
    }

    pub fn coordinate(&self, node: NodeId) -> Option<Point> {
        self.coordinates.get(node).copied().flatten()
    }

    /// Coordinates in the form the edge bundler consumes.
    pub fn bundle_coords(&self) -> Vec<Option<[f64; 2]>> {
        self.coordinates.iter().map(|c| c.map(Point::to_array)).collect()
    }
}

/// Graph edges whose endpoints both have coordinates, in edge order.
pub fn remaining_edges(graph: &Graph, coordinates: &[Option<Point>]) -> Vec<Edge> {
    let placed = |n: NodeId| coordinates.get(n).is_some_and(Option::is_some);
    graph
        .edges()
        .iter()
        .filter(|e| placed(e.source) && placed(e.target))
        .copied()
        .collect()
}
