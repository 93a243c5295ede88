//! Graph-scale data a layout worker holds across requests.

use crate::partition::{CanvasScale, LayoutSpec};
use focal_graphlib::{DistanceMetric, Graph, NeighborMask, NeighborMasks, NodeId, neighbor_distance};
use std::sync::Arc;

/// Immutable per-worker state, built once per loaded graph and passed by reference into every
/// layout call.
///
/// The graph and masks sit behind `Arc` so several workers can share one copy. Nothing here is
/// invalidated automatically: when the graph changes, build a new state.
#[derive(Debug, Clone)]
pub struct LayoutState {
    pub graph: Arc<Graph>,
    pub masks: Arc<NeighborMasks>,
    pub metric: DistanceMetric,
    pub spec: LayoutSpec,
    pub canvas: CanvasScale,
}

impl LayoutState {
    /// Builds neighbor masks for `hops` levels and wraps everything for sharing.
    pub fn initialize(graph: Arc<Graph>, hops: usize, metric: DistanceMetric, spec: LayoutSpec) -> Self {
        let masks = Arc::new(NeighborMasks::build(&graph, hops));
        Self::from_parts(graph, masks, metric, spec)
    }

    pub fn from_parts(
        graph: Arc<Graph>,
        masks: Arc<NeighborMasks>,
        metric: DistanceMetric,
        spec: LayoutSpec,
    ) -> Self {
        Self {
            graph,
            masks,
            metric,
            spec,
            canvas: CanvasScale::default(),
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.graph.num_nodes()
    }

    pub fn hops(&self) -> usize {
        self.masks.hops()
    }

    /// Global (k-hop) or local (1-hop) masks.
    pub fn masks_for(&self, use_global: bool) -> &[NeighborMask] {
        self.masks.select(use_global)
    }

    pub fn distance(&self, u: NodeId, v: NodeId, use_global: bool) -> f64 {
        let masks = self.masks_for(use_global);
        neighbor_distance(&masks[u], &masks[v], self.metric)
    }
}
