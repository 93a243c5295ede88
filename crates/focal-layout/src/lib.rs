#![forbid(unsafe_code)]

//! Focal-group layout: neighborhood resolution, canvas partitioning and the layout algorithms
//! that place a selection and its hop tiers.
//!
//! Everything is synchronous and takes an explicit [`LayoutState`]; scheduling and stale-result
//! handling live in the `focal` crate.

pub mod algo;
pub mod error;
pub mod geom;
pub mod partition;
pub mod request;
pub mod resolve;
pub mod rng;
pub mod scale;
pub mod sim;
pub mod state;
pub mod subgraph;

pub use algo::initial::{InitialLayout, InitialOptions};
pub use algo::projection::{DefaultProjector, ProjectionInput, Projector};
pub use algo::{Algorithm, ConstraintOptions, ForceOptions, ProjectionOptions, SpiralOptions};
pub use error::{Error, Result};
pub use geom::{Point, Rect};
pub use partition::{CanvasScale, LayoutSpec, MAX_HOPS, Partition, Region, compute_group_positions};
pub use request::{LayoutRequest, LayoutResult};
pub use resolve::{FocalGroups, NeighborResolution, nodes_by_hop, resolve};
pub use state::LayoutState;

/// Headless layout entry point.
///
/// An empty selection short-circuits to [`LayoutResult::empty`] without running any algorithm.
pub fn layout(state: &LayoutState, request: &LayoutRequest) -> Result<LayoutResult> {
    if request.is_empty() {
        return Ok(LayoutResult::empty(state.num_nodes()));
    }
    request.validate(state)?;
    tracing::debug!(
        algorithm = request.algorithm.name(),
        groups = request.groups.len(),
        hops = request.hops(),
        "focal layout"
    );
    match &request.algorithm {
        Algorithm::EmbeddingProjection(opts) => {
            let projector = DefaultProjector::new(opts.fallback_threshold);
            let embeddings =
                algo::projection::compute_embeddings(state, request, &projector, opts.random_seed);
            algo::projection::layout(state, request, opts, &embeddings)
        }
        Algorithm::Constraint(opts) => algo::constraint::layout(state, request, opts),
        Algorithm::ForceDirected(opts) => algo::force::layout(state, request, opts),
        Algorithm::SpaceFilling(opts) => algo::spiral::layout(state, request, opts),
    }
}

/// Layout of the whole graph, independent of any selection.
pub fn initial_layout(state: &LayoutState, options: &InitialOptions) -> InitialLayout {
    algo::initial::layout(&state.graph, options)
}
