//! Orchestration of selection edits, background layouts and result slots.

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::pool::ProjectionPool;
use crate::selection::{FocalSelection, SelectionMode};
use crate::slot::{CommitOutcome, Generation, ResultSlot, SlotStatus};
use crate::worker::LayoutWorker;
use focal_bundle::BundleOptions;
use focal_graphlib::{Graph, NodeId};
use focal_layout::{
    Algorithm, FocalGroups, InitialLayout, LayoutRequest, LayoutResult, LayoutState,
    NeighborResolution,
};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// A committed focal layout together with the selection it was computed for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocalLayout {
    pub groups: FocalGroups,
    pub resolution: NeighborResolution,
    pub layout: LayoutResult,
}

/// Drives the layout workers for one loaded graph.
///
/// Selection edits apply immediately; the layout they trigger runs on a worker and is committed
/// to [`FocalEngine::current_layout`] only if no newer request was issued while it ran. Nothing is
/// cancelled, so concurrent calls are fine: the last request issued wins.
#[derive(Debug)]
pub struct FocalEngine {
    config: Mutex<EngineConfig>,
    layout_worker: LayoutWorker,
    initial_worker: LayoutWorker,
    pool: ProjectionPool,
    state: Mutex<Option<LayoutState>>,
    selection: Mutex<FocalSelection>,
    layout_slot: ResultSlot<FocalLayout>,
    initial_slot: ResultSlot<InitialLayout>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FocalEngine {
    /// Spawns the layout worker, the initial-layout worker and the projection pool.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let pool = ProjectionPool::new(config.projection_workers)?;
        Ok(Self {
            layout_worker: LayoutWorker::spawn("focal-layout")?,
            initial_worker: LayoutWorker::spawn("focal-initial")?,
            pool,
            config: Mutex::new(config),
            state: Mutex::new(None),
            selection: Mutex::new(FocalSelection::new()),
            layout_slot: ResultSlot::new("focal-layout"),
            initial_slot: ResultSlot::new("initial-layout"),
        })
    }

    /// Loads `graph`: builds the masks once, pushes the state to every worker and clears the
    /// selection.
    ///
    /// Layouts still running for a previous graph are superseded.
    pub async fn initialize(&self, graph: Arc<Graph>) -> Result<()> {
        let config = self.config();
        let start = Instant::now();
        let state = self
            .layout_worker
            .initialize_state(graph, config.hops, config.metric, config.spec)
            .await?;
        futures::try_join!(
            self.pool.install_state(&state),
            self.initial_worker.install_state(state.clone()),
        )?;
        tracing::debug!(
            nodes = state.num_nodes(),
            hops = state.hops(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "graph installed"
        );

        let num_nodes = state.num_nodes();
        *lock(&self.state) = Some(state);
        *lock(&self.selection) = FocalSelection::new();
        let generation = self.layout_slot.begin();
        self.layout_slot.commit(
            generation,
            FocalLayout {
                groups: Vec::new(),
                resolution: NeighborResolution::default(),
                layout: LayoutResult::empty(num_nodes),
            },
        );
        Ok(())
    }

    pub fn state(&self) -> Option<LayoutState> {
        lock(&self.state).clone()
    }

    fn require_state(&self) -> Result<LayoutState> {
        self.state().ok_or(Error::NoGraph)
    }

    pub fn config(&self) -> EngineConfig {
        lock(&self.config).clone()
    }

    /// Changes the algorithm used by later layouts.
    pub fn set_algorithm(&self, algorithm: Algorithm) {
        lock(&self.config).focal_graph.algorithm = algorithm;
    }

    pub fn set_use_edge_bundling(&self, enabled: bool) {
        lock(&self.config).focal_graph.use_edge_bundling = enabled;
    }

    pub fn set_use_global_mask(&self, enabled: bool) {
        lock(&self.config).focal_graph.use_global_mask = enabled;
    }

    pub fn selection(&self) -> FocalSelection {
        lock(&self.selection).clone()
    }

    /// Neighborhood of the current selection.
    pub fn resolve(&self) -> Result<NeighborResolution> {
        let state = self.require_state()?;
        let groups = self.selection().into_groups();
        Ok(focal_layout::resolve(&groups, &state.masks, state.hops())?)
    }

    /// Rejects node ids outside the loaded graph before they reach the selection.
    fn check_nodes(&self, nodes: &[NodeId]) -> Result<()> {
        let num_nodes = self.require_state()?.num_nodes();
        match nodes.iter().find(|&&n| n >= num_nodes) {
            Some(&node) => Err(focal_layout::Error::NodeOutOfRange { node, num_nodes }.into()),
            None => Ok(()),
        }
    }

    /// Edits the selection and lays it out.
    pub async fn select(&self, mode: SelectionMode, nodes: &[NodeId]) -> Result<CommitOutcome> {
        self.check_nodes(nodes)?;
        let groups = {
            let mut selection = lock(&self.selection);
            selection.apply(mode, nodes);
            selection.groups().to_vec()
        };
        self.run_layout(groups).await
    }

    /// Replaces the selection with the two singleton groups `[a]` and `[b]`.
    pub async fn select_pair(&self, a: NodeId, b: NodeId) -> Result<CommitOutcome> {
        self.check_nodes(&[a, b])?;
        let groups = {
            let mut selection = lock(&self.selection);
            *selection = FocalSelection::pair(a, b);
            selection.groups().to_vec()
        };
        self.run_layout(groups).await
    }

    /// Replaces the selection with `groups`, created in order, and runs a single layout.
    pub async fn select_groups(&self, groups: &[Vec<NodeId>]) -> Result<CommitOutcome> {
        for g in groups {
            self.check_nodes(g)?;
        }
        let groups = {
            let mut selection = lock(&self.selection);
            *selection = FocalSelection::new();
            for g in groups {
                selection.apply(SelectionMode::Create, g);
            }
            selection.groups().to_vec()
        };
        self.run_layout(groups).await
    }

    /// Lays out the current selection again, e.g. after a configuration change.
    pub async fn relayout(&self) -> Result<CommitOutcome> {
        let groups = self.selection().into_groups();
        self.run_layout(groups).await
    }

    async fn run_layout(&self, groups: FocalGroups) -> Result<CommitOutcome> {
        let state = self.require_state()?;
        let config = self.config();

        let resolution = focal_layout::resolve(&groups, &state.masks, state.hops())?;
        let algorithm = config.algorithm();
        let mut request =
            LayoutRequest::new(groups.clone(), resolution.neighbors_by_hop.clone(), algorithm.clone());
        request.use_global_mask = config.focal_graph.use_global_mask;
        request.node_size = config.node_size;
        request.validate(&state)?;

        let generation = self.layout_slot.begin();
        let start = Instant::now();
        let layout = match self.compute_layout(request, &algorithm).await {
            Ok(layout) => layout,
            Err(e) => {
                self.layout_slot.fail(generation);
                return Err(e);
            }
        };
        tracing::debug!(
            generation = generation.0,
            algorithm = algorithm.name(),
            placed = layout.num_nodes,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "focal layout finished"
        );

        Ok(self.layout_slot.commit(
            generation,
            FocalLayout {
                groups,
                resolution,
                layout,
            },
        ))
    }

    async fn compute_layout(
        &self,
        request: LayoutRequest,
        algorithm: &Algorithm,
    ) -> Result<LayoutResult> {
        match algorithm {
            Algorithm::EmbeddingProjection(options) if !request.is_empty() => {
                let embeddings = self.pool.project(&request, options).await?;
                self.layout_worker
                    .projection_layout(request, *options, embeddings)
                    .await
            }
            _ => self.layout_worker.layout(request).await,
        }
    }

    /// Bundles the remaining edges of the current layout in the background.
    ///
    /// The bundles are attached only if that layout is still the newest one when bundling ends.
    pub async fn bundle_current(&self) -> Result<CommitOutcome> {
        let (generation, current) = self.layout_slot.current().ok_or(Error::NoLayout)?;
        let options = match self.config().algorithm() {
            Algorithm::EmbeddingProjection(o) => o.bundling,
            _ => BundleOptions::default(),
        };
        let bundles = self
            .layout_worker
            .bundle(
                current.layout.remaining_edges.clone(),
                current.layout.bundle_coords(),
                options,
            )
            .await?;
        Ok(self.layout_slot.update(generation, move |fl| {
            let mut fl = fl.clone();
            fl.layout.edge_bundles = Some(bundles);
            fl
        }))
    }

    /// Computes the whole-graph layout on its own worker.
    pub async fn initial_layout(&self) -> Result<CommitOutcome> {
        let generation = self.initial_slot.begin();
        let options = self.config().initial;
        match self.initial_worker.initial_layout(options).await {
            Ok(layout) => Ok(self.initial_slot.commit(generation, layout)),
            Err(e) => {
                self.initial_slot.fail(generation);
                Err(e)
            }
        }
    }

    pub fn current_layout(&self) -> Option<Arc<FocalLayout>> {
        self.layout_slot.latest()
    }

    pub fn initial(&self) -> Option<Arc<InitialLayout>> {
        self.initial_slot.latest()
    }

    pub fn layout_status(&self) -> SlotStatus {
        self.layout_slot.status()
    }

    pub fn layout_status_of(&self, generation: Generation) -> SlotStatus {
        self.layout_slot.status_of(generation)
    }

    pub fn initial_status(&self) -> SlotStatus {
        self.initial_slot.status()
    }
}
