//! Background layout workers.
//!
//! A worker is one OS thread draining a job queue. It owns its [`LayoutState`], installed once per
//! graph and reused by every later job. Replies travel over oneshot channels, so callers can await
//! them on any executor.

use crate::error::{Error, Result};
use crossbeam_channel::{Receiver, Sender};
use focal_bundle::{BundleOptions, Polylines};
use focal_graphlib::{DistanceMetric, Edge, Graph, NodeId};
use focal_layout::algo::projection::{self, DefaultProjector, ProjectionInput, Projector};
use focal_layout::{
    InitialLayout, InitialOptions, LayoutRequest, LayoutResult, LayoutSpec, LayoutState, Point,
    ProjectionOptions,
};
use futures::channel::oneshot;
use std::sync::Arc;
use std::thread::JoinHandle;

/// One tier to project on a pool worker.
#[derive(Debug, Clone)]
pub struct ProjectionTask {
    pub nodes: Vec<NodeId>,
    pub use_global_mask: bool,
    pub node_size: f64,
    pub fallback_threshold: usize,
    pub random_seed: u64,
}

enum Job {
    Initialize {
        graph: Arc<Graph>,
        hops: usize,
        metric: DistanceMetric,
        spec: LayoutSpec,
        reply: oneshot::Sender<LayoutState>,
    },
    Install {
        state: LayoutState,
        reply: oneshot::Sender<()>,
    },
    Layout {
        request: LayoutRequest,
        reply: oneshot::Sender<Result<LayoutResult>>,
    },
    ProjectionLayout {
        request: LayoutRequest,
        options: ProjectionOptions,
        embeddings: Vec<Vec<Point>>,
        reply: oneshot::Sender<Result<LayoutResult>>,
    },
    Project {
        task: ProjectionTask,
        reply: oneshot::Sender<Result<Vec<Point>>>,
    },
    Bundle {
        edges: Vec<Edge>,
        coords: Vec<Option<[f64; 2]>>,
        options: BundleOptions,
        reply: oneshot::Sender<Polylines>,
    },
    Initial {
        options: InitialOptions,
        reply: oneshot::Sender<Result<InitialLayout>>,
    },
}

#[derive(Debug)]
pub struct LayoutWorker {
    name: String,
    sender: Option<Sender<Job>>,
    handle: Option<JoinHandle<()>>,
}

impl LayoutWorker {
    pub fn spawn(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let (sender, receiver) = crossbeam_channel::unbounded();
        let thread_name = name.clone();
        let handle = std::thread::Builder::new()
            .name(name.clone())
            .spawn(move || run(thread_name, receiver))?;
        Ok(Self {
            name,
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn disconnected(&self) -> Error {
        Error::WorkerDisconnected {
            name: self.name.clone(),
        }
    }

    async fn call<R>(&self, job: impl FnOnce(oneshot::Sender<R>) -> Job) -> Result<R> {
        let (tx, rx) = oneshot::channel();
        let sender = self.sender.as_ref().ok_or_else(|| self.disconnected())?;
        sender.send(job(tx)).map_err(|_| self.disconnected())?;
        rx.await.map_err(|_| self.disconnected())
    }

    /// Builds masks for `graph` on the worker thread and keeps the resulting state.
    pub async fn initialize_state(
        &self,
        graph: Arc<Graph>,
        hops: usize,
        metric: DistanceMetric,
        spec: LayoutSpec,
    ) -> Result<LayoutState> {
        self.call(|reply| Job::Initialize {
            graph,
            hops,
            metric,
            spec,
            reply,
        })
        .await
    }

    /// Replaces the worker's state with an already built one.
    pub async fn install_state(&self, state: LayoutState) -> Result<()> {
        self.call(|reply| Job::Install { state, reply }).await
    }

    pub async fn layout(&self, request: LayoutRequest) -> Result<LayoutResult> {
        self.call(|reply| Job::Layout { request, reply }).await?
    }

    /// Embedding-projection layout over embeddings computed elsewhere.
    pub async fn projection_layout(
        &self,
        request: LayoutRequest,
        options: ProjectionOptions,
        embeddings: Vec<Vec<Point>>,
    ) -> Result<LayoutResult> {
        self.call(|reply| Job::ProjectionLayout {
            request,
            options,
            embeddings,
            reply,
        })
        .await?
    }

    pub async fn project(&self, task: ProjectionTask) -> Result<Vec<Point>> {
        self.call(|reply| Job::Project { task, reply }).await?
    }

    pub async fn bundle(
        &self,
        edges: Vec<Edge>,
        coords: Vec<Option<[f64; 2]>>,
        options: BundleOptions,
    ) -> Result<Polylines> {
        self.call(|reply| Job::Bundle {
            edges,
            coords,
            options,
            reply,
        })
        .await
    }

    pub async fn initial_layout(&self, options: InitialOptions) -> Result<InitialLayout> {
        self.call(|reply| Job::Initial { options, reply }).await?
    }
}

impl Drop for LayoutWorker {
    fn drop(&mut self) {
        // Closing the queue ends the thread's loop.
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!(worker = %self.name, "worker thread panicked");
            }
        }
    }
}

fn run(name: String, jobs: Receiver<Job>) {
    let mut state: Option<LayoutState> = None;
    let uninitialized = || Error::Uninitialized { name: name.clone() };

    for job in jobs {
        match job {
            Job::Initialize {
                graph,
                hops,
                metric,
                spec,
                reply,
            } => {
                let built = LayoutState::initialize(graph, hops, metric, spec);
                tracing::debug!(worker = %name, nodes = built.num_nodes(), hops, "state initialized");
                state = Some(built.clone());
                let _ = reply.send(built);
            }
            Job::Install { state: s, reply } => {
                state = Some(s);
                let _ = reply.send(());
            }
            Job::Layout { request, reply } => {
                let out = match &state {
                    Some(s) => focal_layout::layout(s, &request).map_err(Error::from),
                    None => Err(uninitialized()),
                };
                let _ = reply.send(out);
            }
            Job::ProjectionLayout {
                request,
                options,
                embeddings,
                reply,
            } => {
                let out = match &state {
                    Some(s) => projection::layout(s, &request, &options, &embeddings).map_err(Error::from),
                    None => Err(uninitialized()),
                };
                let _ = reply.send(out);
            }
            Job::Project { task, reply } => {
                let out = match &state {
                    Some(s) => Ok(DefaultProjector::new(task.fallback_threshold).project(&ProjectionInput {
                        state: s,
                        nodes: &task.nodes,
                        use_global_mask: task.use_global_mask,
                        node_size: task.node_size,
                        random_seed: task.random_seed,
                    })),
                    None => Err(uninitialized()),
                };
                let _ = reply.send(out);
            }
            Job::Bundle {
                edges,
                coords,
                options,
                reply,
            } => {
                let _ = reply.send(focal_bundle::bundle_edges(&edges, &coords, &options));
            }
            Job::Initial { options, reply } => {
                let out = match &state {
                    Some(s) => Ok(focal_layout::initial_layout(s, &options)),
                    None => Err(uninitialized()),
                };
                let _ = reply.send(out);
            }
        }
    }
    tracing::trace!(worker = %name, "worker stopped");
}
