#![forbid(unsafe_code)]

//! Focal-group graph layout engine.
//!
//! Layouts run on background worker threads that each hold a [`LayoutState`] for the loaded
//! graph. Callers await typed replies; results of requests that were superseded while running are
//! dropped at the [`ResultSlot`] instead of being cancelled.
//!
//! ```no_run
//! use focal::{EngineConfig, FocalEngine, SelectionMode};
//! use focal_graphlib::Graph;
//! use std::sync::Arc;
//!
//! # fn main() -> focal::Result<()> {
//! let engine = FocalEngine::new(EngineConfig::default())?;
//! let graph = Arc::new(Graph::from_raw_edges(4, [(0, 1), (1, 2), (2, 3)]));
//! futures::executor::block_on(async {
//!     engine.initialize(graph).await?;
//!     engine.select(SelectionMode::Create, &[0]).await?;
//!     focal::Result::Ok(())
//! })?;
//! let layout = engine.current_layout();
//! # let _ = layout;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod pool;
pub mod selection;
pub mod slot;
pub mod worker;

pub use config::{EngineConfig, FocalGraphConfig};
pub use engine::{FocalEngine, FocalLayout};
pub use error::{Error, Result};
pub use pool::{ProjectionPool, assign_least_loaded};
pub use selection::{FocalSelection, SelectionMode};
pub use slot::{CommitOutcome, Generation, ResultSlot, SlotStatus};
pub use worker::{LayoutWorker, ProjectionTask};

pub use focal_layout::LayoutState;
