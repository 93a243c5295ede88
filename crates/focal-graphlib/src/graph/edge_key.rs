//! Edge records.
//!
//! Edges are undirected. The stored orientation is canonical (`source < target`), while
//! adjacency queries expose both directions.

use serde::{Deserialize, Serialize};

pub type NodeId = usize;
pub type EdgeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub id: EdgeId,
}

impl Edge {
    pub fn new(a: NodeId, b: NodeId, id: EdgeId) -> Self {
        let key = EdgeKey::new(a, b);
        Self {
            source: key.v,
            target: key.w,
            id,
        }
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.source, self.target)
    }

    /// The endpoint opposite to `v`, if `v` is an endpoint at all.
    pub fn other(&self, v: NodeId) -> Option<NodeId> {
        if self.source == v {
            Some(self.target)
        } else if self.target == v {
            Some(self.source)
        } else {
            None
        }
    }
}

/// Orientation-free key of an undirected edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub v: NodeId,
    pub w: NodeId,
}

impl EdgeKey {
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Self { v: a, w: b }
        } else {
            Self { v: b, w: a }
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.v == self.w
    }
}
