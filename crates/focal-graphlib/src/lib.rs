#![forbid(unsafe_code)]

//! Graph container, bitset neighborhood masks and mask distances.
//!
//! Everything here is immutable once built and meant to be shared read-only across layout
//! workers.

pub mod distance;
pub mod error;
pub mod graph;
pub mod mask;
pub mod masks;

pub use distance::{
    DistanceMetric, cosine_distance, euclidean_distance, hamming_distance, jaccard_distance,
    neighbor_distance,
};
pub use error::{DistanceError, Result};
pub use graph::{Edge, EdgeId, EdgeKey, Graph, NodeId, RawEdge, RawGraph, alg};
pub use mask::NeighborMask;
pub use masks::NeighborMasks;
