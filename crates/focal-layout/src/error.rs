use focal_graphlib::NodeId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("hop count {hops} exceeds the supported maximum of {max}")]
    TooManyHops { hops: usize, max: usize },
    #[error("requested {hops} hops but neighbor masks were built for {available}")]
    HopsExceedMasks { hops: usize, available: usize },
    #[error("expected {expected} tiers, got {actual}")]
    TierCountMismatch { expected: usize, actual: usize },
    #[error("tier {tier} has {nodes} nodes but its embedding has {points} points")]
    EmbeddingSizeMismatch {
        tier: usize,
        nodes: usize,
        points: usize,
    },
    #[error("node {node} is outside a graph of {num_nodes} nodes")]
    NodeOutOfRange { node: NodeId, num_nodes: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
