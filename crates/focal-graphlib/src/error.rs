use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DistanceError {
    #[error("vector length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
    #[error("cosine distance is undefined for a zero-magnitude vector")]
    ZeroMagnitude,
}

pub type Result<T> = std::result::Result<T, DistanceError>;
