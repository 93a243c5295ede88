//! Distances between neighborhood masks and between embedding vectors.

use crate::error::{DistanceError, Result};
use crate::mask::NeighborMask;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// `1 - |A ∩ B| / |A ∪ B|`, in `[0, 1]`.
    #[default]
    Jaccard,
    /// `|A xor B|`, an unnormalized bit count.
    Hamming,
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jaccard => f.write_str("jaccard"),
            Self::Hamming => f.write_str("hamming"),
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jaccard" => Ok(Self::Jaccard),
            "hamming" => Ok(Self::Hamming),
            other => Err(format!("unknown distance metric `{other}`")),
        }
    }
}

pub fn neighbor_distance(a: &NeighborMask, b: &NeighborMask, metric: DistanceMetric) -> f64 {
    match metric {
        DistanceMetric::Jaccard => jaccard_distance(a, b),
        DistanceMetric::Hamming => hamming_distance(a, b),
    }
}

/// Two empty masks are at distance 0.
pub fn jaccard_distance(a: &NeighborMask, b: &NeighborMask) -> f64 {
    let union = a.union_count(b);
    if union == 0 {
        return 0.0;
    }
    1.0 - a.intersection_count(b) as f64 / union as f64
}

pub fn hamming_distance(a: &NeighborMask, b: &NeighborMask) -> f64 {
    a.symmetric_difference_count(b) as f64
}

/// Cosine similarity mapped from `[-1, 1]` onto a distance in `[0, 1]`.
pub fn cosine_distance(a: &[f64], b: &[f64]) -> Result<f64> {
    check_lengths(a, b)?;
    let mut dot = 0.0;
    let mut na = 0.0;
    let mut nb = 0.0;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return Err(DistanceError::ZeroMagnitude);
    }
    let sim = (dot / (na.sqrt() * nb.sqrt())).clamp(-1.0, 1.0);
    Ok((1.0 - sim) / 2.0)
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> Result<f64> {
    check_lengths(a, b)?;
    Ok(a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt())
}

fn check_lengths(a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        return Err(DistanceError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}
