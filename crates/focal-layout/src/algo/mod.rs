pub mod constraint;
pub mod force;
pub mod initial;
pub mod projection;
pub mod spiral;

use focal_bundle::BundleOptions;
use serde::{Deserialize, Serialize};

/// Focal layout algorithm with its options, tagged by `layout` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "kebab-case")]
pub enum Algorithm {
    /// Per-tier 2D projections, then a reflection/rotation search across tiers.
    #[serde(alias = "umap")]
    EmbeddingProjection(ProjectionOptions),
    /// Grouped layout with separation constraints between tiers.
    #[serde(alias = "cola")]
    Constraint(ConstraintOptions),
    /// Simulation with all-pairs distance links and hard region clamping.
    #[serde(alias = "d3")]
    ForceDirected(ForceOptions),
    /// Spiral ordered by tier and parameterised by accumulated distance.
    #[serde(alias = "spiral")]
    SpaceFilling(SpiralOptions),
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::EmbeddingProjection(ProjectionOptions::default())
    }
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::EmbeddingProjection(_) => "embedding-projection",
            Algorithm::Constraint(_) => "constraint",
            Algorithm::ForceDirected(_) => "force-directed",
            Algorithm::SpaceFilling(_) => "space-filling",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "embedding-projection" | "umap" => Self::EmbeddingProjection(Default::default()),
            "constraint" | "cola" => Self::Constraint(Default::default()),
            "force-directed" | "d3" => Self::ForceDirected(Default::default()),
            "space-filling" | "spiral" => Self::SpaceFilling(Default::default()),
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectionOptions {
    /// Run the edge bundler on the winning coordinates.
    pub bundle_edges: bool,
    pub bundling: BundleOptions,
    /// Tiers with at most this many nodes use the simulation fallback projector.
    pub fallback_threshold: usize,
    pub random_seed: u64,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            bundle_edges: true,
            bundling: BundleOptions::default(),
            fallback_threshold: 15,
            random_seed: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConstraintOptions {
    pub unconstrained_iterations: usize,
    pub constrained_iterations: usize,
    pub overlap_iterations: usize,
    /// Link length per unit of neighbor distance.
    pub link_length: f64,
    pub random_seed: u64,
}

impl Default for ConstraintOptions {
    fn default() -> Self {
        Self {
            unconstrained_iterations: 10,
            constrained_iterations: 15,
            overlap_iterations: 20,
            link_length: 100.0,
            random_seed: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForceOptions {
    /// Virtual link distance per unit of neighbor distance.
    pub link_distance: f64,
    /// Virtual link strength is `link_strength / num_nodes`.
    pub link_strength: f64,
    pub charge: f64,
    /// Pull towards the tier's region centre.
    pub center_strength: f64,
    pub random_seed: u64,
}

impl Default for ForceOptions {
    fn default() -> Self {
        Self {
            link_distance: 200.0,
            link_strength: 10.0,
            charge: -1000.0,
            center_strength: 1.0,
            random_seed: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpiralOptions {
    /// Radius per unit of accumulated distance.
    pub radius_scale: f64,
    /// Smallest step between consecutive nodes.
    pub min_step: f64,
}

impl Default for SpiralOptions {
    fn default() -> Self {
        Self {
            radius_scale: 2.0,
            min_step: 0.1,
        }
    }
}
