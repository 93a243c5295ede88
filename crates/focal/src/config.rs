use crate::error::Result;
use focal_graphlib::DistanceMetric;
use focal_layout::{Algorithm, InitialOptions, LayoutSpec};
use serde::{Deserialize, Serialize};

/// Engine settings, usually loaded from JSON.
///
/// Every field has a default; `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Neighborhood radius; masks are built for this many hops.
    pub hops: usize,
    pub metric: DistanceMetric,
    pub focal_graph: FocalGraphConfig,
    pub node_size: f64,
    /// Threads in the projection pool.
    pub projection_workers: usize,
    pub spec: LayoutSpec,
    pub initial: InitialOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hops: 2,
            metric: DistanceMetric::Jaccard,
            focal_graph: FocalGraphConfig::default(),
            node_size: 3.0,
            projection_workers: 4,
            spec: LayoutSpec::default(),
            initial: InitialOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocalGraphConfig {
    /// `layout` tag plus the algorithm's own options, inlined.
    #[serde(flatten)]
    pub algorithm: Algorithm,
    #[serde(default = "default_true")]
    pub use_global_mask: bool,
    #[serde(default = "default_true")]
    pub use_edge_bundling: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FocalGraphConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            use_global_mask: true,
            use_edge_bundling: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// The configured algorithm with the bundling toggle applied.
    pub fn algorithm(&self) -> Algorithm {
        match &self.focal_graph.algorithm {
            Algorithm::EmbeddingProjection(opts) => {
                let mut opts = *opts;
                opts.bundle_edges = self.focal_graph.use_edge_bundling;
                Algorithm::EmbeddingProjection(opts)
            }
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn layout_tag_and_options_are_inlined() {
        let cfg = EngineConfig::from_json(
            r#"{"hops": 3, "metric": "hamming",
                "focalGraph": {"layout": "space-filling", "minStep": 0.5, "useGlobalMask": false}}"#,
        )
        .unwrap();
        assert_eq!(cfg.hops, 3);
        assert_eq!(cfg.metric, DistanceMetric::Hamming);
        assert!(!cfg.focal_graph.use_global_mask);
        match cfg.algorithm() {
            Algorithm::SpaceFilling(o) => assert_eq!(o.min_step, 0.5),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_layout_is_an_error() {
        assert!(EngineConfig::from_json(r#"{"focalGraph": {"layout": "grid"}}"#).is_err());
    }

    #[test]
    fn bundling_toggle_reaches_projection_options() {
        let mut cfg = EngineConfig::default();
        cfg.focal_graph.use_edge_bundling = false;
        assert!(matches!(cfg.algorithm(), Algorithm::EmbeddingProjection(o) if !o.bundle_edges));
    }
}
