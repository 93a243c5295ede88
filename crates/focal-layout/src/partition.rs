//! Allocation of canvas space to focal groups and hop tiers.

use crate::error::{Error, Result};
use crate::geom::Rect;
use crate::scale::SqrtScale;
use focal_graphlib::NodeId;
use serde::{Deserialize, Serialize};

/// Largest hop count the tier weighting supports.
pub const MAX_HOPS: usize = 5;

/// Spacing constants shared by every focal layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutSpec {
    /// Room above the tiers for group labels.
    pub padding_top: f64,
    pub padding_bottom: f64,
    /// Padding inside each region.
    pub padding: f64,
    pub gap_between_hop: f64,
    pub gap_between_focal: f64,
}

impl Default for LayoutSpec {
    fn default() -> Self {
        Self {
            padding_top: 18.0,
            padding_bottom: 2.0,
            padding: 10.0,
            gap_between_hop: 10.0,
            gap_between_focal: 16.0,
        }
    }
}

/// Canvas size as a clamped `sqrt` function of the node count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl Default for CanvasScale {
    fn default() -> Self {
        Self {
            domain: (1.0, 10_000.0),
            range: (350.0, 1000.0),
        }
    }
}

impl CanvasScale {
    pub fn size(&self, num_nodes: usize) -> f64 {
        SqrtScale::new(self.domain, self.range).apply(num_nodes as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub bounds: Rect,
    /// `foc-<j>` for focal groups, `hop-<h>` for hop tiers.
    pub label: String,
    pub population_count: usize,
}

impl Region {
    pub fn focal(j: usize, bounds: Rect, population_count: usize) -> Self {
        Self {
            bounds,
            label: format!("foc-{j}"),
            population_count,
        }
    }

    pub fn hop(h: usize, bounds: Rect, population_count: usize) -> Self {
        Self {
            bounds,
            label: format!("hop-{h}"),
            population_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partition {
    /// Focal groups in selection order, then hop tiers `1..=hops`.
    pub regions: Vec<Region>,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub num_nodes: usize,
}

/// Relative width weights for the selection tier and each hop tier: `[10, 10, 8, 6, ...]`.
pub fn tier_weights(hops: usize) -> Result<Vec<f64>> {
    if hops > MAX_HOPS {
        return Err(Error::TooManyHops {
            hops,
            max: MAX_HOPS,
        });
    }
    let mut weights = vec![10.0, 10.0];
    for _ in 2..=hops {
        let last = weights[weights.len() - 1];
        weights.push(last - 2.0);
    }
    Ok(weights)
}

/// Lays regions out left to right: the focal groups stacked in the first tier, then one column
/// per hop.
///
/// `nodes_by_hop[0]` is the flattened selection and `nodes_by_hop[h]` the hop-`h` bucket. Tier
/// widths follow `weight * log2(population + 1)`; focal group heights follow group size. The
/// canvas shrinks vertically when the tiers do not need the full height.
pub fn compute_group_positions(
    groups: &[Vec<NodeId>],
    nodes_by_hop: &[Vec<NodeId>],
    spec: &LayoutSpec,
    canvas: &CanvasScale,
) -> Result<Partition> {
    let hops = nodes_by_hop.len().saturating_sub(1);
    let weights = tier_weights(hops)?;
    let num_foc = groups.len();
    let LayoutSpec {
        padding_top,
        padding_bottom,
        padding,
        gap_between_hop,
        gap_between_focal,
    } = *spec;

    let mut nums: Vec<usize> = nodes_by_hop.iter().map(Vec::len).collect();
    if nums.is_empty() {
        nums.push(0);
    }
    let num_nodes: usize = nums.iter().sum();

    let mut canvas_height = canvas.size(num_nodes);
    let canvas_width = canvas_height * 1.3;
    canvas_height += padding_top + padding_bottom;

    let log_pop = |n: usize| ((n + 1) as f64).log2();
    let weighted_sum: f64 = nums.iter().zip(&weights).map(|(&n, w)| log_pop(n) * w).sum();
    let usable_width = canvas_width - hops as f64 * gap_between_hop;
    let group_widths: Vec<f64> = nums
        .iter()
        .zip(&weights)
        .map(|(&n, w)| {
            if weighted_sum > 0.0 {
                w * log_pop(n) / weighted_sum * usable_width
            } else {
                0.0
            }
        })
        .collect();

    let foc = num_foc as f64;
    let avail_focal = canvas_height
        - (foc - 1.0) * gap_between_focal
        - foc * 2.0 * padding
        - padding_top
        - padding_bottom;
    let num_selected = nums.first().copied().unwrap_or(0).max(1) as f64;
    let focal_heights: Vec<f64> = groups
        .iter()
        .map(|s| group_widths[0].min(avail_focal / num_selected * s.len() as f64 + 2.0 * padding))
        .collect();

    let hop_heights: Vec<f64> = group_widths[1..]
        .iter()
        .map(|w| canvas_height.min(*w))
        .collect();
    let max_neigh_height = hop_heights.iter().copied().fold(0.0, f64::max);

    let focal_sum: f64 = focal_heights.iter().sum();
    let possible_focal_height = focal_sum + gap_between_focal * (foc - 1.0).max(0.0);
    canvas_height = canvas_height
        .min(possible_focal_height.max(max_neigh_height) + padding_bottom + padding_top);

    let mut regions: Vec<Region> = Vec::with_capacity(num_foc + hops);
    let mut x_offset = 0.0;
    let mut y_offset = padding_top;
    let mut actual_gap_focal = 0.0;
    if num_foc > 1 {
        actual_gap_focal = (canvas_height - padding_top - focal_sum) / (foc - 1.0);
    } else if let Some(h) = focal_heights.first() {
        y_offset = (canvas_height - h) / 2.0;
    }
    for (j, (group, &h)) in groups.iter().zip(&focal_heights).enumerate() {
        let w = h.min(group_widths[0]);
        let bounds = Rect::new(x_offset + (group_widths[0] - w) / 2.0, y_offset, w, h);
        regions.push(Region::focal(j, bounds, group.len()));
        y_offset += h + actual_gap_focal;
    }

    x_offset += group_widths[0] + gap_between_hop;
    for i in 1..=hops {
        let h = hop_heights[i - 1];
        let bounds = Rect::new(
            x_offset,
            ((canvas_height - h) / 2.0).max(padding_top),
            group_widths[i],
            h,
        );
        regions.push(Region::hop(i, bounds, nums[i]));
        x_offset += group_widths[i] + gap_between_hop;
    }

    tracing::debug!(
        canvas_width,
        canvas_height,
        num_nodes,
        regions = regions.len(),
        "partitioned canvas"
    );

    Ok(Partition {
        regions,
        canvas_width,
        canvas_height,
        num_nodes,
    })
}
