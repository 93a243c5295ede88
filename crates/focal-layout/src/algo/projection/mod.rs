//! Embedding-projection layout.
//!
//! Each tier (every focal group, then every hop bucket) is projected to 2D on its own and
//! min-max scaled into the region the partitioner gave it. Tiers are independent up to
//! reflection and rotation, so a depth-first search then picks one orientation per tier to
//! minimise an energy between consecutive hop tiers: `-ln(d)` for every sampled pair, plus `d`
//! when the pair is a graph edge. Connected nodes end up facing each other across tier
//! boundaries without collapsing onto one another.

mod pivot_mds;
mod projector;

pub use projector::{DefaultProjector, ForceProjector, PivotMds, ProjectionInput, Projector};

use super::ProjectionOptions;
use crate::error::{Error, Result};
use crate::geom::{Point, Rect, extents};
use crate::partition::compute_group_positions;
use crate::request::{LayoutRequest, LayoutResult, remaining_edges};
use crate::resolve::nodes_by_hop;
use crate::rng::XorShift64Star;
use crate::scale::LinearScale;
use crate::state::LayoutState;
use crate::subgraph::Subgraph;
use focal_graphlib::NodeId;
use std::time::Instant;

/// Pairs considered per side of a tier boundary, divided by the number of regions.
const ENERGY_SAMPLE_BUDGET: usize = 200;

/// Tier node lists in region order: each focal group, then each hop bucket.
pub fn tiers(request: &LayoutRequest) -> Vec<&[NodeId]> {
    request
        .groups
        .iter()
        .chain(&request.neighbors_by_hop)
        .map(Vec::as_slice)
        .collect()
}

/// Projects every tier with `projector`, in [`tiers`] order.
pub fn compute_embeddings(
    state: &LayoutState,
    request: &LayoutRequest,
    projector: &dyn Projector,
    random_seed: u64,
) -> Vec<Vec<Point>> {
    let started = Instant::now();
    let out: Vec<Vec<Point>> = tiers(request)
        .into_iter()
        .map(|nodes| {
            projector.project(&ProjectionInput {
                state,
                nodes,
                use_global_mask: request.use_global_mask,
                node_size: request.node_size,
                random_seed,
            })
        })
        .collect();
    tracing::debug!(
        tiers = out.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "projected tiers"
    );
    out
}

/// Places `embeddings` (one per tier, [`tiers`] order) into their regions and searches for the
/// lowest-energy orientation of each tier.
pub fn layout(
    state: &LayoutState,
    request: &LayoutRequest,
    options: &ProjectionOptions,
    embeddings: &[Vec<Point>],
) -> Result<LayoutResult> {
    let tier_nodes = tiers(request);
    if embeddings.len() != tier_nodes.len() {
        return Err(Error::TierCountMismatch {
            expected: tier_nodes.len(),
            actual: embeddings.len(),
        });
    }
    for (tier, (nodes, points)) in tier_nodes.iter().zip(embeddings).enumerate() {
        if nodes.len() != points.len() {
            return Err(Error::EmbeddingSizeMismatch {
                tier,
                nodes: nodes.len(),
                points: points.len(),
            });
        }
    }

    let by_hop = nodes_by_hop(&request.groups, &request.neighbors_by_hop);
    let partition = compute_group_positions(&request.groups, &by_hop, &state.spec, &state.canvas)?;
    let padding = state.spec.padding;
    let subgraph = Subgraph::new(&state.graph, &request.groups, &request.neighbors_by_hop);

    let variants: Vec<Vec<Vec<Point>>> = embeddings
        .iter()
        .zip(&partition.regions)
        .map(|(points, region)| {
            let base = fit_into(points, &region.bounds, padding);
            orientations(&base, &region.bounds)
        })
        .collect();

    let mut rng = XorShift64Star::new(options.random_seed);
    let sample_size = energy_sample_size(partition.regions.len());
    let samples: Vec<Vec<usize>> = by_hop
        .iter()
        .map(|tier| {
            let local: Vec<usize> = tier.iter().filter_map(|&n| subgraph.local(n)).collect();
            sample_tier(local, sample_size, &mut rng)
        })
        .collect();
    let boundaries: Vec<Vec<(usize, usize, bool)>> = (1..samples.len())
        .map(|t| {
            let mut pairs = Vec::with_capacity(samples[t - 1].len() * samples[t].len());
            for &u in &samples[t - 1] {
                for &v in &samples[t] {
                    let edge = state.graph.has_edge(subgraph.global(u), subgraph.global(v));
                    pairs.push((u, v, edge));
                }
            }
            pairs
        })
        .collect();

    let started = Instant::now();
    let search = OrientationSearch {
        variants: &variants,
        offsets: tier_offsets(&tier_nodes),
        num_focal: request.groups.len(),
        boundaries: &boundaries,
    };
    let mut positions = vec![Point::default(); subgraph.len()];
    let mut choice = Vec::with_capacity(variants.len());
    let (mut best, energy) = search.run(0, &mut positions, &mut choice, 0.0);
    if best.len() != variants.len() {
        best = vec![0; variants.len()];
    }
    tracing::debug!(
        tiers = variants.len(),
        energy,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "orientation search"
    );

    let mut coordinates = vec![None; state.num_nodes()];
    for ((nodes, tier_variants), &pick) in tier_nodes.iter().zip(&variants).zip(&best) {
        for (&n, p) in nodes.iter().zip(&tier_variants[pick]) {
            coordinates[n] = Some(*p);
        }
    }

    let remaining = remaining_edges(&state.graph, &coordinates);
    let mut result = LayoutResult {
        coordinates,
        regions: partition.regions,
        canvas_width: partition.canvas_width,
        canvas_height: partition.canvas_height,
        num_nodes: partition.num_nodes,
        edge_bundles: None,
        remaining_edges: remaining,
    };
    if options.bundle_edges {
        let started = Instant::now();
        let bundles =
            focal_bundle::bundle_edges(&result.remaining_edges, &result.bundle_coords(), &options.bundling);
        tracing::debug!(
            edges = result.remaining_edges.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "bundled edges"
        );
        result.edge_bundles = Some(bundles);
    }
    Ok(result)
}

/// Nodes sampled per side of a tier boundary.
fn energy_sample_size(num_regions: usize) -> usize {
    ENERGY_SAMPLE_BUDGET / num_regions.max(1)
}

/// Keeps `local` whole unless it exceeds `1.2 * sample_size`, then draws `sample_size` of it.
fn sample_tier(local: Vec<usize>, sample_size: usize, rng: &mut XorShift64Star) -> Vec<usize> {
    if local.len() as f64 > 1.2 * sample_size as f64 {
        rng.sample(&local, sample_size)
    } else {
        local
    }
}

/// Min-max scales `points` into `bounds` shrunk by `padding`. A single point goes to the centre.
fn fit_into(points: &[Point], bounds: &Rect, padding: f64) -> Vec<Point> {
    if points.len() == 1 {
        return vec![bounds.center()];
    }
    let Some(((x0, x1), (y0, y1))) = extents(points.iter().copied()) else {
        return Vec::new();
    };
    let sx = LinearScale::new((x0, x1), (bounds.x + padding, bounds.x + bounds.width - padding));
    let sy = LinearScale::new((y0, y1), (bounds.y + padding, bounds.y + bounds.height - padding));
    points
        .iter()
        .map(|p| Point::new(sx.apply(p.x), sy.apply(p.y)))
        .collect()
}

/// Candidate placements of one tier: identity, 90/180/270 degree rotations about the region
/// centre, and horizontal/vertical flips. Axis-aligned turns are rigid; nothing is rescaled.
fn orientations(base: &[Point], bounds: &Rect) -> Vec<Vec<Point>> {
    if base.len() <= 1 {
        return vec![base.to_vec()];
    }
    let c = bounds.center();
    let rotate = |quarters: u8| -> Vec<Point> {
        base.iter()
            .map(|p| {
                let (dx, dy) = (p.x - c.x, p.y - c.y);
                match quarters {
                    1 => Point::new(c.x - dy, c.y + dx),
                    2 => Point::new(c.x - dx, c.y - dy),
                    _ => Point::new(c.x + dy, c.y - dx),
                }
            })
            .collect()
    };
    vec![
        base.to_vec(),
        rotate(1),
        rotate(2),
        rotate(3),
        base.iter().map(|p| Point::new(2.0 * c.x - p.x, p.y)).collect(),
        base.iter().map(|p| Point::new(p.x, 2.0 * c.y - p.y)).collect(),
    ]
}

fn tier_offsets(tiers: &[&[NodeId]]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(tiers.len());
    let mut acc = 0;
    for t in tiers {
        offsets.push(acc);
        acc += t.len();
    }
    offsets
}

struct OrientationSearch<'a> {
    variants: &'a [Vec<Vec<Point>>],
    /// First local id of each tier.
    offsets: Vec<usize>,
    num_focal: usize,
    /// Sampled pairs across each hop boundary; index `t - 1` is the boundary into hop tier `t`.
    boundaries: &'a [Vec<(usize, usize, bool)>],
}

impl OrientationSearch<'_> {
    /// Best `(choice per tier, energy)` below `tier`. Ties keep the first assignment found.
    fn run(
        &self,
        tier: usize,
        positions: &mut [Point],
        choice: &mut Vec<usize>,
        energy: f64,
    ) -> (Vec<usize>, f64) {
        if tier == self.variants.len() {
            return (choice.clone(), energy);
        }
        let mut best = (Vec::new(), f64::INFINITY);
        for (v, coords) in self.variants[tier].iter().enumerate() {
            let offset = self.offsets[tier];
            positions[offset..offset + coords.len()].copy_from_slice(coords);
            let delta = if tier >= self.num_focal {
                self.energy(tier - self.num_focal + 1, positions)
            } else {
                0.0
            };
            choice.push(v);
            let found = self.run(tier + 1, positions, choice, energy + delta);
            choice.pop();
            if found.1 < best.1 {
                best = found;
            }
        }
        best
    }

    fn energy(&self, hop: usize, positions: &[Point]) -> f64 {
        self.boundaries[hop - 1]
            .iter()
            .map(|&(u, v, edge)| {
                let d = positions[u].distance(&positions[v]);
                let e = -d.ln();
                if edge { e + d } else { e }
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_point_goes_to_region_centre() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(fit_into(&[Point::new(3.0, 4.0)], &r, 5.0), vec![Point::new(60.0, 45.0)]);
    }

    #[test]
    fn quarter_turns_are_rigid_rotations_about_the_centre() {
        let r = Rect::new(0.0, 0.0, 100.0, 100.0);
        let base = vec![Point::new(40.0, 50.0), Point::new(60.0, 50.0), Point::new(50.0, 55.0)];
        let all = orientations(&base, &r);
        assert_eq!(all.len(), 6);
        assert_eq!(all[0], base);
        assert_eq!(
            all[1],
            vec![Point::new(50.0, 40.0), Point::new(50.0, 60.0), Point::new(45.0, 50.0)]
        );
        assert_eq!(
            all[2],
            vec![Point::new(60.0, 50.0), Point::new(40.0, 50.0), Point::new(50.0, 45.0)]
        );
        assert_eq!(
            all[3],
            vec![Point::new(50.0, 60.0), Point::new(50.0, 40.0), Point::new(55.0, 50.0)]
        );
        assert_eq!(all[4][2], Point::new(50.0, 55.0));
        assert_eq!(all[5][2], Point::new(50.0, 45.0));
    }

    #[test]
    fn rotations_and_flips_preserve_pairwise_distances() {
        let r = Rect::new(0.0, 0.0, 200.0, 80.0);
        let base = fit_into(
            &[Point::new(0.0, 0.0), Point::new(1.0, 3.0), Point::new(2.0, 1.0)],
            &r,
            10.0,
        );
        for coords in orientations(&base, &r) {
            for i in 0..base.len() {
                for j in 0..base.len() {
                    let d0 = base[i].distance(&base[j]);
                    assert!((coords[i].distance(&coords[j]) - d0).abs() < 1e-9);
                }
            }
        }
    }

    /// One focal tier pinned at the origin and one hop tier whose only node can sit at
    /// distance 1, 3 or 2 from it.
    fn two_tier_search<'a>(
        variants: &'a [Vec<Vec<Point>>],
        boundaries: &'a [Vec<(usize, usize, bool)>],
    ) -> OrientationSearch<'a> {
        OrientationSearch {
            variants,
            offsets: vec![0, 1],
            num_focal: 1,
            boundaries,
        }
    }

    fn hop_candidates() -> Vec<Vec<Vec<Point>>> {
        vec![
            vec![vec![Point::new(0.0, 0.0)]],
            vec![
                vec![Point::new(1.0, 0.0)],
                vec![Point::new(3.0, 0.0)],
                vec![Point::new(0.0, 2.0)],
            ],
        ]
    }

    fn run(search: &OrientationSearch<'_>) -> (Vec<usize>, f64) {
        let mut positions = vec![Point::default(); 2];
        search.run(0, &mut positions, &mut Vec::new(), 0.0)
    }

    #[test]
    fn search_picks_minimum_energy_without_edges() {
        let variants = hop_candidates();
        let boundaries = vec![vec![(0, 1, false)]];
        let (choice, energy) = run(&two_tier_search(&variants, &boundaries));
        // -ln(d) alone favours the farthest placement.
        assert_eq!(choice, vec![0, 1]);
        assert!((energy + 3.0f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn edge_term_pulls_connected_nodes_together() {
        let variants = hop_candidates();
        let boundaries = vec![vec![(0, 1, true)]];
        let (choice, energy) = run(&two_tier_search(&variants, &boundaries));
        // -ln(d) + d is smallest at d = 1.
        assert_eq!(choice, vec![0, 0]);
        assert!((energy - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ties_keep_the_first_assignment() {
        let variants = vec![
            vec![vec![Point::new(0.0, 0.0)], vec![Point::new(0.0, 0.0)]],
            vec![
                vec![Point::new(2.0, 0.0)],
                vec![Point::new(0.0, 2.0)],
                vec![Point::new(-2.0, 0.0)],
            ],
        ];
        let boundaries = vec![vec![(0, 1, false)]];
        let (choice, _) = run(&two_tier_search(&variants, &boundaries));
        assert_eq!(choice, vec![0, 0]);
    }

    #[test]
    fn focal_tiers_carry_no_energy_of_their_own() {
        let variants = vec![vec![vec![Point::new(0.0, 0.0)], vec![Point::new(5.0, 5.0)]]];
        let search = OrientationSearch {
            variants: &variants,
            offsets: vec![0],
            num_focal: 1,
            boundaries: &[],
        };
        let mut positions = vec![Point::default(); 1];
        assert_eq!(search.run(0, &mut positions, &mut Vec::new(), 0.0), (vec![0], 0.0));
    }

    #[test]
    fn large_tiers_are_sampled_down_to_the_budget_share() {
        assert_eq!(energy_sample_size(5), 40);
        assert_eq!(energy_sample_size(3), 66);
        let mut rng = XorShift64Star::new(3);

        let at_threshold: Vec<usize> = (0..48).collect();
        assert_eq!(sample_tier(at_threshold.clone(), 40, &mut rng), at_threshold);

        let over: Vec<usize> = (100..149).collect();
        let sampled = sample_tier(over.clone(), 40, &mut rng);
        assert_eq!(sampled.len(), 40);
        let mut unique = sampled.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 40);
        assert!(sampled.iter().all(|n| over.contains(n)));
    }

    #[test]
    fn orientations_stay_inside_padded_region() {
        let r = Rect::new(0.0, 0.0, 100.0, 100.0);
        let base = fit_into(
            &[Point::new(0.0, 0.0), Point::new(1.0, 3.0), Point::new(2.0, 1.0)],
            &r,
            10.0,
        );
        for coords in orientations(&base, &r) {
            for p in coords {
                assert!(r.contains(p), "{p:?} outside {r:?}");
            }
        }
    }
}
