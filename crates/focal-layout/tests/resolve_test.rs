use focal_graphlib::{Graph, NeighborMasks, alg};
use focal_layout::{Error, nodes_by_hop, resolve};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn path(n: usize) -> Graph {
    Graph::from_raw_edges(n, (1..n).map(|i| (i - 1, i)))
}

#[test]
fn single_group_on_path_buckets_by_distance() {
    let g = path(4);
    let masks = NeighborMasks::build(&g, 2);
    let res = resolve(&[vec![0]], &masks, 2).unwrap();

    assert_eq!(res.is_selected, BTreeMap::from([(0, 0)]));
    assert_eq!(res.neighbors_by_hop, vec![vec![1], vec![2]]);
    assert_eq!(res.hop_of(3), None);
    assert_eq!(res.hop_of(0), None);
}

#[test]
fn two_groups_share_one_hop_bucket() {
    let g = path(4);
    let masks = NeighborMasks::build(&g, 1);
    let res = resolve(&[vec![0], vec![3]], &masks, 1).unwrap();

    assert_eq!(res.is_selected, BTreeMap::from([(0, 0), (3, 1)]));
    assert_eq!(res.neighbors_by_hop, vec![vec![1, 2]]);
}

#[test]
fn nearest_hop_wins_regardless_of_group_order() {
    let g = path(4);
    let masks = NeighborMasks::build(&g, 2);
    for groups in [vec![vec![0], vec![3]], vec![vec![3], vec![0]]] {
        let res = resolve(&groups, &masks, 2).unwrap();
        assert_eq!(res.hop_of(1), Some(1));
        assert_eq!(res.hop_of(2), Some(1));
        assert!(res.neighbors_by_hop[1].is_empty());
    }
}

#[test]
fn resolving_fewer_hops_than_masks_hold() {
    let g = path(5);
    let masks = NeighborMasks::build(&g, 3);
    let res = resolve(&[vec![0]], &masks, 1).unwrap();
    assert_eq!(res.neighbors_by_hop, vec![vec![1]]);
}

#[test]
fn selected_nodes_never_appear_in_buckets() {
    let g = path(3);
    let masks = NeighborMasks::build(&g, 1);
    let res = resolve(&[vec![0, 1]], &masks, 1).unwrap();
    assert_eq!(res.is_neighbor.get(&1), Some(&1));
    assert_eq!(res.neighbors_by_hop, vec![vec![2]]);
}

#[test]
fn rejects_hops_beyond_masks_and_unknown_nodes() {
    let g = path(3);
    let masks = NeighborMasks::build(&g, 1);
    assert_eq!(
        resolve(&[vec![0]], &masks, 2),
        Err(Error::HopsExceedMasks {
            hops: 2,
            available: 1
        })
    );
    assert_eq!(
        resolve(&[vec![7]], &masks, 1),
        Err(Error::NodeOutOfRange {
            node: 7,
            num_nodes: 3
        })
    );
}

#[test]
fn nodes_by_hop_flattens_groups_first() {
    let tiers = nodes_by_hop(&[vec![4, 1], vec![7]], &[vec![2], vec![9, 3]]);
    assert_eq!(tiers, vec![vec![4, 1, 7], vec![2], vec![9, 3]]);
}

fn arb_selection() -> impl Strategy<Value = (Graph, Vec<Vec<usize>>, usize)> {
    (1usize..30, 1usize..4).prop_flat_map(|(n, hops)| {
        (
            prop::collection::vec((0..n, 0..n), 0..(n * 2)),
            prop::collection::vec(0usize..4, n),
        )
            .prop_map(move |(edges, assign)| {
                let g = Graph::from_raw_edges(n, edges);
                let groups: Vec<Vec<usize>> = (0..2)
                    .map(|k| (0..n).filter(|&i| assign[i] == k).collect::<Vec<_>>())
                    .filter(|grp| !grp.is_empty())
                    .collect();
                (g, groups, hops)
            })
    })
}

proptest! {
    #[test]
    fn buckets_are_disjoint_and_hold_the_nearest_hop((g, groups, hops) in arb_selection()) {
        let masks = NeighborMasks::build(&g, hops);
        let res = resolve(&groups, &masks, hops).unwrap();

        let mut seen = BTreeMap::new();
        for (h, bucket) in res.neighbors_by_hop.iter().enumerate() {
            for &n in bucket {
                prop_assert!(!res.is_selected.contains_key(&n));
                prop_assert!(seen.insert(n, h + 1).is_none());
            }
        }

        let selected: Vec<usize> = groups.iter().flatten().copied().collect();
        let dists: Vec<Vec<Option<usize>>> =
            selected.iter().map(|&s| alg::hop_distances(&g, s, hops)).collect();
        for n in 0..g.num_nodes() {
            if res.is_selected.contains_key(&n) {
                continue;
            }
            let nearest = dists.iter().filter_map(|d| d[n]).min();
            prop_assert_eq!(seen.get(&n).copied(), nearest);
        }
    }
}
