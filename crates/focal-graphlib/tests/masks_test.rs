use focal_graphlib::{Graph, NeighborMasks, alg};
use proptest::prelude::*;

fn path(n: usize) -> Graph {
    Graph::from_raw_edges(n, (1..n).map(|i| (i - 1, i)))
}

fn arb_graph() -> impl Strategy<Value = Graph> {
    (1usize..40).prop_flat_map(|n| {
        prop::collection::vec((0..n, 0..n), 0..(n * 3))
            .prop_map(move |edges| Graph::from_raw_edges(n, edges))
    })
}

#[test]
fn one_hop_mask_is_adjacency_plus_self() {
    let masks = NeighborMasks::build(&path(4), 1);
    assert_eq!(masks.one_hop()[1].iter().collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(masks.one_hop()[0].iter().collect::<Vec<_>>(), vec![0, 1]);
}

#[test]
fn path_graph_masks_grow_one_layer_per_hop() {
    let masks = NeighborMasks::build(&path(5), 3);
    assert_eq!(masks.hops(), 3);
    assert_eq!(masks.num_nodes(), 5);
    let at = |h: usize, i: usize| masks.mask(h, i).unwrap().iter().collect::<Vec<_>>();
    assert_eq!(at(1, 0), vec![0, 1]);
    assert_eq!(at(2, 0), vec![0, 1, 2]);
    assert_eq!(at(3, 0), vec![0, 1, 2, 3]);
    assert_eq!(at(2, 2), vec![0, 1, 2, 3, 4]);
    assert!(masks.at_hop(0).is_none());
    assert!(masks.at_hop(4).is_none());
}

#[test]
fn select_switches_between_local_and_global_masks() {
    let masks = NeighborMasks::build(&path(4), 2);
    assert_eq!(masks.select(false)[0].count(), 2);
    assert_eq!(masks.select(true)[0].count(), 3);
}

#[test]
fn isolated_nodes_only_contain_themselves() {
    let g = Graph::from_raw_edges(3, [(0, 1)]);
    let masks = NeighborMasks::build(&g, 3);
    assert_eq!(masks.global()[2].iter().collect::<Vec<_>>(), vec![2]);
}

proptest! {
    #[test]
    fn masks_are_cumulative(g in arb_graph(), hops in 1usize..5) {
        let masks = NeighborMasks::build(&g, hops);
        for h in 2..=hops {
            let (prev, cur) = (masks.at_hop(h - 1).unwrap(), masks.at_hop(h).unwrap());
            for i in 0..g.num_nodes() {
                prop_assert!(cur[i].is_superset(&prev[i]));
            }
        }
        for i in 0..g.num_nodes() {
            prop_assert!(masks.one_hop()[i].contains(i));
        }
    }

    #[test]
    fn masks_match_breadth_first_search(g in arb_graph(), hops in 1usize..5) {
        let masks = NeighborMasks::build(&g, hops);
        for i in 0..g.num_nodes() {
            let dist = alg::hop_distances(&g, i, hops);
            for h in 1..=hops {
                let m = masks.mask(h, i).unwrap();
                for (j, d) in dist.iter().enumerate() {
                    prop_assert_eq!(m.contains(j), d.is_some_and(|d| d <= h));
                }
            }
        }
    }
}
