use focal_graphlib::{Graph, RawGraph, alg};

#[test]
fn loading_drops_self_loops_and_duplicates() {
    let g = Graph::from_raw_edges(3, [(0, 1), (1, 0), (2, 2), (1, 2), (0, 1)]);

    assert_eq!(g.edge_count(), 2);
    assert_eq!(g.edges()[0].id, 0);
    assert_eq!(g.edges()[1].id, 1);
    assert!(g.has_edge(1, 0));
    assert!(g.has_edge(2, 1));
    assert!(!g.has_edge(0, 2));
    assert!(!g.has_edge(2, 2));
}

#[test]
fn edges_are_canonicalised_but_exposed_both_ways() {
    let g = Graph::from_raw_edges(4, [(3, 1)]);
    let e = g.edge(0).copied().unwrap();
    assert_eq!((e.source, e.target), (1, 3));
    assert_eq!(g.neighbors(3), &[1]);
    assert_eq!(g.neighbors(1), &[3]);
    assert_eq!(g.edge_between(3, 1), Some(0));
    assert_eq!(e.other(3), Some(1));
    assert_eq!(e.other(2), None);
}

#[test]
#[should_panic]
fn out_of_range_endpoints_fail_fast() {
    let _ = Graph::from_raw_edges(2, [(0, 5)]);
}

#[test]
fn raw_graph_deserializes_from_loader_json() {
    let raw: RawGraph = serde_json::from_str(
        r#"{"numNodes": 4, "edges": [{"source": 0, "target": 1}, {"source": 2, "target": 1}]}"#,
    )
    .unwrap();
    let g = raw.into_graph();
    assert_eq!(g.num_nodes(), 4);
    assert_eq!(g.degree(1), 2);
    assert_eq!(g.degree(3), 0);
}

#[test]
fn hop_distances_stop_at_the_radius() {
    let g = Graph::from_raw_edges(4, [(0, 1), (1, 2), (2, 3)]);
    assert_eq!(alg::hop_distances(&g, 0, 2), vec![Some(0), Some(1), Some(2), None]);
}
