use focal::{CommitOutcome, EngineConfig, Error, FocalEngine, SelectionMode, SlotStatus};
use focal_graphlib::Graph;
use focal_layout::{Algorithm, ProjectionOptions, SpiralOptions};
use futures::executor::block_on;
use std::sync::Arc;

/// Two 5-cycles joined by a bridge 4-5, plus an isolated node 10.
fn barbell() -> Arc<Graph> {
    let left = (0..5).map(|i| (i, (i + 1) % 5));
    let right = (5..10).map(|i| (i, 5 + (i - 5 + 1) % 5));
    Arc::new(Graph::from_raw_edges(11, left.chain(right).chain([(4, 5)])))
}

fn engine_with(algorithm: Algorithm) -> FocalEngine {
    let mut config = EngineConfig::default();
    config.projection_workers = 2;
    config.focal_graph.algorithm = algorithm;
    FocalEngine::new(config).unwrap()
}

fn loaded(algorithm: Algorithm) -> FocalEngine {
    let engine = engine_with(algorithm);
    block_on(engine.initialize(barbell())).unwrap();
    engine
}

#[test]
fn requests_before_initialize_fail() {
    let engine = engine_with(Algorithm::default());
    assert!(matches!(engine.resolve(), Err(Error::NoGraph)));
    assert!(matches!(
        block_on(engine.select(SelectionMode::Create, &[0])),
        Err(Error::NoGraph)
    ));
    assert!(matches!(block_on(engine.bundle_current()), Err(Error::NoLayout)));
    assert!(matches!(
        block_on(engine.initial_layout()),
        Err(Error::Uninitialized { .. })
    ));
}

#[test]
fn failed_requests_do_not_stay_running() {
    let engine = engine_with(Algorithm::default());
    assert!(matches!(block_on(engine.relayout()), Err(Error::NoGraph)));
    assert_eq!(engine.layout_status(), SlotStatus::Idle);

    assert!(block_on(engine.initial_layout()).is_err());
    assert_eq!(engine.initial_status(), SlotStatus::Failed);
    assert!(engine.initial().is_none());

    block_on(engine.initialize(barbell())).unwrap();
    block_on(engine.initial_layout()).unwrap();
    assert_eq!(engine.initial_status(), SlotStatus::Done);
}

#[test]
fn initialize_commits_an_empty_layout() {
    let engine = loaded(Algorithm::default());
    let current = engine.current_layout().unwrap();
    assert!(current.groups.is_empty());
    assert_eq!(current.layout.coordinates.len(), 11);
    assert!(current.layout.coordinates.iter().all(Option::is_none));
    assert_eq!(engine.layout_status(), SlotStatus::Done);
}

#[test]
fn projection_layout_places_selection_and_neighbors() {
    let engine = loaded(Algorithm::default());
    let outcome = block_on(engine.select(SelectionMode::Create, &[0])).unwrap();
    assert_eq!(outcome, CommitOutcome::Applied);

    let current = engine.current_layout().unwrap();
    assert_eq!(current.groups, vec![vec![0]]);
    assert_eq!(current.resolution.neighbors_by_hop, vec![vec![1, 4], vec![2, 3, 5]]);
    let placed: Vec<usize> = (0..11).filter(|&n| current.layout.coordinate(n).is_some()).collect();
    assert_eq!(placed, vec![0, 1, 2, 3, 4, 5]);
    assert!(current.layout.edge_bundles.is_some());
}

#[test]
fn superseded_layout_is_not_committed() {
    let engine = loaded(Algorithm::SpaceFilling(SpiralOptions::default()));
    let (first, second) = block_on(async {
        futures::join!(
            engine.select(SelectionMode::Create, &[0]),
            engine.select(SelectionMode::Create, &[7]),
        )
    });
    assert_eq!(first.unwrap(), CommitOutcome::Superseded);
    assert_eq!(second.unwrap(), CommitOutcome::Applied);

    let current = engine.current_layout().unwrap();
    assert_eq!(current.groups, vec![vec![0], vec![7]]);
    assert_eq!(engine.layout_status(), SlotStatus::Done);
}

#[test]
fn pair_selection_replaces_the_selection() {
    let engine = loaded(Algorithm::SpaceFilling(SpiralOptions::default()));
    block_on(engine.select(SelectionMode::Create, &[1, 2, 3])).unwrap();
    block_on(engine.select_pair(0, 9)).unwrap();
    assert_eq!(engine.selection().groups(), &[vec![0], vec![9]]);
    assert_eq!(engine.current_layout().unwrap().groups, vec![vec![0], vec![9]]);
}

#[test]
fn clearing_the_selection_yields_an_empty_layout() {
    let engine = loaded(Algorithm::default());
    block_on(engine.select(SelectionMode::Create, &[2])).unwrap();
    block_on(engine.select(SelectionMode::Clear, &[])).unwrap();
    let current = engine.current_layout().unwrap();
    assert_eq!(current.layout.num_nodes, 0);
    assert!(current.resolution.neighbors_by_hop.iter().all(Vec::is_empty));
}

#[test]
fn bundling_on_demand_decorates_the_current_layout() {
    let engine = loaded(Algorithm::EmbeddingProjection(ProjectionOptions {
        bundle_edges: false,
        ..Default::default()
    }));
    block_on(engine.select(SelectionMode::Create, &[4, 5])).unwrap();
    assert!(engine.current_layout().unwrap().layout.edge_bundles.is_none());

    assert_eq!(block_on(engine.bundle_current()).unwrap(), CommitOutcome::Applied);
    let current = engine.current_layout().unwrap();
    let bundles = current.layout.edge_bundles.as_ref().unwrap();
    assert_eq!(bundles.len(), current.layout.remaining_edges.len());
}

#[test]
fn bundling_toggle_applies_to_later_layouts() {
    let engine = loaded(Algorithm::default());
    engine.set_use_edge_bundling(false);
    block_on(engine.select(SelectionMode::Create, &[0])).unwrap();
    assert!(engine.current_layout().unwrap().layout.edge_bundles.is_none());
    engine.set_use_edge_bundling(true);
    block_on(engine.relayout()).unwrap();
    assert!(engine.current_layout().unwrap().layout.edge_bundles.is_some());
}

#[test]
fn initial_layout_covers_every_node() {
    let engine = loaded(Algorithm::default());
    assert_eq!(engine.initial_status(), SlotStatus::Idle);
    assert_eq!(block_on(engine.initial_layout()).unwrap(), CommitOutcome::Applied);
    let initial = engine.initial().unwrap();
    assert_eq!(initial.coordinates.len(), 11);
    assert!(initial.coordinates.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
}

#[test]
fn out_of_range_selection_is_rejected() {
    let engine = loaded(Algorithm::default());
    assert!(block_on(engine.select(SelectionMode::Create, &[42])).is_err());
    // The failed request leaves the previous layout in place.
    assert!(engine.current_layout().unwrap().groups.is_empty());
}

#[test]
fn select_groups_keeps_groups_disjoint() {
    let engine = loaded(Algorithm::SpaceFilling(SpiralOptions::default()));
    let outcome = block_on(engine.select_groups(&[vec![0, 1], vec![1, 6]])).unwrap();
    assert_eq!(outcome, CommitOutcome::Applied);
    assert_eq!(engine.selection().groups(), &[vec![0, 1], vec![6]]);
    assert_eq!(engine.resolve().unwrap().is_selected.len(), 3);
}
