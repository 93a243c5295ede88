use focal_layout::{CanvasScale, Error, LayoutSpec, compute_group_positions};

fn ids(range: std::ops::Range<usize>) -> Vec<usize> {
    range.collect()
}

#[test]
fn tier_widths_and_gaps_fill_the_canvas_width() {
    let spec = LayoutSpec::default();
    let groups = vec![ids(0..4), ids(4..10)];
    let by_hop = vec![ids(0..10), ids(10..40), ids(40..100)];
    let p = compute_group_positions(&groups, &by_hop, &spec, &CanvasScale::default()).unwrap();

    assert_eq!(p.regions.len(), 4);
    assert_eq!(p.num_nodes, 100);
    // The focal tier spans [0, hop1.x - gap]; hop tiers follow with one gap between each.
    let focal_tier = p.regions[2].bounds.x - spec.gap_between_hop;
    let hop_widths: f64 = p.regions[2..].iter().map(|r| r.bounds.width).sum();
    let total = focal_tier + hop_widths + 2.0 * spec.gap_between_hop;
    assert!((total - p.canvas_width).abs() < 1e-6);
    let last = &p.regions[3].bounds;
    assert!((last.x + last.width - p.canvas_width).abs() < 1e-6);
    for r in &p.regions[..2] {
        assert!(r.bounds.x >= 0.0 && r.bounds.x + r.bounds.width <= focal_tier + 1e-9);
    }
}

#[test]
fn focal_groups_fit_within_canvas_height() {
    let spec = LayoutSpec::default();
    let groups = vec![ids(0..3), ids(3..20), ids(20..25)];
    let by_hop = vec![ids(0..25), ids(25..60)];
    let p = compute_group_positions(&groups, &by_hop, &spec, &CanvasScale::default()).unwrap();

    let focal: Vec<_> = p.regions.iter().filter(|r| r.label.starts_with("foc-")).collect();
    assert_eq!(focal.len(), 3);
    let heights: f64 = focal.iter().map(|r| r.bounds.height).sum();
    assert!(heights <= p.canvas_height + 1e-9);
    for pair in focal.windows(2) {
        assert!(pair[0].bounds.y + pair[0].bounds.height <= pair[1].bounds.y + 1e-9);
    }
    let bottom = focal[2].bounds.y + focal[2].bounds.height;
    assert!(bottom <= p.canvas_height + 1e-9);
}

#[test]
fn single_group_is_vertically_centred() {
    let spec = LayoutSpec::default();
    let groups = vec![ids(0..5)];
    let by_hop = vec![ids(0..5), ids(5..50)];
    let p = compute_group_positions(&groups, &by_hop, &spec, &CanvasScale::default()).unwrap();

    let b = p.regions[0].bounds;
    assert!((b.y - (p.canvas_height - b.height) / 2.0).abs() < 1e-9);
    assert_eq!(p.regions[0].label, "foc-0");
    assert_eq!(p.regions[1].label, "hop-1");
    assert_eq!(p.regions[1].population_count, 45);
}

#[test]
fn more_than_five_hops_is_rejected() {
    let by_hop: Vec<Vec<usize>> = (0..7).map(|i| vec![i]).collect();
    let err = compute_group_positions(&[vec![0]], &by_hop, &LayoutSpec::default(), &CanvasScale::default())
        .unwrap_err();
    assert_eq!(err, Error::TooManyHops { hops: 6, max: 5 });
}

#[test]
fn canvas_grows_with_node_count() {
    let scale = CanvasScale::default();
    assert_eq!(scale.size(1), 350.0);
    assert_eq!(scale.size(10_000), 1000.0);
    assert!(scale.size(100) < scale.size(1000));
}

#[test]
fn spec_deserializes_with_defaults() {
    let spec: LayoutSpec = serde_json::from_str(r#"{"padding": 4}"#).unwrap();
    assert_eq!(spec.padding, 4.0);
    assert_eq!(spec.padding_top, 18.0);
}
