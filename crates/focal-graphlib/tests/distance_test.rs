use focal_graphlib::{
    DistanceError, DistanceMetric, NeighborMask, cosine_distance, euclidean_distance,
    hamming_distance, jaccard_distance, neighbor_distance,
};
use proptest::prelude::*;

fn mask(bits: &[usize]) -> NeighborMask {
    NeighborMask::from_bits(16, bits.iter().copied())
}

#[test]
fn jaccard_of_empty_sets_is_zero() {
    assert_eq!(jaccard_distance(&mask(&[]), &mask(&[])), 0.0);
}

#[test]
fn jaccard_and_hamming_on_known_sets() {
    let a = mask(&[0, 1, 2, 3]);
    let b = mask(&[2, 3, 4, 5]);
    assert!((jaccard_distance(&a, &b) - (1.0 - 2.0 / 6.0)).abs() < 1e-12);
    assert_eq!(hamming_distance(&a, &b), 4.0);
    assert_eq!(neighbor_distance(&a, &b, DistanceMetric::Hamming), 4.0);
}

#[test]
fn metric_parses_case_insensitively() {
    assert_eq!("Jaccard".parse::<DistanceMetric>(), Ok(DistanceMetric::Jaccard));
    assert_eq!("hamming".parse::<DistanceMetric>(), Ok(DistanceMetric::Hamming));
    assert!("cosine".parse::<DistanceMetric>().is_err());
    assert_eq!(DistanceMetric::default(), DistanceMetric::Jaccard);
}

#[test]
fn cosine_maps_similarity_onto_unit_interval() {
    assert!(cosine_distance(&[1.0, 0.0], &[2.0, 0.0]).unwrap().abs() < 1e-12);
    assert!((cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]).unwrap() - 1.0).abs() < 1e-12);
    assert!((cosine_distance(&[1.0, 0.0], &[0.0, 3.0]).unwrap() - 0.5).abs() < 1e-12);
}

#[test]
fn vector_helpers_reject_degenerate_input() {
    assert_eq!(
        cosine_distance(&[0.0, 0.0], &[1.0, 1.0]),
        Err(DistanceError::ZeroMagnitude)
    );
    assert_eq!(
        euclidean_distance(&[1.0], &[1.0, 2.0]),
        Err(DistanceError::LengthMismatch { left: 1, right: 2 })
    );
    assert_eq!(euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]), Ok(5.0));
}

proptest! {
    #[test]
    fn jaccard_stays_in_bounds(
        a in prop::collection::btree_set(0usize..100, 0..40),
        b in prop::collection::btree_set(0usize..100, 0..40),
    ) {
        let a = NeighborMask::from_bits(100, a);
        let b = NeighborMask::from_bits(100, b);
        let d = jaccard_distance(&a, &b);
        prop_assert!((0.0..=1.0).contains(&d));
        prop_assert_eq!(jaccard_distance(&a, &a), 0.0);
        prop_assert_eq!(d, jaccard_distance(&b, &a));
    }
}
