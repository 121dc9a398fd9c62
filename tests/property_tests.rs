//! Property-based tests for canopy invariants.
//!
//! These verify contracts that should hold regardless of input:
//! - query results are bounded by k and sorted by non-decreasing distance
//! - fit + query is deterministic for a fixed seed
//! - a full candidate quota degenerates to brute force
//! - hashing is deterministic and dimension-checked

use canopy::{exact_knn, DistanceMetric, HashFamily, LSHForestIndex, LSHForestParams};
use proptest::prelude::*;

prop_compose! {
    fn arb_vector(dim: usize)(vec in prop::collection::vec(-10.0f32..10.0, dim)) -> Vec<f32> {
        vec
    }
}

prop_compose! {
    fn arb_points(dim: usize)(points in prop::collection::vec(arb_vector(dim), 1..40)) -> Vec<Vec<f32>> {
        points
    }
}

fn forest(points: Vec<Vec<f32>>, n_estimators: usize) -> LSHForestIndex {
    LSHForestIndex::fit(
        points,
        LSHForestParams {
            n_estimators,
            signature_bits: 16,
            seed: 5,
            metric: DistanceMetric::Cosine,
        },
    )
    .expect("non-empty fixed-dimension input")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn results_bounded_sorted_and_unique(
        points in arb_points(8),
        query in arb_vector(8),
        k in 1..8usize,
        n_candidates in 0..30usize,
    ) {
        let n = points.len();
        let index = forest(points, 3);
        let results = index.kneighbors(&query, k, n_candidates).unwrap();

        prop_assert!(results.len() <= k);
        for w in results.windows(2) {
            prop_assert!(w[0].1 <= w[1].1, "distances not sorted: {:?}", results);
        }
        let mut ids: Vec<u32> = results.iter().map(|(id, _)| *id).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), results.len(), "duplicate ids in result");
        prop_assert!(results.iter().all(|(id, _)| (*id as usize) < n));
    }

    #[test]
    fn fit_and_query_are_deterministic(
        points in arb_points(6),
        query in arb_vector(6),
    ) {
        let a = forest(points.clone(), 4);
        let b = forest(points, 4);
        prop_assert_eq!(
            a.kneighbors(&query, 5, 10).unwrap(),
            b.kneighbors(&query, 5, 10).unwrap()
        );
    }

    #[test]
    fn full_quota_degenerates_to_brute_force(
        points in arb_points(6),
        query in arb_vector(6),
        k in 1..6usize,
    ) {
        let index = forest(points.clone(), 2);
        let approx = index.kneighbors(&query, k, points.len()).unwrap();
        let truth = exact_knn(&points, &query, k, &DistanceMetric::Cosine);
        prop_assert_eq!(approx, truth);
    }

    #[test]
    fn exact_knn_top1_is_the_argmin(
        points in arb_points(5),
        query in arb_vector(5),
    ) {
        let truth = exact_knn(&points, &query, 1, &DistanceMetric::L2);
        let by_scan = points
            .iter()
            .enumerate()
            .map(|(i, p)| (i as u32, DistanceMetric::L2.distance(&query, p)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap().then(a.0.cmp(&b.0)))
            .unwrap();
        prop_assert_eq!(truth[0].0, by_scan.0);
    }

    #[test]
    fn hashing_is_deterministic_per_seed(
        v in arb_vector(12),
        seed in any::<u64>(),
    ) {
        let a = HashFamily::generate(12, 24, seed);
        let b = HashFamily::generate(12, 24, seed);
        let sa = a.hash(&v).unwrap();
        let sb = b.hash(&v).unwrap();
        prop_assert_eq!(sa, sb);
        prop_assert_eq!(sa.bits(), 24);
        prop_assert!(sa.value() < (1u64 << 24));
    }

    #[test]
    fn wrong_dimension_never_hashes(
        v in arb_vector(7),
        seed in any::<u64>(),
    ) {
        let family = HashFamily::generate(9, 16, seed);
        prop_assert!(family.hash(&v).is_err());
    }
}
