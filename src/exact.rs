//! Brute-force exact k-nearest-neighbor baseline.
//!
//! Used by accuracy drivers to produce the ground truth that approximate
//! results are scored against. The forest never calls this internally.

use crate::distance::Distance;

/// Compute the exact `k` nearest neighbors of `query` by scanning every
/// point.
///
/// Same ordering contract as the forest's search: ascending distance, ties
/// broken by insertion order, at most `k` pairs. Ids are input positions.
/// Vectors whose dimension disagrees with the query rank last under the
/// built-in metrics (distance `INFINITY`).
pub fn exact_knn<D>(points: &[Vec<f32>], query: &[f32], k: usize, oracle: &D) -> Vec<(u32, f32)>
where
    D: Distance + ?Sized,
{
    let mut distances: Vec<(u32, f32)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as u32, oracle.distance(query, p)))
        .collect();
    distances.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    distances.truncate(k);
    distances
}
