//! Query engine: per-tree candidate pooling and exact re-ranking.

use std::collections::HashSet;

use crate::distance::Distance;
use crate::error::{ForestError, Result};
use crate::forest::LSHForestIndex;

impl LSHForestIndex {
    /// Approximate k-nearest-neighbor search with the forest's configured
    /// metric.
    ///
    /// `n_candidates` is the per-tree candidate quota, not a global cap: each
    /// tree contributes at least that many points (when it has them), and the
    /// merged pool grows with the number of trees. Only pooled candidates are
    /// ranked by exact distance, which is what keeps the search sublinear.
    ///
    /// Returns at most `k` `(id, distance)` pairs, ascending by distance,
    /// ties broken by insertion order. An empty result is a valid outcome for
    /// a too-sparse index, not an error.
    pub fn kneighbors(
        &self,
        query: &[f32],
        k: usize,
        n_candidates: usize,
    ) -> Result<Vec<(u32, f32)>> {
        self.kneighbors_with(query, k, n_candidates, &self.params.metric)
    }

    /// Approximate k-nearest-neighbor search ranked by a caller-supplied
    /// distance oracle.
    ///
    /// The oracle only affects ranking; bucket placement always follows the
    /// trees' hyperplane signatures, so an oracle far from angular distance
    /// degrades recall but never correctness of the contract.
    pub fn kneighbors_with<D>(
        &self,
        query: &[f32],
        k: usize,
        n_candidates: usize,
        oracle: &D,
    ) -> Result<Vec<(u32, f32)>>
    where
        D: Distance + ?Sized,
    {
        if query.len() != self.dimension {
            return Err(ForestError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut pool: HashSet<u32> = HashSet::new();
        for tree in &self.trees {
            let signature = tree.family().hash(query)?;
            tree.candidates(signature, n_candidates, &mut pool);
        }
        if pool.is_empty() {
            return Ok(Vec::new());
        }

        let mut ranked: Vec<(u32, f32)> = pool
            .into_iter()
            .map(|id| (id, oracle.distance(query, &self.points[id as usize])))
            .collect();
        // Ascending by distance; equal (or NaN, from a misbehaving oracle)
        // distances fall back to insertion order so the pool's hash-set
        // iteration order never leaks into the result.
        ranked.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(k);
        Ok(ranked)
    }
}
