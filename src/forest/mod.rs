//! LSH Forest index: a collection of independently randomized hash trees
//! over one shared point store.
//!
//! # Algorithm
//!
//! Every inserted point is hashed through each tree's own [`HashFamily`] and
//! filed under its signature, so each tree holds exactly one entry per point.
//! A query is hashed the same way; each tree walks outward from the query's
//! bucket until a candidate quota is met, the per-tree candidate sets are
//! merged and deduplicated, and the pool is re-ranked by exact distance.
//!
//! The accuracy/cost tradeoff is controlled entirely by two knobs:
//!
//! - `n_candidates` (per query): the per-tree candidate quota. Larger quotas
//!   widen each tree's bucket walk.
//! - `n_estimators` (per index): the number of trees. More trees enlarge the
//!   merged pool because each tree's randomization misses different
//!   neighbors.
//!
//! # Concurrency
//!
//! Single-writer/multi-reader, expressed through the borrow system: queries
//! take `&self` and may run in parallel against a built forest, insertion
//! takes `&mut self` and is exclusive. The index is `Send + Sync`.
//!
//! # Usage
//!
//! ```rust
//! use canopy::{LSHForestIndex, LSHForestParams};
//!
//! # fn main() -> Result<(), canopy::ForestError> {
//! let points = vec![
//!     vec![1.0, 0.0, 0.1],
//!     vec![0.0, 1.0, 0.2],
//!     vec![0.9, 0.1, 0.0],
//! ];
//! let mut index = LSHForestIndex::fit(points, LSHForestParams::default())?;
//!
//! let neighbors = index.kneighbors(&[1.0, 0.05, 0.1], 2, 10)?;
//! assert!(neighbors.len() <= 2);
//!
//! let id = index.insert(vec![1.0, 0.04, 0.1])?;
//! assert_eq!(id, 3);
//! # Ok(())
//! # }
//! ```
//!
//! # References
//!
//! - Bawa, Condie & Ganesan (2005): "LSH Forest: Self-Tuning Indexes for
//!   Similarity Search"

mod search;

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMetric;
use crate::error::{ForestError, Result};
use crate::hash::{HashFamily, HashTree};

/// LSH Forest parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LSHForestParams {
    /// Number of trees in the forest. Must be at least 1.
    pub n_estimators: usize,

    /// Bits per signature, in `1..=64`. Longer signatures split the space
    /// more finely (smaller exact buckets, more widening steps).
    pub signature_bits: usize,

    /// Seed for the whole forest. Per-tree hash families derive their own
    /// seeds from it, so re-fitting with the same seed reproduces the index.
    pub seed: u64,

    /// Metric used to rank pooled candidates.
    pub metric: DistanceMetric,
}

impl Default for LSHForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 10,
            signature_bits: 32,
            seed: 42,
            metric: DistanceMetric::Cosine,
        }
    }
}

impl LSHForestParams {
    fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(ForestError::InvalidParameter(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if self.signature_bits == 0 || self.signature_bits > 64 {
            return Err(ForestError::InvalidParameter(format!(
                "signature_bits must be in 1..=64, got {}",
                self.signature_bits
            )));
        }
        Ok(())
    }
}

/// Statistics about a built forest.
#[derive(Debug, Clone)]
pub struct ForestStats {
    pub num_points: usize,
    pub dimension: usize,
    pub n_estimators: usize,
    pub signature_bits: usize,
    /// Approximate memory footprint of points, projections and buckets.
    pub size_bytes: usize,
}

/// LSH Forest index for approximate k-nearest-neighbor search.
///
/// Owns the point collection and `n_estimators` hash trees. Invariant: every
/// inserted point has exactly one entry in every tree. Append-only; there is
/// no partial deletion, teardown drops the whole structure.
#[derive(Debug, Clone)]
pub struct LSHForestIndex {
    pub(crate) points: Vec<Vec<f32>>,
    pub(crate) dimension: usize,
    pub(crate) trees: Vec<HashTree>,
    pub(crate) params: LSHForestParams,
}

impl LSHForestIndex {
    /// Build a forest over an initial point set.
    ///
    /// Point ids are assigned by position: the i-th input vector gets id `i`.
    ///
    /// # Errors
    ///
    /// - [`ForestError::EmptyDataset`] if `points` is empty.
    /// - [`ForestError::DimensionMismatch`] if the vectors disagree in length.
    /// - [`ForestError::InvalidParameter`] for out-of-range params.
    pub fn fit(points: Vec<Vec<f32>>, params: LSHForestParams) -> Result<Self> {
        params.validate()?;

        let Some(first) = points.first() else {
            return Err(ForestError::EmptyDataset);
        };
        let dimension = first.len();
        if dimension == 0 {
            return Err(ForestError::InvalidParameter(
                "points must have at least one dimension".to_string(),
            ));
        }
        for p in &points {
            if p.len() != dimension {
                return Err(ForestError::DimensionMismatch {
                    expected: dimension,
                    actual: p.len(),
                });
            }
        }

        let trees = (0..params.n_estimators)
            .map(|i| {
                let family = HashFamily::generate(
                    dimension,
                    params.signature_bits,
                    tree_seed(params.seed, i),
                );
                HashTree::build(
                    points
                        .iter()
                        .enumerate()
                        .map(|(id, p)| (id as u32, p.as_slice())),
                    family,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            points,
            dimension,
            trees,
            params,
        })
    }

    /// Insert one point into every tree and return its assigned id.
    ///
    /// Keeps all trees in sync: the dimension check happens before any tree
    /// is touched, and tree-level hashing cannot fail after it.
    pub fn insert(&mut self, point: Vec<f32>) -> Result<u32> {
        if point.len() != self.dimension {
            return Err(ForestError::DimensionMismatch {
                expected: self.dimension,
                actual: point.len(),
            });
        }
        let id = self.points.len() as u32;
        for tree in &mut self.trees {
            tree.insert(id, &point)?;
        }
        self.points.push(point);
        Ok(id)
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the forest holds no points. A freshly fit forest never is.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fixed dimension of all indexed points.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The parameters the forest was built with.
    pub fn params(&self) -> &LSHForestParams {
        &self.params
    }

    /// The indexed vector for `id`, if it exists.
    pub fn point(&self, id: u32) -> Option<&[f32]> {
        self.points.get(id as usize).map(Vec::as_slice)
    }

    /// Index statistics.
    pub fn stats(&self) -> ForestStats {
        ForestStats {
            num_points: self.points.len(),
            dimension: self.dimension,
            n_estimators: self.trees.len(),
            signature_bits: self.params.signature_bits,
            size_bytes: self.points.len() * self.dimension * std::mem::size_of::<f32>()
                + self.trees.iter().map(HashTree::size_bytes).sum::<usize>(),
        }
    }
}

/// Seed for tree `i`, derived from the forest seed (SplitMix64 finalizer).
///
/// Adjacent forest seeds must not produce correlated projection streams, so
/// the tree index is spread by the golden-ratio constant before mixing.
fn tree_seed(seed: u64, i: usize) -> u64 {
    let mut z = seed ^ (i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
