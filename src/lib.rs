//! canopy: LSH Forest approximate nearest neighbor search.
//!
//! An in-memory forest of locality-sensitive hash trees for approximate
//! k-nearest-neighbor queries over dense `f32` vectors.
//!
//! # How it works
//!
//! Each tree hashes every point through its own family of random hyperplanes
//! into a sortable bit signature; nearby points collide into the same or
//! adjacent buckets with high probability. A query walks each tree outward
//! from its own bucket until a candidate quota is met, the per-tree
//! candidates are merged and deduplicated, and the pool is re-ranked by
//! exact distance. Restricting exact-distance work to the pool is what makes
//! the search sublinear.
//!
//! Two knobs trade accuracy for cost:
//!
//! - `n_candidates`: per-tree candidate quota at query time
//! - `n_estimators`: number of trees in the forest
//!
//! Both only ever enlarge the candidate pool, so recall improves
//! monotonically with either (at the price of more exact distance
//! computations).
//!
//! # Usage
//!
//! ```rust
//! use canopy::{exact_knn, DistanceMetric, LSHForestIndex, LSHForestParams};
//!
//! # fn main() -> Result<(), canopy::ForestError> {
//! let points: Vec<Vec<f32>> = (0..100)
//!     .map(|i| {
//!         let a = i as f32 * 0.13;
//!         vec![a.cos(), a.sin(), (a * 2.0).cos(), (a * 2.0).sin()]
//!     })
//!     .collect();
//!
//! let index = LSHForestIndex::fit(points.clone(), LSHForestParams::default())?;
//! let query = [1.0, 0.1, 0.9, 0.2];
//!
//! let approx = index.kneighbors(&query, 5, 20)?;
//! let truth = exact_knn(&points, &query, 5, &DistanceMetric::Cosine);
//!
//! assert!(approx.len() <= 5);
//! assert!(!truth.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! # References
//!
//! - Bawa, Condie & Ganesan (2005): "LSH Forest: Self-Tuning Indexes for
//!   Similarity Search"
//! - Charikar (2002): "Similarity estimation techniques from rounding
//!   algorithms"
//! - Indyk & Motwani (1998): "Approximate nearest neighbors: towards removing
//!   the curse of dimensionality"

pub mod distance;
pub mod error;
pub mod exact;
pub mod forest;
pub mod hash;

pub use distance::{Distance, DistanceMetric};
pub use error::{ForestError, Result};
pub use exact::exact_knn;
pub use forest::{ForestStats, LSHForestIndex, LSHForestParams};
pub use hash::{HashFamily, HashTree, Signature};
