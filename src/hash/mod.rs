//! Hashing layer: random hyperplane families and per-tree signature storage.
//!
//! The core LSH idea: design hash functions where similar items collide more
//! often than dissimilar ones. Here the hash is a battery of random
//! hyperplane sign tests, so two vectors' signatures agree bit-for-bit with
//! probability governed by the angle between them. A [`HashTree`] keeps
//! signatures sorted, which turns "Hamming-nearby signatures" into "adjacent
//! key ranges" and makes candidate retrieval a bucket walk instead of a scan.
//!
//! ## References
//!
//! - Charikar (2002): "Similarity estimation techniques from rounding
//!   algorithms"
//! - Bawa, Condie & Ganesan (2005): "LSH Forest: Self-Tuning Indexes for
//!   Similarity Search"

mod family;
mod tree;

pub use family::{HashFamily, Signature};
pub use tree::HashTree;
