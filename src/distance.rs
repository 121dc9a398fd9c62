//! Distance metrics for dense vectors.
//!
//! The forest hashes with random hyperplanes (an angular scheme) but ranks
//! pooled candidates by *exact* distance, so the metric used for ranking is
//! pluggable: anything implementing [`Distance`] works, with
//! [`DistanceMetric::Cosine`] as the default.
//!
//! ## Important nuance
//!
//! [`cosine_distance`] is defined as $1 - \cos(a,b)$ and computes norms when
//! needed; no normalization is performed internally. Callers that require a
//! proper metric (e.g. to compare against an L2 ground truth) must
//! pre-normalize their vectors with [`normalize`].

use serde::{Deserialize, Serialize};

/// Pluggable exact-distance oracle used to rank candidates.
///
/// Implemented by [`DistanceMetric`] and by any `Fn(&[f32], &[f32]) -> f32`
/// closure, so a custom metric can be passed without wrapper types:
///
/// ```rust
/// use canopy::Distance;
///
/// let manhattan = |a: &[f32], b: &[f32]| -> f32 {
///     a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
/// };
/// assert_eq!(manhattan.distance(&[0.0, 0.0], &[1.0, 2.0]), 3.0);
/// ```
///
/// Ranking is only meaningful when the oracle is a proper (or quasi-) metric.
pub trait Distance {
    /// Compute the distance between two vectors.
    fn distance(&self, a: &[f32], b: &[f32]) -> f32;
}

/// Distance metric for dense vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Euclidean (L2) distance.
    L2,
    /// Cosine distance $1 - \cos(a,b)$.
    Cosine,
    /// Angular distance $\arccos(\cos(a,b)) / \pi$, in `[0,1]`.
    Angular,
    /// Inner product distance $-\langle a,b\rangle$ (for maximum inner product search).
    InnerProduct,
}

impl DistanceMetric {
    /// Compute distance between two vectors.
    ///
    /// If dimensions mismatch, this returns `f32::INFINITY` (so it is never
    /// selected as a nearest neighbor).
    #[inline]
    #[must_use]
    pub fn distance(self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            DistanceMetric::L2 => l2_distance(a, b),
            DistanceMetric::Cosine => cosine_distance(a, b),
            DistanceMetric::Angular => angular_distance(a, b),
            DistanceMetric::InnerProduct => inner_product_distance(a, b),
        }
    }
}

impl Distance for DistanceMetric {
    #[inline]
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        (*self).distance(a, b)
    }
}

impl<F> Distance for F
where
    F: Fn(&[f32], &[f32]) -> f32,
{
    #[inline]
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        self(a, b)
    }
}

/// L2 (Euclidean) distance.
#[inline]
#[must_use]
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f32>()
        .sqrt()
}

/// Cosine distance $1 - \cos(a,b)$.
///
/// This computes cosine similarity (including norms), so it does **not**
/// require pre-normalized vectors. Zero vectors are at maximum distance.
#[inline]
#[must_use]
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a < 1e-10 || norm_b < 1e-10 {
        return 1.0;
    }
    1.0 - (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Angular distance $\arccos(\cos(a,b)) / \pi$, in `[0,1]`.
#[inline]
#[must_use]
pub fn angular_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a < 1e-10 || norm_b < 1e-10 {
        return 1.0;
    }
    let cos_sim = (dot / (norm_a * norm_b)).clamp(-1.0, 1.0);
    cos_sim.acos() / std::f32::consts::PI
}

/// Inner product distance (negative dot product).
#[inline]
#[must_use]
pub fn inner_product_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }
    -a.iter().zip(b.iter()).map(|(x, y)| x * y).sum::<f32>()
}

/// Normalize a vector to unit L2 norm.
#[inline]
#[must_use]
pub fn normalize(v: &[f32]) -> Vec<f32> {
    let n: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if n < 1e-10 {
        return vec![0.0; v.len()];
    }
    v.iter().map(|x| x / n).collect()
}
