//! Random hyperplane hash families.
//!
//! Each tree of the forest owns one family of `signature_bits` random
//! hyperplanes sampled from a standard Gaussian. A vector hashes to one bit
//! per hyperplane: 1 if the dot product with the hyperplane normal is
//! positive, else 0. For two vectors at angle θ, each bit agrees with
//! probability 1 - θ/π (Charikar 2002), so Hamming-close signatures imply
//! angular-close vectors.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::error::{ForestError, Result};

/// A packed bit signature.
///
/// Projection 0 occupies the most significant of the `nbits` used bits, so
/// ordering signatures by their packed value orders them lexicographically
/// by bit prefix. That is what lets a sorted tree answer "everything sharing
/// my first p bits" with a single range scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    value: u64,
    nbits: usize,
}

impl Signature {
    pub(crate) fn new(value: u64, nbits: usize) -> Self {
        debug_assert!(nbits >= 1 && nbits <= 64);
        Self { value, nbits }
    }

    /// The packed signature value. Only the low `bits()` bits are used.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Number of bits in the signature.
    pub fn bits(&self) -> usize {
        self.nbits
    }

    /// Number of bit positions that differ.
    pub fn hamming_distance(&self, other: &Signature) -> usize {
        (self.value ^ other.value).count_ones() as usize
    }

    /// Inclusive range of packed values sharing this signature's first
    /// `prefix_len` bits. `prefix_len == bits()` is the exact bucket,
    /// `prefix_len == 0` spans every signature.
    pub(crate) fn prefix_range(&self, prefix_len: usize) -> (u64, u64) {
        debug_assert!(prefix_len <= self.nbits);
        let suffix = self.nbits - prefix_len;
        let mask = if suffix >= 64 {
            u64::MAX
        } else {
            (1u64 << suffix) - 1
        };
        (self.value & !mask, self.value | mask)
    }
}

/// A fixed set of random hyperplane projections.
///
/// Deterministic for a given seed: re-generating with the same
/// `(dimension, signature_bits, seed)` yields identical projections, which is
/// what makes repeated fits of the forest reproducible.
#[derive(Debug, Clone)]
pub struct HashFamily {
    /// `signature_bits` rows of `dimension` Gaussian components.
    projections: Vec<Vec<f32>>,
    dimension: usize,
}

impl HashFamily {
    /// Generate `signature_bits` independent projection vectors of size
    /// `dimension` from the given seed.
    pub fn generate(dimension: usize, signature_bits: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let projections = (0..signature_bits)
            .map(|_| {
                (0..dimension)
                    .map(|_| rng.sample::<f32, _>(StandardNormal))
                    .collect()
            })
            .collect();
        Self {
            projections,
            dimension,
        }
    }

    /// Hash a vector into a bit signature.
    ///
    /// Bit i is 1 iff the dot product with projection i exceeds 0.
    pub fn hash(&self, v: &[f32]) -> Result<Signature> {
        if v.len() != self.dimension {
            return Err(ForestError::DimensionMismatch {
                expected: self.dimension,
                actual: v.len(),
            });
        }
        let nbits = self.projections.len();
        let mut value = 0u64;
        for (i, proj) in self.projections.iter().enumerate() {
            let dot: f32 = proj.iter().zip(v.iter()).map(|(p, x)| p * x).sum();
            if dot > 0.0 {
                value |= 1u64 << (nbits - 1 - i);
            }
        }
        Ok(Signature::new(value, nbits))
    }

    /// Input dimension the family was generated for.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of bits in produced signatures.
    pub fn signature_bits(&self) -> usize {
        self.projections.len()
    }

    pub(crate) fn size_bytes(&self) -> usize {
        self.projections.len() * self.dimension * std::mem::size_of::<f32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_signatures() {
        let a = HashFamily::generate(16, 32, 7);
        let b = HashFamily::generate(16, 32, 7);
        let v: Vec<f32> = (0..16).map(|i| (i as f32 * 0.3).sin()).collect();
        assert_eq!(a.hash(&v).unwrap(), b.hash(&v).unwrap());
    }

    #[test]
    fn different_seeds_differ() {
        let a = HashFamily::generate(32, 32, 1);
        let b = HashFamily::generate(32, 32, 2);
        let v: Vec<f32> = (0..32).map(|i| (i as f32 * 0.3).cos()).collect();
        // 32 independent fair bits agreeing across seeds is a ~2^-32 event.
        assert_ne!(a.hash(&v).unwrap(), b.hash(&v).unwrap());
    }

    #[test]
    fn dimension_mismatch_is_an_error() {
        let family = HashFamily::generate(4, 16, 0);
        let err = family.hash(&[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            ForestError::DimensionMismatch {
                expected: 4,
                actual: 2
            }
        );
    }

    #[test]
    fn nearby_vectors_have_small_hamming_distance() {
        let family = HashFamily::generate(24, 64, 11);
        let v: Vec<f32> = (0..24).map(|i| (i as f32 * 0.7).sin()).collect();
        let mut w = v.clone();
        w[0] += 1e-3;
        let far: Vec<f32> = v.iter().map(|x| -x).collect();

        let sv = family.hash(&v).unwrap();
        let sw = family.hash(&w).unwrap();
        let sf = family.hash(&far).unwrap();

        assert!(sv.hamming_distance(&sw) < sv.hamming_distance(&sf));
        // Antipodal vectors flip every bit.
        assert_eq!(sv.hamming_distance(&sf), 64);
    }

    #[test]
    fn prefix_range_bounds() {
        let sig = Signature::new(0b1011, 4);
        assert_eq!(sig.prefix_range(4), (0b1011, 0b1011));
        assert_eq!(sig.prefix_range(2), (0b1000, 0b1011));
        assert_eq!(sig.prefix_range(0), (0, 0b1111));

        let wide = Signature::new(u64::MAX, 64);
        assert_eq!(wide.prefix_range(0), (0, u64::MAX));
        assert_eq!(wide.prefix_range(64), (u64::MAX, u64::MAX));
    }
}
