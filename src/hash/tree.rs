//! A single hash tree: ordered (signature, point-id) storage with
//! prefix-widening candidate retrieval.

use std::collections::BTreeMap;
use std::collections::HashSet;

use smallvec::SmallVec;

use crate::error::Result;
use crate::hash::family::{HashFamily, Signature};

/// One tree of the forest.
///
/// Stores point ids in an ordered map keyed by packed signature. Points with
/// equal signatures share a bucket; ids within a bucket keep insertion order.
/// Because signatures sort lexicographically by bit prefix, "all points
/// sharing my first p bits" is a contiguous key range, and candidate
/// retrieval is a walk outward from the exact bucket by shortening p.
#[derive(Debug, Clone)]
pub struct HashTree {
    family: HashFamily,
    buckets: BTreeMap<u64, SmallVec<[u32; 4]>>,
    len: usize,
}

impl HashTree {
    /// Build a tree from an initial point set.
    pub fn build<'a, I>(points: I, family: HashFamily) -> Result<Self>
    where
        I: IntoIterator<Item = (u32, &'a [f32])>,
    {
        let mut tree = Self {
            family,
            buckets: BTreeMap::new(),
            len: 0,
        };
        for (id, vector) in points {
            tree.insert(id, vector)?;
        }
        Ok(tree)
    }

    /// Insert one point. O(log n) bucket lookup.
    pub fn insert(&mut self, id: u32, vector: &[f32]) -> Result<()> {
        let signature = self.family.hash(vector)?;
        self.buckets.entry(signature.value()).or_default().push(id);
        self.len += 1;
        Ok(())
    }

    /// Collect candidate ids for `signature` into `out`.
    ///
    /// Starts at the exact-match bucket and widens the matched prefix one bit
    /// at a time until the range holds at least `min_count` entries or spans
    /// the whole tree. The entire range at the stopping width is admitted
    /// (enumerated in ascending signature order, insertion order within a
    /// bucket), so collection is deterministic; boundary ties are resolved
    /// downstream by exact-distance ranking.
    ///
    /// An empty tree contributes nothing and is not an error.
    pub fn candidates(&self, signature: Signature, min_count: usize, out: &mut HashSet<u32>) {
        if self.buckets.is_empty() {
            return;
        }
        for prefix_len in (0..=signature.bits()).rev() {
            let (lo, hi) = signature.prefix_range(prefix_len);
            let in_range: usize = self
                .buckets
                .range(lo..=hi)
                .map(|(_, ids)| ids.len())
                .sum();
            if in_range >= min_count || prefix_len == 0 {
                for (_, ids) in self.buckets.range(lo..=hi) {
                    out.extend(ids.iter().copied());
                }
                return;
            }
        }
    }

    /// The tree's hash family.
    pub fn family(&self) -> &HashFamily {
        &self.family
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no points.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn size_bytes(&self) -> usize {
        self.family.size_bytes()
            + self.buckets.len() * std::mem::size_of::<u64>()
            + self.len * std::mem::size_of::<u32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(points: &[Vec<f32>], bits: usize, seed: u64) -> HashTree {
        let family = HashFamily::generate(points[0].len(), bits, seed);
        HashTree::build(
            points
                .iter()
                .enumerate()
                .map(|(id, p)| (id as u32, p.as_slice())),
            family,
        )
        .unwrap()
    }

    #[test]
    fn empty_tree_yields_no_candidates() {
        let family = HashFamily::generate(3, 16, 0);
        let tree = HashTree::build(std::iter::empty::<(u32, &[f32])>(), family).unwrap();
        let sig = tree.family().hash(&[1.0, 0.0, 0.0]).unwrap();

        let mut out = HashSet::new();
        tree.candidates(sig, 10, &mut out);
        assert!(out.is_empty());
        assert!(tree.is_empty());
    }

    #[test]
    fn widening_reaches_the_whole_tree() {
        let points: Vec<Vec<f32>> = (0..20)
            .map(|i| vec![(i as f32).sin(), (i as f32).cos(), (i as f32 * 0.5).sin()])
            .collect();
        let tree = tree_with(&points, 16, 3);
        let sig = tree.family().hash(&[0.2, -0.7, 0.4]).unwrap();

        // Asking for more than the tree holds degrades to a full scan.
        let mut out = HashSet::new();
        tree.candidates(sig, 1000, &mut out);
        assert_eq!(out.len(), 20);
    }

    #[test]
    fn exact_bucket_contains_the_hashed_point() {
        let points: Vec<Vec<f32>> = (0..8).map(|i| vec![i as f32 + 1.0, -(i as f32)]).collect();
        let tree = tree_with(&points, 8, 9);

        // min_count 1: the point's own bucket always satisfies the quota.
        let sig = tree.family().hash(&points[3]).unwrap();
        let mut out = HashSet::new();
        tree.candidates(sig, 1, &mut out);
        assert!(out.contains(&3));
    }

    #[test]
    fn larger_quota_collects_a_superset() {
        let points: Vec<Vec<f32>> = (0..50)
            .map(|i| {
                vec![
                    (i as f32 * 0.37).sin(),
                    (i as f32 * 0.61).cos(),
                    (i as f32 * 0.13).sin(),
                    (i as f32 * 0.89).cos(),
                ]
            })
            .collect();
        let tree = tree_with(&points, 24, 21);
        let sig = tree.family().hash(&[0.1, 0.2, -0.3, 0.4]).unwrap();

        let mut small = HashSet::new();
        tree.candidates(sig, 3, &mut small);
        let mut large = HashSet::new();
        tree.candidates(sig, 20, &mut large);

        assert!(small.len() >= 3.min(tree.len()));
        assert!(large.len() >= small.len());
        assert!(small.is_subset(&large));
    }

    #[test]
    fn insert_keeps_counts() {
        let points: Vec<Vec<f32>> = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let mut tree = tree_with(&points, 8, 5);
        assert_eq!(tree.len(), 2);

        tree.insert(2, &[0.5, 0.5]).unwrap();
        assert_eq!(tree.len(), 3);

        let sig = tree.family().hash(&[0.5, 0.5]).unwrap();
        let mut out = HashSet::new();
        tree.candidates(sig, 3, &mut out);
        assert!(out.contains(&2));
    }
}
