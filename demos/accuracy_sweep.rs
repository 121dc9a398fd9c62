//! Accuracy vs Hyperparameter Sweep
//!
//! Sweeps the forest's two tuning knobs and reports mean and standard
//! deviation of recall@10 across independently seeded trials, measured
//! against the brute-force baseline.
//!
//! ```bash
//! cargo run --example accuracy_sweep --release
//! ```

use canopy::{exact_knn, DistanceMetric, LSHForestIndex, LSHForestParams};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

const N_POINTS: usize = 2000;
const N_QUERIES: usize = 50;
const DIMENSION: usize = 32;
const N_CLUSTERS: usize = 10;
const K: usize = 10;
const TRIALS: u64 = 5;

fn main() {
    println!("LSH Forest Accuracy Sweep");
    println!("=========================\n");
    println!(
        "dataset: {} points x {} dims ({} clusters), {} queries, k={}, {} trials per setting\n",
        N_POINTS, DIMENSION, N_CLUSTERS, N_QUERIES, K, TRIALS
    );

    let database = clustered(N_POINTS, DIMENSION, N_CLUSTERS, 42);
    let queries = clustered(N_QUERIES, DIMENSION, N_CLUSTERS, 123);

    let ground_truths: Vec<Vec<u32>> = queries
        .iter()
        .map(|q| {
            exact_knn(&database, q, K, &DistanceMetric::Cosine)
                .into_iter()
                .map(|(id, _)| id)
                .collect()
        })
        .collect();

    sweep_n_candidates(&database, &queries, &ground_truths);
    sweep_n_estimators(&database, &queries, &ground_truths);

    println!("Both knobs only ever enlarge the candidate pool, so mean recall");
    println!("rises monotonically with either; the price is more exact distance");
    println!("computations per query.");
}

/// Accuracy as the per-tree candidate quota grows (forest size fixed).
fn sweep_n_candidates(database: &[Vec<f32>], queries: &[Vec<f32>], truth: &[Vec<u32>]) {
    println!("1. recall@{} vs n_candidates (n_estimators = 10)", K);
    println!("   ---------------------------------------------");
    println!("   n_candidates | mean recall | std dev");
    println!("   -------------|-------------|--------");

    for n_candidates in [1, 5, 10, 20, 50, 100] {
        let recalls: Vec<f32> = (0..TRIALS)
            .map(|trial| {
                let index = fit(database, 10, trial);
                mean_recall(&index, queries, truth, n_candidates)
            })
            .collect();
        let (mean, std) = mean_std(&recalls);
        println!("   {:>12} | {:>11.3} | {:>6.3}", n_candidates, mean, std);
    }
    println!();
}

/// Accuracy as the forest grows (candidate quota fixed).
fn sweep_n_estimators(database: &[Vec<f32>], queries: &[Vec<f32>], truth: &[Vec<u32>]) {
    println!("2. recall@{} vs n_estimators (n_candidates = 10)", K);
    println!("   ---------------------------------------------");
    println!("   n_estimators | mean recall | std dev");
    println!("   -------------|-------------|--------");

    for n_estimators in [1, 2, 5, 10, 20] {
        let recalls: Vec<f32> = (0..TRIALS)
            .map(|trial| {
                let index = fit(database, n_estimators, trial);
                mean_recall(&index, queries, truth, 10)
            })
            .collect();
        let (mean, std) = mean_std(&recalls);
        println!("   {:>12} | {:>11.3} | {:>6.3}", n_estimators, mean, std);
    }
    println!();
}

fn fit(database: &[Vec<f32>], n_estimators: usize, trial: u64) -> LSHForestIndex {
    LSHForestIndex::fit(
        database.to_vec(),
        LSHForestParams {
            n_estimators,
            signature_bits: 32,
            seed: 1000 + trial,
            metric: DistanceMetric::Cosine,
        },
    )
    .expect("fit sweep forest")
}

fn mean_recall(
    index: &LSHForestIndex,
    queries: &[Vec<f32>],
    truth: &[Vec<u32>],
    n_candidates: usize,
) -> f32 {
    let mut total = 0.0;
    for (query, gt) in queries.iter().zip(truth) {
        let results = index.kneighbors(query, K, n_candidates).expect("query");
        let gt_set: HashSet<u32> = gt.iter().copied().collect();
        let found = results.iter().filter(|(id, _)| gt_set.contains(id)).count();
        total += found as f32 / K as f32;
    }
    total / queries.len() as f32
}

fn mean_std(values: &[f32]) -> (f32, f32) {
    let mean = values.iter().sum::<f32>() / values.len() as f32;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / values.len() as f32;
    (mean, var.sqrt())
}

fn clustered(n: usize, dim: usize, n_clusters: usize, seed: u64) -> Vec<Vec<f32>> {
    let cluster_std = 0.08;
    let mut rng = StdRng::seed_from_u64(seed);
    let centers: Vec<Vec<f32>> = (0..n_clusters)
        .map(|_| (0..dim).map(|_| rng.random::<f32>()).collect())
        .collect();
    (0..n)
        .map(|_| {
            let center = &centers[rng.random_range(0..n_clusters)];
            center
                .iter()
                .map(|&c| {
                    let u1: f32 = rng.random();
                    let u2: f32 = rng.random();
                    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
                    (c + z * cluster_std).clamp(0.0, 1.0)
                })
                .collect()
        })
        .collect()
}
