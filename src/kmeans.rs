use log::{debug, warn};
use rand::Rng;
use rand::seq::index;
use serde::Serialize;

use crate::features::FeatureMatrix;

pub const MAX_ITERATIONS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KMeansResult {
    /// 1-based cluster label per row, in row order.
    pub labels: Vec<u32>,
    pub centroids: Vec<Vec<f64>>,
    pub iterations: usize,
    /// Cluster count actually used after clamping into `[1, rows]`.
    pub k: usize,
}

impl KMeansResult {
    pub fn empty() -> Self {
        Self {
            labels: Vec::new(),
            centroids: Vec::new(),
            iterations: 0,
            k: 0,
        }
    }

    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.k];
        for label in &self.labels {
            if let Some(slot) = sizes.get_mut((*label as usize).saturating_sub(1)) {
                *slot += 1;
            }
        }
        sizes
    }
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Lloyd's k-means with centroids seeded from distinct random rows.
///
/// Results depend on `rng`; pass a seeded generator for reproducible labels.
/// Only a local optimum is reached. A zero-column matrix puts every row in
/// cluster 1, since all distances tie and the lowest centroid index wins.
pub fn kmeans<R: Rng + ?Sized>(matrix: &FeatureMatrix, k: usize, rng: &mut R) -> KMeansResult {
    let n = matrix.n_rows();
    if n == 0 {
        return KMeansResult::empty();
    }
    let k = if k == 0 || k > n {
        let clamped = k.clamp(1, n);
        warn!("cluster count {k} outside [1, {n}], using {clamped}");
        clamped
    } else {
        k
    };
    let m = matrix.n_cols();
    let rows = &matrix.rows;

    let mut centroids: Vec<Vec<f64>> = index::sample(rng, n, k)
        .into_iter()
        .map(|i| rows[i].clone())
        .collect();

    let mut labels = vec![0usize; n];
    let mut changed = true;
    let mut iterations = 0usize;

    while changed && iterations < MAX_ITERATIONS {
        changed = false;

        for (i, row) in rows.iter().enumerate() {
            let mut best = 0usize;
            let mut best_dist = f64::INFINITY;
            for (c, centroid) in centroids.iter().enumerate() {
                let dist = euclidean_distance(row, centroid);
                if dist < best_dist {
                    best_dist = dist;
                    best = c;
                }
            }
            if labels[i] != best {
                labels[i] = best;
                changed = true;
            }
        }

        let mut sums = vec![vec![0.0; m]; k];
        let mut counts = vec![0usize; k];
        for (row, &c) in rows.iter().zip(&labels) {
            counts[c] += 1;
            for (acc, v) in sums[c].iter_mut().zip(row) {
                *acc += v;
            }
        }
        for ((centroid, sum), count) in centroids.iter_mut().zip(sums).zip(&counts) {
            if *count > 0 {
                let count = *count as f64;
                for (dst, s) in centroid.iter_mut().zip(sum) {
                    *dst = s / count;
                }
            }
        }

        iterations += 1;
    }

    debug!("k-means converged after {iterations} iterations (k={k}, n={n}, m={m})");

    KMeansResult {
        labels: labels.into_iter().map(|l| l as u32 + 1).collect(),
        centroids,
        iterations,
        k,
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::features::Feature;

    fn matrix(rows: Vec<Vec<f64>>) -> FeatureMatrix {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        FeatureMatrix {
            features: vec![Feature::TotalGoals; cols],
            rows,
        }
    }

    #[test]
    fn empty_matrix_yields_no_labels() {
        let mut rng = StdRng::seed_from_u64(1);
        let out = kmeans(&FeatureMatrix::default(), 3, &mut rng);
        assert!(out.labels.is_empty());
        assert_eq!(out.k, 0);
    }

    #[test]
    fn single_cluster_labels_everything_one() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = matrix(vec![vec![0.0, 1.0], vec![5.0, 5.0], vec![-3.0, 2.0]]);
        let out = kmeans(&m, 1, &mut rng);
        assert_eq!(out.labels, vec![1, 1, 1]);
        assert_eq!(out.cluster_sizes(), vec![3]);
    }

    #[test]
    fn separated_groups_split_cleanly() {
        let m = matrix(vec![
            vec![0.0, 0.0],
            vec![0.2, 0.1],
            vec![10.0, 10.0],
            vec![10.1, 9.8],
            vec![0.1, 0.3],
            vec![9.9, 10.2],
        ]);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let out = kmeans(&m, 2, &mut rng);
            assert_eq!(out.labels[0], out.labels[1]);
            assert_eq!(out.labels[0], out.labels[4]);
            assert_eq!(out.labels[2], out.labels[3]);
            assert_eq!(out.labels[2], out.labels[5]);
            assert_ne!(out.labels[0], out.labels[2]);
        }
    }

    #[test]
    fn same_seed_same_labels() {
        let m = matrix(
            (0..40)
                .map(|i| vec![(i % 7) as f64, (i * 3 % 11) as f64])
                .collect(),
        );
        let a = kmeans(&m, 3, &mut StdRng::seed_from_u64(42));
        let b = kmeans(&m, 3, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
        assert!(a.labels.iter().all(|l| (1..=3).contains(l)));
    }

    #[test]
    fn zero_columns_collapse_to_cluster_one() {
        let m = FeatureMatrix {
            features: Vec::new(),
            rows: vec![Vec::new(); 4],
        };
        let out = kmeans(&m, 3, &mut StdRng::seed_from_u64(3));
        assert_eq!(out.labels, vec![1, 1, 1, 1]);
    }

    #[test]
    fn oversized_k_is_clamped() {
        let m = matrix(vec![vec![1.0], vec![2.0]]);
        let out = kmeans(&m, 5, &mut StdRng::seed_from_u64(9));
        assert_eq!(out.k, 2);
        assert_eq!(out.labels.len(), 2);
        assert_ne!(out.labels[0], out.labels[1]);
    }
}
