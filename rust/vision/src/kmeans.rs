// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Seeded k-means clustering over color features
//!
//! Initialisation is k-means++ drawn from a `StdRng` seeded per call, so two
//! runs with the same seed and samples always produce the same labels and no
//! state is shared between calls.

use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// RGB color as a feature vector
pub type Color = Vector3<f32>;

/// Clustering parameters
#[derive(Debug, Clone)]
pub struct KMeans {
    pub clusters: usize,
    pub seed: u64,
    pub max_iterations: usize,
    pub tolerance: f32,
    pub restarts: usize,
}

/// Result of a k-means fit
#[derive(Debug, Clone)]
pub struct Clustering {
    pub centroids: Vec<Color>,
    /// Cluster index per sample, in sample order
    pub labels: Vec<usize>,
    /// Sum of squared distances to the assigned centroid
    pub inertia: f64,
    pub iterations: usize,
}

impl KMeans {
    pub fn new(clusters: usize, seed: u64) -> Self {
        Self {
            clusters,
            seed,
            max_iterations: 300,
            tolerance: 1e-4,
            restarts: 3,
        }
    }

    /// Partition `samples` into at most `clusters` groups
    pub fn fit(&self, samples: &[Color]) -> Clustering {
        if samples.is_empty() || self.clusters == 0 {
            return Clustering {
                centroids: Vec::new(),
                labels: vec![0; samples.len()],
                inertia: 0.0,
                iterations: 0,
            };
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best = self.run_once(samples, &mut rng);
        for _ in 1..self.restarts.max(1) {
            let candidate = self.run_once(samples, &mut rng);
            if candidate.inertia < best.inertia {
                best = candidate;
            }
        }
        best
    }

    fn run_once(&self, samples: &[Color], rng: &mut StdRng) -> Clustering {
        let mut centroids = init_plus_plus(samples, self.clusters, rng);
        let mut labels = vec![0usize; samples.len()];
        let mut iterations = 0;

        for _ in 0..self.max_iterations.max(1) {
            iterations += 1;
            assign(samples, &centroids, &mut labels);
            let updated = update_centroids(samples, &labels, &centroids);

            let shift: f32 = centroids
                .iter()
                .zip(&updated)
                .map(|(old, new)| (old - new).norm_squared())
                .sum();
            centroids = updated;

            if shift <= self.tolerance {
                break;
            }
        }

        let inertia = assign(samples, &centroids, &mut labels);
        Clustering {
            centroids,
            labels,
            inertia,
            iterations,
        }
    }
}

/// Index of the closest centroid; the lowest index wins ties
fn nearest(sample: &Color, centroids: &[Color]) -> (usize, f32) {
    let mut best = (0usize, f32::MAX);
    for (i, c) in centroids.iter().enumerate() {
        let d = (sample - c).norm_squared();
        if d < best.1 {
            best = (i, d);
        }
    }
    best
}

/// Assign each sample to its nearest centroid, returning the inertia
fn assign(samples: &[Color], centroids: &[Color], labels: &mut [usize]) -> f64 {
    let mut inertia = 0.0f64;
    for (sample, label) in samples.iter().zip(labels.iter_mut()) {
        let (idx, d) = nearest(sample, centroids);
        *label = idx;
        inertia += d as f64;
    }
    inertia
}

/// Mean of each cluster; empty clusters keep their previous centroid
fn update_centroids(samples: &[Color], labels: &[usize], previous: &[Color]) -> Vec<Color> {
    let mut sums = vec![Vector3::<f64>::zeros(); previous.len()];
    let mut counts = vec![0usize; previous.len()];

    for (sample, &label) in samples.iter().zip(labels) {
        sums[label] += sample.cast::<f64>();
        counts[label] += 1;
    }

    sums.iter()
        .zip(&counts)
        .zip(previous)
        .map(|((sum, &count), prev)| {
            if count > 0 {
                (sum / count as f64).cast::<f32>()
            } else {
                *prev
            }
        })
        .collect()
}

/// k-means++ seeding: each next centroid is drawn with probability
/// proportional to its squared distance from the closest chosen one
fn init_plus_plus(samples: &[Color], k: usize, rng: &mut StdRng) -> Vec<Color> {
    let n = samples.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(samples[rng.random_range(0..n)]);

    let mut distances: Vec<f64> = samples
        .iter()
        .map(|s| (s - centroids[0]).norm_squared() as f64)
        .collect();

    while centroids.len() < k {
        let total: f64 = distances.iter().sum();

        let idx = if total <= 0.0 {
            // Every sample coincides with a centroid already
            rng.random_range(0..n)
        } else {
            let target = rng.random::<f64>() * total;
            let mut acc = 0.0;
            let mut chosen = n - 1;
            for (i, &d) in distances.iter().enumerate() {
                acc += d;
                if d > 0.0 && acc >= target {
                    chosen = i;
                    break;
                }
            }
            chosen
        };

        let centroid = samples[idx];
        for (d, s) in distances.iter_mut().zip(samples) {
            *d = d.min((s - centroid).norm_squared() as f64);
        }
        centroids.push(centroid);
    }

    centroids
}
