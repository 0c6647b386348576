use std::collections::BTreeMap;

use crate::error::{PipelineError, Result};
use crate::features::FeatureVector;

pub const DEFAULT_NEIGHBORS: usize = 5;

/// k-nearest-neighbours over Euclidean distance. A lazy learner: fitting
/// stores the (already normalised) training rows and labels.
#[derive(Debug, Clone)]
pub struct KnnClassifier {
    k: usize,
    x_train: Vec<FeatureVector>,
    y_train: Vec<u32>,
}

impl KnnClassifier {
    pub fn fit(k: usize, x: Vec<FeatureVector>, y: Vec<u32>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(PipelineError::InvalidInput(format!(
                "{} training vectors but {} labels",
                x.len(),
                y.len()
            )));
        }
        if x.is_empty() {
            return Err(PipelineError::InvalidInput("cannot fit with zero samples".into()));
        }
        if k == 0 || k > x.len() {
            return Err(PipelineError::InvalidInput(format!(
                "k={} must be between 1 and the number of training samples ({})",
                k,
                x.len()
            )));
        }
        Ok(Self { k, x_train: x, y_train: y })
    }

    /// Majority label among the k nearest training rows.
    ///
    /// Neighbours are ranked by (distance, training index) and vote ties go to
    /// the lowest label, so the result depends only on the training data and k.
    pub fn predict(&self, q: &FeatureVector) -> u32 {
        let mut distances: Vec<(f64, usize)> = self
            .x_train
            .iter()
            .enumerate()
            .map(|(i, row)| (euclidean(q, row), i))
            .collect();
        distances.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut votes: BTreeMap<u32, usize> = BTreeMap::new();
        for &(_, i) in &distances[..self.k] {
            *votes.entry(self.y_train[i]).or_insert(0) += 1;
        }
        // BTreeMap iterates labels ascending; strict > keeps the lowest on ties
        let mut best = (0u32, 0usize);
        for (label, count) in votes {
            if count > best.1 {
                best = (label, count);
            }
        }
        best.0
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn n_samples(&self) -> usize {
        self.x_train.len()
    }
}

fn euclidean(a: &FeatureVector, b: &FeatureVector) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum::<f64>().sqrt()
}
