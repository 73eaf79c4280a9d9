//! Feature vectors for the downstream classifier.
//!
//! Each patch becomes its flattened RGB samples scaled to unit L2 norm, with
//! the integer label alongside. Fitting a model on these is left to the
//! consumer.
use crate::error::{PrepError, Result};
use crate::partition::Patch;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitParams {
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for SplitParams {
    fn default() -> Self {
        Self {
            test_fraction: 0.3,
            seed: 42,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub features: Vec<Vec<f32>>,
    pub labels: Vec<u8>,
}

/// Flattened samples divided by their L2 norm; all-zero patches stay zero.
pub fn feature_vector(patch: &Patch) -> Vec<f32> {
    let raw: Vec<f32> = patch.pixels.data.iter().map(|&v| f32::from(v)).collect();
    let norm = raw.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return raw;
    }
    raw.into_iter().map(|v| v / norm).collect()
}

impl FeatureSet {
    /// Normal rows first, then anomalous rows.
    pub fn from_patches(normal: &[Patch], anomalous: &[Patch]) -> Self {
        let mut set = FeatureSet::default();
        for patch in normal.iter().chain(anomalous) {
            set.features.push(feature_vector(patch));
            set.labels.push(patch.label.as_u8());
        }
        set
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Shuffle deterministically and split into (train, test).
    ///
    /// The test share is rounded up, matching the usual convention.
    pub fn train_test_split(&self, params: SplitParams) -> Result<(FeatureSet, FeatureSet)> {
        let fraction = params.test_fraction;
        if !(fraction > 0.0 && fraction < 1.0) {
            return Err(PrepError::config(format!(
                "test_fraction must be within (0, 1), got {fraction}"
            )));
        }
        let mut order: Vec<usize> = (0..self.len()).collect();
        let mut rng = StdRng::seed_from_u64(params.seed);
        order.shuffle(&mut rng);

        let test_len = (self.len() as f64 * fraction).ceil() as usize;
        let (test_idx, train_idx) = order.split_at(test_len.min(order.len()));
        Ok((self.select(train_idx), self.select(test_idx)))
    }

    fn select(&self, indices: &[usize]) -> FeatureSet {
        FeatureSet {
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }
}
