//! Labeled samples and single-pass helpers.
//!
//! Loading, normalizing and shuffling data is the caller's job. A [`Sample`] is
//! trusted as given: features are expected to be pre-scaled (e.g. to `[0, 1]`)
//! and are not re-validated here.

use tracing::debug;

use crate::{Error, Network, Result, UpdateRule};

/// One labeled feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub features: Vec<f64>,
    pub label: usize,
}

impl Sample {
    pub fn new(features: Vec<f64>, label: usize) -> Self {
        Self { features, label }
    }
}

/// A vector of `num_classes` zeros with `1.0` at `label`.
pub fn one_hot(label: usize, num_classes: usize) -> Result<Vec<f64>> {
    if label >= num_classes {
        return Err(Error::InvalidLabel { label, num_classes });
    }
    let mut v = vec![0.0; num_classes];
    v[label] = 1.0;
    Ok(v)
}

impl Network {
    /// Train on every sample once, in order, with one update per sample.
    ///
    /// Returns the mean per-sample squared error.
    pub fn train_epoch(&mut self, samples: &[Sample], rule: UpdateRule) -> Result<f64> {
        if samples.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let num_classes = self.output_dim();
        let mut total = 0.0;
        for sample in samples {
            let target = one_hot(sample.label, num_classes)?;
            total += self.step(rule, &sample.features, &target)?;
        }

        let mean = total / samples.len() as f64;
        debug!(samples = samples.len(), ?rule, mean_error = mean, "epoch complete");
        Ok(mean)
    }

    /// Fraction of samples whose prediction equals the label.
    pub fn accuracy(&self, samples: &[Sample]) -> Result<f64> {
        if samples.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let mut correct = 0usize;
        for sample in samples {
            if self.predict(&sample.features)? == sample.label {
                correct += 1;
            }
        }
        Ok(correct as f64 / samples.len() as f64)
    }
}
