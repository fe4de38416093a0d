//! Parameter initialization.
//!
//! Weights use He initialization (zero-mean Gaussian scaled by `sqrt(2 / fan_in)`),
//! which suits the Leaky-ReLU hidden layers. Biases start at a small positive
//! constant so that no unit begins dead.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::Matrix;

/// Initial value of every bias.
pub const BIAS_INIT: f64 = 0.1;

/// Draw an `(out_dim, in_dim)` weight matrix.
///
/// Entries are drawn row-major from `rng`; reproducing a network requires the
/// same call order.
pub fn he_normal<R: Rng + ?Sized>(out_dim: usize, in_dim: usize, rng: &mut R) -> Matrix {
    let std_dev = (2.0 / in_dim as f64).sqrt();
    Matrix::from_fn(out_dim, in_dim, |_, _| {
        let z: f64 = rng.sample(StandardNormal);
        z * std_dev
    })
}

pub fn constant(len: usize, value: f64) -> Vec<f64> {
    vec![value; len]
}
