//! Activation functions.
//!
//! A layer computes a pre-activation value `z = W x + b` and then applies a
//! nonlinearity. The network caches the *post-activation* outputs `y`, so every
//! derivative here takes `y` rather than `z`.
//!
//! Hidden layers always use Leaky-ReLU. The output layer uses softmax by default;
//! sigmoid is available for single-unit binary problems such as XOR.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Slope of Leaky-ReLU for non-positive inputs.
pub const LEAKY_RELU_SLOPE: f64 = 0.01;

#[inline]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Takes the sigmoid *output* `y`.
#[inline]
pub fn sigmoid_derivative(y: f64) -> f64 {
    y * (1.0 - y)
}

#[inline]
pub fn relu(x: f64) -> f64 {
    x.max(0.0)
}

/// `1` for strictly positive outputs, `0` otherwise (including exactly zero).
#[inline]
pub fn relu_derivative(y: f64) -> f64 {
    if y > 0.0 { 1.0 } else { 0.0 }
}

#[inline]
pub fn leaky_relu(x: f64) -> f64 {
    if x > 0.0 { x } else { LEAKY_RELU_SLOPE * x }
}

/// `1` for strictly positive outputs, [`LEAKY_RELU_SLOPE`] otherwise.
#[inline]
pub fn leaky_relu_derivative(y: f64) -> f64 {
    if y > 0.0 { 1.0 } else { LEAKY_RELU_SLOPE }
}

/// Softmax over raw logits.
///
/// The maximum logit is subtracted before exponentiating, so large logits such
/// as `[1000, 1000, 1000]` do not overflow.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut probs: Vec<f64> = logits.iter().map(|&z| (z - max).exp()).collect();
    let sum: f64 = probs.iter().sum();
    for p in &mut probs {
        *p /= sum;
    }
    probs
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Element-wise activation function.
pub enum Activation {
    Sigmoid,
    ReLU,
    LeakyReLU,
}

impl Activation {
    #[inline]
    pub fn forward(self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => sigmoid(x),
            Activation::ReLU => relu(x),
            Activation::LeakyReLU => leaky_relu(x),
        }
    }

    /// Derivative of the activation, expressed in terms of its output `y`.
    #[inline]
    pub fn grad_from_output(self, y: f64) -> f64 {
        match self {
            Activation::Sigmoid => sigmoid_derivative(y),
            Activation::ReLU => relu_derivative(y),
            Activation::LeakyReLU => leaky_relu_derivative(y),
        }
    }

    pub fn apply(self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.forward(x)).collect()
    }

    pub fn grads_from_outputs(self, ys: &[f64]) -> Vec<f64> {
        ys.iter().map(|&y| self.grad_from_output(y)).collect()
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Nonlinearity applied by the final layer.
pub enum OutputActivation {
    /// Probability distribution over classes. The output delta is
    /// `output - expected`, with no extra derivative factor.
    #[default]
    Softmax,
    /// Independent sigmoid units. The output delta is multiplied by
    /// `sigmoid_derivative(output)`.
    Sigmoid,
}

impl OutputActivation {
    pub fn apply(self, logits: &[f64]) -> Vec<f64> {
        match self {
            OutputActivation::Softmax => softmax(logits),
            OutputActivation::Sigmoid => Activation::Sigmoid.apply(logits),
        }
    }
}
