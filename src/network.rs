use tracing::trace;

use crate::activation::{Activation, OutputActivation};
use crate::matrix::{elementwise_multiply, matrix_vector_multiply, subtract_vectors};
use crate::optim::{self, AdamConfig, AdamState, Hyperparams, UpdateRule};
use crate::{Error, Layer, NetworkBuilder, Result};

/// Nonlinearity of every layer except the last.
pub const HIDDEN_ACTIVATION: Activation = Activation::LeakyReLU;

/// Fully-connected feed-forward classifier.
///
/// Owns its layers exclusively. Every training call mutates parameters and
/// optimizer state in place.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
    hyper: Hyperparams,
    adam: AdamState,
    output: OutputActivation,
}

impl Network {
    /// Build a softmax classifier with He-initialized weights.
    ///
    /// `sizes` lists every layer width including the input, e.g. `[784, 128, 64, 10]`
    /// yields three layers. `momentum: None` is equivalent to a coefficient of `0.0`.
    pub fn new(
        learning_rate: f64,
        momentum: Option<f64>,
        lambda: f64,
        seed: u64,
        sizes: &[usize],
    ) -> Result<Self> {
        NetworkBuilder::new(sizes)
            .learning_rate(learning_rate)
            .momentum(momentum.unwrap_or(0.0))
            .lambda(lambda)
            .build_with_seed(seed)
    }

    /// Assemble a network from explicit layers.
    ///
    /// Each layer's input width must equal the previous layer's output width.
    pub fn from_layers(
        layers: Vec<Layer>,
        hyper: Hyperparams,
        adam: AdamConfig,
        output: OutputActivation,
    ) -> Result<Self> {
        if layers.is_empty() {
            return Err(Error::InvalidConfig(
                "network must have at least one layer".to_owned(),
            ));
        }
        if layers.iter().any(|l| l.in_dim() == 0 || l.out_dim() == 0) {
            return Err(Error::InvalidConfig(
                "all layer sizes must be > 0".to_owned(),
            ));
        }
        for pair in layers.windows(2) {
            if pair[1].in_dim() != pair[0].out_dim() {
                return Err(Error::mismatch(
                    "layer chain",
                    pair[0].out_dim(),
                    pair[1].in_dim(),
                ));
            }
        }
        hyper.validate()?;
        adam.validate()?;

        Ok(Self::from_validated(layers, hyper, adam, output))
    }

    pub(crate) fn from_validated(
        layers: Vec<Layer>,
        hyper: Hyperparams,
        adam: AdamConfig,
        output: OutputActivation,
    ) -> Self {
        Self {
            layers,
            hyper,
            adam: AdamState::new(adam),
            output,
        }
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.layers[0].in_dim()
    }

    #[inline]
    pub fn output_dim(&self) -> usize {
        self.layers[self.layers.len() - 1].out_dim()
    }

    #[inline]
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[inline]
    pub fn layer(&self, idx: usize) -> Option<&Layer> {
        self.layers.get(idx)
    }

    #[inline]
    pub fn layer_mut(&mut self, idx: usize) -> Option<&mut Layer> {
        self.layers.get_mut(idx)
    }

    #[inline]
    pub fn hyperparams(&self) -> &Hyperparams {
        &self.hyper
    }

    #[inline]
    pub fn output_activation(&self) -> OutputActivation {
        self.output
    }

    /// Number of completed [`Network::train_adam`] calls.
    #[inline]
    pub fn adam_steps(&self) -> u64 {
        self.adam.steps()
    }

    #[inline]
    pub fn beta1_t(&self) -> f64 {
        self.adam.beta1_t()
    }

    #[inline]
    pub fn beta2_t(&self) -> f64 {
        self.adam.beta2_t()
    }

    /// Lazily evaluate the forward pass.
    ///
    /// Yields the input itself first, then one activation vector per layer. The
    /// iterator cannot be restarted; call again to run another pass.
    pub fn activations<'a>(&'a self, input: &[f64]) -> Activations<'a> {
        Activations {
            layers: self.layers.iter(),
            output: self.output,
            pending: Some(Ok(input.to_vec())),
        }
    }

    /// Run the forward pass and keep every activation (input included).
    ///
    /// Backprop needs the full list, so `len() == num_layers() + 1`.
    pub fn feed_forward(&self, input: &[f64]) -> Result<Vec<Vec<f64>>> {
        self.activations(input).collect()
    }

    /// Compute every layer's delta from a forward pass and a target vector.
    ///
    /// Deltas are returned in layer order (index 0 = first layer).
    pub fn backpropagate(
        &self,
        activations: &[Vec<f64>],
        expected: &[f64],
    ) -> Result<Vec<Vec<f64>>> {
        let n = self.layers.len();
        if activations.len() != n + 1 {
            return Err(Error::mismatch("activations", n + 1, activations.len()));
        }

        let output = &activations[n];
        let error = subtract_vectors(output, expected)?;
        let output_delta = match self.output {
            // Softmax combined with the loss: no extra derivative factor.
            OutputActivation::Softmax => error,
            OutputActivation::Sigmoid => {
                elementwise_multiply(&error, &Activation::Sigmoid.grads_from_outputs(output))?
            }
        };

        let mut deltas = vec![Vec::new(); n];
        deltas[n - 1] = output_delta;

        for idx in (0..n - 1).rev() {
            let front = &self.layers[idx + 1];
            let propagated = matrix_vector_multiply(&front.weights.transpose(), &deltas[idx + 1])?;
            let derivatives = HIDDEN_ACTIVATION.grads_from_outputs(&activations[idx + 1]);
            deltas[idx] = elementwise_multiply(&propagated, &derivatives)?;
        }

        Ok(deltas)
    }

    /// One SGD-with-momentum step on a single sample.
    ///
    /// Returns the sample's squared error (diagnostic only).
    pub fn train(&mut self, input: &[f64], expected: &[f64]) -> Result<f64> {
        self.step(UpdateRule::Momentum, input, expected)
    }

    /// One Adam step on a single sample.
    ///
    /// Returns the sample's squared error (diagnostic only).
    pub fn train_adam(&mut self, input: &[f64], expected: &[f64]) -> Result<f64> {
        self.step(UpdateRule::Adam, input, expected)
    }

    /// Forward pass, backprop and parameter update for one sample.
    pub fn step(&mut self, rule: UpdateRule, input: &[f64], expected: &[f64]) -> Result<f64> {
        let activations = self.feed_forward(input)?;
        let deltas = self.backpropagate(&activations, expected)?;
        let error = squared_error(&activations[self.layers.len()], expected)?;

        if rule == UpdateRule::Adam {
            self.adam.advance();
        }

        for (idx, (layer, delta)) in self.layers.iter_mut().zip(&deltas).enumerate() {
            let prev = &activations[idx];
            match rule {
                UpdateRule::Momentum => optim::momentum_step(layer, prev, delta, &self.hyper)?,
                UpdateRule::Adam => optim::adam_step(layer, prev, delta, &self.hyper, &self.adam)?,
            }
        }

        trace!(?rule, error, adam_steps = self.adam.steps(), "training step");
        Ok(error)
    }

    /// Index of the largest output. Ties resolve to the lowest index.
    pub fn predict(&self, input: &[f64]) -> Result<usize> {
        let mut activations = self.feed_forward(input)?;
        let output = activations.pop().unwrap_or_default();
        Ok(argmax(&output))
    }
}

/// Forward pass as an iterator; see [`Network::activations`].
#[derive(Debug)]
pub struct Activations<'a> {
    layers: std::slice::Iter<'a, Layer>,
    output: OutputActivation,
    pending: Option<Result<Vec<f64>>>,
}

impl Iterator for Activations<'_> {
    type Item = Result<Vec<f64>>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = match self.pending.take()? {
            Ok(current) => current,
            Err(err) => return Some(Err(err)),
        };

        if let Some(layer) = self.layers.next() {
            let is_output = self.layers.len() == 0;
            let output = self.output;
            self.pending = Some(layer.pre_activation(&current).map(|z| {
                if is_output {
                    output.apply(&z)
                } else {
                    HIDDEN_ACTIVATION.apply(&z)
                }
            }));
        }

        Some(Ok(current))
    }
}

/// `Σ (expected_i - output_i)²`. Both slices must have the same length.
pub fn squared_error(output: &[f64], expected: &[f64]) -> Result<f64> {
    if output.len() != expected.len() {
        return Err(Error::mismatch("squared_error", output.len(), expected.len()));
    }
    Ok(expected
        .iter()
        .zip(output)
        .map(|(e, o)| (e - o) * (e - o))
        .sum())
}

/// First index holding the maximum value (strict `>` scan). `0` for an empty slice.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (idx, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = idx;
        }
    }
    best
}
