//! Network builder.
//!
//! `NetworkBuilder` collects topology and hyperparameters, validates all of them
//! at build time, and draws the initial weights from a single RNG stream in
//! layer order.
//!
//! Hidden layers always use Leaky-ReLU; only the output nonlinearity is
//! configurable.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::optim::{AdamConfig, Hyperparams};
use crate::{Error, Layer, Network, OutputActivation, Result};

#[derive(Debug, Clone)]
/// Builder for a [`Network`].
///
/// Example:
///
/// ```rust
/// use fashion_mlp::{NetworkBuilder, OutputActivation};
///
/// # fn main() -> fashion_mlp::Result<()> {
/// let net = NetworkBuilder::new(&[2, 3, 1])
///     .learning_rate(0.1)
///     .momentum(0.9)
///     .output_activation(OutputActivation::Sigmoid)
///     .build_with_seed(23)?;
/// assert_eq!(net.num_layers(), 2);
/// # Ok(())
/// # }
/// ```
pub struct NetworkBuilder {
    sizes: Vec<usize>,
    hyper: Hyperparams,
    adam: AdamConfig,
    output: OutputActivation,
}

impl NetworkBuilder {
    /// Start from a list of layer widths, input first.
    pub fn new(sizes: &[usize]) -> Self {
        Self {
            sizes: sizes.to_vec(),
            hyper: Hyperparams {
                learning_rate: 1e-2,
                momentum: 0.0,
                lambda: 0.0,
            },
            adam: AdamConfig::default(),
            output: OutputActivation::Softmax,
        }
    }

    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.hyper.learning_rate = learning_rate;
        self
    }

    pub fn momentum(mut self, momentum: f64) -> Self {
        self.hyper.momentum = momentum;
        self
    }

    /// L2 weight-decay strength (applied to weights, not biases).
    pub fn lambda(mut self, lambda: f64) -> Self {
        self.hyper.lambda = lambda;
        self
    }

    pub fn adam(mut self, adam: AdamConfig) -> Self {
        self.adam = adam;
        self
    }

    pub fn output_activation(mut self, output: OutputActivation) -> Self {
        self.output = output;
        self
    }

    /// Validate the configuration without building.
    pub fn validate(&self) -> Result<()> {
        if self.sizes.len() < 2 {
            return Err(Error::InvalidConfig(
                "sizes must include input and output dims".to_owned(),
            ));
        }
        if self.sizes.contains(&0) {
            return Err(Error::InvalidConfig(
                "all layer sizes must be > 0".to_owned(),
            ));
        }
        self.hyper.validate()?;
        self.adam.validate()
    }

    /// Build using a deterministic seed.
    pub fn build_with_seed(self, seed: u64) -> Result<Network> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.build_with_rng(&mut rng)
    }

    /// Build using the provided RNG.
    ///
    /// Weights are drawn layer by layer, row-major within each layer.
    pub fn build_with_rng<R: Rng + ?Sized>(self, rng: &mut R) -> Result<Network> {
        self.validate()?;

        let mut layers = Vec::with_capacity(self.sizes.len() - 1);
        for w in self.sizes.windows(2) {
            layers.push(Layer::new_with_rng(w[0], w[1], &mut *rng));
        }

        let params: usize = layers.iter().map(|l| (l.in_dim() + 1) * l.out_dim()).sum();
        debug!(
            sizes = ?self.sizes,
            params,
            learning_rate = self.hyper.learning_rate,
            momentum = self.hyper.momentum,
            lambda = self.hyper.lambda,
            output = ?self.output,
            "built network"
        );

        Ok(Network::from_validated(layers, self.hyper, self.adam, self.output))
    }
}
