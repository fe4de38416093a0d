//! A from-scratch feed-forward classifier.
//!
//! `fashion-mlp` implements a fully-connected network trained one sample at a
//! time with hand-derived backpropagation. It was built for 28×28 grayscale
//! image classification (784 inputs, 10 classes) but any layer widths work.
//!
//! # Architecture
//!
//! - Hidden layers: Leaky-ReLU (slope `0.01`).
//! - Output layer: softmax (default) or element-wise sigmoid.
//! - Weights: He-normal, drawn from one seeded RNG in layer order. Biases: `0.1`.
//! - Updates: SGD with momentum ([`Network::train`]) or Adam ([`Network::train_adam`]),
//!   both with optional L2 weight decay on weights.
//!
//! # Errors
//!
//! The only numerical failure is a shape mismatch, reported as
//! [`Error::DimensionMismatch`] and propagated to the caller. Configuration
//! problems are caught when the network is built.
//!
//! # Logging
//!
//! The crate emits `tracing` events (`debug` on build and per epoch, `trace` per
//! step) and never installs a subscriber.
//!
//! # Quick start
//!
//! ```rust
//! use fashion_mlp::{Network, one_hot};
//!
//! # fn main() -> fashion_mlp::Result<()> {
//! let mut net = Network::new(0.01, Some(0.6), 0.0, 0, &[4, 8, 3])?;
//!
//! let x = [0.1, 0.5, 0.9, 0.3];
//! let target = one_hot(2, 3)?;
//! let err = net.train_adam(&x, &target)?;
//! assert!(err >= 0.0);
//!
//! let class = net.predict(&x)?;
//! assert!(class < 3);
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod builder;
pub mod data;
pub mod error;
pub mod init;
pub mod layer;
pub mod matrix;
pub mod network;
pub mod optim;

pub use activation::{Activation, OutputActivation};
pub use builder::NetworkBuilder;
pub use data::{Sample, one_hot};
pub use error::{Error, Result};
pub use layer::Layer;
pub use matrix::Matrix;
pub use network::{Activations, Network, argmax, squared_error};
pub use optim::{AdamConfig, AdamState, Hyperparams, UpdateRule};
