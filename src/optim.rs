//! Parameter update rules.
//!
//! Both rules consume the same per-layer inputs: the activation that fed the
//! layer and the layer's delta from backprop. They mutate the layer in place.
//!
//! L2 weight decay (`lambda * w`) is folded into the weight gradient before the
//! momentum/Adam blend. Biases are not decayed.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Error, Layer, Result};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Which update rule a training step applies.
pub enum UpdateRule {
    /// SGD with momentum.
    #[default]
    Momentum,
    /// Adam (bias-corrected).
    Adam,
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Hyperparameters shared by both update rules.
pub struct Hyperparams {
    pub learning_rate: f64,
    /// Momentum coefficient. `0.0` degrades the momentum rule to plain SGD.
    pub momentum: f64,
    /// L2 weight-decay strength.
    pub lambda: f64,
}

impl Hyperparams {
    pub fn validate(&self) -> Result<()> {
        let Hyperparams {
            learning_rate,
            momentum,
            lambda,
        } = *self;

        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "learning rate must be finite and > 0, got {learning_rate}"
            )));
        }
        if !(momentum.is_finite() && (0.0..1.0).contains(&momentum)) {
            return Err(Error::InvalidConfig(format!(
                "momentum must be finite and in [0,1), got {momentum}"
            )));
        }
        if !(lambda.is_finite() && lambda >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "lambda must be finite and >= 0, got {lambda}"
            )));
        }
        Ok(())
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdamConfig {
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
}

impl Default for AdamConfig {
    fn default() -> Self {
        Self {
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
        }
    }
}

impl AdamConfig {
    pub fn validate(&self) -> Result<()> {
        let AdamConfig {
            beta1,
            beta2,
            epsilon,
        } = *self;

        if !(beta1.is_finite() && (0.0..1.0).contains(&beta1)) {
            return Err(Error::InvalidConfig(format!(
                "adam beta1 must be finite and in [0,1), got {beta1}"
            )));
        }
        if !(beta2.is_finite() && (0.0..1.0).contains(&beta2)) {
            return Err(Error::InvalidConfig(format!(
                "adam beta2 must be finite and in [0,1), got {beta2}"
            )));
        }
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "adam epsilon must be finite and > 0, got {epsilon}"
            )));
        }
        Ok(())
    }
}

/// Network-wide Adam bookkeeping.
///
/// `beta1_t` / `beta2_t` start at `1.0` and are multiplied by their beta once per
/// training call. They are never reset.
#[derive(Debug, Clone, PartialEq)]
pub struct AdamState {
    config: AdamConfig,
    t: u64,
    beta1_t: f64,
    beta2_t: f64,
}

impl AdamState {
    pub fn new(config: AdamConfig) -> Self {
        Self {
            config,
            t: 0,
            beta1_t: 1.0,
            beta2_t: 1.0,
        }
    }

    /// Advance the bias-correction powers by one training call.
    #[inline]
    pub fn advance(&mut self) {
        self.t += 1;
        self.beta1_t *= self.config.beta1;
        self.beta2_t *= self.config.beta2;
    }

    #[inline]
    pub fn steps(&self) -> u64 {
        self.t
    }

    #[inline]
    pub fn beta1_t(&self) -> f64 {
        self.beta1_t
    }

    #[inline]
    pub fn beta2_t(&self) -> f64 {
        self.beta2_t
    }
}

fn check_shapes(layer: &Layer, prev_activation: &[f64], delta: &[f64]) -> Result<()> {
    if delta.len() != layer.out_dim() {
        return Err(Error::mismatch("layer delta", layer.out_dim(), delta.len()));
    }
    if prev_activation.len() != layer.in_dim() {
        return Err(Error::mismatch(
            "layer input activation",
            layer.in_dim(),
            prev_activation.len(),
        ));
    }
    Ok(())
}

/// SGD-with-momentum update of one layer.
///
/// For each parameter: `v = momentum * v - lr * g; p += v`.
pub fn momentum_step(
    layer: &mut Layer,
    prev_activation: &[f64],
    delta: &[f64],
    hp: &Hyperparams,
) -> Result<()> {
    check_shapes(layer, prev_activation, delta)?;

    for (j, &g) in delta.iter().enumerate() {
        let velocity = layer.bias_velocities[j] * hp.momentum - hp.learning_rate * g;
        layer.biases[j] += velocity;
        layer.bias_velocities[j] = velocity;
    }

    for (j, &d) in delta.iter().enumerate() {
        let weights = layer.weights.row_mut(j);
        let velocities = layer.weight_velocities.row_mut(j);
        for ((w, v), &a) in weights.iter_mut().zip(velocities).zip(prev_activation) {
            let g = d * a + hp.lambda * *w;
            let velocity = *v * hp.momentum - hp.learning_rate * g;
            *w += velocity;
            *v = velocity;
        }
    }

    Ok(())
}

/// Adam update of one layer.
///
/// `state` must already have been advanced for the current training call.
pub fn adam_step(
    layer: &mut Layer,
    prev_activation: &[f64],
    delta: &[f64],
    hp: &Hyperparams,
    state: &AdamState,
) -> Result<()> {
    check_shapes(layer, prev_activation, delta)?;

    let AdamConfig {
        beta1,
        beta2,
        epsilon,
    } = state.config;
    let corr1 = 1.0 - state.beta1_t;
    let corr2 = 1.0 - state.beta2_t;

    let update = |g: f64, m: &mut f64, v: &mut f64| -> f64 {
        *m = beta1 * *m + (1.0 - beta1) * g;
        *v = beta2 * *v + (1.0 - beta2) * (g * g);
        let m_hat = *m / corr1;
        let v_hat = *v / corr2;
        hp.learning_rate * m_hat / (v_hat.sqrt() + epsilon)
    };

    for (j, &g) in delta.iter().enumerate() {
        layer.biases[j] -= update(g, &mut layer.m_biases[j], &mut layer.v_biases[j]);
    }

    for (j, &d) in delta.iter().enumerate() {
        let weights = layer.weights.row_mut(j);
        let ms = layer.m_weights.row_mut(j);
        let vs = layer.v_weights.row_mut(j);
        for (((w, m), v), &a) in weights.iter_mut().zip(ms).zip(vs).zip(prev_activation) {
            let g = d * a + hp.lambda * *w;
            *w -= update(g, m, v);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::Matrix;

    fn unit_layer(w: f64, b: f64) -> Layer {
        Layer::from_parts(Matrix::from_rows(&[vec![w]]).unwrap(), vec![b]).unwrap()
    }

    fn hp(momentum: f64, lambda: f64) -> Hyperparams {
        Hyperparams {
            learning_rate: 0.1,
            momentum,
            lambda,
        }
    }

    #[test]
    fn hyperparams_validation_rejects_bad_values() {
        assert!(hp(0.9, 0.0).validate().is_ok());
        assert!(hp(1.0, 0.0).validate().is_err());
        assert!(hp(-0.1, 0.0).validate().is_err());
        assert!(hp(0.5, -1.0).validate().is_err());
        assert!(hp(0.5, f64::NAN).validate().is_err());
        assert!(
            Hyperparams {
                learning_rate: 0.0,
                momentum: 0.0,
                lambda: 0.0
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn adam_config_validation_rejects_bad_hyperparams() {
        assert!(AdamConfig::default().validate().is_ok());
        let bad = [
            AdamConfig {
                beta1: 1.0,
                ..AdamConfig::default()
            },
            AdamConfig {
                beta2: 1.0,
                ..AdamConfig::default()
            },
            AdamConfig {
                epsilon: 0.0,
                ..AdamConfig::default()
            },
        ];
        for cfg in bad {
            assert!(cfg.validate().is_err(), "{cfg:?}");
        }
    }

    #[test]
    fn momentum_first_step_matches_plain_sgd() {
        let mut layer = unit_layer(1.0, 2.0);
        momentum_step(&mut layer, &[3.0], &[4.0], &hp(0.9, 0.0)).unwrap();

        // Weight gradient = 4 * 3 = 12, bias gradient = 4.
        assert!((layer.weights().get(0, 0) - (1.0 - 0.1 * 12.0)).abs() < 1e-12);
        assert!((layer.biases()[0] - (2.0 - 0.1 * 4.0)).abs() < 1e-12);
        assert!((layer.bias_velocities()[0] + 0.4).abs() < 1e-12);
    }

    #[test]
    fn momentum_accumulates_velocity() {
        let mut layer = unit_layer(0.0, 0.0);
        let hp = hp(0.5, 0.0);
        momentum_step(&mut layer, &[0.0], &[1.0], &hp).unwrap();
        momentum_step(&mut layer, &[0.0], &[1.0], &hp).unwrap();

        // v1 = -0.1, v2 = 0.5 * -0.1 - 0.1 = -0.15
        assert!((layer.bias_velocities()[0] + 0.15).abs() < 1e-12);
        assert!((layer.biases()[0] + 0.25).abs() < 1e-12);
    }

    #[test]
    fn weight_decay_applies_to_weights_only() {
        let mut layer = unit_layer(2.0, 2.0);
        momentum_step(&mut layer, &[0.0], &[0.0], &hp(0.0, 0.5)).unwrap();

        // Zero delta: only the decay term (0.5 * 2.0) contributes.
        assert!((layer.weights().get(0, 0) - (2.0 - 0.1 * 1.0)).abs() < 1e-12);
        assert_eq!(layer.biases()[0], 2.0);
    }

    #[test]
    fn adam_weight_decay_applies_to_weights_only() {
        let mut layer = unit_layer(2.0, 1.0);
        let mut state = AdamState::new(AdamConfig::default());
        state.advance();

        adam_step(&mut layer, &[0.0], &[0.0], &hp(0.0, 0.5), &state).unwrap();

        // Weight gradient is the decay term 0.5 * 2.0; bias-corrected moments give a step of ~lr.
        assert!((layer.weights().get(0, 0) - 1.900000001).abs() < 1e-9);
        assert!((layer.m_weights().get(0, 0) - 0.1).abs() < 1e-12);
        assert_eq!(layer.biases()[0], 1.0);
        assert_eq!(layer.m_biases()[0], 0.0);
        assert_eq!(layer.v_biases()[0], 0.0);
    }

    #[test]
    fn adam_state_powers_advance_multiplicatively() {
        let mut state = AdamState::new(AdamConfig::default());
        assert_eq!((state.beta1_t(), state.beta2_t()), (1.0, 1.0));

        state.advance();
        assert_eq!(state.beta1_t(), 0.9);
        assert_eq!(state.beta2_t(), 0.999);

        state.advance();
        assert!((state.beta1_t() - 0.81).abs() < 1e-15);
        assert_eq!(state.steps(), 2);
    }

    #[test]
    fn adam_first_step_has_unit_normalized_direction() {
        let mut layer = unit_layer(1.0, 1.0);
        let mut state = AdamState::new(AdamConfig {
            epsilon: 1.0,
            ..AdamConfig::default()
        });
        state.advance();

        adam_step(&mut layer, &[1.0], &[1.0], &hp(0.0, 0.0), &state).unwrap();

        // m_hat = v_hat = 1 after bias correction, so the step is lr / (1 + eps) = 0.05.
        assert!((layer.weights().get(0, 0) - 0.95).abs() < 1e-9);
        assert!((layer.biases()[0] - 0.95).abs() < 1e-9);
        assert!((layer.m_biases()[0] - 0.1).abs() < 1e-12);
        assert!((layer.v_biases()[0] - 0.001).abs() < 1e-12);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn configs_round_trip_through_json() {
        let cfg = AdamConfig {
            beta1: 0.8,
            ..AdamConfig::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(serde_json::from_str::<AdamConfig>(&json).unwrap(), cfg);

        assert_eq!(serde_json::to_string(&UpdateRule::Adam).unwrap(), "\"adam\"");
        let rule: UpdateRule = serde_json::from_str("\"momentum\"").unwrap();
        assert_eq!(rule, UpdateRule::Momentum);
    }

    #[test]
    fn update_rules_reject_mismatched_deltas() {
        let mut layer = unit_layer(1.0, 1.0);
        let state = AdamState::new(AdamConfig::default());
        assert!(momentum_step(&mut layer, &[1.0], &[1.0, 2.0], &hp(0.0, 0.0)).is_err());
        assert!(adam_step(&mut layer, &[1.0, 2.0], &[1.0], &hp(0.0, 0.0), &state).is_err());
    }
}
