use rand::Rng;

use crate::{Error, Matrix, Result, init, matrix};

/// One fully-connected transformation plus its optimizer state.
///
/// All arrays are sized once at construction and never change shape:
/// - `weights`, `weight_velocities`, `m_weights`, `v_weights`: `(out_dim, in_dim)`
/// - `biases`, `bias_velocities`, `m_biases`, `v_biases`: `(out_dim,)`
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Row `i` holds the incoming weights of output neuron `i`.
    pub(crate) weights: Matrix,
    pub(crate) biases: Vec<f64>,

    // Momentum velocities.
    pub(crate) weight_velocities: Matrix,
    pub(crate) bias_velocities: Vec<f64>,

    // Adam first/second moment estimates.
    pub(crate) m_weights: Matrix,
    pub(crate) v_weights: Matrix,
    pub(crate) m_biases: Vec<f64>,
    pub(crate) v_biases: Vec<f64>,
}

impl Layer {
    /// He-initialized weights, constant biases, zeroed optimizer state.
    pub fn new_with_rng<R: Rng + ?Sized>(in_dim: usize, out_dim: usize, rng: &mut R) -> Self {
        let weights = init::he_normal(out_dim, in_dim, rng);
        let biases = init::constant(out_dim, init::BIAS_INIT);
        Self::from_params(weights, biases)
    }

    /// Build a layer from explicit parameters.
    ///
    /// Fails unless `biases.len() == weights.rows()`.
    pub fn from_parts(weights: Matrix, biases: Vec<f64>) -> Result<Self> {
        if biases.len() != weights.rows() {
            return Err(Error::mismatch(
                "Layer::from_parts",
                weights.rows(),
                biases.len(),
            ));
        }
        Ok(Self::from_params(weights, biases))
    }

    fn from_params(weights: Matrix, biases: Vec<f64>) -> Self {
        let (out_dim, in_dim) = (weights.rows(), weights.cols());
        Self {
            weights,
            biases,
            weight_velocities: Matrix::zeros(out_dim, in_dim),
            bias_velocities: vec![0.0; out_dim],
            m_weights: Matrix::zeros(out_dim, in_dim),
            v_weights: Matrix::zeros(out_dim, in_dim),
            m_biases: vec![0.0; out_dim],
            v_biases: vec![0.0; out_dim],
        }
    }

    #[inline]
    pub fn in_dim(&self) -> usize {
        self.weights.cols()
    }

    #[inline]
    pub fn out_dim(&self) -> usize {
        self.weights.rows()
    }

    /// `W · input + b`, before any nonlinearity.
    pub fn pre_activation(&self, input: &[f64]) -> Result<Vec<f64>> {
        let weighted = matrix::matrix_vector_multiply(&self.weights, input)?;
        matrix::add_vectors(&weighted, &self.biases)
    }

    #[inline]
    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    /// Mutable access to the weights. The shape cannot be changed through it.
    #[inline]
    pub fn weights_mut(&mut self) -> &mut [f64] {
        self.weights.as_mut_slice()
    }

    #[inline]
    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    #[inline]
    pub fn biases_mut(&mut self) -> &mut [f64] {
        &mut self.biases
    }

    #[inline]
    pub fn weight_velocities(&self) -> &Matrix {
        &self.weight_velocities
    }

    #[inline]
    pub fn bias_velocities(&self) -> &[f64] {
        &self.bias_velocities
    }

    #[inline]
    pub fn m_weights(&self) -> &Matrix {
        &self.m_weights
    }

    #[inline]
    pub fn v_weights(&self) -> &Matrix {
        &self.v_weights
    }

    #[inline]
    pub fn m_biases(&self) -> &[f64] {
        &self.m_biases
    }

    #[inline]
    pub fn v_biases(&self) -> &[f64] {
        &self.v_biases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn new_layer_has_consistent_shapes_and_zeroed_state() {
        let layer = Layer::new_with_rng(3, 2, &mut StdRng::seed_from_u64(1));

        assert_eq!(layer.in_dim(), 3);
        assert_eq!(layer.out_dim(), 2);
        assert_eq!(layer.biases(), &[0.1, 0.1]);

        for state in [
            layer.weight_velocities(),
            layer.m_weights(),
            layer.v_weights(),
        ] {
            assert_eq!((state.rows(), state.cols()), (2, 3));
            assert!(state.as_slice().iter().all(|&v| v == 0.0));
        }
        for state in [layer.bias_velocities(), layer.m_biases(), layer.v_biases()] {
            assert_eq!(state, &[0.0, 0.0]);
        }
    }

    #[test]
    fn pre_activation_is_affine() {
        let weights = Matrix::from_rows(&[vec![1.0, 1.0], vec![2.0, -1.0]]).unwrap();
        let layer = Layer::from_parts(weights, vec![0.5, 0.0]).unwrap();
        assert_eq!(layer.pre_activation(&[1.0, 2.0]).unwrap(), vec![3.5, 0.0]);
        assert!(layer.pre_activation(&[1.0]).is_err());
    }

    #[test]
    fn from_parts_rejects_bias_length_mismatch() {
        let weights = Matrix::zeros(2, 3);
        assert!(Layer::from_parts(weights, vec![0.0; 3]).is_err());
    }
}
