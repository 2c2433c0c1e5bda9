use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{Result, SwanError};
use crate::math::matrix::Matrix;

/// One fully connected stage of a network.
///
/// `weights` is `input_size x size` and `biases` is `1 x size`, so a batch of
/// inputs shaped `n x input_size` maps to outputs shaped `n x size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    weights: Matrix,
    biases: Matrix,
    activator: ActivationFunction,
}

impl Layer {
    /// Allocates a zero-filled layer.
    pub fn new(size: usize, input_size: usize, activation: ActivationFunction) -> Layer {
        Layer {
            weights: Matrix::zeros(input_size, size),
            biases: Matrix::zeros(1, size),
            activator: activation,
        }
    }

    /// Number of neurons, i.e. the width of this layer's output.
    pub fn size(&self) -> usize {
        self.weights.cols()
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows()
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> &Matrix {
        &self.biases
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activator
    }

    /// Replaces the weights. The new matrix must keep the layer's shape.
    pub fn set_weights(&mut self, weights: Matrix) -> Result<()> {
        if weights.shape() != self.weights.shape() {
            return Err(SwanError::ShapeMismatch {
                expected: self.weights.shape(),
                found: weights.shape(),
            });
        }
        self.weights = weights;
        Ok(())
    }

    pub fn set_biases(&mut self, biases: Matrix) -> Result<()> {
        if biases.shape() != self.biases.shape() {
            return Err(SwanError::ShapeMismatch {
                expected: self.biases.shape(),
                found: biases.shape(),
            });
        }
        self.biases = biases;
        Ok(())
    }

    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.weights.randomize(rng);
        self.biases.randomize(rng);
    }

    /// `activation(input * W + b)`, with `b` added to every row of the batch.
    pub fn feed_from(&self, input: &Matrix) -> Result<Matrix> {
        let mut z = input.multiply(&self.weights)?;
        z.add_row_broadcast(&self.biases)?;
        self.activator.apply(&mut z);
        Ok(z)
    }

    /// Shape and buffer checks for a layer that did not come from `new`.
    pub(crate) fn validate(&self, expected_input: usize) -> Result<()> {
        if !self.weights.is_consistent() || !self.biases.is_consistent() {
            return Err(SwanError::InvalidConfiguration(
                "layer buffer length does not match its declared shape".to_owned(),
            ));
        }
        if self.size() == 0 {
            return Err(SwanError::InvalidConfiguration(
                "layer has no neurons".to_owned(),
            ));
        }
        if self.input_size() != expected_input {
            return Err(SwanError::InvalidConfiguration(format!(
                "layer expects {} inputs but the previous stage produces {}",
                self.input_size(),
                expected_input
            )));
        }
        if self.biases.shape() != (1, self.size()) {
            return Err(SwanError::InvalidConfiguration(format!(
                "bias shape {}x{} does not match {} neurons",
                self.biases.rows(),
                self.biases.cols(),
                self.size()
            )));
        }
        Ok(())
    }
}
