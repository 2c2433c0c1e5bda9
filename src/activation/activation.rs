use serde::{Serialize, Deserialize};
use std::f32::consts::E;

use crate::math::matrix::Matrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    ReLU,
    Sigmoid,
    /// Hyperbolic tangent rescaled into `(0, 1)`: `tanh(x) * 0.5 + 0.5`.
    Tanh,
    /// Softmax is a vector-valued activation; it normalizes each row in
    /// `apply()`. The scalar `function()` leaves values untouched for it.
    Softmax,
}

impl ActivationFunction {
    /// Element-wise activation of a single pre-activation value.
    pub fn function(&self, x: f32) -> f32 {
        match self {
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            // Kept rescaled to (0, 1) for compatibility with existing networks.
            ActivationFunction::Tanh => x.tanh() * 0.5 + 0.5,
            ActivationFunction::Softmax => x,
        }
    }

    /// Applies the activation to a whole pre-activation matrix in place.
    ///
    /// Each row is one example, so `Softmax` normalizes row by row.
    pub fn apply(&self, z: &mut Matrix) {
        match self {
            ActivationFunction::Softmax => softmax_rows(z),
            _ => z.apply(|x| self.function(x)),
        }
    }
}

/// Numerically stable softmax over every row: `exp(x - max) / sum`.
///
/// Non-finite pre-activations (a NaN, or a row that is all `-inf`) give NaN
/// output for the whole row.
fn softmax_rows(z: &mut Matrix) {
    let cols = z.cols();
    if cols == 0 {
        return;
    }

    for row in z.as_mut_slice().chunks_exact_mut(cols) {
        let max = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let mut sum = 0.0;
        for x in row.iter_mut() {
            *x = (*x - max).exp();
            sum += *x;
        }
        for x in row.iter_mut() {
            *x /= sum;
        }
    }
}
