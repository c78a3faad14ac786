use serde::{Serialize, Deserialize};

use crate::error::TopoResult;
use crate::math::matrix::Matrix;

/// Affine map `y = x W + b` applied to every row of `x`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Linear {
    pub in_features: usize,
    pub out_features: usize,
    /// Shape: (in_features, out_features).
    pub weights: Matrix,
    /// Shape: (1, out_features).
    pub biases: Matrix,
}

impl Linear {
    /// Weights and biases start uniform on ±1/sqrt(in_features).
    pub fn new(in_features: usize, out_features: usize) -> Linear {
        let bound = if in_features > 0 { 1.0 / (in_features as f64).sqrt() } else { 0.0 };
        Linear {
            in_features,
            out_features,
            weights: Matrix::uniform(in_features, out_features, bound),
            biases: Matrix::uniform(1, out_features, bound),
        }
    }

    pub fn forward(&self, x: &Matrix) -> TopoResult<Matrix> {
        x.matmul(&self.weights)?.add_row_broadcast(&self.biases)
    }

    /// Applies the map to a single feature vector.
    pub fn forward_vec(&self, x: Vec<f64>) -> TopoResult<Vec<f64>> {
        let mut out = self.forward(&Matrix::row_vector(x))?;
        Ok(out.data.swap_remove(0))
    }
}
