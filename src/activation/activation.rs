use serde::{Serialize, Deserialize};
use std::f64::consts::E;

use crate::math::matrix::Matrix;

/// Element-wise update applied to a layer's output after aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateFunction {
    Sigmoid,
    ReLU,
}

impl UpdateFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            UpdateFunction::Sigmoid => sigmoid(x),
            UpdateFunction::ReLU => if x > 0.0 { x } else { 0.0 },
        }
    }

    pub fn apply(&self, m: &Matrix) -> Matrix {
        m.map(|x| self.function(x))
    }
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + E.powf(-x))
}
