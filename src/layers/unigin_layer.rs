use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::error::TopoResult;
use crate::layers::linear::Linear;
use crate::math::matrix::Matrix;

/// GIN-style message passing on a hypergraph.
///
/// Two sum-aggregations through the incidence matrix B (nodes × hyperedges):
/// nodes to hyperedges, then hyperedges back to nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniGinLayer {
    pub in_channels: usize,
    pub eps: f64,
    pub linear: Linear,
}

impl UniGinLayer {
    pub fn new(in_channels: usize, eps: f64) -> UniGinLayer {
        UniGinLayer {
            in_channels,
            eps,
            linear: Linear::new(in_channels, in_channels),
        }
    }

    /// Returns the updated node features and the hyperedge messages.
    ///
    /// - `x_0`         — (n_nodes, in_channels)
    /// - `incidence_1` — (n_nodes, n_hyperedges)
    pub fn forward(&self, x_0: &Matrix, incidence_1: &Matrix) -> TopoResult<(Matrix, Matrix)> {
        let x_1 = incidence_1.transpose().matmul(x_0)?;
        let m_0 = incidence_1.matmul(&x_1)?;
        let x_0 = self.linear.forward(&x_0.scale(1.0 + self.eps).add(&m_0)?)?;

        debug!(nodes = x_0.rows, hyperedges = x_1.rows, channels = x_0.cols, "unigin layer forward");

        Ok((x_0, x_1))
    }
}
