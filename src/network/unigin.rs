use std::path::Path;

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::activation::activation::sigmoid;
use crate::error::{TopoError, TopoResult};
use crate::layers::{linear::Linear, unigin_layer::UniGinLayer};
use crate::math::matrix::Matrix;

/// Hypergraph isomorphism network built from `UniGinLayer`s.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniGin {
    pub linear_init: Linear,
    pub layers: Vec<UniGinLayer>,
    pub linear_out: Linear,
}

impl UniGin {
    pub fn new(
        in_channels_node: usize,
        intermediate_channels: usize,
        out_channels: usize,
        n_layers: usize,
    ) -> UniGin {
        let layers = (0..n_layers)
            .map(|_| UniGinLayer::new(intermediate_channels, 0.0))
            .collect();
        UniGin {
            linear_init: Linear::new(in_channels_node, intermediate_channels),
            layers,
            linear_out: Linear::new(intermediate_channels, out_channels),
        }
    }

    /// Runs the message-passing stack and returns the final node and
    /// hyperedge features. With no layers the hyperedge features are the
    /// plain sums `Bᵀ x_0` of the embedded nodes.
    pub fn embed(&self, x_0: &Matrix, incidence_1: &Matrix) -> TopoResult<(Matrix, Matrix)> {
        let mut x_0 = self.linear_init.forward(x_0)?;
        let mut x_1 = incidence_1.transpose().matmul(&x_0)?;
        for layer in &self.layers {
            (x_0, x_1) = layer.forward(&x_0, incidence_1)?;
        }
        Ok((x_0, x_1))
    }

    /// Forward pass.
    ///
    /// - `x_0`         — (n_nodes, in_channels_node)
    /// - `incidence_1` — (n_nodes, n_hyperedges)
    ///
    /// Node features are max-pooled, projected to `out_channels` and squashed
    /// with a sigmoid.
    pub fn forward(&self, x_0: &Matrix, incidence_1: &Matrix) -> TopoResult<Vec<f64>> {
        if x_0.rows == 0 {
            return Err(TopoError::EmptyInput("unigin needs at least one node"));
        }
        let (nodes, _) = self.embed(x_0, incidence_1)?;
        let pooled = nodes.max_rows().ok_or(TopoError::EmptyInput("no node features to pool"))?;
        let out = self.linear_out.forward_vec(pooled)?;

        debug!(nodes = x_0.rows, hyperedges = incidence_1.cols, layers = self.layers.len(), "unigin forward");
        Ok(out.into_iter().map(sigmoid).collect())
    }

    pub fn in_channels(&self) -> usize {
        self.linear_init.in_features
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> TopoResult<()> {
        super::persist::save_json(self, path)
    }

    pub fn load_json(path: impl AsRef<Path>) -> TopoResult<UniGin> {
        super::persist::load_json(path)
    }
}
