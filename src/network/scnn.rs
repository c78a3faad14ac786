use std::path::Path;

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::activation::activation::UpdateFunction;
use crate::error::{TopoError, TopoResult};
use crate::layers::{linear::Linear, scnn_layer::ScnnLayer};
use crate::math::matrix::Matrix;

/// Simplicial convolutional network for complex classification.
///
/// The last layer produces features on simplices (e.g. edges); a linear
/// readout maps each simplex to one value and the network returns the mean
/// over simplices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scnn {
    pub layers: Vec<ScnnLayer>,
    pub linear: Linear,
}

impl Scnn {
    /// Builds `n_layers` simplicial convolutions followed by a `Linear(out_channels, 1)` readout.
    ///
    /// The first layer maps `in_channels → intermediate_channels` with default
    /// normalization and no update function. Later layers carry `aggr_norm`
    /// and `update_func`; hidden ones keep `intermediate_channels` and the last
    /// one maps to `out_channels`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        in_channels: usize,
        intermediate_channels: usize,
        out_channels: usize,
        conv_order_down: usize,
        conv_order_up: usize,
        aggr_norm: bool,
        update_func: Option<UpdateFunction>,
        n_layers: usize,
    ) -> TopoResult<Scnn> {
        if n_layers == 0 {
            return Err(TopoError::InvalidConfig("scnn needs at least one layer".to_string()));
        }

        let first_out = if n_layers == 1 { out_channels } else { intermediate_channels };
        let mut layers = vec![ScnnLayer::new(
            in_channels,
            first_out,
            conv_order_down,
            conv_order_up,
            false,
            None,
        )];

        for i in 1..n_layers {
            let out = if i == n_layers - 1 { out_channels } else { intermediate_channels };
            layers.push(ScnnLayer::new(
                intermediate_channels,
                out,
                conv_order_down,
                conv_order_up,
                aggr_norm,
                update_func,
            ));
        }

        Ok(Scnn {
            layers,
            linear: Linear::new(out_channels, 1),
        })
    }

    /// Forward pass.
    ///
    /// - `x`              — (n_simplices, in_channels) features
    /// - `laplacian_down` — (n_simplices, n_simplices); `None` for nodes
    /// - `laplacian_up`   — (n_simplices, n_simplices); `None` for top-rank cells
    ///
    /// Returns a single value: the NaN-ignoring mean of the per-simplex readout,
    /// with NaN replaced by 0.
    pub fn forward(
        &self,
        x: &Matrix,
        laplacian_down: Option<&Matrix>,
        laplacian_up: Option<&Matrix>,
    ) -> TopoResult<Vec<f64>> {
        let mut current = x.clone();
        for layer in &self.layers {
            current = layer.forward(&current, laplacian_down, laplacian_up)?;
        }

        let x_1 = self.linear.forward(&current)?;
        let mean: Vec<f64> = x_1.nanmean_rows()
            .into_iter()
            .map(|v| if v.is_nan() { 0.0 } else { v })
            .collect();

        debug!(simplices = x.rows, layers = self.layers.len(), "scnn forward");
        Ok(mean)
    }

    pub fn in_channels(&self) -> usize {
        self.layers.first().map(|l| l.in_channels).unwrap_or(0)
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> TopoResult<()> {
        super::persist::save_json(self, path)
    }

    pub fn load_json(path: impl AsRef<Path>) -> TopoResult<Scnn> {
        super::persist::load_json(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge_laplacians() -> (Matrix, Matrix) {
        let down = Matrix::from_data(vec![
            vec![2.0, 1.0, -1.0],
            vec![1.0, 2.0, 1.0],
            vec![-1.0, 1.0, 2.0],
        ]).unwrap();
        let up = Matrix::from_data(vec![
            vec![1.0, -1.0, 1.0],
            vec![-1.0, 1.0, -1.0],
            vec![1.0, -1.0, 1.0],
        ]).unwrap();
        (down, up)
    }

    #[test]
    fn two_layer_stack_has_expected_widths() {
        let model = Scnn::new(3, 8, 4, 1, 1, false, None, 2).unwrap();
        assert_eq!(model.layers.len(), 2);
        assert_eq!((model.layers[0].in_channels, model.layers[0].out_channels), (3, 8));
        assert_eq!((model.layers[1].in_channels, model.layers[1].out_channels), (8, 4));
        assert_eq!(model.linear.in_features, 4);
        assert!(!model.layers[0].aggr_norm);
    }

    #[test]
    fn deeper_stack_chains_widths() {
        let model = Scnn::new(2, 5, 3, 1, 2, true, Some(UpdateFunction::ReLU), 4).unwrap();
        let widths: Vec<(usize, usize)> = model.layers.iter()
            .map(|l| (l.in_channels, l.out_channels))
            .collect();
        assert_eq!(widths, vec![(2, 5), (5, 5), (5, 5), (5, 3)]);
        assert!(model.layers[1..].iter().all(|l| l.aggr_norm));
        assert_eq!(model.layers[0].update_func, None);
    }

    #[test]
    fn forward_returns_single_value() {
        let model = Scnn::new(2, 4, 4, 1, 1, false, None, 2).unwrap();
        let (down, up) = edge_laplacians();
        let x = Matrix::random(3, 2);
        let out = model.forward(&x, Some(&down), Some(&up)).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].is_finite());
    }

    #[test]
    fn all_nan_readout_becomes_zero() {
        let mut model = Scnn::new(2, 2, 2, 0, 1, false, None, 2).unwrap();
        model.linear.biases = Matrix::row_vector(vec![f64::NAN]);
        let (_, up) = edge_laplacians();
        let out = model.forward(&Matrix::random(3, 2), None, Some(&up)).unwrap();
        assert_eq!(out, vec![0.0]);
    }

    #[test]
    fn readout_is_mean_over_simplices() {
        let mut model = Scnn::new(1, 1, 1, 0, 0, false, None, 1).unwrap();
        model.layers[0].weights[0] = Matrix::from_data(vec![vec![1.0]]).unwrap();
        model.linear.weights = Matrix::from_data(vec![vec![1.0]]).unwrap();
        model.linear.biases = Matrix::zeros(1, 1);
        let x = Matrix::from_data(vec![vec![1.0], vec![2.0], vec![6.0]]).unwrap();
        assert_eq!(model.forward(&x, None, None).unwrap(), vec![3.0]);
    }

    #[test]
    fn zero_layers_is_rejected() {
        assert!(matches!(
            Scnn::new(2, 2, 2, 1, 1, false, None, 0),
            Err(TopoError::InvalidConfig(_))
        ));
    }

    #[test]
    fn missing_operator_propagates() {
        let model = Scnn::new(2, 2, 2, 1, 1, false, None, 2).unwrap();
        let (down, _) = edge_laplacians();
        let err = model.forward(&Matrix::random(3, 2), Some(&down), None).unwrap_err();
        assert!(matches!(err, TopoError::MissingOperator("laplacian_up")));
    }
}
