use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::activation::activation::UpdateFunction;
use crate::error::{TopoError, TopoResult};
use crate::math::matrix::Matrix;

/// Gain used for the Xavier-normal weight initialization.
const INIT_GAIN: f64 = 1.414;

/// Simplicial convolution layer.
///
/// Convolves features on k-simplices with polynomials of the lower and upper
/// Laplacians:
///
///   y = x W_0 + Σ_{i=1..p} L_down^i x W_i + Σ_{j=1..q} L_up^j x W_{p+j}
///
/// where `p = conv_order_down` and `q = conv_order_up`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScnnLayer {
    pub in_channels: usize,
    pub out_channels: usize,
    pub conv_order_down: usize,
    pub conv_order_up: usize,
    /// Divide every power above the first by the number of simplices.
    pub aggr_norm: bool,
    pub update_func: Option<UpdateFunction>,
    /// `1 + conv_order_down + conv_order_up` matrices of shape
    /// (in_channels, out_channels): identity term, down terms, up terms.
    pub weights: Vec<Matrix>,
}

impl ScnnLayer {
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        conv_order_down: usize,
        conv_order_up: usize,
        aggr_norm: bool,
        update_func: Option<UpdateFunction>,
    ) -> ScnnLayer {
        let n_terms = 1 + conv_order_down + conv_order_up;
        // Fans of a (in, out, n_terms) tensor.
        let fan_in = out_channels * n_terms;
        let fan_out = in_channels * n_terms;
        let weights = (0..n_terms)
            .map(|_| Matrix::xavier_normal(in_channels, out_channels, fan_in, fan_out, INIT_GAIN))
            .collect();

        ScnnLayer {
            in_channels,
            out_channels,
            conv_order_down,
            conv_order_up,
            aggr_norm,
            update_func,
            weights,
        }
    }

    /// Powers `L x, L² x, …, L^order x`.
    fn chebyshev_conv(&self, operator: &Matrix, order: usize, x: &Matrix) -> TopoResult<Vec<Matrix>> {
        let num_simplices = x.rows as f64;
        let mut terms: Vec<Matrix> = Vec::with_capacity(order);
        let mut current = operator.matmul(x)?;
        for k in 0..order {
            if k > 0 {
                current = operator.matmul(&current)?;
                if self.aggr_norm {
                    current = current.scale(1.0 / num_simplices);
                }
            }
            terms.push(current.clone());
        }
        Ok(terms)
    }

    /// `x`: (n_simplices, in_channels). Laplacians: (n_simplices, n_simplices).
    /// A Laplacian may be `None` only when its convolution order is zero.
    pub fn forward(
        &self,
        x: &Matrix,
        laplacian_down: Option<&Matrix>,
        laplacian_up: Option<&Matrix>,
    ) -> TopoResult<Matrix> {
        let mut terms = vec![x.clone()];

        if self.conv_order_down > 0 {
            let l_down = laplacian_down.ok_or(TopoError::MissingOperator("laplacian_down"))?;
            terms.extend(self.chebyshev_conv(l_down, self.conv_order_down, x)?);
        }
        if self.conv_order_up > 0 {
            let l_up = laplacian_up.ok_or(TopoError::MissingOperator("laplacian_up"))?;
            terms.extend(self.chebyshev_conv(l_up, self.conv_order_up, x)?);
        }

        let mut y = Matrix::zeros(x.rows, self.out_channels);
        for (term, weight) in terms.iter().zip(self.weights.iter()) {
            y = y.add(&term.matmul(weight)?)?;
        }

        debug!(
            simplices = x.rows,
            in_channels = x.cols,
            out_channels = y.cols,
            terms = terms.len(),
            "scnn layer forward"
        );

        Ok(match self.update_func {
            Some(update) => update.apply(&y),
            None => y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_laplacian() -> Matrix {
        Matrix::from_data(vec![
            vec![1.0, -1.0, 0.0],
            vec![-1.0, 2.0, -1.0],
            vec![0.0, -1.0, 1.0],
        ]).unwrap()
    }

    #[test]
    fn zero_orders_reduce_to_linear_map() {
        let mut layer = ScnnLayer::new(2, 2, 0, 0, false, None);
        assert_eq!(layer.weights.len(), 1);
        layer.weights[0] = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();

        let x = Matrix::from_data(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        let y = layer.forward(&x, None, None).unwrap();
        assert_eq!(y.data, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn weight_count_follows_orders() {
        let layer = ScnnLayer::new(3, 4, 2, 3, false, None);
        assert_eq!(layer.weights.len(), 6);
        assert!(layer.weights.iter().all(|w| w.shape() == (3, 4)));
    }

    #[test]
    fn down_term_uses_laplacian_power() {
        let mut layer = ScnnLayer::new(1, 1, 2, 0, false, None);
        // Only the second power contributes.
        layer.weights = vec![
            Matrix::zeros(1, 1),
            Matrix::zeros(1, 1),
            Matrix::from_data(vec![vec![1.0]]).unwrap(),
        ];
        let l = path_laplacian();
        let x = Matrix::from_data(vec![vec![1.0], vec![0.0], vec![0.0]]).unwrap();

        let y = layer.forward(&x, Some(&l), None).unwrap();
        let expected = l.matmul(&l.matmul(&x).unwrap()).unwrap();
        assert_eq!(y, expected);
    }

    #[test]
    fn aggr_norm_divides_higher_powers() {
        let mut layer = ScnnLayer::new(1, 1, 0, 2, true, None);
        layer.weights = vec![
            Matrix::zeros(1, 1),
            Matrix::zeros(1, 1),
            Matrix::from_data(vec![vec![1.0]]).unwrap(),
        ];
        let l = path_laplacian();
        let x = Matrix::from_data(vec![vec![1.0], vec![0.0], vec![0.0]]).unwrap();

        let y = layer.forward(&x, None, Some(&l)).unwrap();
        let expected = l.matmul(&l.matmul(&x).unwrap()).unwrap().scale(1.0 / 3.0);
        assert_eq!(y, expected);
    }

    #[test]
    fn missing_laplacian_is_an_error() {
        let layer = ScnnLayer::new(1, 1, 1, 1, false, None);
        let x = Matrix::zeros(3, 1);
        let l = path_laplacian();
        let err = layer.forward(&x, None, Some(&l)).unwrap_err();
        assert!(matches!(err, TopoError::MissingOperator("laplacian_down")));
    }

    #[test]
    fn update_func_is_applied() {
        let mut layer = ScnnLayer::new(1, 1, 0, 0, false, Some(UpdateFunction::ReLU));
        layer.weights[0] = Matrix::from_data(vec![vec![-1.0]]).unwrap();
        let x = Matrix::from_data(vec![vec![2.0], vec![-3.0]]).unwrap();
        let y = layer.forward(&x, None, None).unwrap();
        assert_eq!(y.data, vec![vec![0.0], vec![3.0]]);
    }
}
