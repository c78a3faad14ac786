use rand::prelude::*;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;

use crate::error::{TopoError, TopoResult};

/// Dense row-major matrix. Feature matrices are `[n_cells, channels]`;
/// structural operators (incidence, Laplacians) use the same type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

/// Unchecked wire form of `Matrix`; converted through `from_data` on load.
#[derive(Deserialize)]
struct RawMatrix {
    rows: usize,
    cols: usize,
    data: Vec<Vec<f64>>,
}

impl TryFrom<RawMatrix> for Matrix {
    type Error = TopoError;

    fn try_from(raw: RawMatrix) -> TopoResult<Matrix> {
        let declared = (raw.rows, raw.cols);
        let checked = Matrix::from_data(raw.data)?;
        // An empty matrix keeps its declared column count.
        if checked.rows == 0 && raw.rows == 0 {
            return Ok(Matrix::zeros(0, raw.cols));
        }
        if checked.shape() != declared {
            return Err(TopoError::ShapeMismatch {
                op: "deserialize",
                left: declared,
                right: checked.shape(),
            });
        }
        Ok(checked)
    }
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    pub fn identity(n: usize) -> Matrix {
        let mut res = Matrix::zeros(n, n);
        for i in 0..n {
            res.data[i][i] = 1.0;
        }
        res
    }

    /// Uniform samples on [0, 1), matching `torch.rand`.
    pub fn random(rows: usize, cols: usize) -> Matrix {
        let mut rng = rand::thread_rng();
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = rng.gen::<f64>();
            }
        }

        res
    }

    /// Uniform samples on [-bound, bound].
    pub fn uniform(rows: usize, cols: usize, bound: f64) -> Matrix {
        let mut rng = rand::thread_rng();
        let mut res = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = (rng.gen::<f64>() * 2.0 - 1.0) * bound;
            }
        }
        res
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal(rng: &mut ThreadRng) -> f64 {
        // (0, 1] keeps log() finite.
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Samples from N(0, std_dev²).
    pub fn normal(rows: usize, cols: usize, std_dev: f64) -> Matrix {
        let mut rng = rand::thread_rng();
        let mut res = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = Matrix::sample_standard_normal(&mut rng) * std_dev;
            }
        }
        res
    }

    /// Xavier (Glorot) normal initialization:
    /// N(0, gain² · 2 / (fan_in + fan_out)).
    ///
    /// The fans are passed explicitly because a layer may split one logical
    /// weight tensor into several matrices (see `ScnnLayer`).
    pub fn xavier_normal(rows: usize, cols: usize, fan_in: usize, fan_out: usize, gain: f64) -> Matrix {
        let std_dev = gain * (2.0 / (fan_in + fan_out) as f64).sqrt();
        Matrix::normal(rows, cols, std_dev)
    }

    /// Builds a matrix from row vectors. Every row must have the same length.
    pub fn from_data(data: Vec<Vec<f64>>) -> TopoResult<Matrix> {
        let cols = data.first().map(|row| row.len()).unwrap_or(0);
        if let Some((row, found)) = data.iter().enumerate()
            .map(|(i, r)| (i, r.len()))
            .find(|&(_, len)| len != cols)
        {
            return Err(TopoError::RaggedRows { row, found, expected: cols });
        }
        Ok(Matrix {
            rows: data.len(),
            cols,
            data
        })
    }

    /// A single-row matrix.
    pub fn row_vector(values: Vec<f64>) -> Matrix {
        Matrix { rows: 1, cols: values.len(), data: vec![values] }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Matrix product `self · rhs`.
    pub fn matmul(&self, rhs: &Matrix) -> TopoResult<Matrix> {
        if self.cols != rhs.rows {
            return Err(TopoError::ShapeMismatch {
                op: "matmul",
                left: self.shape(),
                right: rhs.shape(),
            });
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        Ok(res)
    }

    /// Element-wise sum of two same-shape matrices.
    pub fn add(&self, rhs: &Matrix) -> TopoResult<Matrix> {
        self.zip_with(rhs, "add", |a, b| a + b)
    }

    /// Adds a `[1, cols]` row to every row of `self`.
    pub fn add_row_broadcast(&self, row: &Matrix) -> TopoResult<Matrix> {
        if row.rows != 1 || row.cols != self.cols {
            return Err(TopoError::ShapeMismatch {
                op: "add_row_broadcast",
                left: self.shape(),
                right: row.shape(),
            });
        }
        let bias = &row.data[0];
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter()
                .map(|r| r.iter().zip(bias.iter()).map(|(x, b)| x + b).collect())
                .collect(),
        })
    }

    fn zip_with<F>(&self, rhs: &Matrix, op: &'static str, f: F) -> TopoResult<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.shape() != rhs.shape() {
            return Err(TopoError::ShapeMismatch { op, left: self.shape(), right: rhs.shape() });
        }
        let data = self.data.iter().zip(rhs.data.iter())
            .map(|(row_a, row_b)| {
                row_a.iter().zip(row_b.iter()).map(|(&x, &y)| f(x, y)).collect()
            })
            .collect();
        Ok(Matrix { rows: self.rows, cols: self.cols, data })
    }

    /// Mean of every column over the rows, ignoring NaN entries.
    /// A column holding only NaN yields NaN.
    pub fn nanmean_rows(&self) -> Vec<f64> {
        (0..self.cols)
            .map(|j| {
                let (sum, count) = self.data.iter()
                    .map(|row| row[j])
                    .filter(|x| !x.is_nan())
                    .fold((0.0, 0usize), |(s, c), x| (s + x, c + 1));
                if count == 0 { f64::NAN } else { sum / count as f64 }
            })
            .collect()
    }

    /// Maximum of every column over the rows. `None` when there are no rows.
    /// A NaN anywhere in a column makes that column's maximum NaN.
    pub fn max_rows(&self) -> Option<Vec<f64>> {
        if self.rows == 0 {
            return None;
        }
        Some((0..self.cols)
            .map(|j| {
                self.data.iter()
                    .map(|row| row[j])
                    .fold(f64::NEG_INFINITY, |acc, x| {
                        if acc.is_nan() || x.is_nan() { f64::NAN } else { acc.max(x) }
                    })
            })
            .collect())
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}
