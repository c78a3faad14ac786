use std::collections::{BTreeSet, HashMap};

use crate::error::{TopoError, TopoResult};
use crate::math::matrix::Matrix;

/// Highest simplex dimension the complex stores (triangles).
pub const MAX_RANK: usize = 2;

/// A simplicial complex up to dimension 2, closed under taking faces.
///
/// Cells of each rank are kept as sorted vertex lists in lexicographic order;
/// a cell's position in that order is its row/column in every operator.
#[derive(Debug, Clone)]
pub struct SimplicialComplex {
    cells: Vec<Vec<Vec<usize>>>,
    index: Vec<HashMap<Vec<usize>, usize>>,
}

impl SimplicialComplex {
    /// Builds the complex generated by `simplices` (each a list of vertex ids).
    pub fn new(simplices: &[Vec<usize>]) -> TopoResult<SimplicialComplex> {
        let mut by_rank: Vec<BTreeSet<Vec<usize>>> = vec![BTreeSet::new(); MAX_RANK + 1];

        for simplex in simplices {
            let mut sorted = simplex.clone();
            sorted.sort_unstable();
            sorted.dedup();
            if simplex.is_empty() {
                return Err(invalid(simplex, "simplex has no vertices"));
            }
            if sorted.len() != simplex.len() {
                return Err(invalid(simplex, "repeated vertex"));
            }
            if sorted.len() > MAX_RANK + 1 {
                return Err(invalid(simplex, "only simplices up to dimension 2 are supported"));
            }
            for face in faces_of(&sorted) {
                by_rank[face.len() - 1].insert(face);
            }
        }

        let cells: Vec<Vec<Vec<usize>>> = by_rank.into_iter()
            .map(|set| set.into_iter().collect())
            .collect();
        Ok(SimplicialComplex::from_cells(cells))
    }

    fn from_cells(cells: Vec<Vec<Vec<usize>>>) -> SimplicialComplex {
        let index = cells.iter()
            .map(|rank_cells| {
                rank_cells.iter().enumerate().map(|(i, c)| (c.clone(), i)).collect()
            })
            .collect();
        SimplicialComplex { cells, index }
    }

    /// Cells of the given rank in operator order.
    pub fn cells(&self, rank: usize) -> &[Vec<usize>] {
        self.cells.get(rank).map(|c| c.as_slice()).unwrap_or(&[])
    }

    pub fn num_cells(&self, rank: usize) -> usize {
        self.cells(rank).len()
    }

    /// Highest rank with at least one cell.
    pub fn dim(&self) -> usize {
        (0..=MAX_RANK).rev().find(|&r| self.num_cells(r) > 0).unwrap_or(0)
    }

    /// Oriented boundary matrix B_rank of shape (n_{rank-1}, n_rank).
    /// Face i of [v_0, …, v_k] (v_i removed) carries sign (-1)^i.
    pub fn incidence_matrix(&self, rank: usize) -> TopoResult<Matrix> {
        if rank == 0 || rank > MAX_RANK {
            return Err(TopoError::InvalidConfig(format!(
                "incidence matrix is defined for ranks 1..={MAX_RANK}, got {rank}"
            )));
        }
        let mut b = Matrix::zeros(self.num_cells(rank - 1), self.num_cells(rank));
        for (j, cell) in self.cells(rank).iter().enumerate() {
            for i in 0..cell.len() {
                let mut face = cell.clone();
                face.remove(i);
                let row = self.index[rank - 1][&face];
                b.data[row][j] = if i % 2 == 0 { 1.0 } else { -1.0 };
            }
        }
        Ok(b)
    }

    /// B_rankᵀ B_rank, shape (n_rank, n_rank).
    pub fn down_laplacian(&self, rank: usize) -> TopoResult<Matrix> {
        if rank == 0 {
            return Err(TopoError::MissingOperator("down laplacian of rank 0"));
        }
        let b = self.incidence_matrix(rank)?;
        b.transpose().matmul(&b)
    }

    /// B_{rank+1} B_{rank+1}ᵀ, shape (n_rank, n_rank).
    pub fn up_laplacian(&self, rank: usize) -> TopoResult<Matrix> {
        if rank >= MAX_RANK {
            return Err(TopoError::MissingOperator("up laplacian of the top rank"));
        }
        let b = self.incidence_matrix(rank + 1)?;
        b.matmul(&b.transpose())
    }

    /// Both Laplacians of a rank, `None` where the operator does not exist.
    pub fn laplacians(&self, rank: usize) -> TopoResult<(Option<Matrix>, Option<Matrix>)> {
        if rank > MAX_RANK {
            return Err(TopoError::InvalidConfig(format!("rank {rank} exceeds {MAX_RANK}")));
        }
        let down = if rank > 0 { Some(self.down_laplacian(rank)?) } else { None };
        let up = if rank < MAX_RANK { Some(self.up_laplacian(rank)?) } else { None };
        Ok((down, up))
    }

    /// Hodge Laplacian L_down + L_up.
    pub fn hodge_laplacian(&self, rank: usize) -> TopoResult<Matrix> {
        match self.laplacians(rank)? {
            (Some(down), Some(up)) => down.add(&up),
            (Some(only), None) | (None, Some(only)) => Ok(only),
            (None, None) => Ok(Matrix::zeros(self.num_cells(rank), self.num_cells(rank))),
        }
    }
}

/// Every non-empty sorted subset of `simplex`.
fn faces_of(simplex: &[usize]) -> Vec<Vec<usize>> {
    let n = simplex.len();
    (1u32..(1 << n))
        .map(|mask| {
            simplex.iter().enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, &v)| v)
                .collect()
        })
        .collect()
}

fn invalid(cell: &[usize], reason: &str) -> TopoError {
    TopoError::InvalidCell { cell: cell.to_vec(), reason: reason.to_string() }
}
