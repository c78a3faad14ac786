use crate::error::{TopoError, TopoResult};
use crate::math::matrix::Matrix;

/// Hypergraph on nodes `0..num_nodes`; each hyperedge is a set of nodes.
#[derive(Debug, Clone)]
pub struct Hypergraph {
    pub num_nodes: usize,
    pub hyperedges: Vec<Vec<usize>>,
}

impl Hypergraph {
    pub fn new(num_nodes: usize, hyperedges: Vec<Vec<usize>>) -> TopoResult<Hypergraph> {
        for edge in &hyperedges {
            if edge.is_empty() {
                return Err(invalid(edge, "hyperedge has no nodes".to_string()));
            }
            if let Some(&node) = edge.iter().find(|&&n| n >= num_nodes) {
                return Err(invalid(edge, format!("node {node} out of range for {num_nodes} nodes")));
            }
            let mut sorted = edge.clone();
            sorted.sort_unstable();
            sorted.dedup();
            if sorted.len() != edge.len() {
                return Err(invalid(edge, "repeated node".to_string()));
            }
        }
        Ok(Hypergraph { num_nodes, hyperedges })
    }

    pub fn num_hyperedges(&self) -> usize {
        self.hyperedges.len()
    }

    /// Incidence matrix of shape (num_nodes, num_hyperedges) with 1 where the
    /// node belongs to the hyperedge.
    pub fn incidence_matrix(&self) -> Matrix {
        let mut b = Matrix::zeros(self.num_nodes, self.hyperedges.len());
        for (j, edge) in self.hyperedges.iter().enumerate() {
            for &node in edge {
                b.data[node][j] = 1.0;
            }
        }
        b
    }
}

fn invalid(cell: &[usize], reason: String) -> TopoError {
    TopoError::InvalidCell { cell: cell.to_vec(), reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incidence_marks_membership() {
        let hg = Hypergraph::new(4, vec![vec![0, 1, 2], vec![2, 3]]).unwrap();
        let b = hg.incidence_matrix();
        assert_eq!(b.shape(), (4, 2));
        assert_eq!(b.data, vec![
            vec![1.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 1.0],
        ]);
        let memberships: f64 = b.data.iter().flatten().sum();
        assert_eq!(memberships, 5.0);
    }

    #[test]
    fn isolated_nodes_have_empty_rows() {
        let hg = Hypergraph::new(3, vec![vec![0, 1]]).unwrap();
        assert_eq!(hg.incidence_matrix().data[2], vec![0.0]);
    }

    #[test]
    fn rejects_out_of_range_nodes() {
        let err = Hypergraph::new(2, vec![vec![0, 2]]).unwrap_err();
        assert!(matches!(err, TopoError::InvalidCell { .. }));
    }

    #[test]
    fn rejects_empty_and_repeated() {
        assert!(Hypergraph::new(2, vec![vec![]]).is_err());
        assert!(Hypergraph::new(2, vec![vec![1, 1]]).is_err());
    }
}
