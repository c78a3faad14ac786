use std::path::Path;

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::error::{TopoError, TopoResult};
use crate::math::matrix::Matrix;
use crate::network::scnn::Scnn;
use crate::network::unigin::UniGin;
use crate::topology::spec::Topology;

/// Any of the supported architectures, with its weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "model", content = "weights")]
pub enum Model {
    #[serde(rename = "scnn")]
    Scnn(Scnn),
    #[serde(rename = "unigin")]
    UniGin(UniGin),
}

impl Model {
    /// Feature width the model expects on its input cells.
    pub fn in_channels(&self) -> usize {
        match self {
            Model::Scnn(m) => m.in_channels(),
            Model::UniGin(m) => m.in_channels(),
        }
    }

    /// Derives the structural operators from `topology` and runs the model.
    ///
    /// SCNN runs on simplicial complexes (Laplacians of the feature rank),
    /// UniGIN on hypergraphs (node-hyperedge incidence).
    pub fn forward_on(&self, topology: &Topology, features: &Matrix) -> TopoResult<Vec<f64>> {
        match (self, topology) {
            (Model::Scnn(m), Topology::Simplicial { complex, rank }) => {
                let (down, up) = complex.laplacians(*rank)?;
                debug!(rank, cells = complex.num_cells(*rank), "derived laplacians");
                m.forward(features, down.as_ref(), up.as_ref())
            }
            (Model::UniGin(m), Topology::Hypergraph(hg)) => {
                m.forward(features, &hg.incidence_matrix())
            }
            (Model::Scnn(_), Topology::Hypergraph(_)) => Err(TopoError::InvalidConfig(
                "scnn runs on simplicial complexes, got a hypergraph".to_string(),
            )),
            (Model::UniGin(_), Topology::Simplicial { .. }) => Err(TopoError::InvalidConfig(
                "unigin runs on hypergraphs, got a simplicial complex".to_string(),
            )),
        }
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> TopoResult<()> {
        super::persist::save_json(self, path)
    }

    pub fn load_json(path: impl AsRef<Path>) -> TopoResult<Model> {
        super::persist::load_json(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::spec::TopologySpec;

    fn triangle_edges() -> Topology {
        TopologySpec::Simplicial { simplices: vec![vec![0, 1, 2], vec![2, 3]], rank: 1 }
            .build()
            .unwrap()
    }

    #[test]
    fn scnn_runs_on_edges() {
        let model = Model::Scnn(Scnn::new(2, 4, 4, 1, 1, false, None, 2).unwrap());
        let topology = triangle_edges();
        let x = Matrix::random(topology.num_feature_cells(), model.in_channels());
        assert_eq!(model.forward_on(&topology, &x).unwrap().len(), 1);
    }

    #[test]
    fn scnn_on_nodes_needs_no_down_order() {
        let model = Model::Scnn(Scnn::new(1, 2, 2, 0, 2, false, None, 2).unwrap());
        let topology = TopologySpec::Simplicial { simplices: vec![vec![0, 1, 2]], rank: 0 }
            .build()
            .unwrap();
        let x = Matrix::random(3, 1);
        assert!(model.forward_on(&topology, &x).is_ok());
    }

    #[test]
    fn mismatched_topology_is_rejected() {
        let model = Model::UniGin(UniGin::new(2, 2, 2, 1));
        let err = model.forward_on(&triangle_edges(), &Matrix::random(4, 2)).unwrap_err();
        assert!(matches!(err, TopoError::InvalidConfig(_)));
    }

    #[test]
    fn weights_survive_json() {
        let model = Model::UniGin(UniGin::new(2, 3, 1, 2));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let path = path.to_str().unwrap();

        model.save_json(path).unwrap();
        let loaded = Model::load_json(path).unwrap();

        let hg = TopologySpec::Hypergraph { num_nodes: 3, hyperedges: vec![vec![0, 1], vec![1, 2]] }
            .build()
            .unwrap();
        let x = Matrix::random(3, 2);
        let before = model.forward_on(&hg, &x).unwrap();
        let after = loaded.forward_on(&hg, &x).unwrap();
        assert_eq!(before.len(), after.len());
        for (a, b) in before.iter().zip(after.iter()) {
            assert!((a - b).abs() < 1e-9, "{a} vs {b}");
        }
    }

    #[test]
    fn corrupted_weights_fail_to_load() {
        let model = Model::UniGin(UniGin::new(2, 2, 1, 1));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        model.save_json(&path).unwrap();

        let mut value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        value["weights"]["linear_init"]["weights"]["data"] = serde_json::json!([[0.1, 0.2]]);
        std::fs::write(&path, value.to_string()).unwrap();

        let err = Model::load_json(&path).unwrap_err();
        assert!(matches!(err, TopoError::Json(_)), "{err}");
    }
}
