use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::{TopoError, TopoResult};
use crate::topology::hypergraph::Hypergraph;
use crate::topology::simplicial::{SimplicialComplex, MAX_RANK};

fn default_rank() -> usize {
    1
}

/// JSON description of the structure a model runs on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopologySpec {
    /// Maximal simplices of a complex; features live on cells of `rank`.
    Simplicial {
        simplices: Vec<Vec<usize>>,
        #[serde(default = "default_rank")]
        rank: usize,
    },
    Hypergraph {
        num_nodes: usize,
        hyperedges: Vec<Vec<usize>>,
    },
}

/// A built structure ready to produce operators.
#[derive(Debug, Clone)]
pub enum Topology {
    Simplicial { complex: SimplicialComplex, rank: usize },
    Hypergraph(Hypergraph),
}

impl TopologySpec {
    pub fn build(&self) -> TopoResult<Topology> {
        match self {
            TopologySpec::Simplicial { simplices, rank } => {
                if *rank > MAX_RANK {
                    return Err(TopoError::InvalidConfig(format!(
                        "feature rank {rank} exceeds {MAX_RANK}"
                    )));
                }
                Ok(Topology::Simplicial {
                    complex: SimplicialComplex::new(simplices)?,
                    rank: *rank,
                })
            }
            TopologySpec::Hypergraph { num_nodes, hyperedges } => {
                Ok(Topology::Hypergraph(Hypergraph::new(*num_nodes, hyperedges.clone())?))
            }
        }
    }

    pub fn load_json(path: impl AsRef<Path>) -> TopoResult<TopologySpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Topology {
    /// Number of cells that carry features.
    pub fn num_feature_cells(&self) -> usize {
        match self {
            Topology::Simplicial { complex, rank } => complex.num_cells(*rank),
            Topology::Hypergraph(hg) => hg.num_nodes,
        }
    }
}
