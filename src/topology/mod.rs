pub mod hypergraph;
pub mod simplicial;
pub mod spec;

pub use hypergraph::Hypergraph;
pub use simplicial::SimplicialComplex;
pub use spec::{Topology, TopologySpec};
