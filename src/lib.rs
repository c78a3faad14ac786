pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod topology;

// Convenience re-exports
pub use error::{TopoError, TopoResult};
pub use math::matrix::Matrix;
pub use activation::activation::UpdateFunction;
pub use layers::{Linear, ScnnLayer, UniGinLayer};
pub use network::{Model, ModelSpec, Scnn, UniGin};
pub use topology::{Hypergraph, SimplicialComplex, Topology, TopologySpec};
