pub mod model;
pub mod persist;
pub mod scnn;
pub mod spec;
pub mod unigin;

pub use model::Model;
pub use scnn::Scnn;
pub use spec::{Architecture, ModelSpec, ScnnSpec, UniGinSpec};
pub use unigin::UniGin;
