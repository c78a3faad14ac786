pub mod linear;
pub mod scnn_layer;
pub mod unigin_layer;

pub use linear::Linear;
pub use scnn_layer::ScnnLayer;
pub use unigin_layer::UniGinLayer;
