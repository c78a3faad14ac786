pub mod activation;

pub use activation::UpdateFunction;
