//! Small CPU neural-network toolkit for the training crates.
//!
//! Provides plain `Vec<f32>` tensors, dense layers with hand-written
//! backward passes, an [`Mlp`] container, an [`Adam`] optimizer and the
//! flat parameter-vector codec used by the evolutionary search.

pub mod codec;
pub mod nn;
pub mod optim;
pub mod tensor;

pub use nn::{Activation, Dense, Grads, Mlp, MlpCache};
pub use optim::Adam;
pub use tensor::Tensor;
