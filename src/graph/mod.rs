//! Model execution engine
//!
//! Feed-forward computation graphs over `ndarray` batches with manual
//! forward/backward passes:
//!
//! - `Dense`, `BatchNorm`, `Dropout`, `Activation` transformation stages
//! - `LayerStack` sequential composition
//! - `Architecture`: a compiled graph with either a single stack or two
//!   parallel branches fused by concatenation into a shared head
//!
//! Training mode caches intermediate values for backprop and mutates
//! parameters in place; the inference path is cache-free and pure.

mod activation;
mod architecture;
mod dense;
mod dropout;
mod loss;
mod norm;
mod stack;


pub use activation::{Activation, ActivationKind};
pub use architecture::{Architecture, BatchInput};
pub use dense::Dense;
pub use dropout::Dropout;
pub use loss::{BinaryCrossEntropy, Loss};
pub use norm::BatchNorm;
pub use stack::{Layer, LayerStack, NamedParam};
