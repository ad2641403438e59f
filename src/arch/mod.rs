//! Classifier architectures
//!
//! Each architecture is a plain value implementing the
//! [`ArchitectureSpec`] capability: a stateless specification consumed
//! exactly once when a [`NeuralNetwork`](crate::NeuralNetwork) is
//! constructed. Three concrete specifications are provided:
//!
//! - [`Mlp`]: shallow multilayer perceptron, no regularization
//! - [`Ffnn`]: deep feed-forward network with normalized, dropout-
//!   regularized projection blocks
//! - [`MultiModal`]: dual-input network fusing two branch encoders by
//!   concatenation, wrapped by [`MultiModalNetwork`] for its positional
//!   fit signature

mod ffnn;
mod fusion;
mod mlp;

use crate::error::{Error, Result};
use crate::graph::{
    Activation, ActivationKind, Architecture, BatchNorm, Dense, Dropout, Layer,
};

pub use ffnn::Ffnn;
pub use fusion::{MultiModal, MultiModalNetwork};
pub use mlp::Mlp;

/// Dropout retention complement used by every regularized stage.
const DROPOUT_RATE: f32 = 0.3;

/// Capability to build a compiled architecture from shape parameters.
pub trait ArchitectureSpec {
    /// Produce the computation graph. Invalid shape parameters fail
    /// with [`Error::ArchitectureBuild`].
    fn build(&self) -> Result<Architecture>;

    /// Architecture name recorded in persistence metadata.
    fn name(&self) -> &'static str;
}

fn ensure_input_dim(input_dim: usize, name: &str) -> Result<()> {
    if input_dim == 0 {
        return Err(Error::ArchitectureBuild(format!(
            "{name} requires a positive input dimension"
        )));
    }
    Ok(())
}

/// One regularized width level: two projections (the second without a
/// non-linearity), then normalization, the explicit activation, and
/// dropout. The ordering is a correctness contract.
fn regularized_block(layers: &mut Vec<Layer>, input_dim: usize, width: usize) {
    layers.push(Layer::Dense(Dense::new(
        input_dim,
        width,
        ActivationKind::Relu,
    )));
    layers.push(Layer::Dense(Dense::new(width, width, ActivationKind::Linear)));
    layers.push(Layer::BatchNorm(BatchNorm::new(width)));
    layers.push(Layer::Activation(Activation::new(ActivationKind::Relu)));
    layers.push(Layer::Dropout(Dropout::new(DROPOUT_RATE)));
}
