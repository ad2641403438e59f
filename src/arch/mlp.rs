//! Shallow multilayer perceptron

use super::{ensure_input_dim, ArchitectureSpec};
use crate::error::Result;
use crate::graph::{ActivationKind, Architecture, Dense, Layer, LayerStack};

/// Shallow single-input architecture: five rectified projections of
/// decreasing width (128, 128, 64, 32, 16) into a sigmoid scalar
/// output. No regularization stages.
#[derive(Debug, Clone)]
pub struct Mlp {
    input_dim: usize,
}

impl Mlp {
    pub fn new(input_dim: usize) -> Self {
        Self { input_dim }
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }
}

impl ArchitectureSpec for Mlp {
    fn build(&self) -> Result<Architecture> {
        ensure_input_dim(self.input_dim, self.name())?;

        let mut layers = Vec::new();
        let mut dim = self.input_dim;
        for width in [128, 128, 64, 32, 16] {
            layers.push(Layer::Dense(Dense::new(dim, width, ActivationKind::Relu)));
            dim = width;
        }
        layers.push(Layer::Dense(Dense::new(dim, 1, ActivationKind::Sigmoid)));

        Ok(Architecture::sequential(
            self.name(),
            self.input_dim,
            LayerStack::new(layers),
        ))
    }

    fn name(&self) -> &'static str {
        "mlp"
    }
}
