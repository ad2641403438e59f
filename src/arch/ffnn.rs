//! Deep regularized feed-forward network

use super::{ensure_input_dim, regularized_block, ArchitectureSpec};
use crate::error::Result;
use crate::graph::{ActivationKind, Architecture, Dense, Layer, LayerStack};

/// Deep single-input architecture: the decreasing-width skeleton of
/// [`Mlp`](super::Mlp) where each width level above the narrowest is a
/// regularized two-projection block, followed by a narrow unregularized
/// tail into the sigmoid scalar output.
#[derive(Debug, Clone)]
pub struct Ffnn {
    input_dim: usize,
}

impl Ffnn {
    pub fn new(input_dim: usize) -> Self {
        Self { input_dim }
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }
}

impl ArchitectureSpec for Ffnn {
    fn build(&self) -> Result<Architecture> {
        ensure_input_dim(self.input_dim, self.name())?;

        let mut layers = Vec::new();
        let mut dim = self.input_dim;
        for width in [128, 64, 32] {
            regularized_block(&mut layers, dim, width);
            dim = width;
        }
        layers.push(Layer::Dense(Dense::new(dim, 16, ActivationKind::Relu)));
        layers.push(Layer::Dense(Dense::new(16, 8, ActivationKind::Relu)));
        layers.push(Layer::Dense(Dense::new(8, 1, ActivationKind::Sigmoid)));

        Ok(Architecture::sequential(
            self.name(),
            self.input_dim,
            LayerStack::new(layers),
        ))
    }

    fn name(&self) -> &'static str {
        "ffnn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::BatchInput;
    use ndarray::Array2;

    #[test]
    fn test_build_succeeds() {
        let arch = Ffnn::new(50).build().unwrap();
        assert_eq!(arch.input_dim(), 50);
        assert!(!arch.is_fused());
    }

    #[test]
    fn test_zero_input_dim_fails() {
        assert!(Ffnn::new(0).build().is_err());
    }

    #[test]
    fn test_scores_in_unit_interval() {
        let arch = Ffnn::new(12).build().unwrap();
        let input = BatchInput::single(Array2::from_elem((5, 12), 1.0));
        let scores = arch.infer(&input).unwrap();
        assert_eq!(scores.len(), 5);
        assert!(scores.iter().all(|&s| (0.0..=1.0).contains(&s)));
    }

    #[test]
    fn test_parameter_count() {
        // per level w in {128, 64, 32}: d*w+w + w*w+w + 2w (norm scale/shift)
        // tail: 32*16+16 + 16*8+8 + 8*1+1
        let arch = Ffnn::new(50).build().unwrap();
        let level = |d: usize, w: usize| d * w + w + w * w + w + 2 * w;
        let expected =
            level(50, 128) + level(128, 64) + level(64, 32) + (32 * 16 + 16) + (16 * 8 + 8) + (8 + 1);
        assert_eq!(arch.num_parameters(), expected);
    }
}
