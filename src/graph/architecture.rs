//! Compiled computation graphs

use ndarray::{concatenate, s, Array1, Array2, Axis};

use super::loss::Loss;
use super::stack::{LayerStack, NamedParam};
use crate::error::{Error, Result};
use crate::optim::Optimizer;

/// Feature input for one batch: a single feature matrix, or a
/// left/right pair with identical leading dimension.
pub enum BatchInput {
    Single(Array2<f32>),
    Pair {
        left: Array2<f32>,
        right: Array2<f32>,
    },
}

impl BatchInput {
    pub fn single(features: Array2<f32>) -> Self {
        BatchInput::Single(features)
    }

    pub fn pair(left: Array2<f32>, right: Array2<f32>) -> Self {
        BatchInput::Pair { left, right }
    }

    /// Number of examples in the batch.
    pub fn num_examples(&self) -> usize {
        match self {
            BatchInput::Single(features) => features.nrows(),
            BatchInput::Pair { left, .. } => left.nrows(),
        }
    }

    pub(crate) fn select(&self, indices: &[usize]) -> BatchInput {
        match self {
            BatchInput::Single(features) => {
                BatchInput::Single(features.select(Axis(0), indices))
            }
            BatchInput::Pair { left, right } => BatchInput::Pair {
                left: left.select(Axis(0), indices),
                right: right.select(Axis(0), indices),
            },
        }
    }
}

enum Topology {
    /// One stack from input to the scalar head.
    Sequential(LayerStack),
    /// Two parallel branch stacks fused by concatenation into a head.
    Fused {
        left: LayerStack,
        right: LayerStack,
        head: LayerStack,
        /// Width of the left branch output, where the fused gradient splits.
        split: usize,
    },
}

/// An owned, compiled computation graph mapping one or two feature
/// matrices to one probability per example. Built once at trainer
/// construction; training steps mutate the parameters in place.
pub struct Architecture {
    name: String,
    input_dim: usize,
    topology: Topology,
    loss: Option<Box<dyn Loss>>,
}

impl Architecture {
    pub fn sequential(name: impl Into<String>, input_dim: usize, stack: LayerStack) -> Self {
        Self {
            name: name.into(),
            input_dim,
            topology: Topology::Sequential(stack),
            loss: None,
        }
    }

    pub fn fused(
        name: impl Into<String>,
        input_dim: usize,
        left: LayerStack,
        right: LayerStack,
        head: LayerStack,
    ) -> Self {
        let split = left.output_dim().unwrap_or(0);
        Self {
            name: name.into(),
            input_dim,
            topology: Topology::Fused {
                left,
                right,
                head,
                split,
            },
            loss: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn is_fused(&self) -> bool {
        matches!(self.topology, Topology::Fused { .. })
    }

    pub fn num_parameters(&self) -> usize {
        match &self.topology {
            Topology::Sequential(stack) => stack.num_parameters(),
            Topology::Fused {
                left, right, head, ..
            } => left.num_parameters() + right.num_parameters() + head.num_parameters(),
        }
    }

    /// Fix the objective and install per-parameter-group optimizer state.
    pub fn compile(&mut self, optimizer: &dyn Optimizer, loss: Box<dyn Loss>) {
        match &mut self.topology {
            Topology::Sequential(stack) => stack.compile(optimizer),
            Topology::Fused {
                left, right, head, ..
            } => {
                left.compile(optimizer);
                right.compile(optimizer);
                head.compile(optimizer);
            }
        }
        self.loss = Some(loss);
    }

    /// Validate that a batch matches this graph's input arity and width.
    pub fn check_input(&self, input: &BatchInput) -> Result<()> {
        match (&self.topology, input) {
            (Topology::Sequential(_), BatchInput::Single(features)) => {
                if features.ncols() != self.input_dim {
                    return Err(Error::ShapeMismatch {
                        expected: vec![features.nrows(), self.input_dim],
                        got: vec![features.nrows(), features.ncols()],
                    });
                }
                Ok(())
            }
            (Topology::Fused { .. }, BatchInput::Pair { left, right }) => {
                if left.nrows() != right.nrows() {
                    return Err(Error::ShapeMismatch {
                        expected: vec![left.nrows(), self.input_dim],
                        got: vec![right.nrows(), right.ncols()],
                    });
                }
                for features in [left, right] {
                    if features.ncols() != self.input_dim {
                        return Err(Error::ShapeMismatch {
                            expected: vec![features.nrows(), self.input_dim],
                            got: vec![features.nrows(), features.ncols()],
                        });
                    }
                }
                Ok(())
            }
            (Topology::Sequential(_), BatchInput::Pair { .. }) => Err(Error::InvalidConfiguration(
                "this architecture takes a single feature matrix, not a pair".into(),
            )),
            (Topology::Fused { .. }, BatchInput::Single(_)) => Err(Error::InvalidConfiguration(
                "this architecture takes a left/right feature pair".into(),
            )),
        }
    }

    fn forward_train(&mut self, input: &BatchInput) -> Array2<f32> {
        match (&mut self.topology, input) {
            (Topology::Sequential(stack), BatchInput::Single(features)) => {
                stack.forward_train(features)
            }
            (
                Topology::Fused {
                    left, right, head, ..
                },
                BatchInput::Pair {
                    left: left_input,
                    right: right_input,
                },
            ) => {
                let left_out = left.forward_train(left_input);
                let right_out = right.forward_train(right_input);
                let fused = concatenate(Axis(1), &[left_out.view(), right_out.view()])
                    .expect("branch outputs share the leading dimension");
                head.forward_train(&fused)
            }
            _ => unreachable!("input arity is validated before training"),
        }
    }

    fn backward(&mut self, grad: &Array2<f32>) {
        match &mut self.topology {
            Topology::Sequential(stack) => {
                stack.backward(grad);
            }
            Topology::Fused {
                left,
                right,
                head,
                split,
            } => {
                let fused_grad = head.backward(grad);
                let left_grad = fused_grad.slice(s![.., ..*split]).to_owned();
                let right_grad = fused_grad.slice(s![.., *split..]).to_owned();
                left.backward(&left_grad);
                right.backward(&right_grad);
            }
        }
    }

    /// One training step: forward in training mode, objective gradient,
    /// backward with in-place parameter updates. Returns the batch loss.
    /// Callers validate the input with [`check_input`](Self::check_input)
    /// first.
    pub(crate) fn train_batch(&mut self, input: &BatchInput, labels: &Array1<f32>) -> f32 {
        let predictions = self.forward_train(input);
        let loss = self
            .loss
            .as_ref()
            .expect("architecture must be compiled before training");
        let value = loss.value(&predictions, labels);
        let grad = loss.gradient(&predictions, labels);
        self.backward(&grad);
        value
    }

    /// Pure inference path: no caches, no dropout, running statistics.
    pub fn infer(&self, input: &BatchInput) -> Result<Array1<f32>> {
        self.check_input(input)?;
        let out = match (&self.topology, input) {
            (Topology::Sequential(stack), BatchInput::Single(features)) => {
                stack.forward_infer(features)
            }
            (
                Topology::Fused {
                    left, right, head, ..
                },
                BatchInput::Pair {
                    left: left_input,
                    right: right_input,
                },
            ) => {
                let left_out = left.forward_infer(left_input);
                let right_out = right.forward_infer(right_input);
                let fused = concatenate(Axis(1), &[left_out.view(), right_out.view()])
                    .expect("branch outputs share the leading dimension");
                head.forward_infer(&fused)
            }
            _ => unreachable!("check_input rejects arity mismatches"),
        };
        Ok(out.column(0).to_owned())
    }

    /// Export every parameter group for persistence.
    pub fn export_parameters(&self) -> Vec<NamedParam> {
        let mut params = Vec::new();
        match &self.topology {
            Topology::Sequential(stack) => stack.export_parameters("", &mut params),
            Topology::Fused {
                left, right, head, ..
            } => {
                left.export_parameters("left.", &mut params);
                right.export_parameters("right.", &mut params);
                head.export_parameters("head.", &mut params);
            }
        }
        params
    }

    /// Restore every parameter group from an exported set.
    pub fn import_parameters(&mut self, params: Vec<NamedParam>) -> Result<()> {
        let by_name: std::collections::HashMap<String, NamedParam> = params
            .into_iter()
            .map(|param| (param.name.clone(), param))
            .collect();
        match &mut self.topology {
            Topology::Sequential(stack) => stack.import_parameters("", &by_name),
            Topology::Fused {
                left, right, head, ..
            } => {
                left.import_parameters("left.", &by_name)?;
                right.import_parameters("right.", &by_name)?;
                head.import_parameters("head.", &by_name)
            }
        }
    }
}
