//! Sequential stage composition

use std::collections::HashMap;

use ndarray::{Array1, Array2};

use super::activation::Activation;
use super::dense::Dense;
use super::dropout::Dropout;
use super::norm::BatchNorm;
use crate::error::{Error, Result};
use crate::optim::Optimizer;

/// A transformation stage in a layer stack.
pub enum Layer {
    Dense(Dense),
    BatchNorm(BatchNorm),
    Activation(Activation),
    Dropout(Dropout),
}

/// Exported view of one parameter group, used by the persistence layer.
pub struct NamedParam {
    pub name: String,
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

/// An ordered sequence of stages with a single input and output.
pub struct LayerStack {
    layers: Vec<Layer>,
}

impl LayerStack {
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Width of the stack's output, taken from the last projection.
    pub fn output_dim(&self) -> Option<usize> {
        self.layers.iter().rev().find_map(|layer| match layer {
            Layer::Dense(dense) => Some(dense.output_dim()),
            _ => None,
        })
    }

    /// Install one optimizer instance per parameter group.
    pub fn compile(&mut self, optimizer: &dyn Optimizer) {
        for layer in &mut self.layers {
            match layer {
                Layer::Dense(dense) => dense.compile(optimizer.clone_box()),
                Layer::BatchNorm(norm) => {
                    norm.compile(optimizer.clone_box(), optimizer.clone_box())
                }
                Layer::Activation(_) | Layer::Dropout(_) => {}
            }
        }
    }

    pub fn forward_train(&mut self, input: &Array2<f32>) -> Array2<f32> {
        let mut out = input.clone();
        for layer in &mut self.layers {
            out = match layer {
                Layer::Dense(dense) => dense.forward_train(&out),
                Layer::BatchNorm(norm) => norm.forward_train(&out),
                Layer::Activation(act) => act.forward_train(&out),
                Layer::Dropout(dropout) => dropout.forward_train(&out),
            };
        }
        out
    }

    pub fn forward_infer(&self, input: &Array2<f32>) -> Array2<f32> {
        let mut out = input.clone();
        for layer in &self.layers {
            out = match layer {
                Layer::Dense(dense) => dense.forward_infer(&out),
                Layer::BatchNorm(norm) => norm.forward_infer(&out),
                Layer::Activation(act) => act.forward_infer(&out),
                Layer::Dropout(dropout) => dropout.forward_infer(&out),
            };
        }
        out
    }

    /// Backpropagate through the stack, updating parameters in place,
    /// and return the gradient with respect to the stack's input.
    pub fn backward(&mut self, grad: &Array2<f32>) -> Array2<f32> {
        let mut grad = grad.clone();
        for layer in self.layers.iter_mut().rev() {
            grad = match layer {
                Layer::Dense(dense) => dense.backward(&grad),
                Layer::BatchNorm(norm) => norm.backward(&grad),
                Layer::Activation(act) => act.backward(&grad),
                Layer::Dropout(dropout) => dropout.backward(&grad),
            };
        }
        grad
    }

    pub fn num_parameters(&self) -> usize {
        self.layers
            .iter()
            .map(|layer| match layer {
                Layer::Dense(dense) => dense.num_parameters(),
                Layer::BatchNorm(norm) => 2 * norm.features(),
                Layer::Activation(_) | Layer::Dropout(_) => 0,
            })
            .sum()
    }

    /// Export every parameter group, prefixed for topology placement.
    /// Running statistics are exported too so a restored stack infers
    /// identically.
    pub fn export_parameters(&self, prefix: &str, out: &mut Vec<NamedParam>) {
        for (i, layer) in self.layers.iter().enumerate() {
            match layer {
                Layer::Dense(dense) => {
                    out.push(matrix_param(
                        format!("{prefix}dense_{i}.weight"),
                        dense.weights(),
                    ));
                    out.push(vector_param(format!("{prefix}dense_{i}.bias"), dense.bias()));
                }
                Layer::BatchNorm(norm) => {
                    out.push(vector_param(
                        format!("{prefix}batch_norm_{i}.gamma"),
                        norm.gamma(),
                    ));
                    out.push(vector_param(
                        format!("{prefix}batch_norm_{i}.beta"),
                        norm.beta(),
                    ));
                    out.push(vector_param(
                        format!("{prefix}batch_norm_{i}.running_mean"),
                        norm.running_mean(),
                    ));
                    out.push(vector_param(
                        format!("{prefix}batch_norm_{i}.running_var"),
                        norm.running_var(),
                    ));
                }
                Layer::Activation(_) | Layer::Dropout(_) => {}
            }
        }
    }

    /// Restore every parameter group from an exported set. Names and
    /// shapes must match the stack exactly.
    pub fn import_parameters(
        &mut self,
        prefix: &str,
        params: &HashMap<String, NamedParam>,
    ) -> Result<()> {
        for (i, layer) in self.layers.iter_mut().enumerate() {
            match layer {
                Layer::Dense(dense) => {
                    let weights = take_matrix(
                        params,
                        &format!("{prefix}dense_{i}.weight"),
                        (dense.input_dim(), dense.output_dim()),
                    )?;
                    let bias =
                        take_vector(params, &format!("{prefix}dense_{i}.bias"), dense.output_dim())?;
                    dense.set_weights(weights);
                    dense.set_bias(bias);
                }
                Layer::BatchNorm(norm) => {
                    let features = norm.features();
                    norm.set_gamma(take_vector(
                        params,
                        &format!("{prefix}batch_norm_{i}.gamma"),
                        features,
                    )?);
                    norm.set_beta(take_vector(
                        params,
                        &format!("{prefix}batch_norm_{i}.beta"),
                        features,
                    )?);
                    norm.set_running_mean(take_vector(
                        params,
                        &format!("{prefix}batch_norm_{i}.running_mean"),
                        features,
                    )?);
                    norm.set_running_var(take_vector(
                        params,
                        &format!("{prefix}batch_norm_{i}.running_var"),
                        features,
                    )?);
                }
                Layer::Activation(_) | Layer::Dropout(_) => {}
            }
        }
        Ok(())
    }
}

fn matrix_param(name: String, value: &Array2<f32>) -> NamedParam {
    NamedParam {
        name,
        shape: value.shape().to_vec(),
        data: value.iter().copied().collect(),
    }
}

fn vector_param(name: String, value: &Array1<f32>) -> NamedParam {
    NamedParam {
        name,
        shape: vec![value.len()],
        data: value.to_vec(),
    }
}

fn lookup<'a>(params: &'a HashMap<String, NamedParam>, name: &str) -> Result<&'a NamedParam> {
    params
        .get(name)
        .ok_or_else(|| Error::Serialization(format!("missing parameter {name}")))
}

fn take_matrix(
    params: &HashMap<String, NamedParam>,
    name: &str,
    dim: (usize, usize),
) -> Result<Array2<f32>> {
    let param = lookup(params, name)?;
    if param.shape != [dim.0, dim.1] {
        return Err(Error::ShapeMismatch {
            expected: vec![dim.0, dim.1],
            got: param.shape.clone(),
        });
    }
    Array2::from_shape_vec(dim, param.data.clone())
        .map_err(|e| Error::Serialization(format!("parameter {name}: {e}")))
}

fn take_vector(
    params: &HashMap<String, NamedParam>,
    name: &str,
    len: usize,
) -> Result<Array1<f32>> {
    let param = lookup(params, name)?;
    if param.shape != [len] {
        return Err(Error::ShapeMismatch {
            expected: vec![len],
            got: param.shape.clone(),
        });
    }
    Ok(Array1::from(param.data.clone()))
}
