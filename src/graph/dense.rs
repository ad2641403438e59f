//! Dense (fully connected) projection stage

use ndarray::{Array1, Array2, Axis};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

use super::activation::ActivationKind;
use crate::optim::Optimizer;

/// Dense projection with a fused activation: `y = activation(x W + b)`.
///
/// Weights use Glorot-uniform initialization. The training forward pass
/// caches the input and pre-activation for backprop; the inference path
/// is cache-free.
pub struct Dense {
    weights: Array2<f32>,
    bias: Array1<f32>,
    activation: ActivationKind,
    input_dim: usize,
    output_dim: usize,
    cache: Option<DenseCache>,
    optimizer: Option<Box<dyn Optimizer>>,
}

struct DenseCache {
    input: Array2<f32>,
    pre_activation: Array2<f32>,
}

impl Dense {
    pub fn new(input_dim: usize, output_dim: usize, activation: ActivationKind) -> Self {
        let limit = (6.0 / (input_dim + output_dim) as f32).sqrt();
        let weights = Array2::random((input_dim, output_dim), Uniform::new(-limit, limit));
        Self {
            weights,
            bias: Array1::zeros(output_dim),
            activation,
            input_dim,
            output_dim,
            cache: None,
            optimizer: None,
        }
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn output_dim(&self) -> usize {
        self.output_dim
    }

    pub fn compile(&mut self, optimizer: Box<dyn Optimizer>) {
        self.optimizer = Some(optimizer);
    }

    fn affine(&self, input: &Array2<f32>) -> Array2<f32> {
        let mut z = input.dot(&self.weights);
        for mut row in z.rows_mut() {
            row += &self.bias;
        }
        z
    }

    pub fn forward_train(&mut self, input: &Array2<f32>) -> Array2<f32> {
        let z = self.affine(input);
        let out = self.activation.apply(&z);
        self.cache = Some(DenseCache {
            input: input.clone(),
            pre_activation: z,
        });
        out
    }

    pub fn forward_infer(&self, input: &Array2<f32>) -> Array2<f32> {
        self.activation.apply(&self.affine(input))
    }

    /// Backpropagate, update the parameters, and return the gradient
    /// with respect to the input. The input gradient is taken against
    /// the pre-update weights.
    pub fn backward(&mut self, grad: &Array2<f32>) -> Array2<f32> {
        let cache = self
            .cache
            .take()
            .expect("forward_train must run before backward");

        let delta = grad * &self.activation.derivative(&cache.pre_activation);
        let weight_grad = cache.input.t().dot(&delta);
        let bias_grad = delta.sum_axis(Axis(0));
        let input_grad = delta.dot(&self.weights.t());

        let optimizer = self
            .optimizer
            .as_mut()
            .expect("stage must be compiled before training");
        optimizer.update_matrix(&mut self.weights, &weight_grad);
        optimizer.update_vector(&mut self.bias, &bias_grad);

        input_grad
    }

    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    pub fn bias(&self) -> &Array1<f32> {
        &self.bias
    }

    pub fn set_weights(&mut self, weights: Array2<f32>) {
        self.weights = weights;
    }

    pub fn set_bias(&mut self, bias: Array1<f32>) {
        self.bias = bias;
    }

    pub fn num_parameters(&self) -> usize {
        self.weights.len() + self.bias.len()
    }
}
