//! Elementwise non-linearities

use ndarray::Array2;

/// Activation kinds used by the classifier stacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationKind {
    /// Rectified linear unit
    Relu,
    /// Logistic sigmoid, used by the scalar output stage
    Sigmoid,
    /// Identity (projection without non-linearity)
    Linear,
}

impl ActivationKind {
    /// Apply the activation to a batch of pre-activations.
    pub fn apply(&self, z: &Array2<f32>) -> Array2<f32> {
        match self {
            ActivationKind::Relu => z.mapv(|v| v.max(0.0)),
            ActivationKind::Sigmoid => z.mapv(sigmoid),
            ActivationKind::Linear => z.clone(),
        }
    }

    /// Derivative with respect to the pre-activation, evaluated at `z`.
    pub fn derivative(&self, z: &Array2<f32>) -> Array2<f32> {
        match self {
            ActivationKind::Relu => z.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 }),
            ActivationKind::Sigmoid => z.mapv(|v| {
                let s = sigmoid(v);
                s * (1.0 - s)
            }),
            ActivationKind::Linear => Array2::ones(z.raw_dim()),
        }
    }
}

fn sigmoid(v: f32) -> f32 {
    1.0 / (1.0 + (-v).exp())
}

/// Standalone activation stage, used where normalization sits between a
/// projection and its non-linearity.
#[derive(Debug)]
pub struct Activation {
    kind: ActivationKind,
    input: Option<Array2<f32>>,
}

impl Activation {
    pub fn new(kind: ActivationKind) -> Self {
        Self { kind, input: None }
    }

    pub fn kind(&self) -> ActivationKind {
        self.kind
    }

    pub fn forward_train(&mut self, z: &Array2<f32>) -> Array2<f32> {
        self.input = Some(z.clone());
        self.kind.apply(z)
    }

    pub fn forward_infer(&self, z: &Array2<f32>) -> Array2<f32> {
        self.kind.apply(z)
    }

    pub fn backward(&mut self, grad: &Array2<f32>) -> Array2<f32> {
        let z = self
            .input
            .take()
            .expect("forward_train must run before backward");
        grad * &self.kind.derivative(&z)
    }
}
