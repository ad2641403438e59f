//! Dual-input late-fusion network

use std::path::Path;

use ndarray::{Array1, Array2};

use super::{ensure_input_dim, regularized_block, ArchitectureSpec, DROPOUT_RATE};
use crate::error::Result;
use crate::graph::{
    Activation, ActivationKind, Architecture, BatchInput, BatchNorm, Dense, Dropout, Layer,
    LayerStack,
};
use crate::train::{Dataset, NeuralNetwork, ProgressReporter, TrainConfig, TrainingHistory};

/// Dual-input architecture: two structurally identical branch encoders
/// (independent parameters) over the left and right feature vectors,
/// fused by concatenation into a shared regularized head ending in a
/// sigmoid scalar output.
///
/// Each branch terminates at a 32-wide normalized, activated
/// representation; dropout is applied once after fusion, not per
/// branch.
#[derive(Debug, Clone)]
pub struct MultiModal {
    input_dim: usize,
}

impl MultiModal {
    pub fn new(input_dim: usize) -> Self {
        Self { input_dim }
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn branch(&self) -> LayerStack {
        let mut layers = Vec::new();
        let mut dim = self.input_dim;
        for width in [128, 64] {
            regularized_block(&mut layers, dim, width);
            dim = width;
        }
        // fusion boundary: normalized and activated, no dropout
        layers.push(Layer::Dense(Dense::new(dim, 32, ActivationKind::Relu)));
        layers.push(Layer::Dense(Dense::new(32, 32, ActivationKind::Linear)));
        layers.push(Layer::BatchNorm(BatchNorm::new(32)));
        layers.push(Layer::Activation(Activation::new(ActivationKind::Relu)));
        LayerStack::new(layers)
    }

    fn head(&self) -> LayerStack {
        let mut layers = vec![Layer::Dropout(Dropout::new(DROPOUT_RATE))];
        regularized_block(&mut layers, 64, 64);
        layers.push(Layer::Dense(Dense::new(64, 32, ActivationKind::Relu)));
        layers.push(Layer::Dense(Dense::new(32, 32, ActivationKind::Linear)));
        layers.push(Layer::BatchNorm(BatchNorm::new(32)));
        layers.push(Layer::Activation(Activation::new(ActivationKind::Relu)));
        layers.push(Layer::Dense(Dense::new(32, 16, ActivationKind::Relu)));
        layers.push(Layer::Dense(Dense::new(16, 8, ActivationKind::Relu)));
        layers.push(Layer::Dense(Dense::new(8, 1, ActivationKind::Sigmoid)));
        LayerStack::new(layers)
    }
}

impl ArchitectureSpec for MultiModal {
    fn build(&self) -> Result<Architecture> {
        ensure_input_dim(self.input_dim, self.name())?;
        Ok(Architecture::fused(
            self.name(),
            self.input_dim,
            self.branch(),
            self.branch(),
            self.head(),
        ))
    }

    fn name(&self) -> &'static str {
        "multi_modal"
    }
}

/// Trainer for the dual-input architecture.
///
/// Wraps the generic [`NeuralNetwork`] and replaces its fit signature
/// with the positional dual-input form, reshaping the left/right
/// feature collections plus labels into the paired dataset the generic
/// trainer expects.
pub struct MultiModalNetwork {
    network: NeuralNetwork,
}

impl MultiModalNetwork {
    pub fn new(input_dim: usize, config: TrainConfig) -> Result<Self> {
        Ok(Self {
            network: NeuralNetwork::new(&MultiModal::new(input_dim), config)?,
        })
    }

    pub fn network(&self) -> &NeuralNetwork {
        &self.network
    }

    /// Fit on paired features with optional validation data.
    ///
    /// Validation data is used only when all three of `left_test`,
    /// `right_test`, and `label_test` are present; supplying one or two
    /// of them behaves exactly as supplying none, without error.
    #[allow(clippy::too_many_arguments)]
    pub fn fit(
        &mut self,
        left_train: &Array2<f32>,
        right_train: &Array2<f32>,
        label_train: &Array1<f32>,
        left_test: Option<&Array2<f32>>,
        right_test: Option<&Array2<f32>>,
        label_test: Option<&Array1<f32>>,
    ) -> Result<TrainingHistory> {
        let train = Dataset::paired(
            left_train.clone(),
            right_train.clone(),
            label_train.clone(),
        );
        let test = match (left_test, right_test, label_test) {
            (Some(left), Some(right), Some(labels)) => Some(Dataset::paired(
                left.clone(),
                right.clone(),
                labels.clone(),
            )),
            _ => None,
        };
        self.network.fit(&train, test.as_ref())
    }

    /// Like [`fit`](Self::fit), with an explicit progress reporter.
    #[allow(clippy::too_many_arguments)]
    pub fn fit_with(
        &mut self,
        left_train: &Array2<f32>,
        right_train: &Array2<f32>,
        label_train: &Array1<f32>,
        left_test: Option<&Array2<f32>>,
        right_test: Option<&Array2<f32>>,
        label_test: Option<&Array1<f32>>,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<TrainingHistory> {
        let train = Dataset::paired(
            left_train.clone(),
            right_train.clone(),
            label_train.clone(),
        );
        let test = match (left_test, right_test, label_test) {
            (Some(left), Some(right), Some(labels)) => Some(Dataset::paired(
                left.clone(),
                right.clone(),
                labels.clone(),
            )),
            _ => None,
        };
        self.network.fit_with(&train, test.as_ref(), reporter)
    }

    /// Per-example scores in `[0,1]` for left/right feature pairs.
    pub fn predict_proba(
        &self,
        left: &Array2<f32>,
        right: &Array2<f32>,
    ) -> Result<Array1<f32>> {
        self.network
            .predict_proba(&BatchInput::pair(left.clone(), right.clone()))
    }

    /// Same scores as [`predict_proba`](Self::predict_proba).
    pub fn predict(&self, left: &Array2<f32>, right: &Array2<f32>) -> Result<Array1<f32>> {
        self.predict_proba(left, right)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.network.save(path)
    }

    pub fn load_parameters(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.network.load_parameters(path)
    }
}
