//! Generic training and inference orchestration

use std::path::Path;

use ndarray::{Array1, Axis};
use rand::seq::SliceRandom;

use super::config::TrainConfig;
use super::dataset::Dataset;
use super::early_stopping::EarlyStopping;
use super::history::{EpochRecord, TrainingHistory};
use super::progress::{self, ProgressReporter};
use crate::arch::ArchitectureSpec;
use crate::error::Result;
use crate::graph::{Architecture, BatchInput, BinaryCrossEntropy, Loss};
use crate::metrics::{Accuracy, Auprc, Auroc, Metric};
use crate::optim::Nadam;

/// Generic trainer: owns the hyperparameters and the compiled
/// architecture, and implements the uniform fit/predict protocol
/// independent of architecture shape.
///
/// Construction builds the architecture from its specification and
/// compiles it against the fixed objective (binary cross-entropy) and
/// metric set (accuracy, auroc, auprc).
///
/// # Example
///
/// ```no_run
/// use clasificar::{Dataset, Mlp, NeuralNetwork, TrainConfig};
/// use ndarray::{Array1, Array2};
///
/// let config = TrainConfig::new().with_max_epochs(20).with_monitor("auprc");
/// let mut network = NeuralNetwork::new(&Mlp::new(50), config).unwrap();
///
/// let features = Array2::<f32>::zeros((100, 50));
/// let labels = Array1::<f32>::zeros(100);
/// let history = network.fit(&Dataset::single(features, labels), None).unwrap();
/// println!("{history}");
/// ```
pub struct NeuralNetwork {
    config: TrainConfig,
    arch: Architecture,
}

impl NeuralNetwork {
    /// Build and compile the architecture described by `spec`.
    ///
    /// A build failure is fatal: no usable trainer results.
    pub fn new(spec: &impl ArchitectureSpec, config: TrainConfig) -> Result<Self> {
        let mut arch = spec.build()?;
        arch.compile(&Nadam::default(), Box::new(BinaryCrossEntropy));
        Ok(Self { config, arch })
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn architecture(&self) -> &Architecture {
        &self.arch
    }

    /// Train on `train`, optionally tracking `test` as validation data,
    /// and return the per-epoch history.
    ///
    /// The progress-reporting strategy is selected from the host
    /// environment once per call. Fails with
    /// [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration)
    /// before any computation when the monitored metric requires
    /// validation data that was not supplied.
    pub fn fit(&mut self, train: &Dataset, test: Option<&Dataset>) -> Result<TrainingHistory> {
        let mut reporter = progress::detect();
        self.fit_with(train, test, reporter.as_mut())
    }

    /// Like [`fit`](Self::fit), with an explicit progress reporter.
    pub fn fit_with(
        &mut self,
        train: &Dataset,
        test: Option<&Dataset>,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<TrainingHistory> {
        // Input-validation gates: configuration first, then shapes.
        // Nothing below runs unless all of them pass.
        self.config.validate(test.is_some())?;
        train.validate()?;
        self.arch.check_input(train.input())?;
        if let Some(test) = test {
            test.validate()?;
            self.arch.check_input(test.input())?;
        }

        let n = train.len();
        let batch_size = self.config.batch_size;
        let batches_per_epoch = n.div_ceil(batch_size);

        let mut early = EarlyStopping::new(self.config.monitor.clone(), self.config.patience);
        let mut history = TrainingHistory::new();
        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = rand::thread_rng();

        reporter.on_train_begin(self.config.max_epochs, batches_per_epoch);
        for epoch in 0..self.config.max_epochs {
            reporter.on_epoch_begin(epoch);
            indices.shuffle(&mut rng);

            let mut total_loss = 0.0;
            for (batch, chunk) in indices.chunks(batch_size).enumerate() {
                let (input, labels) = train.select(chunk);
                let loss = self.arch.train_batch(&input, &labels);
                total_loss += loss;
                reporter.on_batch_end(batch, loss);
            }

            let record = self.epoch_record(
                epoch,
                total_loss / batches_per_epoch as f32,
                train,
                test,
            )?;
            reporter.on_epoch_end(&record);

            let monitored = record
                .metric(early.monitor())
                .expect("monitor is validated against the tracked columns");
            history.push(record);

            if early.observe(monitored) {
                reporter.on_early_stop(epoch, early.monitor());
                break;
            }
        }
        reporter.on_train_end();

        Ok(history)
    }

    /// Per-example scores in `[0,1]`; pure pass-through to the compiled
    /// graph's inference path.
    pub fn predict_proba(&self, input: &BatchInput) -> Result<Array1<f32>> {
        self.arch.infer(input)
    }

    /// Same scores as [`predict_proba`](Self::predict_proba): the
    /// sigmoid head already yields probabilities.
    pub fn predict(&self, input: &BatchInput) -> Result<Array1<f32>> {
        self.arch.infer(input)
    }

    /// Serialize the learned parameters to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        crate::io::save_parameters(&self.arch, path)
    }

    /// Restore learned parameters from a JSON file written by a trainer
    /// of the same architecture shape.
    pub fn load_parameters(&mut self, path: impl AsRef<Path>) -> Result<()> {
        crate::io::load_parameters(&mut self.arch, path)
    }

    /// Metrics for one completed epoch: running training loss plus the
    /// tracked metric set over the full sets in inference mode.
    fn epoch_record(
        &self,
        epoch: usize,
        train_loss: f32,
        train: &Dataset,
        test: Option<&Dataset>,
    ) -> Result<EpochRecord> {
        let scores = self.arch.infer(train.input())?;
        let mut record = EpochRecord {
            epoch,
            loss: train_loss,
            accuracy: Accuracy::default().compute(&scores, train.labels()),
            auroc: Auroc.compute(&scores, train.labels()),
            auprc: Auprc.compute(&scores, train.labels()),
            val_loss: None,
            val_accuracy: None,
            val_auroc: None,
            val_auprc: None,
        };

        if let Some(test) = test {
            let val_scores = self.arch.infer(test.input())?;
            let val_predictions = val_scores.clone().insert_axis(Axis(1));
            record.val_loss = Some(BinaryCrossEntropy.value(&val_predictions, test.labels()));
            record.val_accuracy = Some(Accuracy::default().compute(&val_scores, test.labels()));
            record.val_auroc = Some(Auroc.compute(&val_scores, test.labels()));
            record.val_auprc = Some(Auprc.compute(&val_scores, test.labels()));
        }

        Ok(record)
    }
}
