//! Uniform training protocol
//!
//! This module provides the training-orchestration layer shared by
//! every architecture:
//!
//! - `TrainConfig`: the hyperparameter record (epochs, batch size,
//!   monitored metric, patience)
//! - `Dataset`: single or paired feature input plus labels
//! - `NeuralNetwork`: the generic trainer implementing fit/predict
//! - `TrainingHistory`: tabular per-epoch metrics returned by every fit
//! - `EarlyStopping`: stop-early termination on the monitored metric
//! - `progress`: environment-aware progress-reporting strategies
//!
//! # Example
//!
//! ```no_run
//! use clasificar::{Dataset, Mlp, NeuralNetwork, TrainConfig};
//! use ndarray::{Array1, Array2};
//!
//! let config = TrainConfig::new()
//!     .with_max_epochs(100)
//!     .with_batch_size(64)
//!     .with_monitor("auprc")
//!     .with_patience(10);
//! let mut network = NeuralNetwork::new(&Mlp::new(50), config).unwrap();
//!
//! let train = Dataset::single(Array2::<f32>::zeros((1000, 50)), Array1::<f32>::zeros(1000));
//! let history = network.fit(&train, None).unwrap();
//! assert!(history.len() <= 100);
//! ```

mod config;
mod dataset;
mod early_stopping;
mod history;
pub mod progress;
mod trainer;

pub use config::{TrainConfig, TRACKED_METRICS, VAL_PREFIX};
pub use dataset::Dataset;
pub use early_stopping::EarlyStopping;
pub use history::{EpochRecord, TrainingHistory};
pub use progress::{NotebookProgress, ProgressReporter, SilentProgress, TerminalProgress};
pub use trainer::NeuralNetwork;
