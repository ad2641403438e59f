//! # Clasificar: Feed-Forward Classifier Networks
//!
//! Clasificar provides a thin framework for defining, training, and
//! evaluating feed-forward neural-network classifiers over tabular or
//! dual-input (pairwise) feature vectors, with a uniform training
//! protocol: early stopping on a monitored metric, environment-aware
//! progress reporting, and a tabular per-epoch training history.
//!
//! ## Architecture
//!
//! - **graph**: Model execution engine (dense, normalization, dropout,
//!   and activation stages; sequential and fused computation graphs)
//! - **optim**: Nadam optimizer
//! - **metrics**: Accuracy, AUROC, and AUPRC
//! - **train**: Training protocol (configuration, datasets, generic
//!   trainer, early stopping, progress reporting, history)
//! - **arch**: Concrete architectures (MLP, FFNN, multi-modal fusion)
//! - **io**: Parameter saving and loading (JSON)
//!
//! ## Example
//!
//! ```no_run
//! use clasificar::{Dataset, Mlp, NeuralNetwork, TrainConfig};
//! use ndarray::{Array1, Array2};
//!
//! let config = TrainConfig::new()
//!     .with_max_epochs(200)
//!     .with_monitor("auprc")
//!     .with_patience(10);
//! let mut network = NeuralNetwork::new(&Mlp::new(50), config)?;
//!
//! let features = Array2::<f32>::zeros((1000, 50));
//! let labels = Array1::<f32>::zeros(1000);
//! let history = network.fit(&Dataset::single(features.clone(), labels), None)?;
//! println!("{history}");
//!
//! let scores = network.predict_proba(&clasificar::BatchInput::single(features))?;
//! # Ok::<(), clasificar::Error>(())
//! ```

pub mod arch;
pub mod graph;
pub mod io;
pub mod metrics;
pub mod optim;
pub mod train;

pub mod error;

// Re-export commonly used types
pub use arch::{ArchitectureSpec, Ffnn, Mlp, MultiModal, MultiModalNetwork};
pub use error::{Error, Result};
pub use graph::{Architecture, BatchInput};
pub use train::{
    Dataset, EpochRecord, NeuralNetwork, ProgressReporter, SilentProgress, TrainConfig,
    TrainingHistory,
};
