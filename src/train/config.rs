//! Training configuration

use crate::error::{Error, Result};

/// Prefix marking a metric computed on held-out validation data.
pub const VAL_PREFIX: &str = "val_";

/// Metric columns every fit tracks; validation-prefixed variants are
/// added when validation data is present.
pub const TRACKED_METRICS: [&str; 4] = ["loss", "accuracy", "auroc", "auprc"];

/// Hyperparameters of the uniform training protocol. Immutable once a
/// trainer is constructed.
#[derive(Clone, Debug)]
pub struct TrainConfig {
    /// Maximum number of epochs; early stopping may end training sooner.
    pub max_epochs: usize,

    /// Number of examples per training batch.
    pub batch_size: usize,

    /// Metric watched by the early stopping, e.g. "auprc" or "val_loss".
    pub monitor: String,

    /// Number of epochs to wait for an improvement before stopping.
    pub patience: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            max_epochs: 1000,
            batch_size: 64,
            monitor: "auprc".to_string(),
            patience: 10,
        }
    }
}

impl TrainConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_epochs(mut self, max_epochs: usize) -> Self {
        self.max_epochs = max_epochs;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_monitor(mut self, monitor: impl Into<String>) -> Self {
        self.monitor = monitor.into();
        self
    }

    pub fn with_patience(mut self, patience: usize) -> Self {
        self.patience = patience;
        self
    }

    /// Whether the monitored metric is computed on validation data.
    pub fn monitors_validation(&self) -> bool {
        self.monitor.starts_with(VAL_PREFIX)
    }

    /// Pure input-validation gate, run before any computation at the
    /// start of every fit.
    pub(crate) fn validate(&self, has_validation: bool) -> Result<()> {
        if self.max_epochs == 0 {
            return Err(Error::InvalidConfiguration(
                "max_epochs must be positive".into(),
            ));
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidConfiguration(
                "batch_size must be positive".into(),
            ));
        }

        let base = self.monitor.strip_prefix(VAL_PREFIX).unwrap_or(&self.monitor);
        if !TRACKED_METRICS.contains(&base) {
            return Err(Error::InvalidConfiguration(format!(
                "unknown monitor metric {:?}; tracked metrics are {:?} and their {}-prefixed variants",
                self.monitor, TRACKED_METRICS, VAL_PREFIX
            )));
        }

        if self.monitors_validation() && !has_validation {
            return Err(Error::InvalidConfiguration(format!(
                "no validation data was given, but monitor {:?} requires it for the early stopping",
                self.monitor
            )));
        }

        Ok(())
    }
}
