//! Early stopping on a monitored metric

use super::config::VAL_PREFIX;

/// Improvement direction of a monitored metric.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Maximize,
    Minimize,
}

/// Watches one metric and signals a stop once it has failed to improve
/// for `patience` consecutive epochs. Stopping keeps the last weights;
/// there is no roll back to the best epoch.
#[derive(Clone, Debug)]
pub struct EarlyStopping {
    monitor: String,
    patience: usize,
    direction: Direction,
    best: Option<f32>,
    wait: usize,
}

impl EarlyStopping {
    /// The direction is inferred from the metric name: loss metrics
    /// improve downward, every other tracked metric improves upward.
    pub fn new(monitor: impl Into<String>, patience: usize) -> Self {
        let monitor = monitor.into();
        let base = monitor.strip_prefix(VAL_PREFIX).unwrap_or(&monitor);
        let direction = if base == "loss" {
            Direction::Minimize
        } else {
            Direction::Maximize
        };
        Self {
            monitor,
            patience,
            direction,
            best: None,
            wait: 0,
        }
    }

    pub fn monitor(&self) -> &str {
        &self.monitor
    }

    /// Record one epoch's monitored value. Returns `true` when training
    /// should stop.
    pub fn observe(&mut self, value: f32) -> bool {
        let improved = match self.best {
            None => true,
            Some(best) => match self.direction {
                Direction::Maximize => value > best,
                Direction::Minimize => value < best,
            },
        };

        if improved {
            self.best = Some(value);
            self.wait = 0;
            false
        } else {
            self.wait += 1;
            self.wait >= self.patience
        }
    }
}
