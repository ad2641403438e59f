//! Progress reporting strategies
//!
//! Training surfaces progress through a `ProgressReporter` chosen once
//! per fit call: an in-place redrawn bar for plain terminal processes,
//! a line-per-epoch reporter for notebook-like hosts that cannot handle
//! carriage-return redraws, and a silent reporter for tests and
//! embedding. Reporting never affects numerical results, and the
//! environment is probed exactly once per fit, never from inside the
//! training loop.

use std::io::{self, Write};

use super::history::EpochRecord;

/// Per-fit progress events. All methods have default no-op
/// implementations.
pub trait ProgressReporter {
    fn on_train_begin(&mut self, _max_epochs: usize, _batches_per_epoch: usize) {}

    fn on_epoch_begin(&mut self, _epoch: usize) {}

    fn on_batch_end(&mut self, _batch: usize, _loss: f32) {}

    fn on_epoch_end(&mut self, _record: &EpochRecord) {}

    fn on_early_stop(&mut self, _epoch: usize, _monitor: &str) {}

    fn on_train_end(&mut self) {}
}

/// No-op reporter, the default choice for tests and embedding.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {}

/// Whether the host process looks like an interactive notebook kernel.
/// A pure function of the process environment.
pub fn is_notebook() -> bool {
    std::env::var_os("JPY_PARENT_PID").is_some()
        || std::env::var_os("JUPYTER_RUNTIME_DIR").is_some()
}

/// Select the reporting strategy for the current host.
pub fn detect() -> Box<dyn ProgressReporter> {
    if is_notebook() {
        Box::new(NotebookProgress::new())
    } else {
        Box::new(TerminalProgress::new())
    }
}

const BAR_WIDTH: usize = 40;

/// In-place redrawn progress bar for plain terminal processes.
#[derive(Debug)]
pub struct TerminalProgress {
    max_epochs: usize,
    batches_per_epoch: usize,
    epoch: usize,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self {
            max_epochs: 0,
            batches_per_epoch: 0,
            epoch: 0,
        }
    }

    fn render_bar(&self, batch: usize, loss: f32) {
        let total = self.batches_per_epoch.max(1);
        let done = (batch + 1).min(total);
        let filled = done * BAR_WIDTH / total;
        print!(
            "\rEpoch {}/{} [{}{}] {}/{} loss={:.4}",
            self.epoch + 1,
            self.max_epochs,
            "#".repeat(filled),
            "-".repeat(BAR_WIDTH - filled),
            done,
            total,
            loss
        );
        io::stdout().flush().ok();
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for TerminalProgress {
    fn on_train_begin(&mut self, max_epochs: usize, batches_per_epoch: usize) {
        self.max_epochs = max_epochs;
        self.batches_per_epoch = batches_per_epoch;
    }

    fn on_epoch_begin(&mut self, epoch: usize) {
        self.epoch = epoch;
    }

    fn on_batch_end(&mut self, batch: usize, loss: f32) {
        self.render_bar(batch, loss);
    }

    fn on_epoch_end(&mut self, record: &EpochRecord) {
        println!("{}", epoch_summary(record, self.max_epochs));
    }

    fn on_early_stop(&mut self, epoch: usize, monitor: &str) {
        println!(
            "Early stopping at epoch {}: no improvement in {}",
            epoch + 1,
            monitor
        );
    }
}

/// Line-per-epoch reporter for notebook-like hosts; emits no terminal
/// control codes.
#[derive(Debug, Default)]
pub struct NotebookProgress {
    max_epochs: usize,
}

impl NotebookProgress {
    pub fn new() -> Self {
        Self { max_epochs: 0 }
    }
}

impl ProgressReporter for NotebookProgress {
    fn on_train_begin(&mut self, max_epochs: usize, _batches_per_epoch: usize) {
        self.max_epochs = max_epochs;
    }

    fn on_epoch_end(&mut self, record: &EpochRecord) {
        println!("{}", epoch_summary(record, self.max_epochs));
    }

    fn on_early_stop(&mut self, epoch: usize, monitor: &str) {
        println!(
            "Early stopping at epoch {}: no improvement in {}",
            epoch + 1,
            monitor
        );
    }
}

fn epoch_summary(record: &EpochRecord, max_epochs: usize) -> String {
    let mut line = format!(
        "Epoch {}/{}: loss={:.4} accuracy={:.4} auroc={:.4} auprc={:.4}",
        record.epoch + 1,
        max_epochs,
        record.loss,
        record.accuracy,
        record.auroc,
        record.auprc
    );
    if let (Some(val_loss), Some(val_accuracy), Some(val_auroc), Some(val_auprc)) = (
        record.val_loss,
        record.val_accuracy,
        record.val_auroc,
        record.val_auprc,
    ) {
        line.push_str(&format!(
            " val_loss={:.4} val_accuracy={:.4} val_auroc={:.4} val_auprc={:.4}",
            val_loss, val_accuracy, val_auroc, val_auprc
        ));
    }
    line
}
