//! Evaluation metrics for the classifier networks
//!
//! The trainer compiles every architecture against the fixed set
//! {accuracy, auroc, auprc}; each is computed over per-example scores
//! in `[0,1]` and binary labels.

use ndarray::Array1;
use std::cmp::Ordering;

/// Trait for evaluation metrics over scores and binary labels.
pub trait Metric {
    /// Compute the metric given per-example scores and targets.
    fn compute(&self, scores: &Array1<f32>, targets: &Array1<f32>) -> f32;

    /// Column name of the metric in the training history.
    fn name(&self) -> &str;

    /// Whether higher values are better (true) or lower (false).
    fn higher_is_better(&self) -> bool {
        true
    }
}

/// Fraction of correct predictions at a decision threshold.
#[derive(Debug, Clone)]
pub struct Accuracy {
    threshold: f32,
}

impl Accuracy {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }
}

impl Default for Accuracy {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl Metric for Accuracy {
    fn compute(&self, scores: &Array1<f32>, targets: &Array1<f32>) -> f32 {
        if scores.is_empty() {
            return 0.0;
        }
        let correct = scores
            .iter()
            .zip(targets.iter())
            .filter(|(&s, &t)| {
                let predicted = if s >= self.threshold { 1.0 } else { 0.0 };
                (predicted - t).abs() < 0.5
            })
            .count();
        correct as f32 / scores.len() as f32
    }

    fn name(&self) -> &str {
        "accuracy"
    }
}

/// Area under the receiver operating characteristic curve, computed by
/// a threshold sweep with trapezoidal integration. Tied scores are
/// collapsed into one curve point. Single-class label sets return 0.5
/// (chance level).
#[derive(Debug, Clone, Copy, Default)]
pub struct Auroc;

impl Metric for Auroc {
    fn compute(&self, scores: &Array1<f32>, targets: &Array1<f32>) -> f32 {
        let positives = count_positives(targets);
        let negatives = targets.len() - positives;
        if positives == 0 || negatives == 0 {
            return 0.5;
        }

        let order = descending_order(scores);
        let mut tp = 0u64;
        let mut fp = 0u64;
        let mut prev_tp = 0u64;
        let mut prev_fp = 0u64;
        let mut area = 0.0f64;

        let mut i = 0;
        while i < order.len() {
            let group_score = scores[order[i]];
            while i < order.len() && scores[order[i]] == group_score {
                if targets[order[i]] >= 0.5 {
                    tp += 1;
                } else {
                    fp += 1;
                }
                i += 1;
            }
            area += (fp - prev_fp) as f64 * (tp + prev_tp) as f64 / 2.0;
            prev_tp = tp;
            prev_fp = fp;
        }

        (area / (positives as f64 * negatives as f64)) as f32
    }

    fn name(&self) -> &str {
        "auroc"
    }
}

/// Area under the precision-recall curve (average precision). Tied
/// scores are collapsed into one curve point. Returns 0.0 when there
/// are no positive labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct Auprc;

impl Metric for Auprc {
    fn compute(&self, scores: &Array1<f32>, targets: &Array1<f32>) -> f32 {
        let positives = count_positives(targets);
        if positives == 0 {
            return 0.0;
        }

        let order = descending_order(scores);
        let mut tp = 0u64;
        let mut fp = 0u64;
        let mut prev_recall = 0.0f64;
        let mut average_precision = 0.0f64;

        let mut i = 0;
        while i < order.len() {
            let group_score = scores[order[i]];
            while i < order.len() && scores[order[i]] == group_score {
                if targets[order[i]] >= 0.5 {
                    tp += 1;
                } else {
                    fp += 1;
                }
                i += 1;
            }
            let recall = tp as f64 / positives as f64;
            let precision = tp as f64 / (tp + fp) as f64;
            average_precision += (recall - prev_recall) * precision;
            prev_recall = recall;
        }

        average_precision as f32
    }

    fn name(&self) -> &str {
        "auprc"
    }
}

fn count_positives(targets: &Array1<f32>) -> usize {
    targets.iter().filter(|&&t| t >= 0.5).count()
}

fn descending_order(scores: &Array1<f32>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(Ordering::Equal)
    });
    order
}
