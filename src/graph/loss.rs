//! Training objectives

use ndarray::{Array1, Array2};

const CLAMP: f32 = 1e-7;

/// Trait for training objectives over per-example scalar scores.
///
/// `value` reports the mean loss for the batch; `gradient` returns the
/// loss gradient with respect to the predicted scores.
pub trait Loss: Send {
    fn value(&self, predictions: &Array2<f32>, targets: &Array1<f32>) -> f32;

    fn gradient(&self, predictions: &Array2<f32>, targets: &Array1<f32>) -> Array2<f32>;

    fn name(&self) -> &str;
}

/// Binary cross-entropy over sigmoid scores, the fixed objective every
/// architecture compiles against.
pub struct BinaryCrossEntropy;

impl Loss for BinaryCrossEntropy {
    fn value(&self, predictions: &Array2<f32>, targets: &Array1<f32>) -> f32 {
        let n = targets.len() as f32;
        let mut total = 0.0;
        for (row, &t) in predictions.rows().into_iter().zip(targets.iter()) {
            let p = row[0].clamp(CLAMP, 1.0 - CLAMP);
            total += t * p.ln() + (1.0 - t) * (1.0 - p).ln();
        }
        -total / n
    }

    fn gradient(&self, predictions: &Array2<f32>, targets: &Array1<f32>) -> Array2<f32> {
        let n = targets.len() as f32;
        let mut grad = Array2::zeros(predictions.raw_dim());
        for (i, &t) in targets.iter().enumerate() {
            let p = predictions[[i, 0]].clamp(CLAMP, 1.0 - CLAMP);
            grad[[i, 0]] = (p - t) / (p * (1.0 - p)) / n;
        }
        grad
    }

    fn name(&self) -> &str {
        "binary_crossentropy"
    }
}
