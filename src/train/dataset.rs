//! Training data containers

use ndarray::{Array1, Array2, Axis};

use crate::error::{Error, Result};
use crate::graph::BatchInput;

/// Feature input plus index-aligned binary labels.
pub struct Dataset {
    input: BatchInput,
    labels: Array1<f32>,
}

impl Dataset {
    /// Single-input form: one feature matrix of shape `(n, input_dim)`.
    pub fn single(features: Array2<f32>, labels: Array1<f32>) -> Self {
        Self {
            input: BatchInput::single(features),
            labels,
        }
    }

    /// Dual-input form: left/right feature matrices with the same
    /// leading dimension.
    pub fn paired(left: Array2<f32>, right: Array2<f32>, labels: Array1<f32>) -> Self {
        Self {
            input: BatchInput::pair(left, right),
            labels,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn input(&self) -> &BatchInput {
        &self.input
    }

    pub fn labels(&self) -> &Array1<f32> {
        &self.labels
    }

    /// Check internal consistency: labels aligned with features, and a
    /// pair's leading dimensions agreeing with each other.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::InvalidConfiguration("dataset is empty".into()));
        }
        if let BatchInput::Pair { left, right } = &self.input {
            if left.nrows() != right.nrows() {
                return Err(Error::ShapeMismatch {
                    expected: vec![left.nrows(), left.ncols()],
                    got: vec![right.nrows(), right.ncols()],
                });
            }
        }
        let rows = self.input.num_examples();
        if rows != self.labels.len() {
            return Err(Error::ShapeMismatch {
                expected: vec![rows],
                got: vec![self.labels.len()],
            });
        }
        Ok(())
    }

    /// Extract the batch at the given example indices.
    pub(crate) fn select(&self, indices: &[usize]) -> (BatchInput, Array1<f32>) {
        (
            self.input.select(indices),
            self.labels.select(Axis(0), indices),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_single_dataset_validates() {
        let data = Dataset::single(Array2::zeros((4, 3)), Array1::zeros(4));
        assert!(data.validate().is_ok());
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn test_label_count_mismatch() {
        let data = Dataset::single(Array2::zeros((4, 3)), Array1::zeros(3));
        assert!(matches!(
            data.validate(),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_pair_leading_dimension_mismatch() {
        let data = Dataset::paired(Array2::zeros((4, 3)), Array2::zeros((5, 3)), Array1::zeros(4));
        assert!(matches!(
            data.validate(),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let data = Dataset::single(Array2::zeros((0, 3)), Array1::zeros(0));
        assert!(matches!(
            data.validate(),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_select_extracts_rows() {
        let features = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let labels = array![0.0, 1.0, 0.0];
        let data = Dataset::single(features, labels);

        let (input, labels) = data.select(&[2, 0]);
        match input {
            BatchInput::Single(batch) => assert_eq!(batch, array![[5.0, 6.0], [1.0, 2.0]]),
            BatchInput::Pair { .. } => panic!("expected single input"),
        }
        assert_eq!(labels, array![0.0, 0.0]);
    }
}
