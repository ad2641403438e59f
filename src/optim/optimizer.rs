//! Optimizer trait

use ndarray::{Array1, Array2};

/// Trait for gradient-based parameter updates.
///
/// One instance serves one parameter group: a projection's weight
/// matrix plus bias, or a single normalization vector. Moment buffers
/// are allocated lazily from the first gradient's shape.
pub trait Optimizer: Send {
    /// Update a weight matrix in place given its gradient.
    fn update_matrix(&mut self, param: &mut Array2<f32>, grad: &Array2<f32>);

    /// Update a parameter vector in place given its gradient.
    fn update_vector(&mut self, param: &mut Array1<f32>, grad: &Array1<f32>);

    /// Reset optimizer state for a new training run.
    fn reset(&mut self);

    /// Clone the optimizer for another parameter group.
    fn clone_box(&self) -> Box<dyn Optimizer>;

    fn lr(&self) -> f32;
}
