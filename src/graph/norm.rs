//! Batch normalization stage

use ndarray::{Array1, Array2, Axis};

use crate::optim::Optimizer;

const MOMENTUM: f32 = 0.99;
const EPSILON: f32 = 1e-3;

/// Per-feature batch normalization with learnable scale and shift.
///
/// Training mode normalizes with batch statistics and updates the
/// running mean/variance; inference mode uses the running statistics
/// only, so the inference path takes `&self`.
pub struct BatchNorm {
    gamma: Array1<f32>,
    beta: Array1<f32>,
    running_mean: Array1<f32>,
    running_var: Array1<f32>,
    features: usize,
    cache: Option<NormCache>,
    gamma_opt: Option<Box<dyn Optimizer>>,
    beta_opt: Option<Box<dyn Optimizer>>,
}

struct NormCache {
    normalized: Array2<f32>,
    inv_std: Array1<f32>,
}

impl BatchNorm {
    pub fn new(features: usize) -> Self {
        Self {
            gamma: Array1::ones(features),
            beta: Array1::zeros(features),
            running_mean: Array1::zeros(features),
            running_var: Array1::ones(features),
            features,
            cache: None,
            gamma_opt: None,
            beta_opt: None,
        }
    }

    pub fn features(&self) -> usize {
        self.features
    }

    /// Scale and shift parameters get independent optimizer state.
    pub fn compile(&mut self, gamma_opt: Box<dyn Optimizer>, beta_opt: Box<dyn Optimizer>) {
        self.gamma_opt = Some(gamma_opt);
        self.beta_opt = Some(beta_opt);
    }

    pub fn forward_train(&mut self, input: &Array2<f32>) -> Array2<f32> {
        let mean = input
            .mean_axis(Axis(0))
            .expect("training batches are non-empty");
        let var = input.var_axis(Axis(0), 0.0);
        let inv_std = var.mapv(|v| 1.0 / (v + EPSILON).sqrt());

        let mut normalized = input.clone();
        for mut row in normalized.rows_mut() {
            row -= &mean;
            row *= &inv_std;
        }

        let mut out = normalized.clone();
        for mut row in out.rows_mut() {
            row *= &self.gamma;
            row += &self.beta;
        }

        self.running_mean = &self.running_mean * MOMENTUM + &mean * (1.0 - MOMENTUM);
        self.running_var = &self.running_var * MOMENTUM + &var * (1.0 - MOMENTUM);

        self.cache = Some(NormCache {
            normalized,
            inv_std,
        });
        out
    }

    pub fn forward_infer(&self, input: &Array2<f32>) -> Array2<f32> {
        let inv_std = self.running_var.mapv(|v| 1.0 / (v + EPSILON).sqrt());
        let mut out = input.clone();
        for mut row in out.rows_mut() {
            row -= &self.running_mean;
            row *= &inv_std;
            row *= &self.gamma;
            row += &self.beta;
        }
        out
    }

    /// Full backward through the batch statistics:
    /// `dx = γ/(n·σ) · (n·dy − Σdy − x̂·Σ(dy·x̂))`.
    pub fn backward(&mut self, grad: &Array2<f32>) -> Array2<f32> {
        let cache = self
            .cache
            .take()
            .expect("forward_train must run before backward");

        let n = grad.nrows() as f32;
        let beta_grad = grad.sum_axis(Axis(0));
        let gamma_grad = (grad * &cache.normalized).sum_axis(Axis(0));

        let coeff: Array1<f32> = self
            .gamma
            .iter()
            .zip(cache.inv_std.iter())
            .map(|(&g, &s)| g * s / n)
            .collect();

        let input_grad = Array2::from_shape_fn(grad.raw_dim(), |(i, j)| {
            coeff[j]
                * (n * grad[[i, j]]
                    - beta_grad[j]
                    - cache.normalized[[i, j]] * gamma_grad[j])
        });

        let gamma_opt = self
            .gamma_opt
            .as_mut()
            .expect("stage must be compiled before training");
        gamma_opt.update_vector(&mut self.gamma, &gamma_grad);
        let beta_opt = self
            .beta_opt
            .as_mut()
            .expect("stage must be compiled before training");
        beta_opt.update_vector(&mut self.beta, &beta_grad);

        input_grad
    }

    pub fn gamma(&self) -> &Array1<f32> {
        &self.gamma
    }

    pub fn beta(&self) -> &Array1<f32> {
        &self.beta
    }

    pub fn running_mean(&self) -> &Array1<f32> {
        &self.running_mean
    }

    pub fn running_var(&self) -> &Array1<f32> {
        &self.running_var
    }

    pub fn set_gamma(&mut self, gamma: Array1<f32>) {
        self.gamma = gamma;
    }

    pub fn set_beta(&mut self, beta: Array1<f32>) {
        self.beta = beta;
    }

    pub fn set_running_mean(&mut self, mean: Array1<f32>) {
        self.running_mean = mean;
    }

    pub fn set_running_var(&mut self, var: Array1<f32>) {
        self.running_var = var;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_training_mode_normalizes_batch() {
        let mut norm = BatchNorm::new(2);
        let input = array![[1.0, 10.0], [3.0, 30.0], [5.0, 50.0], [7.0, 70.0]];
        let out = norm.forward_train(&input);

        for j in 0..2 {
            let col = out.column(j);
            let mean: f32 = col.iter().sum::<f32>() / col.len() as f32;
            let var: f32 = col.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / col.len() as f32;
            assert!(mean.abs() < 1e-4);
            assert!((var - 1.0).abs() < 1e-2);
        }
    }

    #[test]
    fn test_running_statistics_move_toward_batch() {
        let mut norm = BatchNorm::new(1);
        let input = array![[4.0], [6.0]];
        norm.forward_train(&input);

        // batch mean 5.0, one update with momentum 0.99
        assert!((norm.running_mean()[0] - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_inference_uses_running_statistics() {
        let norm = BatchNorm::new(2);
        let input = array![[0.5, -0.5]];
        // fresh running stats are mean 0, var 1
        let out = norm.forward_infer(&input);
        let expected = 0.5 / (1.0f32 + EPSILON).sqrt();
        assert!((out[[0, 0]] - expected).abs() < 1e-5);
        assert!((out[[0, 1]] + expected).abs() < 1e-5);
    }

    #[test]
    fn test_backward_shape_and_updates() {
        use crate::optim::Nadam;

        let mut norm = BatchNorm::new(3);
        norm.compile(Box::new(Nadam::default()), Box::new(Nadam::default()));

        let input = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        norm.forward_train(&input);
        let grad = norm.backward(&Array2::ones((2, 3)));

        assert_eq!(grad.dim(), (2, 3));
        // a constant gradient shifts beta but leaves gamma's gradient at zero
        assert!(norm.beta().iter().any(|&b| b != 0.0));
    }
}
