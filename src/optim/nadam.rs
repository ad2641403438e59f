//! Nadam optimizer

use ndarray::{Array1, Array2};

use super::Optimizer;

/// Nesterov-accelerated adaptive moment estimation (Dozat, 2016).
///
/// Adam with the first-moment estimate replaced by its Nesterov
/// look-ahead. Matrix and vector parameter groups keep independent
/// moment buffers and step counters.
#[derive(Clone)]
pub struct Nadam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    t_matrix: u64,
    t_vector: u64,
    m_matrix: Option<Array2<f32>>,
    v_matrix: Option<Array2<f32>>,
    m_vector: Option<Array1<f32>>,
    v_vector: Option<Array1<f32>>,
}

impl Nadam {
    pub fn new(lr: f32, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Self {
            lr,
            beta1,
            beta2,
            epsilon,
            t_matrix: 0,
            t_vector: 0,
            m_matrix: None,
            v_matrix: None,
            m_vector: None,
            v_vector: None,
        }
    }

    /// Nadam with the conventional defaults.
    pub fn default_params(lr: f32) -> Self {
        Self::new(lr, 0.9, 0.999, 1e-7)
    }
}

impl Default for Nadam {
    fn default() -> Self {
        Self::default_params(1e-3)
    }
}

impl Optimizer for Nadam {
    fn update_matrix(&mut self, param: &mut Array2<f32>, grad: &Array2<f32>) {
        self.t_matrix += 1;
        let t = self.t_matrix as i32;

        let m = self
            .m_matrix
            .get_or_insert_with(|| Array2::zeros(grad.raw_dim()));
        let v = self
            .v_matrix
            .get_or_insert_with(|| Array2::zeros(grad.raw_dim()));

        *m = &*m * self.beta1 + grad * (1.0 - self.beta1);
        *v = &*v * self.beta2 + &(grad * grad) * (1.0 - self.beta2);

        let m_correction = 1.0 - self.beta1.powi(t);
        let v_correction = 1.0 - self.beta2.powi(t);

        // Nesterov look-ahead on the corrected first moment
        let m_bar = &*m * (self.beta1 / m_correction) + grad * ((1.0 - self.beta1) / m_correction);
        let denom = (&*v / v_correction).mapv(f32::sqrt) + self.epsilon;

        *param = &*param - &(m_bar / denom * self.lr);
    }

    fn update_vector(&mut self, param: &mut Array1<f32>, grad: &Array1<f32>) {
        self.t_vector += 1;
        let t = self.t_vector as i32;

        let m = self
            .m_vector
            .get_or_insert_with(|| Array1::zeros(grad.len()));
        let v = self
            .v_vector
            .get_or_insert_with(|| Array1::zeros(grad.len()));

        *m = &*m * self.beta1 + grad * (1.0 - self.beta1);
        *v = &*v * self.beta2 + &(grad * grad) * (1.0 - self.beta2);

        let m_correction = 1.0 - self.beta1.powi(t);
        let v_correction = 1.0 - self.beta2.powi(t);

        let m_bar = &*m * (self.beta1 / m_correction) + grad * ((1.0 - self.beta1) / m_correction);
        let denom = (&*v / v_correction).mapv(f32::sqrt) + self.epsilon;

        *param = &*param - &(m_bar / denom * self.lr);
    }

    fn reset(&mut self) {
        self.t_matrix = 0;
        self.t_vector = 0;
        self.m_matrix = None;
        self.v_matrix = None;
        self.m_vector = None;
        self.v_vector = None;
    }

    fn clone_box(&self) -> Box<dyn Optimizer> {
        Box::new(self.clone())
    }

    fn lr(&self) -> f32 {
        self.lr
    }
}
