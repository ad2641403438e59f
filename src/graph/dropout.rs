//! Dropout regularization stage

use ndarray::Array2;
use rand::Rng;

/// Inverted dropout: surviving activations are scaled by `1/(1-rate)`
/// during training so the inference path is the identity.
pub struct Dropout {
    rate: f32,
    mask: Option<Array2<f32>>,
}

impl Dropout {
    pub fn new(rate: f32) -> Self {
        Self {
            rate: rate.clamp(0.0, 1.0 - f32::EPSILON),
            mask: None,
        }
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn forward_train(&mut self, input: &Array2<f32>) -> Array2<f32> {
        if self.rate == 0.0 {
            self.mask = None;
            return input.clone();
        }

        let mut rng = rand::thread_rng();
        let keep_scale = 1.0 / (1.0 - self.rate);
        let mask = Array2::from_shape_fn(input.raw_dim(), |_| {
            if rng.gen::<f32>() >= self.rate {
                keep_scale
            } else {
                0.0
            }
        });
        let out = input * &mask;
        self.mask = Some(mask);
        out
    }

    pub fn forward_infer(&self, input: &Array2<f32>) -> Array2<f32> {
        input.clone()
    }

    pub fn backward(&mut self, grad: &Array2<f32>) -> Array2<f32> {
        match self.mask.take() {
            Some(mask) => grad * &mask,
            None => grad.clone(),
        }
    }
}
