//! Integration tests for trainer-level parameter persistence

use clasificar::train::SilentProgress;
use clasificar::{BatchInput, Dataset, Ffnn, Mlp, MultiModalNetwork, NeuralNetwork, TrainConfig};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::tempdir;

fn random_features(n: usize, dim: usize, seed: u64) -> Array2<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((n, dim), |_| rng.gen::<f32>() * 2.0 - 1.0)
}

fn random_labels(n: usize, seed: u64) -> Array1<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array1::from_shape_fn(n, |_| if rng.gen::<bool>() { 1.0 } else { 0.0 })
}

#[test]
fn test_trained_mlp_roundtrip_preserves_scores() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mlp.json");

    let features = random_features(80, 10, 83);
    let labels = random_labels(80, 89);
    let config = TrainConfig::new().with_max_epochs(3).with_monitor("loss");
    let mut network = NeuralNetwork::new(&Mlp::new(10), config.clone()).unwrap();
    network
        .fit_with(
            &Dataset::single(features.clone(), labels),
            None,
            &mut SilentProgress,
        )
        .unwrap();
    network.save(&path).unwrap();

    let mut restored = NeuralNetwork::new(&Mlp::new(10), config).unwrap();
    restored.load_parameters(&path).unwrap();

    let probe = BatchInput::single(features);
    let original = network.predict_proba(&probe).unwrap();
    let reloaded = restored.predict_proba(&probe).unwrap();
    for (a, b) in original.iter().zip(reloaded.iter()) {
        assert!((a - b).abs() < 1e-6);
    }
}

#[test]
fn test_trained_ffnn_roundtrip_preserves_running_statistics() {
    // the FFNN's normalization stages infer with running statistics,
    // so the round-trip only holds if those are persisted too
    let dir = tempdir().unwrap();
    let path = dir.path().join("ffnn.json");

    let features = random_features(96, 8, 97);
    let labels = random_labels(96, 101);
    let config = TrainConfig::new().with_max_epochs(3).with_monitor("loss");
    let mut network = NeuralNetwork::new(&Ffnn::new(8), config.clone()).unwrap();
    network
        .fit_with(
            &Dataset::single(features.clone(), labels),
            None,
            &mut SilentProgress,
        )
        .unwrap();
    network.save(&path).unwrap();

    let mut restored = NeuralNetwork::new(&Ffnn::new(8), config).unwrap();
    restored.load_parameters(&path).unwrap();

    let probe = BatchInput::single(features);
    let original = network.predict_proba(&probe).unwrap();
    let reloaded = restored.predict_proba(&probe).unwrap();
    for (a, b) in original.iter().zip(reloaded.iter()) {
        assert!((a - b).abs() < 1e-6);
    }
}

#[test]
fn test_multi_modal_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fusion.json");

    let left = random_features(40, 5, 103);
    let right = random_features(40, 5, 107);
    let labels = random_labels(40, 109);
    let config = TrainConfig::new().with_max_epochs(2).with_monitor("loss");
    let mut network = MultiModalNetwork::new(5, config.clone()).unwrap();
    network
        .fit_with(&left, &right, &labels, None, None, None, &mut SilentProgress)
        .unwrap();
    network.save(&path).unwrap();

    let mut restored = MultiModalNetwork::new(5, config).unwrap();
    restored.load_parameters(&path).unwrap();

    let original = network.predict_proba(&left, &right).unwrap();
    let reloaded = restored.predict_proba(&left, &right).unwrap();
    for (a, b) in original.iter().zip(reloaded.iter()) {
        assert!((a - b).abs() < 1e-6);
    }
}

#[test]
fn test_load_into_wrong_shape_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mlp.json");

    let network = NeuralNetwork::new(&Mlp::new(10), TrainConfig::new()).unwrap();
    network.save(&path).unwrap();

    let mut wrong = NeuralNetwork::new(&Mlp::new(11), TrainConfig::new()).unwrap();
    assert!(wrong.load_parameters(&path).is_err());
}
