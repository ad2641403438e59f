//! Integration tests for the uniform training protocol

use clasificar::train::SilentProgress;
use clasificar::{BatchInput, Dataset, Error, Ffnn, Mlp, NeuralNetwork, TrainConfig};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_dataset(n: usize, dim: usize, seed: u64) -> (Array2<f32>, Array1<f32>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let features = Array2::from_shape_fn((n, dim), |_| rng.gen::<f32>() * 2.0 - 1.0);
    let labels = Array1::from_shape_fn(n, |_| if rng.gen::<bool>() { 1.0 } else { 0.0 });
    (features, labels)
}

#[test]
fn test_mlp_scenario_two_epochs() {
    let (features, labels) = random_dataset(1000, 50, 7);
    let config = TrainConfig::new()
        .with_max_epochs(2)
        .with_patience(10)
        .with_monitor("auprc");
    let mut network = NeuralNetwork::new(&Mlp::new(50), config).unwrap();

    let history = network
        .fit_with(
            &Dataset::single(features.clone(), labels),
            None,
            &mut SilentProgress,
        )
        .unwrap();

    assert_eq!(history.len(), 2);
    assert!(!history.has_validation());
    assert_eq!(history.records()[0].epoch, 0);
    assert_eq!(history.records()[1].epoch, 1);

    let scores = network
        .predict_proba(&BatchInput::single(features))
        .unwrap();
    assert_eq!(scores.len(), 1000);
    assert!(scores.iter().all(|&s| (0.0..=1.0).contains(&s)));
}

#[test]
fn test_validation_monitor_without_test_data_fails_before_training() {
    let (features, labels) = random_dataset(64, 10, 11);
    let config = TrainConfig::new()
        .with_max_epochs(5)
        .with_monitor("val_auprc");
    let mut network = NeuralNetwork::new(&Mlp::new(10), config).unwrap();

    let before = network
        .predict_proba(&BatchInput::single(features.clone()))
        .unwrap();

    let result = network.fit_with(
        &Dataset::single(features.clone(), labels),
        None,
        &mut SilentProgress,
    );
    assert!(matches!(result, Err(Error::InvalidConfiguration(_))));

    // the gate runs before any computation: parameters are untouched
    let after = network
        .predict_proba(&BatchInput::single(features))
        .unwrap();
    for (a, b) in before.iter().zip(after.iter()) {
        assert_eq!(a, b);
    }
}

#[test]
fn test_validation_data_adds_val_columns() {
    let (features, labels) = random_dataset(120, 8, 13);
    let (val_features, val_labels) = random_dataset(40, 8, 17);
    let config = TrainConfig::new()
        .with_max_epochs(2)
        .with_monitor("val_loss");
    let mut network = NeuralNetwork::new(&Mlp::new(8), config).unwrap();

    let history = network
        .fit_with(
            &Dataset::single(features, labels),
            Some(&Dataset::single(val_features, val_labels)),
            &mut SilentProgress,
        )
        .unwrap();

    assert!(history.has_validation());
    assert_eq!(history.column("val_loss").map(|c| c.len()), Some(2));
    assert_eq!(history.column("val_auprc").map(|c| c.len()), Some(2));
}

#[test]
fn test_history_never_exceeds_max_epochs() {
    let (features, labels) = random_dataset(48, 6, 19);
    let config = TrainConfig::new()
        .with_max_epochs(3)
        .with_batch_size(16)
        .with_monitor("loss")
        .with_patience(50);
    let mut network = NeuralNetwork::new(&Mlp::new(6), config).unwrap();

    let history = network
        .fit_with(&Dataset::single(features, labels), None, &mut SilentProgress)
        .unwrap();
    assert!(history.len() <= 3);
    assert!(!history.is_empty());
}

#[test]
fn test_zero_patience_stops_quickly() {
    // with patience 0, the first epoch without improvement ends training
    let (features, labels) = random_dataset(64, 6, 23);
    let config = TrainConfig::new()
        .with_max_epochs(50)
        .with_monitor("accuracy")
        .with_patience(0);
    let mut network = NeuralNetwork::new(&Mlp::new(6), config).unwrap();

    let history = network
        .fit_with(&Dataset::single(features, labels), None, &mut SilentProgress)
        .unwrap();
    assert!(history.len() < 50);
}

#[test]
fn test_label_count_mismatch_rejected() {
    let config = TrainConfig::new().with_max_epochs(2);
    let mut network = NeuralNetwork::new(&Mlp::new(4), config).unwrap();

    let result = network.fit_with(
        &Dataset::single(Array2::zeros((10, 4)), Array1::zeros(9)),
        None,
        &mut SilentProgress,
    );
    assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
}

#[test]
fn test_feature_width_mismatch_rejected() {
    let config = TrainConfig::new().with_max_epochs(2);
    let mut network = NeuralNetwork::new(&Mlp::new(4), config).unwrap();

    let result = network.fit_with(
        &Dataset::single(Array2::zeros((10, 5)), Array1::zeros(10)),
        None,
        &mut SilentProgress,
    );
    assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
}

#[test]
fn test_unknown_monitor_rejected() {
    let config = TrainConfig::new().with_monitor("f1");
    let mut network = NeuralNetwork::new(&Mlp::new(4), config).unwrap();

    let result = network.fit_with(
        &Dataset::single(Array2::zeros((8, 4)), Array1::zeros(8)),
        None,
        &mut SilentProgress,
    );
    assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
}

#[test]
fn test_training_improves_separable_problem() {
    // labels follow the sign of the first feature
    let mut rng = StdRng::seed_from_u64(29);
    let features = Array2::from_shape_fn((200, 5), |_| rng.gen::<f32>() * 2.0 - 1.0);
    let labels = Array1::from_shape_fn(200, |i| if features[[i, 0]] > 0.0 { 1.0 } else { 0.0 });

    let config = TrainConfig::new()
        .with_max_epochs(30)
        .with_batch_size(32)
        .with_monitor("loss")
        .with_patience(30);
    let mut network = NeuralNetwork::new(&Mlp::new(5), config).unwrap();

    let history = network
        .fit_with(
            &Dataset::single(features.clone(), labels.clone()),
            None,
            &mut SilentProgress,
        )
        .unwrap();

    let first_loss = history.records()[0].loss;
    let last = history.last().unwrap();
    assert!(last.loss < first_loss);
    assert!(last.accuracy > 0.7, "accuracy only reached {}", last.accuracy);
}

#[test]
fn test_ffnn_trains_and_predicts() {
    let (features, labels) = random_dataset(96, 12, 31);
    let config = TrainConfig::new()
        .with_max_epochs(2)
        .with_batch_size(24)
        .with_monitor("auroc");
    let mut network = NeuralNetwork::new(&Ffnn::new(12), config).unwrap();

    let history = network
        .fit_with(
            &Dataset::single(features.clone(), labels),
            None,
            &mut SilentProgress,
        )
        .unwrap();
    assert_eq!(history.len(), 2);

    let scores = network
        .predict_proba(&BatchInput::single(features))
        .unwrap();
    assert_eq!(scores.len(), 96);
    assert!(scores.iter().all(|&s| (0.0..=1.0).contains(&s)));
}

#[test]
fn test_predict_rejects_wrong_arity() {
    let config = TrainConfig::new();
    let network = NeuralNetwork::new(&Mlp::new(4), config).unwrap();
    let pair = BatchInput::pair(Array2::zeros((2, 4)), Array2::zeros((2, 4)));
    assert!(network.predict_proba(&pair).is_err());
}
