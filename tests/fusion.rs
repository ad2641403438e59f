//! Integration tests for the dual-input fusion network

use clasificar::train::SilentProgress;
use clasificar::{MultiModalNetwork, TrainConfig};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DIM: usize = 6;

fn paired_data(n: usize, seed: u64) -> (Array2<f32>, Array2<f32>, Array1<f32>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let left = Array2::from_shape_fn((n, DIM), |_| rng.gen::<f32>() * 2.0 - 1.0);
    let right = Array2::from_shape_fn((n, DIM), |_| rng.gen::<f32>() * 2.0 - 1.0);
    let labels = Array1::from_shape_fn(n, |_| if rng.gen::<bool>() { 1.0 } else { 0.0 });
    (left, right, labels)
}

fn quick_config() -> TrainConfig {
    TrainConfig::new()
        .with_max_epochs(2)
        .with_batch_size(16)
        .with_monitor("auprc")
        .with_patience(10)
}

#[test]
fn test_fit_and_predict_shapes() {
    let (left, right, labels) = paired_data(64, 41);
    let mut network = MultiModalNetwork::new(DIM, quick_config()).unwrap();

    let history = network
        .fit_with(&left, &right, &labels, None, None, None, &mut SilentProgress)
        .unwrap();
    assert_eq!(history.len(), 2);
    assert!(!history.has_validation());

    let scores = network.predict_proba(&left, &right).unwrap();
    assert_eq!(scores.len(), 64);
    assert!(scores.iter().all(|&s| (0.0..=1.0).contains(&s)));
}

#[test]
fn test_full_validation_triple_enables_val_columns() {
    let (left, right, labels) = paired_data(64, 43);
    let (val_left, val_right, val_labels) = paired_data(24, 47);
    let mut network = MultiModalNetwork::new(DIM, quick_config()).unwrap();

    let history = network
        .fit_with(
            &left,
            &right,
            &labels,
            Some(&val_left),
            Some(&val_right),
            Some(&val_labels),
            &mut SilentProgress,
        )
        .unwrap();
    assert!(history.has_validation());
    assert_eq!(history.column("val_auprc").map(|c| c.len()), Some(2));
}

#[test]
fn test_partial_validation_behaves_as_none() {
    // one or two of the three validation arrays is treated exactly as
    // no validation data: no error, no validation columns
    let (left, right, labels) = paired_data(48, 53);
    let (val_left, val_right, val_labels) = paired_data(16, 59);

    let partial_sets: [(Option<&Array2<f32>>, Option<&Array2<f32>>, Option<&Array1<f32>>); 6] = [
        (Some(&val_left), None, None),
        (None, Some(&val_right), None),
        (None, None, Some(&val_labels)),
        (Some(&val_left), Some(&val_right), None),
        (Some(&val_left), None, Some(&val_labels)),
        (None, Some(&val_right), Some(&val_labels)),
    ];

    for (val_l, val_r, val_y) in partial_sets {
        let mut network = MultiModalNetwork::new(DIM, quick_config()).unwrap();
        let history = network
            .fit_with(&left, &right, &labels, val_l, val_r, val_y, &mut SilentProgress)
            .unwrap();
        assert!(!history.has_validation());
        assert_eq!(history.len(), 2);
    }
}

#[test]
fn test_partial_validation_with_val_monitor_fails() {
    // partial validation data counts as none, so a val_ monitor cannot run
    let (left, right, labels) = paired_data(32, 61);
    let (val_left, _, _) = paired_data(16, 67);

    let config = quick_config().with_monitor("val_auprc");
    let mut network = MultiModalNetwork::new(DIM, config).unwrap();
    let result = network.fit_with(
        &left,
        &right,
        &labels,
        Some(&val_left),
        None,
        None,
        &mut SilentProgress,
    );
    assert!(matches!(
        result,
        Err(clasificar::Error::InvalidConfiguration(_))
    ));
}

#[test]
fn test_pair_leading_dimension_mismatch_rejected() {
    let (left, _, labels) = paired_data(32, 71);
    let (short_right, _, _) = paired_data(31, 73);
    let mut network = MultiModalNetwork::new(DIM, quick_config()).unwrap();

    let result = network.fit_with(
        &left,
        &short_right,
        &labels,
        None,
        None,
        None,
        &mut SilentProgress,
    );
    assert!(matches!(
        result,
        Err(clasificar::Error::ShapeMismatch { .. })
    ));
}

#[test]
fn test_predict_requires_equal_leading_dimensions() {
    let network = MultiModalNetwork::new(DIM, quick_config()).unwrap();
    let result = network.predict_proba(&Array2::zeros((3, DIM)), &Array2::zeros((4, DIM)));
    assert!(result.is_err());
}
