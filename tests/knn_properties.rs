use approx::{assert_abs_diff_eq, assert_relative_eq};
use nearest_neighbors::{
    Dataset, KnnClassifier, KnnDistance, KnnError, KnnRegressor, euclidean_distance, find_neighbors,
    minmax_normalize,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> Vec<Vec<f64>> {
    (0..rows)
        .map(|_| (0..cols).map(|_| rng.gen_range(-100.0..100.0)).collect())
        .collect()
}

#[test]
fn distance_is_symmetric_and_zero_on_self() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let dims = rng.gen_range(1..8);
        let a: Vec<f64> = (0..dims).map(|_| rng.gen_range(-1e3..1e3)).collect();
        let b: Vec<f64> = (0..dims).map(|_| rng.gen_range(-1e3..1e3)).collect();
        assert_eq!(euclidean_distance(&a, &b), euclidean_distance(&b, &a));
        assert_eq!(euclidean_distance(&a, &a), 0.0);
    }
}

#[test]
fn neighbor_sets_have_k_entries_sorted_by_distance() {
    let mut rng = StdRng::seed_from_u64(11);
    let features = random_matrix(&mut rng, 60, 3);
    let targets: Vec<usize> = (0..60).collect();
    let dataset = Dataset::new(features, targets).unwrap();

    for k in [1, 5, 17, 60] {
        let query: Vec<f64> = (0..3).map(|_| rng.gen_range(-100.0..100.0)).collect();
        let neighbors = find_neighbors(&dataset, &query, k, &KnnDistance::Euclidean);
        assert_eq!(neighbors.len(), k);
        let distances: Vec<f64> = neighbors.distances().collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }
}

#[test]
fn equidistant_vote_goes_to_first_encountered_class() {
    // All three points lie on the unit circle around the query.
    let mut classifier: KnnClassifier<f64, &str> = KnnClassifier::new(3);
    classifier.fit(vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![-1.0, 0.0]], vec!["A", "A", "B"]);
    assert_eq!(classifier.predict_one(&[0.0, 0.0]).unwrap(), "A");

    // A 1-1 tie: the class of the closer neighbor wins.
    let mut classifier: KnnClassifier<f64, &str> = KnnClassifier::new(2);
    classifier.fit(vec![vec![0.0], vec![3.0]], vec!["B", "A"]);
    assert_eq!(classifier.predict_one(&[1.0]).unwrap(), "B");
}

#[test]
fn unweighted_mean_ignores_positions() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut regressor: KnnRegressor<f64, f64> = KnnRegressor::new(3, false);
    regressor.fit(random_matrix(&mut rng, 3, 4), vec![2.0, 4.0, 6.0]);
    for query in random_matrix(&mut rng, 10, 4) {
        assert_relative_eq!(regressor.predict_one(&query).unwrap(), 4.0);
    }
}

#[test]
fn weighted_mean_of_two_neighbors() {
    let mut regressor: KnnRegressor<f64, f64> = KnnRegressor::new(2, true);
    regressor.fit(vec![vec![1.0], vec![2.0]], vec![10.0, 20.0]);
    let prediction = regressor.predict_one(&[0.0]).unwrap();
    assert_relative_eq!(prediction, 20.0 / 1.5, epsilon = 1e-12);
    assert_relative_eq!(prediction, 13.333_333_333_333, epsilon = 1e-9);
}

#[test]
fn minmax_column_and_degenerate_column() {
    let normalized = minmax_normalize(vec![vec![0.0], vec![5.0], vec![10.0]]).unwrap();
    assert_eq!(normalized, vec![vec![0.0], vec![0.5], vec![1.0]]);

    let err = minmax_normalize(vec![vec![4.0], vec![4.0]]).unwrap_err();
    assert_eq!(err, KnnError::DegenerateFeature { column: 0, value: 4.0 });
}

#[test]
fn normalizing_normalized_data_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(21);
    let once = minmax_normalize(random_matrix(&mut rng, 25, 5)).unwrap();
    let twice = minmax_normalize(&once).unwrap();
    for (row_once, row_twice) in once.iter().zip(twice.iter()) {
        for (a, b) in row_once.iter().zip(row_twice.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
    }
}

#[test]
fn k1_on_training_set_reproduces_targets() {
    let mut rng = StdRng::seed_from_u64(99);
    let features = random_matrix(&mut rng, 40, 3);
    let labels: Vec<u32> = (0..40).map(|_| rng.gen_range(0..4)).collect();
    let targets: Vec<f64> = (0..40).map(|_| rng.gen_range(-10.0..10.0)).collect();

    let mut classifier: KnnClassifier<f64, u32> = KnnClassifier::new(1);
    classifier.fit(&features, labels.clone());
    assert_eq!(classifier.predict(&features).unwrap(), labels);

    for weighted in [true, false] {
        let mut regressor: KnnRegressor<f64, f64> = KnnRegressor::new(1, weighted);
        regressor.fit(&features, targets.clone());
        assert_eq!(regressor.predict(&features).unwrap(), targets);
    }
}

#[test]
fn parallel_and_sequential_predictions_agree() {
    let mut rng = StdRng::seed_from_u64(5);
    let features = random_matrix(&mut rng, 200, 4);
    let targets: Vec<f64> = (0..200).map(|_| rng.gen_range(0.0..50.0)).collect();
    let queries = random_matrix(&mut rng, 100, 4);

    let mut regressor: KnnRegressor<f64, f64> = KnnRegressor::new(7, true);
    regressor.fit(&features, targets);
    assert_eq!(regressor.par_predict(queries.as_slice()).unwrap(), regressor.predict(&queries).unwrap());
}

#[test]
fn k_beyond_dataset_truncates_neighborhood() {
    let mut classifier: KnnClassifier<f64, char> = KnnClassifier::new(10);
    classifier.fit(vec![vec![0.0], vec![1.0], vec![2.0]], vec!['x', 'y', 'y']);
    assert_eq!(classifier.kneighbors(&[0.0]).unwrap().len(), 3);
    assert_eq!(classifier.predict_one(&[0.0]).unwrap(), 'y');

    // The plain mean still divides by the configured k.
    let mut regressor: KnnRegressor<f64, f64> = KnnRegressor::new(10, false);
    regressor.fit(vec![vec![0.0], vec![1.0]], vec![5.0, 5.0]);
    assert_relative_eq!(regressor.predict_one(&[0.0]).unwrap(), 1.0);
}
