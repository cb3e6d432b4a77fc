//! Brute-force k-nearest-neighbors classification and regression over numeric tabular data.
//!
//! ```
//! use nearest_neighbors::{KnnClassifier, KnnRegressor};
//!
//! let features = vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![5.0, 5.0]];
//!
//! let mut classifier: KnnClassifier<f64, &str> = KnnClassifier::new(1);
//! classifier.fit(&features, ["near", "near", "far"]);
//! assert_eq!(classifier.predict([[4.0, 4.0]]).unwrap(), vec!["far"]);
//!
//! let mut regressor: KnnRegressor<f64, f64> = KnnRegressor::new(2, false);
//! regressor.fit(&features, [1.0, 3.0, 100.0]);
//! assert_eq!(regressor.predict_one(&[0.0, 0.5]).unwrap(), 2.0);
//! ```

pub mod common_types;
pub mod error;
pub mod knn;

pub use common_types::{DataPoint, Dataset, FeatureVector, Matrix};
pub use error::{KnnError, Result};
pub use knn::aggregate::{Aggregate, MajorityVote, Mean, MeanDivisor, RegressionAggregate, WeightedMean, ZeroDistancePolicy};
pub use knn::distance::{euclidean_distance, manhattan_distance, minkowski_distance};
pub use knn::neighbors::{Neighbor, NeighborSet, find_neighbors};
pub use knn::normalize::minmax_normalize;
pub use knn::{DEFAULT_K, KnnClassifier, KnnDistance, KnnModel, KnnRegressor};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Euclidean distance between two vectors; extra trailing features of the longer one are ignored.
#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "euclidean_distance")]
fn euclidean_distance_py(a: Vec<f64>, b: Vec<f64>) -> f64 {
    euclidean_distance(&a, &b)
}

/// Min-max normalizes every column of `x` to [0, 1]. Raises ValueError on a constant column.
#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "minmax_normalize")]
fn minmax_normalize_py(x: Vec<Vec<f64>>) -> PyResult<Vec<Vec<f64>>> {
    Ok(minmax_normalize(&x)?)
}

#[cfg(feature = "python")]
#[pyclass(name = "KnnClassifier")]
struct PyKnnClassifier {
    classifier: KnnClassifier<f64, String>,
}

#[cfg(feature = "python")]
#[pymethods]
impl PyKnnClassifier {
    #[new]
    #[pyo3(signature = (k = DEFAULT_K))]
    fn new(k: usize) -> Self {
        PyKnnClassifier {
            classifier: KnnClassifier::new(k),
        }
    }

    fn fit(&mut self, x: Vec<Vec<f64>>, y: Vec<String>) {
        self.classifier.fit(x, y);
    }

    fn predict_single(&self, features: Vec<f64>) -> PyResult<String> {
        Ok(self.classifier.predict_one(&features)?)
    }

    fn predict(&self, x: Vec<Vec<f64>>) -> PyResult<Vec<String>> {
        Ok(self.classifier.predict(&x)?)
    }

    #[getter]
    fn k(&self) -> usize {
        self.classifier.k()
    }
}

#[cfg(feature = "python")]
#[pyclass(name = "KnnRegressor")]
struct PyKnnRegressor {
    regressor: KnnRegressor<f64, f64>,
}

#[cfg(feature = "python")]
#[pymethods]
impl PyKnnRegressor {
    #[new]
    #[pyo3(signature = (k = DEFAULT_K, weighted = true))]
    fn new(k: usize, weighted: bool) -> Self {
        PyKnnRegressor {
            regressor: KnnRegressor::new(k, weighted),
        }
    }

    fn fit(&mut self, x: Vec<Vec<f64>>, y: Vec<f64>) {
        self.regressor.fit(x, y);
    }

    fn predict_single(&self, features: Vec<f64>) -> PyResult<f64> {
        Ok(self.regressor.predict_one(&features)?)
    }

    fn predict(&self, x: Vec<Vec<f64>>) -> PyResult<Vec<f64>> {
        Ok(self.regressor.predict(&x)?)
    }

    #[getter]
    fn k(&self) -> usize {
        self.regressor.k()
    }

    #[getter]
    fn weighted(&self) -> bool {
        self.regressor.is_weighted()
    }
}

/// Python module. The name must match `lib.name` in `Cargo.toml`.
#[cfg(feature = "python")]
#[pymodule]
fn nearest_neighbors(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(euclidean_distance_py, m)?)?;
    m.add_function(wrap_pyfunction!(minmax_normalize_py, m)?)?;
    m.add_class::<PyKnnClassifier>()?;
    m.add_class::<PyKnnRegressor>()?;
    Ok(())
}
