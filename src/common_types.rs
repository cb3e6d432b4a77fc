//! This module contains the data structures shared by the distance, normalization and model code.

use crate::error::{KnnError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An ordered sequence of numeric features.
pub type FeatureVector<F> = Vec<F>;

/// Row-major feature matrix: one `FeatureVector` per data point.
pub type Matrix<F> = Vec<FeatureVector<F>>;

/// Represents a single data point, with features and a label.
///
/// - `F`: The type of the features (e.g., `f64`, `i32`).
/// - `L`: The type of the label (e.g., `i32`, `String`, an enum, or `f64` for regression).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DataPoint<F, L> {
    pub features: FeatureVector<F>,
    pub label: L,
}

impl<F, L> DataPoint<F, L> {
    pub fn new(features: FeatureVector<F>, label: L) -> Self {
        DataPoint { features, label }
    }
}

/// A reference set: feature rows paired by index with their targets.
///
/// Both containers always have the same length. Rows are not required to share a
/// dimensionality; distances between rows of unequal length only look at the
/// common prefix.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawDataset<F, T>"))]
pub struct Dataset<F, T> {
    features: Matrix<F>,
    targets: Vec<T>,
}

/// Unvalidated wire form of a [`Dataset`]; deserialization checks it with [`Dataset::new`].
#[cfg(feature = "serde")]
#[derive(Debug, Deserialize)]
pub struct RawDataset<F, T> {
    pub features: Matrix<F>,
    pub targets: Vec<T>,
}

#[cfg(feature = "serde")]
impl<F, T> TryFrom<RawDataset<F, T>> for Dataset<F, T> {
    type Error = KnnError;

    fn try_from(raw: RawDataset<F, T>) -> Result<Self> {
        Dataset::new(raw.features, raw.targets)
    }
}

impl<F, T> Dataset<F, T> {
    /// Builds a dataset, rejecting feature and target containers of different length.
    pub fn new(features: Matrix<F>, targets: Vec<T>) -> Result<Self> {
        if features.len() != targets.len() {
            return Err(KnnError::ShapeMismatch {
                expected: format!("{} targets", features.len()),
                actual: format!("{} targets", targets.len()),
            });
        }
        Ok(Dataset { features, targets })
    }

    /// Builds a dataset by pairing rows and targets positionally.
    ///
    /// Any input type works: a `Vec<Vec<f64>>`, a slice of arrays, an iterator of
    /// borrowed rows. Rows are copied into owned vectors. When the two inputs differ in
    /// length, the longer one is truncated so that only complete pairs remain.
    pub fn from_pairs<X, R, Y>(features: X, targets: Y) -> Self
    where
        X: IntoIterator<Item = R>,
        R: AsRef<[F]>,
        F: Clone,
        Y: IntoIterator<Item = T>,
    {
        let mut features: Matrix<F> = features.into_iter().map(|row| row.as_ref().to_vec()).collect();
        let mut targets: Vec<T> = targets.into_iter().collect();

        if features.len() != targets.len() {
            let paired = features.len().min(targets.len());
            log::warn!(
                "{} feature rows but {} targets; pairing truncated to {} points",
                features.len(),
                targets.len(),
                paired
            );
            features.truncate(paired);
            targets.truncate(paired);
        }
        Dataset { features, targets }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Number of features in the first row, or `None` for an empty dataset.
    pub fn dimensions(&self) -> Option<usize> {
        self.features.first().map(Vec::len)
    }

    pub fn features(&self) -> &[FeatureVector<F>] {
        &self.features
    }

    pub fn targets(&self) -> &[T] {
        &self.targets
    }

    /// Iterates over `(features, target)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&[F], &T)> {
        self.features.iter().map(Vec::as_slice).zip(self.targets.iter())
    }

    /// Consumes the dataset and hands back its containers.
    pub fn into_parts(self) -> (Matrix<F>, Vec<T>) {
        (self.features, self.targets)
    }
}

impl<F, T> FromIterator<DataPoint<F, T>> for Dataset<F, T> {
    fn from_iter<I: IntoIterator<Item = DataPoint<F, T>>>(iter: I) -> Self {
        let (features, targets) = iter.into_iter().map(|dp| (dp.features, dp.label)).unzip();
        Dataset { features, targets }
    }
}
