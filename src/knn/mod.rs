//! Brute-force k-nearest-neighbors classification and regression.
//!
//! Both models are the same [`KnnModel`] with a different aggregation strategy:
//! [`KnnClassifier`] takes a majority vote over the neighbor labels and
//! [`KnnRegressor`] averages the neighbor targets, optionally weighted by inverse distance.

pub mod aggregate;
pub mod distance;
pub mod neighbors;
pub mod normalize;

use std::sync::Arc;

use num_traits::AsPrimitive;
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::common_types::{Dataset, Matrix};
use crate::error::{KnnError, Result};
use aggregate::{Aggregate, MajorityVote, MeanDivisor, RegressionAggregate, ZeroDistancePolicy};
use neighbors::{NeighborSet, find_neighbors};

/// Number of neighbors used when none is given.
pub const DEFAULT_K: usize = 5;

/// Distance metric used to rank reference points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KnnDistance {
    #[default]
    Euclidean,
    Manhattan,
    Minkowski { p: u32 }, // p is the order for Minkowski distance
}

impl KnnDistance {
    fn validate(&self) -> Result<()> {
        match *self {
            KnnDistance::Minkowski { p: 0 } => Err(KnnError::InvalidParameter(
                "Minkowski order p must be at least 1".to_string(),
            )),
            KnnDistance::Minkowski { p } if i32::try_from(p).is_err() => Err(KnnError::InvalidParameter(
                format!("Minkowski order p must be at most {}, got {}", i32::MAX, p),
            )),
            _ => Ok(()),
        }
    }
}

/// A k-nearest-neighbors model parameterized by its aggregation strategy.
///
/// - `F`: feature type, anything that widens to `f64` (`f64`, `f32`, `i32`, `u8`, ...).
/// - `T`: target type stored alongside each reference point.
/// - `A`: how the targets of the `k` nearest neighbors become one prediction.
///
/// The reference set is held behind an `Arc` and never modified after `fit`, so a
/// fitted model can be shared across threads and several models can share one dataset.
#[derive(Debug, Clone)]
pub struct KnnModel<F, T, A> {
    k: usize,
    distance_metric: KnnDistance,
    aggregation: A,
    dataset: Option<Arc<Dataset<F, T>>>,
}

/// Predicts the most common label among the `k` nearest neighbors.
pub type KnnClassifier<F, L> = KnnModel<F, L, MajorityVote>;

/// Predicts the (optionally inverse-distance weighted) mean target of the `k` nearest neighbors.
pub type KnnRegressor<F, T> = KnnModel<F, T, RegressionAggregate>;

impl<F, L> KnnModel<F, L, MajorityVote> {
    pub fn new(k: usize) -> Self {
        Self::with_aggregation(k, MajorityVote)
    }
}

impl<F, L> Default for KnnModel<F, L, MajorityVote> {
    fn default() -> Self {
        Self::new(DEFAULT_K)
    }
}

impl<F, T> KnnModel<F, T, RegressionAggregate> {
    /// `weighted` selects the inverse-distance weighted mean over the plain mean.
    pub fn new(k: usize, weighted: bool) -> Self {
        Self::with_aggregation(k, RegressionAggregate::new(weighted))
    }

    pub fn is_weighted(&self) -> bool {
        self.aggregation.is_weighted()
    }

    /// Sets the divisor of the plain mean. Has no effect on a weighted regressor.
    pub fn with_mean_divisor(mut self, divisor: MeanDivisor) -> Self {
        if let RegressionAggregate::Mean(mean) = &mut self.aggregation {
            mean.divisor = divisor;
        }
        self
    }

    /// Sets how zero-distance neighbors are weighted. Has no effect on a plain-mean regressor.
    pub fn with_zero_distance(mut self, policy: ZeroDistancePolicy) -> Self {
        if let RegressionAggregate::WeightedMean(weighted) = &mut self.aggregation {
            weighted.zero_distance = policy;
        }
        self
    }
}

impl<F, T> Default for KnnModel<F, T, RegressionAggregate> {
    fn default() -> Self {
        Self::new(DEFAULT_K, true)
    }
}

impl<F, T, A> KnnModel<F, T, A> {
    /// Builds an unfitted model around any aggregation strategy.
    pub fn with_aggregation(k: usize, aggregation: A) -> Self {
        KnnModel {
            k,
            distance_metric: KnnDistance::default(),
            aggregation,
            dataset: None,
        }
    }

    /// Replaces the distance metric. Fails for a Minkowski order of 0 or above `i32::MAX`.
    pub fn with_distance(mut self, distance_metric: KnnDistance) -> Result<Self> {
        distance_metric.validate()?;
        self.distance_metric = distance_metric;
        Ok(self)
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn distance_metric(&self) -> KnnDistance {
        self.distance_metric
    }

    pub fn aggregation(&self) -> &A {
        &self.aggregation
    }

    pub fn is_fitted(&self) -> bool {
        self.dataset.is_some()
    }

    /// The reference set stored by the last `fit`, if any.
    pub fn dataset(&self) -> Option<&Arc<Dataset<F, T>>> {
        self.dataset.as_ref()
    }

    /// Stores the reference set. Rows and targets are paired by position; no shape
    /// validation is done beyond dropping unpaired trailing entries.
    ///
    /// The inputs are copied, so changing them afterwards does not affect predictions.
    /// Any previously fitted data is replaced.
    pub fn fit<X, R, Y>(&mut self, features: X, targets: Y)
    where
        X: IntoIterator<Item = R>,
        R: AsRef<[F]>,
        F: Clone,
        Y: IntoIterator<Item = T>,
    {
        self.fit_shared(Arc::new(Dataset::from_pairs(features, targets)));
    }

    /// Stores a reference set that the caller (or another model) already owns.
    pub fn fit_shared(&mut self, dataset: Arc<Dataset<F, T>>) {
        log::debug!(
            "fitted k = {} model on {} points with {} features",
            self.k,
            dataset.len(),
            dataset.dimensions().unwrap_or(0)
        );
        if dataset.len() < self.k {
            log::warn!(
                "k = {} exceeds the {} reference points; every neighborhood will be short",
                self.k,
                dataset.len()
            );
        }
        self.dataset = Some(dataset);
    }

    /// Min-max normalizes `x` column by column. Never applied by `fit` or `predict`.
    pub fn minmax_normalize<X, R>(&self, x: X) -> Result<Matrix<f64>>
    where
        X: IntoIterator<Item = R>,
        R: AsRef<[F]>,
        F: AsPrimitive<f64>,
    {
        normalize::minmax_normalize(x)
    }

    fn reference(&self) -> Result<&Dataset<F, T>> {
        self.dataset.as_deref().ok_or(KnnError::NotFitted)
    }
}

impl<F, T, A> KnnModel<F, T, A>
where
    F: AsPrimitive<f64>,
    T: Clone,
    A: Aggregate<T>,
{
    /// The `k` reference points nearest to `query`, closest first.
    pub fn kneighbors(&self, query: &[F]) -> Result<NeighborSet<T>> {
        let reference = self.reference()?;
        let neighbors = find_neighbors(reference, query, self.k, &self.distance_metric);
        if neighbors.len() < self.k {
            log::debug!(
                "k = {} but only {} reference points available",
                self.k,
                neighbors.len()
            );
        }
        Ok(neighbors)
    }

    /// Predicts the target of a single query point.
    pub fn predict_one(&self, query: &[F]) -> Result<A::Output> {
        let neighbors = self.kneighbors(query)?;
        self.aggregation.aggregate(&neighbors, self.k)
    }

    /// Predicts one target per query row, in order. The first failing query aborts the batch.
    pub fn predict<X, R>(&self, queries: X) -> Result<Vec<A::Output>>
    where
        X: IntoIterator<Item = R>,
        R: AsRef<[F]>,
    {
        let queries = queries.into_iter();
        let mut predictions = Vec::with_capacity(queries.size_hint().0);
        for query in queries {
            predictions.push(self.predict_one(query.as_ref())?);
        }
        log::debug!("predicted {} queries", predictions.len());
        Ok(predictions)
    }
}

impl<F, T, A> KnnModel<F, T, A>
where
    F: AsPrimitive<f64> + Sync + Send,
    T: Clone + Sync + Send,
    A: Aggregate<T> + Sync,
    A::Output: Send,
{
    /// Same results as [`predict`](Self::predict), with queries spread over the rayon pool.
    ///
    /// The reference set is read-only for the duration of the call.
    pub fn par_predict<R>(&self, queries: &[R]) -> Result<Vec<A::Output>>
    where
        R: AsRef<[F]> + Sync,
    {
        let predictions = queries
            .par_iter()
            .map(|query| self.predict_one(query.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        log::debug!("predicted {} queries in parallel", predictions.len());
        Ok(predictions)
    }
}
