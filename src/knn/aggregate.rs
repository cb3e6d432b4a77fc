//! Aggregation strategies that turn a neighbor set into a prediction.

use std::collections::HashMap;
use std::hash::Hash;

use num_traits::AsPrimitive;

use super::neighbors::NeighborSet;
use crate::error::{KnnError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reduces the neighbors of one query to a single prediction.
///
/// `k` is the configured neighbor count, which may exceed `neighbors.len()`.
pub trait Aggregate<T> {
    type Output;

    fn aggregate(&self, neighbors: &NeighborSet<T>, k: usize) -> Result<Self::Output>;
}

/// Most frequent target wins. Ties go to the target seen first in neighbor order,
/// i.e. the tied target with the closest neighbor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MajorityVote;

impl<L> Aggregate<L> for MajorityVote
where
    L: Clone + Eq + Hash,
{
    type Output = L;

    fn aggregate(&self, neighbors: &NeighborSet<L>, _k: usize) -> Result<L> {
        // Tallies are kept in first-seen order so ties resolve deterministically.
        let mut slots: HashMap<&L, usize> = HashMap::new();
        let mut tallies: Vec<(&L, usize)> = Vec::new();
        for label in neighbors.targets() {
            let slot = *slots.entry(label).or_insert_with(|| {
                tallies.push((label, 0));
                tallies.len() - 1
            });
            tallies[slot].1 += 1;
        }

        let mut best: Option<(&L, usize)> = None;
        for &(label, count) in &tallies {
            if best.is_none_or(|(_, best_count)| count > best_count) {
                best = Some((label, count));
            }
        }
        best.map(|(label, _)| label.clone())
            .ok_or(KnnError::EmptyNeighborhood)
    }
}

/// What the unweighted mean divides the target sum by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MeanDivisor {
    /// Always divide by the configured `k`, even when fewer neighbors were found.
    /// A short neighborhood therefore biases the mean toward zero.
    #[default]
    ConfiguredK,
    /// Divide by the number of neighbors actually found.
    NeighborCount,
}

/// Plain arithmetic mean of the neighbor targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mean {
    pub divisor: MeanDivisor,
}

impl<T> Aggregate<T> for Mean
where
    T: AsPrimitive<f64>,
{
    type Output = f64;

    fn aggregate(&self, neighbors: &NeighborSet<T>, k: usize) -> Result<f64> {
        if neighbors.is_empty() {
            return Err(KnnError::EmptyNeighborhood);
        }
        let sum: f64 = neighbors.targets().map(|t| t.as_()).sum();
        let divisor = match self.divisor {
            MeanDivisor::ConfiguredK => {
                if neighbors.len() < k {
                    log::debug!(
                        "only {} of k = {} neighbors found; mean still divides by k",
                        neighbors.len(),
                        k
                    );
                }
                k
            }
            MeanDivisor::NeighborCount => neighbors.len(),
        };
        if divisor == 0 {
            return Err(KnnError::InvalidParameter(
                "k must be at least 1 to divide the neighbor sum by k".to_string(),
            ));
        }
        Ok(sum / divisor as f64)
    }
}

/// How inverse-distance weighting treats a neighbor whose weight `1 / d` is infinite.
///
/// That covers distance exactly 0 and subnormal distances such as `5e-324`, whose
/// reciprocal overflows to infinity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ZeroDistancePolicy {
    /// Treat such neighbors as exact matches: the prediction is the mean of their
    /// targets and all other neighbors are ignored.
    #[default]
    ExactMatch,
    /// Fail with `KnnError::ZeroDistance`.
    Reject,
}

/// Inverse-distance weighted mean: `sum(t_i / d_i) / sum(1 / d_i)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WeightedMean {
    pub zero_distance: ZeroDistancePolicy,
}

impl<T> Aggregate<T> for WeightedMean
where
    T: AsPrimitive<f64>,
{
    type Output = f64;

    fn aggregate(&self, neighbors: &NeighborSet<T>, _k: usize) -> Result<f64> {
        if neighbors.is_empty() {
            return Err(KnnError::EmptyNeighborhood);
        }

        let mut exact = neighbors.iter().filter(|n| (1.0 / n.distance).is_infinite()).peekable();
        if let Some(index) = exact.peek().map(|n| n.index) {
            return match self.zero_distance {
                ZeroDistancePolicy::Reject => Err(KnnError::ZeroDistance { index }),
                ZeroDistancePolicy::ExactMatch => {
                    let (sum, count) = exact
                        .fold((0.0, 0usize), |(sum, count), n| (sum + n.target.as_(), count + 1));
                    Ok(sum / count as f64)
                }
            };
        }

        let (numerator, denominator) = neighbors.iter().fold((0.0, 0.0), |(num, den), n| {
            (num + n.target.as_() / n.distance, den + 1.0 / n.distance)
        });
        Ok(numerator / denominator)
    }
}

/// The regressor's aggregation: plain or inverse-distance weighted mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RegressionAggregate {
    Mean(Mean),
    WeightedMean(WeightedMean),
}

impl RegressionAggregate {
    pub fn new(weighted: bool) -> Self {
        if weighted {
            RegressionAggregate::WeightedMean(WeightedMean::default())
        } else {
            RegressionAggregate::Mean(Mean::default())
        }
    }

    pub fn is_weighted(&self) -> bool {
        matches!(self, RegressionAggregate::WeightedMean(_))
    }
}

impl Default for RegressionAggregate {
    fn default() -> Self {
        RegressionAggregate::new(true)
    }
}

impl<T> Aggregate<T> for RegressionAggregate
where
    T: AsPrimitive<f64>,
{
    type Output = f64;

    fn aggregate(&self, neighbors: &NeighborSet<T>, k: usize) -> Result<f64> {
        match self {
            RegressionAggregate::Mean(mean) => mean.aggregate(neighbors, k),
            RegressionAggregate::WeightedMean(weighted) => weighted.aggregate(neighbors, k),
        }
    }
}
