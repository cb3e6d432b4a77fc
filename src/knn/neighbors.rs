//! Brute-force neighbor search over a reference set.

use num_traits::AsPrimitive;
use ordered_float::OrderedFloat;

use super::KnnDistance;
use crate::common_types::Dataset;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One reference point as seen from a query: where it sits in the reference set,
/// how far away it is, and its target.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Neighbor<T> {
    pub index: usize,
    pub distance: f64,
    pub target: T,
}

/// The nearest neighbors of a query, ordered by ascending distance.
///
/// Equal distances keep the order of the reference set. May hold fewer than `k`
/// entries when the reference set is smaller than `k`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NeighborSet<T> {
    neighbors: Vec<Neighbor<T>>,
}

impl<T> NeighborSet<T> {
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Neighbor<T>> {
        self.neighbors.iter()
    }

    pub fn as_slice(&self) -> &[Neighbor<T>] {
        &self.neighbors
    }

    pub fn distances(&self) -> impl Iterator<Item = f64> + '_ {
        self.neighbors.iter().map(|n| n.distance)
    }

    pub fn targets(&self) -> impl Iterator<Item = &T> {
        self.neighbors.iter().map(|n| &n.target)
    }

    pub fn into_vec(self) -> Vec<Neighbor<T>> {
        self.neighbors
    }
}

impl<T> From<Vec<Neighbor<T>>> for NeighborSet<T> {
    /// Wraps already-ordered neighbors; the order is taken as given.
    fn from(neighbors: Vec<Neighbor<T>>) -> Self {
        NeighborSet { neighbors }
    }
}

impl<'a, T> IntoIterator for &'a NeighborSet<T> {
    type Item = &'a Neighbor<T>;
    type IntoIter = std::slice::Iter<'a, Neighbor<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.neighbors.iter()
    }
}

/// Finds the `k` reference points closest to `query`.
///
/// Every reference point is scored with `metric`, the scores are stable-sorted by
/// distance alone, and the first `k` are kept. `k = 0` or an empty reference set
/// yields an empty set; `k` larger than the reference set yields all of it.
pub fn find_neighbors<F, T>(
    reference: &Dataset<F, T>,
    query: &[F],
    k: usize,
    metric: &KnnDistance,
) -> NeighborSet<T>
where
    F: AsPrimitive<f64>,
    T: Clone,
{
    let mut distances: Vec<(OrderedFloat<f64>, usize, &T)> = reference
        .iter()
        .enumerate()
        .map(|(index, (features, target))| {
            (OrderedFloat(metric.distance(query, features)), index, target)
        })
        .collect();

    // sort_by_key is stable: ties stay in reference order. NaN sorts last.
    distances.sort_by_key(|&(distance, _, _)| distance);

    let neighbors = distances
        .into_iter()
        .take(k)
        .map(|(distance, index, target)| Neighbor {
            index,
            distance: distance.into_inner(),
            target: target.clone(),
        })
        .collect();
    NeighborSet { neighbors }
}
