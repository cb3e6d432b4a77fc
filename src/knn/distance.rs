//! Distance functions between two feature vectors.
//!
//! Features are widened to `f64` before they are subtracted, so integer inputs never
//! overflow while squaring. Vectors of unequal length are paired up to the shorter one.

use num_traits::AsPrimitive;

use super::KnnDistance;

/// Euclidean distance: `sqrt(sum((a_i - b_i)^2))` over the paired features.
pub fn euclidean_distance<F>(a: &[F], b: &[F]) -> f64
where
    F: AsPrimitive<f64>,
{
    let sum_sq_diff: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let diff = x.as_() - y.as_();
            diff * diff
        })
        .sum();
    sum_sq_diff.sqrt()
}

/// Manhattan (L1) distance over the paired features.
pub fn manhattan_distance<F>(a: &[F], b: &[F]) -> f64
where
    F: AsPrimitive<f64>,
{
    a.iter().zip(b.iter()).map(|(x, y)| (x.as_() - y.as_()).abs()).sum()
}

/// Minkowski distance of order `p`. `p = 1` is Manhattan, `p = 2` is Euclidean.
pub fn minkowski_distance<F>(a: &[F], b: &[F], p: u32) -> f64
where
    F: AsPrimitive<f64>,
{
    let sum_of_powers: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let diff = (x.as_() - y.as_()).abs();
            match i32::try_from(p) {
                Ok(p) => diff.powi(p),
                Err(_) => diff.powf(p as f64),
            }
        })
        .sum();
    sum_of_powers.powf(1.0 / p as f64)
}

impl KnnDistance {
    /// Computes the distance between `a` and `b` under this metric.
    pub fn distance<F>(&self, a: &[F], b: &[F]) -> f64
    where
        F: AsPrimitive<f64>,
    {
        match *self {
            KnnDistance::Euclidean => euclidean_distance(a, b),
            KnnDistance::Manhattan => manhattan_distance(a, b),
            KnnDistance::Minkowski { p } => minkowski_distance(a, b, p),
        }
    }
}
