//! Per-column min-max scaling of a feature matrix.
//!
//! This is a standalone utility; the models never normalize their inputs on their own.

use num_traits::AsPrimitive;

use crate::common_types::Matrix;
use crate::error::{KnnError, Result};

/// Rescales every column of `x` to `[0, 1]` via `(value - min) / (max - min)`.
///
/// Accepts any sequence of rows (`Vec<Vec<i32>>`, `&[[f64; 3]]`, ...). The output has
/// the same shape as the input and keeps row order.
///
/// # Errors
/// - `ShapeMismatch` if the rows do not all have the same length.
/// - `DegenerateFeature` if a column's minimum equals its maximum, since the range
///   would be zero.
pub fn minmax_normalize<X, R, F>(x: X) -> Result<Matrix<f64>>
where
    X: IntoIterator<Item = R>,
    R: AsRef<[F]>,
    F: AsPrimitive<f64>,
{
    let rows: Matrix<f64> = x
        .into_iter()
        .map(|row| row.as_ref().iter().map(|v| v.as_()).collect())
        .collect();

    let Some(n_features) = rows.first().map(Vec::len) else {
        return Ok(rows);
    };
    if let Some((idx, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n_features) {
        return Err(KnnError::ShapeMismatch {
            expected: format!("{} features in every row", n_features),
            actual: format!("{} features in row {}", row.len(), idx),
        });
    }

    let ranges = column_ranges(&rows, n_features);
    for (column, &(min, max)) in ranges.iter().enumerate() {
        if max - min == 0.0 {
            return Err(KnnError::DegenerateFeature { column, value: min });
        }
    }

    let normalized = rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(ranges.iter())
                .map(|(value, &(min, max))| (value - min) / (max - min))
                .collect()
        })
        .collect();
    Ok(normalized)
}

/// Minimum and maximum of each column. `rows` must be non-empty and rectangular.
fn column_ranges(rows: &[Vec<f64>], n_features: usize) -> Vec<(f64, f64)> {
    let mut ranges = vec![(f64::INFINITY, f64::NEG_INFINITY); n_features];
    for row in rows {
        for (range, &value) in ranges.iter_mut().zip(row.iter()) {
            range.0 = range.0.min(value);
            range.1 = range.1.max(value);
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn scales_each_column_independently() {
        let x = vec![vec![0.0, 10.0], vec![5.0, 30.0], vec![10.0, 20.0]];
        let normalized = minmax_normalize(&x).unwrap();
        assert_eq!(normalized, vec![vec![0.0, 0.0], vec![0.5, 1.0], vec![1.0, 0.5]]);
    }

    #[test]
    fn accepts_integer_matrices() {
        let x = [[2_i32, -4], [4, 0], [6, 4]];
        let normalized = minmax_normalize(x).unwrap();
        assert_eq!(normalized, vec![vec![0.0, 0.0], vec![0.5, 0.5], vec![1.0, 1.0]]);
    }

    #[test]
    fn constant_column_is_rejected() {
        let x = vec![vec![1.0, 3.0], vec![2.0, 3.0], vec![4.0, 3.0]];
        let err = minmax_normalize(&x).unwrap_err();
        assert_eq!(err, KnnError::DegenerateFeature { column: 1, value: 3.0 });
    }

    #[test]
    fn single_row_is_degenerate() {
        let err = minmax_normalize(vec![vec![1.0, 2.0]]).unwrap_err();
        assert_eq!(err, KnnError::DegenerateFeature { column: 0, value: 1.0 });
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let x = vec![vec![1.0, 2.0], vec![3.0]];
        let err = minmax_normalize(&x).unwrap_err();
        assert!(matches!(err, KnnError::ShapeMismatch { .. }));
    }

    #[test]
    fn empty_matrix_normalizes_to_empty() {
        let x: Vec<Vec<f64>> = Vec::new();
        assert!(minmax_normalize(&x).unwrap().is_empty());
    }

    #[test]
    fn normalizing_twice_is_a_no_op() {
        let x = vec![vec![3.0, -1.0], vec![7.5, 2.0], vec![-2.0, 0.25], vec![1.0, 8.0]];
        let once = minmax_normalize(&x).unwrap();
        let twice = minmax_normalize(&once).unwrap();
        for (a, b) in once.iter().zip(twice.iter()) {
            for (x, y) in a.iter().zip(b.iter()) {
                assert_abs_diff_eq!(x, y, epsilon = 1e-12);
            }
        }
    }
}
