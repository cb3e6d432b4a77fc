//! Error types for the nearest-neighbor models.

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, KnnError>;

/// Errors raised by distance, normalization, search and aggregation.
///
/// Every operation is pure and deterministic, so none of these are retryable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KnnError {
    /// Two sequences that must be the same length are not.
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// Aggregation was attempted over zero neighbors (k = 0 or an empty reference set).
    #[error("Cannot aggregate an empty neighborhood")]
    EmptyNeighborhood,

    /// Weighted regression met a neighbor at distance 0 while zero distances are rejected.
    #[error("Neighbor at reference index {index} has zero distance; inverse-distance weight is undefined")]
    ZeroDistance { index: usize },

    /// Min-max normalization met a column whose minimum equals its maximum.
    #[error("Feature column {column} is constant ({value}); min-max range is zero")]
    DegenerateFeature { column: usize, value: f64 },

    /// `predict` was called before `fit`.
    #[error("Model is not fitted yet. Call fit() first.")]
    NotFitted,

    /// A configuration value is out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

#[cfg(feature = "python")]
impl From<KnnError> for pyo3::PyErr {
    fn from(err: KnnError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
