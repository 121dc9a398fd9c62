//! Error types for canopy.

use thiserror::Error;

/// Errors that can occur during forest construction or search.
///
/// All errors are synchronous and surfaced directly to the caller; nothing is
/// retried or recovered internally. An empty query result is *not* an error,
/// just a valid outcome for a sparse index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForestError {
    /// Query or point dimension disagrees with the index's fixed dimension.
    #[error("dimension mismatch: index has {expected} dimensions, input has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// `fit` was called with zero points.
    #[error("cannot build an index from an empty dataset")]
    EmptyDataset,

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, ForestError>;
