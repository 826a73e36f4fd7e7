//! Errors for linear-operator construction.
//!
//! Operator *application* never fails at runtime: buffer sizes are fixed at
//! construction and mismatches are caller defects (panics). What can fail is
//! building an operator from user-supplied shapes, e.g. a sampling pattern
//! whose dimensions cannot be broadcast against the data dimensions.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

/// Result alias for operator construction.
pub type LinopResult<T> = Result<T, LinopError>;

#[derive(Debug, Clone, PartialEq)]
pub enum LinopError {
    /// Data and pattern dimension vectors have different ranks.
    RankMismatch { expected: usize, found: usize },

    /// Pattern array shape does not match the declared pattern dimensions.
    PatternShapeMismatch { expected: Vec<usize>, found: Vec<usize> },

    /// A pattern dimension is neither 1 nor equal to the data dimension.
    NotBroadcastable { axis: usize, dim: usize, pat_dim: usize },

    /// A dimension of size zero was supplied.
    EmptyDimension { axis: usize },
}

impl std::error::Error for LinopError {}

impl std::fmt::Display for LinopError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinopError::RankMismatch { expected, found } => {
                write!(f, "Rank mismatch: expected {expected} dimensions, found {found}")
            }
            LinopError::PatternShapeMismatch { expected, found } => {
                write!(f, "Pattern shape mismatch: expected {expected:?}, found {found:?}")
            }
            LinopError::NotBroadcastable { axis, dim, pat_dim } => {
                write!(
                    f,
                    "Pattern dimension {pat_dim} at axis {axis} cannot be broadcast to {dim}"
                )
            }
            LinopError::EmptyDimension { axis } => {
                write!(f, "Dimension at axis {axis} must be non-zero")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl std::convert::From<LinopError> for PyErr {
    fn from(err: LinopError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
