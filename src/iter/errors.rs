//! Errors for the iteration layer (configuration checks and solver backend).
//!
//! Only *recoverable* conditions live here: invalid configuration values
//! caught by the validated constructors, unknown algorithm names, and
//! failures reported by the `argmin` backend. Arity mismatches and other
//! wiring defects at the dispatch boundary are assertions, and degenerate
//! input data is not an error at all (see [`crate::iter::guard`]).
use argmin::core::{ArgminError, Error};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

/// Result alias for the iteration layer.
pub type IterResult<T> = Result<T, IterError>;

#[derive(Debug, Clone, PartialEq)]
pub enum IterError {
    // ---- Configuration ----
    /// Iteration limit must be positive.
    InvalidMaxIter { max_iter: usize, reason: &'static str },

    /// A tolerance must be finite and non-negative.
    InvalidTolerance { name: &'static str, tol: f64, reason: &'static str },

    /// Continuation factor must lie in [0, 1].
    InvalidContinuation { value: f64, reason: &'static str },

    /// Any other scalar parameter outside its admissible range.
    InvalidParameter { name: &'static str, value: f64, reason: &'static str },

    /// Unknown algorithm name.
    InvalidAlgorithm { name: String, reason: &'static str },

    // ---- Argmin ----
    /// Wrapper for argmin::InvalidParameter
    SolverInvalidParameter { text: String },
    /// Wrapper for argmin::NotImplemented
    NotImplemented { text: String },
    /// Wrapper for argmin::NotInitialized
    NotInitialized { text: String },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated { text: String },
    /// Wrapper for argmin::PotentialBug
    PotentialBug { text: String },
    /// Wrapper for other argmin::Error types
    BackendError { text: String },

    // ---- Solver outcome ----
    /// The backend finished without a solution vector.
    MissingSolution,

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for IterError {}

impl std::fmt::Display for IterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            IterError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            IterError::InvalidTolerance { name, tol, reason } => {
                write!(f, "Invalid tolerance {name} = {tol}: {reason}")
            }
            IterError::InvalidContinuation { value, reason } => {
                write!(f, "Invalid continuation {value}: {reason}")
            }
            IterError::InvalidParameter { name, value, reason } => {
                write!(f, "Invalid parameter {name} = {value}: {reason}")
            }
            IterError::InvalidAlgorithm { name, reason } => {
                write!(f, "Invalid algorithm '{name}': {reason}")
            }

            // ---- Argmin ----
            IterError::SolverInvalidParameter { text } => {
                write!(f, "Invalid solver parameter: {text}")
            }
            IterError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            IterError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            IterError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            IterError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            IterError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Solver outcome ----
            IterError::MissingSolution => {
                write!(f, "Solver finished without a solution vector")
            }

            // ---- Fallback ----
            IterError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for IterError {
    fn from(original_err: Error) -> Self {
        match original_err.downcast() {
            Ok(iter_err) => match iter_err {
                ArgminError::InvalidParameter { text } => {
                    IterError::SolverInvalidParameter { text }
                }
                ArgminError::NotImplemented { text } => IterError::NotImplemented { text },
                ArgminError::NotInitialized { text } => IterError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => IterError::ConditionViolated { text },
                ArgminError::PotentialBug { text } => IterError::PotentialBug { text },
                _ => IterError::UnknownError,
            },
            Err(err) => IterError::BackendError { text: err.to_string() },
        }
    }
}

#[cfg(feature = "python-bindings")]
impl std::convert::From<IterError> for PyErr {
    fn from(err: IterError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
