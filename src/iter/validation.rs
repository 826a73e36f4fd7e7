//! Validation helpers for solver configurations.
//!
//! - **Iteration limits**: [`verify_max_iter`] rejects zero.
//! - **Tolerances**: [`verify_tol`] requires finite, non-negative values
//!   (zero disables early stopping).
//! - **Scalars**: [`verify_positive`], [`verify_non_negative`] and
//!   [`verify_continuation`] cover step sizes, penalties and decay factors.
//!
//! These back the validated constructors in [`crate::iter::conf`]; the
//! dispatch layer re-checks the one invariant it cannot trust a caller to
//! have validated (the continuation range) with an assertion.
use crate::iter::errors::{IterError, IterResult};

/// Iteration limits must be strictly positive.
///
/// # Errors
/// [`IterError::InvalidMaxIter`] if `max_iter == 0`.
pub fn verify_max_iter(max_iter: usize) -> IterResult<()> {
    if max_iter == 0 {
        return Err(IterError::InvalidMaxIter {
            max_iter,
            reason: "Maximum iterations must be greater than zero.",
        });
    }
    Ok(())
}

/// Tolerances must be finite and `>= 0`.
///
/// # Errors
/// [`IterError::InvalidTolerance`] naming the offending field.
pub fn verify_tol(name: &'static str, tol: f64) -> IterResult<()> {
    if !tol.is_finite() {
        return Err(IterError::InvalidTolerance { name, tol, reason: "Tolerance must be finite." });
    }
    if tol < 0.0 {
        return Err(IterError::InvalidTolerance {
            name,
            tol,
            reason: "Tolerance must be non-negative.",
        });
    }
    Ok(())
}

/// Scalar must be finite and `> 0`.
///
/// # Errors
/// [`IterError::InvalidParameter`] naming the offending field.
pub fn verify_positive(name: &'static str, value: f64) -> IterResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(IterError::InvalidParameter {
            name,
            value,
            reason: "Value must be finite and strictly positive.",
        });
    }
    Ok(())
}

/// Scalar must be finite and `>= 0`.
///
/// # Errors
/// [`IterError::InvalidParameter`] naming the offending field.
pub fn verify_non_negative(name: &'static str, value: f64) -> IterResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(IterError::InvalidParameter {
            name,
            value,
            reason: "Value must be finite and non-negative.",
        });
    }
    Ok(())
}

/// Continuation factor must lie in `[0, 1]`.
///
/// # Errors
/// [`IterError::InvalidContinuation`] otherwise (including NaN).
pub fn verify_continuation(value: f64) -> IterResult<()> {
    if !continuation_in_range(value) {
        return Err(IterError::InvalidContinuation {
            value,
            reason: "Continuation must lie in [0, 1].",
        });
    }
    Ok(())
}

/// `true` iff `0 <= value <= 1` (NaN is out of range).
pub fn continuation_in_range(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}
