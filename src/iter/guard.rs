//! Degeneracy guard: classify the data scale before iterating.
//!
//! Purpose
//! -------
//! Every data-driven algorithm scales its tolerance by the Euclidean norm of
//! the adjoint-applied measurement and divides by that scale inside the
//! kernel. A zero or non-finite scale would poison every iterate, so the
//! adapters classify the reference vector first and skip the run on
//! degenerate data.
//!
//! Key behaviors
//! -------------
//! - [`classify`] returns [`DataState::Empty`] for a norm of exactly zero,
//!   [`DataState::Corrupted`] for NaN, infinite or subnormal norms, and
//!   [`DataState::Usable`] with the norm otherwise.
//! - Degenerate states log a warning through the `log` facade.
//! - [`DataState::scaled_tol`] turns a relative tolerance into the absolute
//!   one handed to a kernel.
//!
//! Invariants & assumptions
//! ------------------------
//! - Degenerate data is not an error: callers return a successful
//!   [`IterReport`](crate::iter::types::IterReport) marked as skipped and
//!   leave the image buffer untouched.
//! - Tolerances passed to kernels are always relative to the data scale.
use log::warn;

use crate::iter::types::Degeneracy;

/// Classification of a reference vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DataState {
    Empty,
    Corrupted,
    Usable(f64),
}

impl DataState {
    /// Absolute tolerance `tol · norm`, or the reason the data is unusable.
    pub fn scaled_tol(&self, tol: f64) -> Result<f64, Degeneracy> {
        match self {
            DataState::Usable(norm) => Ok(tol * norm),
            DataState::Empty => Err(Degeneracy::Empty),
            DataState::Corrupted => Err(Degeneracy::Corrupted),
        }
    }
}

/// Euclidean norm of a real vector, scaled by the largest magnitude so that
/// tiny entries do not underflow to zero and huge ones do not overflow.
///
/// Any NaN entry yields NaN; any infinite entry yields infinity.
pub fn norm(x: &[f64]) -> f64 {
    let mut scale = 0.0_f64;
    for &v in x {
        if v.is_nan() {
            return f64::NAN;
        }
        scale = scale.max(v.abs());
    }
    if scale == 0.0 || scale.is_infinite() {
        return scale;
    }
    scale
        * x.iter()
            .map(|&v| {
                let r = v / scale;
                r * r
            })
            .sum::<f64>()
            .sqrt()
}

/// Classify `reference` by its Euclidean norm, logging degenerate cases.
pub fn classify(reference: &[f64]) -> DataState {
    let eps = norm(reference);

    if eps == 0.0 {
        warn!("data empty");
        return DataState::Empty;
    }

    if !eps.is_normal() {
        warn!("data corrupted (reference norm {eps})");
        return DataState::Corrupted;
    }

    DataState::Usable(eps)
}

/// The norm of `reference`, or the reason to skip. Used where no tolerance
/// needs scaling.
pub fn check_data(reference: &[f64]) -> Result<f64, Degeneracy> {
    classify(reference).scaled_tol(1.0)
}
