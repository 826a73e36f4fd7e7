//! iter::types: shared numeric aliases and run reports.
//!
//! Purpose
//! -------
//! Centralize the small types every adapter and kernel exchanges: the
//! vector alias used with the `argmin` backend, the objective callback
//! shape, and the [`IterReport`] each entry point returns.
//!
//! Conventions
//! -----------
//! - Solver vectors are real interleaved `f64` buffers; [`Vector`] is the
//!   owned `ndarray` form used where the backend needs one.
//! - A run that was skipped because of degenerate data is reported as
//!   [`IterStatus::Skipped`], never as an error.
use ndarray::Array1;

/// Owned solver vector (real interleaved).
pub type Vector = Array1<f64>;

/// Objective evaluation callback: maps the current iterate to a scalar that
/// is logged once per iteration. Never used for convergence decisions.
pub type ObjectiveFn<'a> = &'a dyn Fn(&[f64]) -> f64;

/// Why a run was skipped without iterating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degeneracy {
    /// Reference norm is exactly zero.
    Empty,
    /// Reference norm is NaN, infinite or subnormal.
    Corrupted,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterStatus {
    /// No iterations were performed; the image is untouched.
    Skipped(Degeneracy),
    /// A stopping criterion was met before the iteration cap.
    Converged,
    /// The iteration cap was reached.
    MaxIterReached,
}

/// Outcome of one dispatch call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterReport {
    pub status: IterStatus,
    pub iterations: usize,
}

impl IterReport {
    pub fn skipped(reason: Degeneracy) -> Self {
        Self { status: IterStatus::Skipped(reason), iterations: 0 }
    }

    pub fn converged(iterations: usize) -> Self {
        Self { status: IterStatus::Converged, iterations }
    }

    pub fn max_iter_reached(iterations: usize) -> Self {
        Self { status: IterStatus::MaxIterReached, iterations }
    }

    /// `true` unless the run was skipped.
    pub fn ran(&self) -> bool {
        !matches!(self.status, IterStatus::Skipped(_))
    }
}
