//! prox: proximal operator contract and common regularizers.
//!
//! Purpose
//! -------
//! Define [`ProxOperator`], the single primitive proximal-splitting
//! algorithms need from a regularization term, and provide the operators
//! used most often with the sampling model: complex soft thresholding and
//! two projections (support and data consistency).
//!
//! Invariants & assumptions
//! ------------------------
//! - `apply(mu, dst, src)` is a pure function of `mu` and `src`; it must not
//!   keep state between calls. `dst` and `src` have equal length.
//! - Vectors are real interleaved (`(re, im)` pairs) like everywhere in the
//!   iteration layer.
//! - Projections ignore `mu` (the proximal map of an indicator function does
//!   not depend on the step size).

pub mod proj;
pub mod thresh;

pub use self::proj::{ProjData, ProjSupport};
pub use self::thresh::SoftThresh;

/// Proximal map `dst = argmin_x g(x) + 1/(2·mu) ‖x − src‖²`.
pub trait ProxOperator {
    fn apply(&self, mu: f64, dst: &mut [f64], src: &[f64]);
}

impl<F> ProxOperator for F
where
    F: Fn(f64, &mut [f64], &[f64]),
{
    fn apply(&self, mu: f64, dst: &mut [f64], src: &[f64]) {
        self(mu, dst, src)
    }
}
