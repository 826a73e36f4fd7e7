//! Adapters from complex-array operators to the real interleaved vectors
//! the iteration kernels work on.
//!
//! Purpose
//! -------
//! The kernels only see flat `f64` buffers; linear operators work on complex
//! N-dimensional arrays. [`LinopIter`] binds one operator and exposes
//! forward/adjoint/normal on interleaved slices, [`NormalEq`] turns a
//! linear operator into the normal-equation [`Operator`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Interleaved slices have even length `2 * calc_size(dims)`; the complex
//!   view is a zero-copy reinterpretation via `bytemuck`.
//! - Adapters hold nothing but the borrowed/owned operator; they carry no
//!   scratch state between calls.
use ndarray::{ArrayViewD, ArrayViewMutD, IxDyn};
use num_complex::Complex64;

use crate::linops::{
    dims::calc_size,
    traits::{LinearOperator, Operator},
};

/// View a real interleaved slice as complex elements.
///
/// Panics if `x.len()` is odd.
pub fn as_complex(x: &[f64]) -> &[Complex64] {
    bytemuck::cast_slice(x)
}

/// Mutable counterpart of [`as_complex`].
pub fn as_complex_mut(x: &mut [f64]) -> &mut [Complex64] {
    bytemuck::cast_slice_mut(x)
}

/// View complex elements as a real interleaved slice.
pub fn as_real(x: &[Complex64]) -> &[f64] {
    bytemuck::cast_slice(x)
}

fn complex_view<'a>(dims: &[usize], data: &'a [f64]) -> ArrayViewD<'a, Complex64> {
    let expected = 2 * calc_size(dims);
    assert_eq!(data.len(), expected, "buffer length does not match operator dimensions {dims:?}");
    ArrayViewD::from_shape(IxDyn(dims), as_complex(data))
        .unwrap_or_else(|err| panic!("invalid operator dimensions {dims:?}: {err}"))
}

fn complex_view_mut<'a>(dims: &[usize], data: &'a mut [f64]) -> ArrayViewMutD<'a, Complex64> {
    let expected = 2 * calc_size(dims);
    assert_eq!(data.len(), expected, "buffer length does not match operator dimensions {dims:?}");
    ArrayViewMutD::from_shape(IxDyn(dims), as_complex_mut(data))
        .unwrap_or_else(|err| panic!("invalid operator dimensions {dims:?}: {err}"))
}

/// A linear operator bound for use on interleaved vectors.
///
/// Copyable handle; one per regularization term in an ADMM plan.
#[derive(Clone, Copy)]
pub struct LinopIter<'a> {
    op: &'a dyn LinearOperator,
}

impl<'a> LinopIter<'a> {
    pub fn new(op: &'a dyn LinearOperator) -> Self {
        Self { op }
    }

    /// Interleaved length of the domain (`2 × element count`).
    pub fn domain_len(&self) -> usize {
        2 * calc_size(self.op.domain())
    }

    /// Interleaved length of the codomain (`2 × element count`).
    pub fn codomain_len(&self) -> usize {
        2 * calc_size(self.op.codomain())
    }

    pub fn forward(&self, dst: &mut [f64], src: &[f64]) {
        self.op.forward(
            complex_view_mut(self.op.codomain(), dst),
            complex_view(self.op.domain(), src),
        );
    }

    pub fn adjoint(&self, dst: &mut [f64], src: &[f64]) {
        self.op.adjoint(
            complex_view_mut(self.op.domain(), dst),
            complex_view(self.op.codomain(), src),
        );
    }

    pub fn normal(&self, dst: &mut [f64], src: &[f64]) {
        self.op.normal(
            complex_view_mut(self.op.domain(), dst),
            complex_view(self.op.domain(), src),
        );
    }
}

impl std::fmt::Debug for LinopIter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinopIter")
            .field("domain", &self.op.domain())
            .field("codomain", &self.op.codomain())
            .finish()
    }
}

/// Normal-equation operator `AᴴA` of a linear operator, on interleaved vectors.
#[derive(Debug, Clone)]
pub struct NormalEq<L> {
    op: L,
}

impl<L: LinearOperator> NormalEq<L> {
    pub fn new(op: L) -> Self {
        Self { op }
    }
}

impl<L: LinearOperator> Operator for NormalEq<L> {
    fn apply(&self, dst: &mut [f64], src: &[f64]) {
        LinopIter::new(&self.op).normal(dst, src);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linops::identity::IdentityOp;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover the interleaved/complex reinterpretation and the
    // size bookkeeping of `LinopIter`. Operator semantics are tested with the
    // concrete operators.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Interleaved pairs map to complex elements in order.
    fn as_complex_pairs_real_and_imaginary_parts() {
        let x = [1.0, 2.0, 3.0, -4.0];
        let z = as_complex(&x);
        assert_eq!(z, &[Complex64::new(1.0, 2.0), Complex64::new(3.0, -4.0)]);
        assert_eq!(as_real(z), &x);
    }

    #[test]
    // Purpose
    // -------
    // `LinopIter` reports doubled element counts for domain and codomain.
    fn linop_iter_reports_interleaved_lengths() {
        let op = IdentityOp::new(&[3, 2]);
        let it = LinopIter::new(&op);
        assert_eq!(it.domain_len(), 12);
        assert_eq!(it.codomain_len(), 12);
    }

    #[test]
    #[should_panic(expected = "buffer length does not match")]
    // Purpose
    // -------
    // A wrongly sized buffer is a caller defect and panics.
    fn linop_iter_panics_on_wrong_buffer_length() {
        let op = IdentityOp::new(&[3]);
        let it = LinopIter::new(&op);
        let src = vec![0.0; 4];
        let mut dst = vec![0.0; 6];
        it.forward(&mut dst, &src);
    }
}
