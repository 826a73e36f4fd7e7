//! linops::traits: operator contracts consumed by the iteration layer.
//!
//! Purpose
//! -------
//! Define the two operator shapes the solvers work with:
//! - [`LinearOperator`]: a linear map between complex N-dimensional arrays
//!   with fixed domain/codomain dimensions, exposing forward, adjoint and
//!   normal (`AᴴA`) application.
//! - [`Operator`]: a square map on real interleaved vectors, used for the
//!   normal-equation measurement operator handed to the kernels.
//!
//! Invariants & assumptions
//! ------------------------
//! - Domain and codomain dimensions are fixed at construction and never
//!   change; callers size their buffers from [`LinearOperator::domain`] and
//!   [`LinearOperator::codomain`].
//! - Implementations are stateless between calls, or synchronize internally
//!   if they are shared across threads.
//! - Passing a buffer of the wrong size is a caller defect and panics.
//!
//! Conventions
//! -----------
//! - Complex arrays are `ndarray` views over `Complex64` in row-major order.
//! - Real interleaved vectors store each complex element as `(re, im)`, so
//!   their length is twice the complex element count.
use ndarray::{ArrayD, ArrayViewD, ArrayViewMutD, IxDyn};
use num_complex::Complex64;

/// Linear map `A : ℂ^domain → ℂ^codomain`.
pub trait LinearOperator {
    /// Dimensions of the input space.
    fn domain(&self) -> &[usize];

    /// Dimensions of the output space.
    fn codomain(&self) -> &[usize];

    /// `dst = A src`.
    fn forward(&self, dst: ArrayViewMutD<'_, Complex64>, src: ArrayViewD<'_, Complex64>);

    /// `dst = Aᴴ src`.
    fn adjoint(&self, dst: ArrayViewMutD<'_, Complex64>, src: ArrayViewD<'_, Complex64>);

    /// `dst = AᴴA src`.
    ///
    /// The default goes through a temporary codomain array; diagonal
    /// operators override it with a single pass.
    fn normal(&self, dst: ArrayViewMutD<'_, Complex64>, src: ArrayViewD<'_, Complex64>) {
        let mut tmp = ArrayD::<Complex64>::zeros(IxDyn(self.codomain()));
        self.forward(tmp.view_mut(), src);
        self.adjoint(dst, tmp.view());
    }
}

impl<L: LinearOperator + ?Sized> LinearOperator for &L {
    fn domain(&self) -> &[usize] {
        (**self).domain()
    }

    fn codomain(&self) -> &[usize] {
        (**self).codomain()
    }

    fn forward(&self, dst: ArrayViewMutD<'_, Complex64>, src: ArrayViewD<'_, Complex64>) {
        (**self).forward(dst, src)
    }

    fn adjoint(&self, dst: ArrayViewMutD<'_, Complex64>, src: ArrayViewD<'_, Complex64>) {
        (**self).adjoint(dst, src)
    }

    fn normal(&self, dst: ArrayViewMutD<'_, Complex64>, src: ArrayViewD<'_, Complex64>) {
        (**self).normal(dst, src)
    }
}

/// Square operator on real interleaved vectors: `dst = Op(src)`.
///
/// This is the shape of the normal-equation measurement operator consumed by
/// every iteration kernel. Closures `Fn(&mut [f64], &[f64])` implement it
/// directly.
pub trait Operator {
    fn apply(&self, dst: &mut [f64], src: &[f64]);
}

impl<F> Operator for F
where
    F: Fn(&mut [f64], &[f64]),
{
    fn apply(&self, dst: &mut [f64], src: &[f64]) {
        self(dst, src)
    }
}
