//! Identity operator on complex arrays of fixed dimensions.
use ndarray::{ArrayViewD, ArrayViewMutD};
use num_complex::Complex64;

use crate::linops::traits::LinearOperator;

/// `A = I` on arrays with the given dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityOp {
    dims: Vec<usize>,
}

impl IdentityOp {
    pub fn new(dims: &[usize]) -> Self {
        Self { dims: dims.to_vec() }
    }
}

impl LinearOperator for IdentityOp {
    fn domain(&self) -> &[usize] {
        &self.dims
    }

    fn codomain(&self) -> &[usize] {
        &self.dims
    }

    fn forward(&self, mut dst: ArrayViewMutD<'_, Complex64>, src: ArrayViewD<'_, Complex64>) {
        dst.assign(&src);
    }

    fn adjoint(&self, mut dst: ArrayViewMutD<'_, Complex64>, src: ArrayViewD<'_, Complex64>) {
        dst.assign(&src);
    }

    fn normal(&self, mut dst: ArrayViewMutD<'_, Complex64>, src: ArrayViewD<'_, Complex64>) {
        dst.assign(&src);
    }
}
