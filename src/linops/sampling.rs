//! linops::sampling: diagonal k-space sampling operator.
//!
//! Purpose
//! -------
//! Provide the canonical [`LinearOperator`] implementation: an element-wise
//! multiplication by a (possibly broadcast) sampling pattern. Because the
//! operator is diagonal with a pattern that is usually 0/1 valued, forward,
//! adjoint and normal application are all the same multiply.
//!
//! Key behaviors
//! -------------
//! - [`SamplingOp::new`] takes the full data dimensions, the pattern
//!   dimensions and the pattern itself; the maps axis of the data dimensions
//!   is collapsed (sampling acts on k-space).
//! - Pattern axes of size 1 broadcast across the matching data axis with a
//!   zero stride, so a 2-D mask can sample every coil and frame.
//!
//! Invariants & assumptions
//! ------------------------
//! - Domain == codomain == the selected k-space dimensions.
//! - The pattern shape equals `pat_dims` and broadcasts to the k-space
//!   dimensions; both are checked once at construction.
//! - The operator is self-adjoint only for real-valued patterns; complex
//!   patterns are applied unconjugated in all three maps.
//!
//! Testing notes
//! -------------
//! - Unit tests check forward/adjoint/normal agreement, idempotence for 0/1
//!   patterns, broadcasting, and construction errors.
use ndarray::{ArrayD, ArrayViewD, ArrayViewMutD, IxDyn, Zip};
use num_complex::Complex64;

use crate::linops::{
    dims::{check_broadcast, select_kspace_dims},
    errors::{LinopError, LinopResult},
    traits::LinearOperator,
};

/// Diagonal sampling operator `dst = src ⊙ pattern`.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingOp {
    dims: Vec<usize>,
    pattern: ArrayD<Complex64>,
}

impl SamplingOp {
    /// Build a sampling operator.
    ///
    /// Parameters
    /// ----------
    /// - `dims`: full data dimensions; the maps axis is collapsed to 1.
    /// - `pat_dims`: pattern dimensions, same rank as `dims`, each axis 1 or
    ///   equal to the k-space axis.
    /// - `pattern`: pattern values with shape `pat_dims`.
    ///
    /// Errors
    /// ------
    /// - [`LinopError::PatternShapeMismatch`] if `pattern.shape() != pat_dims`.
    /// - [`LinopError::RankMismatch`], [`LinopError::EmptyDimension`] or
    ///   [`LinopError::NotBroadcastable`] from the broadcast check.
    pub fn new(
        dims: &[usize], pat_dims: &[usize], pattern: ArrayD<Complex64>,
    ) -> LinopResult<Self> {
        if pattern.shape() != pat_dims {
            return Err(LinopError::PatternShapeMismatch {
                expected: pat_dims.to_vec(),
                found: pattern.shape().to_vec(),
            });
        }
        let dims = select_kspace_dims(dims);
        check_broadcast(&dims, pat_dims)?;
        Ok(Self { dims, pattern })
    }

    fn apply(&self, mut dst: ArrayViewMutD<'_, Complex64>, src: ArrayViewD<'_, Complex64>) {
        assert_eq!(src.shape(), self.dims.as_slice(), "sampling input has wrong dimensions");
        assert_eq!(dst.shape(), self.dims.as_slice(), "sampling output has wrong dimensions");
        let pattern = self
            .pattern
            .broadcast(IxDyn(&self.dims))
            .unwrap_or_else(|| panic!("pattern no longer broadcasts to {:?}", self.dims));
        Zip::from(&mut dst).and(&src).and(&pattern).for_each(|d, &s, &p| *d = s * p);
    }
}

impl LinearOperator for SamplingOp {
    fn domain(&self) -> &[usize] {
        &self.dims
    }

    fn codomain(&self) -> &[usize] {
        &self.dims
    }

    fn forward(&self, dst: ArrayViewMutD<'_, Complex64>, src: ArrayViewD<'_, Complex64>) {
        self.apply(dst, src);
    }

    fn adjoint(&self, dst: ArrayViewMutD<'_, Complex64>, src: ArrayViewD<'_, Complex64>) {
        self.apply(dst, src);
    }

    fn normal(&self, dst: ArrayViewMutD<'_, Complex64>, src: ArrayViewD<'_, Complex64>) {
        self.apply(dst, src);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, ArrayD};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Agreement of forward, adjoint and normal maps (diagonal operator).
    // - Idempotence under repeated application with a 0/1 pattern.
    // - Zero-stride broadcasting of singleton pattern axes.
    // - Construction errors for inconsistent shapes.
    //
    // They intentionally DO NOT cover use inside the solvers; that is tested
    // in the iteration layer.
    // -------------------------------------------------------------------------

    fn ramp(dims: &[usize]) -> ArrayD<Complex64> {
        let n: usize = dims.iter().product();
        Array::from_shape_vec(
            IxDyn(dims),
            (0..n).map(|i| Complex64::new(i as f64 + 1.0, -(i as f64) * 0.5)).collect(),
        )
        .expect("ramp shape")
    }

    fn mask_2x3() -> ArrayD<Complex64> {
        let vals = [1.0, 0.0, 1.0, 0.0, 1.0, 1.0];
        let data = vals.iter().map(|&v| Complex64::new(v, 0.0)).collect();
        Array::from_shape_vec(IxDyn(&[2, 3]), data).expect("mask shape")
    }

    #[test]
    // Purpose
    // -------
    // Forward, adjoint and normal produce identical output on the same input.
    //
    // Given
    // -----
    // - A 2×3 operator with a 0/1 mask and a non-trivial complex input.
    //
    // Expect
    // ------
    // - All three outputs are equal and equal the masked input.
    fn forward_adjoint_and_normal_agree() {
        // Arrange
        let op = SamplingOp::new(&[2, 3], &[2, 3], mask_2x3()).expect("valid sampling op");
        let x = ramp(&[2, 3]);
        let mut fwd = ArrayD::zeros(IxDyn(&[2, 3]));
        let mut adj = ArrayD::zeros(IxDyn(&[2, 3]));
        let mut nrm = ArrayD::zeros(IxDyn(&[2, 3]));

        // Act
        op.forward(fwd.view_mut(), x.view());
        op.adjoint(adj.view_mut(), x.view());
        op.normal(nrm.view_mut(), x.view());

        // Assert
        assert_eq!(fwd, adj);
        assert_eq!(fwd, nrm);
        assert_eq!(fwd, &x * &mask_2x3());
    }

    #[test]
    // Purpose
    // -------
    // Applying a 0/1 sampling operator twice equals applying it once.
    fn zero_one_pattern_is_idempotent() {
        // Arrange
        let op = SamplingOp::new(&[2, 3], &[2, 3], mask_2x3()).expect("valid sampling op");
        let x = ramp(&[2, 3]);
        let mut once = ArrayD::zeros(IxDyn(&[2, 3]));
        let mut twice = ArrayD::zeros(IxDyn(&[2, 3]));

        // Act
        op.forward(once.view_mut(), x.view());
        op.forward(twice.view_mut(), once.view());

        // Assert
        assert_eq!(once, twice);
    }

    #[test]
    // Purpose
    // -------
    // A singleton pattern axis broadcasts across the data axis.
    //
    // Given
    // -----
    // - Data dims [2, 2, 3] and a [2, 1, 3] pattern.
    //
    // Expect
    // ------
    // - Every slice along axis 1 is masked with the same pattern.
    fn singleton_pattern_axis_broadcasts() {
        // Arrange
        let pattern = mask_2x3().into_shape(IxDyn(&[2, 1, 3])).expect("reshape mask");
        let op = SamplingOp::new(&[2, 2, 3], &[2, 1, 3], pattern).expect("valid sampling op");
        let x = ArrayD::from_elem(IxDyn(&[2, 2, 3]), Complex64::new(2.0, 1.0));
        let mut y = ArrayD::zeros(IxDyn(&[2, 2, 3]));

        // Act
        op.forward(y.view_mut(), x.view());

        // Assert
        let mask = mask_2x3();
        for i in 0..2 {
            for j in 0..2 {
                for k in 0..3 {
                    assert_eq!(y[[i, j, k]], Complex64::new(2.0, 1.0) * mask[[i, k]]);
                }
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // The maps axis is collapsed in the operator's domain/codomain.
    fn maps_axis_is_collapsed() {
        let pattern = ArrayD::from_elem(IxDyn(&[4, 4, 1, 1, 1]), Complex64::new(1.0, 0.0));
        let op = SamplingOp::new(&[4, 4, 1, 8, 3], &[4, 4, 1, 1, 1], pattern)
            .expect("valid sampling op");
        assert_eq!(op.domain(), &[4, 4, 1, 8, 1]);
        assert_eq!(op.codomain(), op.domain());
    }

    #[test]
    // Purpose
    // -------
    // Construction rejects patterns whose shape contradicts `pat_dims` or
    // that do not broadcast.
    fn new_rejects_inconsistent_shapes() {
        let err = SamplingOp::new(&[2, 3], &[2, 1], mask_2x3()).unwrap_err();
        assert!(matches!(err, LinopError::PatternShapeMismatch { .. }));

        let wide = ArrayD::from_elem(IxDyn(&[2, 2]), Complex64::new(1.0, 0.0));
        let err = SamplingOp::new(&[2, 3], &[2, 2], wide).unwrap_err();
        assert_eq!(err, LinopError::NotBroadcastable { axis: 1, dim: 3, pat_dim: 2 });
    }
}
