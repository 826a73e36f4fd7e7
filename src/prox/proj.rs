//! Projections onto convex sets, usable as proximal operators and as the
//! constraint sets of POCS.
use num_complex::Complex64;

use crate::{
    linops::adapters::{as_complex, as_complex_mut},
    prox::ProxOperator,
};

/// Projection onto the subspace of vectors supported on `mask`.
///
/// Complex elements where the mask is `false` are set to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjSupport {
    mask: Vec<bool>,
}

impl ProjSupport {
    /// `mask` has one entry per complex element.
    pub fn new(mask: Vec<bool>) -> Self {
        Self { mask }
    }
}

impl ProxOperator for ProjSupport {
    fn apply(&self, _mu: f64, dst: &mut [f64], src: &[f64]) {
        let src = as_complex(src);
        let dst = as_complex_mut(dst);
        assert_eq!(src.len(), self.mask.len(), "support mask does not match vector length");
        assert_eq!(dst.len(), src.len(), "projection buffers differ in length");
        for ((d, s), &keep) in dst.iter_mut().zip(src).zip(&self.mask) {
            *d = if keep { *s } else { Complex64::new(0.0, 0.0) };
        }
    }
}

/// Data-consistency projection: sampled entries are replaced by the
/// measured values, unsampled entries are left as they are.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjData {
    mask: Vec<bool>,
    data: Vec<Complex64>,
}

impl ProjData {
    /// `mask` and `data` have one entry per complex element.
    ///
    /// Panics if their lengths differ.
    pub fn new(mask: Vec<bool>, data: Vec<Complex64>) -> Self {
        assert_eq!(mask.len(), data.len(), "mask and data must have equal length");
        Self { mask, data }
    }
}

impl ProxOperator for ProjData {
    fn apply(&self, _mu: f64, dst: &mut [f64], src: &[f64]) {
        let src = as_complex(src);
        let dst = as_complex_mut(dst);
        assert_eq!(src.len(), self.mask.len(), "data mask does not match vector length");
        assert_eq!(dst.len(), src.len(), "projection buffers differ in length");
        for (i, (d, s)) in dst.iter_mut().zip(src).enumerate() {
            *d = if self.mask[i] { self.data[i] } else { *s };
        }
    }
}
