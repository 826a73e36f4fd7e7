//! Complex soft thresholding (proximal map of `λ‖x‖₁`).
use num_complex::Complex64;

use crate::{
    linops::adapters::{as_complex, as_complex_mut},
    prox::ProxOperator,
};

/// Soft thresholding with weight `lambda`.
///
/// For every complex element `z`, with threshold `t = lambda · mu`:
/// `z ↦ z · max(|z| − t, 0) / |z|`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftThresh {
    pub lambda: f64,
}

impl SoftThresh {
    pub fn new(lambda: f64) -> Self {
        Self { lambda }
    }
}

impl ProxOperator for SoftThresh {
    fn apply(&self, mu: f64, dst: &mut [f64], src: &[f64]) {
        assert_eq!(dst.len(), src.len(), "soft thresholding buffers differ in length");
        let t = self.lambda * mu;
        for (d, s) in as_complex_mut(dst).iter_mut().zip(as_complex(src)) {
            let mag = s.norm();
            *d = if mag > t { *s * ((mag - t) / mag) } else { Complex64::new(0.0, 0.0) };
        }
    }
}
