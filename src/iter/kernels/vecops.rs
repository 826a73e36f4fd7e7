//! Flat-slice vector arithmetic used by the iteration loops.
//!
//! Thin wrappers over `ndarray` views so the kernels can stay on borrowed
//! `&[f64]` buffers without allocating.
use ndarray::{ArrayView1, ArrayViewMut1};

pub use crate::iter::guard::norm;

pub fn dot(x: &[f64], y: &[f64]) -> f64 {
    ArrayView1::from(x).dot(&ArrayView1::from(y))
}

/// `y += a · x`
pub fn axpy(y: &mut [f64], a: f64, x: &[f64]) {
    ArrayViewMut1::from(y).scaled_add(a, &ArrayView1::from(x));
}

/// `y = x + a · y`
pub fn xpay(y: &mut [f64], a: f64, x: &[f64]) {
    assert_eq!(y.len(), x.len());
    y.iter_mut().zip(x).for_each(|(yi, &xi)| *yi = xi + a * *yi);
}

/// `dst = x − y`
pub fn sub(dst: &mut [f64], x: &[f64], y: &[f64]) {
    assert!(dst.len() == x.len() && x.len() == y.len());
    dst.iter_mut().zip(x.iter().zip(y)).for_each(|(d, (&a, &b))| *d = a - b);
}

pub fn scale(x: &mut [f64], a: f64) {
    x.iter_mut().for_each(|v| *v *= a);
}

/// `‖x − y‖`
pub fn dist(x: &[f64], y: &[f64]) -> f64 {
    let mut d = vec![0.0; x.len()];
    sub(&mut d, x, y);
    norm(&d)
}
