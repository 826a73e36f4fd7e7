//! Iterative soft thresholding (IST) and its accelerated variant (FISTA).
//!
//! Both minimize `½‖Ax − b‖²`-type objectives given through the normal
//! equations, `A x = b`, plus one regularizer known only by its proximal map.
//!
//! Schedule details shared by both loops:
//! - Continuation: iteration `k` thresholds with `step · c^(k / maxiter)`,
//!   so the threshold shrinks geometrically from `step` towards
//!   `c · step`.
//! - Hogwild: the step halves whenever the [`Hogwild`] schedule fires.
use log::debug;

use crate::{
    iter::{
        kernels::vecops::{axpy, norm},
        monitor::IterMonitor,
        types::IterReport,
    },
    linops::traits::Operator,
    prox::ProxOperator,
};

/// Parameters of an IST or FISTA run after tolerance scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreshParams {
    pub maxiter: usize,
    /// Absolute residual tolerance.
    pub epsilon: f64,
    pub step: f64,
    pub continuation: f64,
    pub hogwild: bool,
}

/// Doubling schedule: fires after 10 ticks, then 20 more, then 40 more, …
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hogwild {
    count: usize,
    period: usize,
}

impl Hogwild {
    pub fn new() -> Self {
        Self { count: 0, period: 10 }
    }

    /// Advance one iteration; `true` when the schedule fires.
    pub fn tick(&mut self) -> bool {
        self.count += 1;
        if self.count == self.period {
            self.period *= 2;
            self.count = 0;
            return true;
        }
        false
    }
}

impl Default for Hogwild {
    fn default() -> Self {
        Self::new()
    }
}

/// Threshold scale `c^(iter / maxiter)` for iteration `iter`.
pub fn continuation_scale(continuation: f64, iter: usize, maxiter: usize) -> f64 {
    continuation.powf(iter as f64 / maxiter as f64)
}

/// `r = b − A x`
fn residual(op: &dyn Operator, r: &mut [f64], x: &[f64], b: &[f64]) {
    op.apply(r, x);
    r.iter_mut().zip(b).for_each(|(ri, &bi)| *ri = bi - *ri);
}

/// IST: `x ← prox(τ·s_k)(x)`, `r = b − A x`, stop if `‖r‖ < ε`, else
/// `x ← x + τ r`.
pub fn ist(
    params: &ThreshParams, op: &dyn Operator, prox: &dyn ProxOperator, x: &mut [f64], b: &[f64],
    monitor: &IterMonitor<'_>,
) -> IterReport {
    assert_eq!(x.len(), b.len(), "image and right-hand side differ in length");
    let n = x.len();
    let mut r = vec![0.0; n];
    let mut tmp = vec![0.0; n];
    let mut tau = params.step;
    let mut hogwild = Hogwild::new();
    let rsnot = norm(b);

    for iter in 0..params.maxiter {
        let lambda_scale = continuation_scale(params.continuation, iter, params.maxiter);
        debug!("##lambda_scale = {lambda_scale}");

        prox.apply(lambda_scale * tau, &mut tmp, x);
        x.copy_from_slice(&tmp);

        residual(op, &mut r, x, b);
        let rsnew = norm(&r);
        monitor.report(iter, x, rsnew / rsnot);

        if rsnew < params.epsilon {
            return IterReport::converged(iter + 1);
        }

        if params.hogwild && hogwild.tick() {
            tau /= 2.0;
            debug!("hogwild: step reduced to {tau}");
        }

        axpy(x, tau, &r);
    }

    IterReport::max_iter_reached(params.maxiter)
}

/// FISTA: IST with Nesterov momentum on the prox outputs.
///
/// On reaching the iteration cap the last prox output, not the extrapolated
/// point, is left in `x`.
pub fn fista(
    params: &ThreshParams, op: &dyn Operator, prox: &dyn ProxOperator, x: &mut [f64], b: &[f64],
    monitor: &IterMonitor<'_>,
) -> IterReport {
    assert_eq!(x.len(), b.len(), "image and right-hand side differ in length");
    let n = x.len();
    let mut r = vec![0.0; n];
    let mut tmp = vec![0.0; n];
    let mut o = x.to_vec();
    let mut tau = params.step;
    let mut ra = 1.0_f64;
    let mut hogwild = Hogwild::new();
    let rsnot = norm(b);

    for iter in 0..params.maxiter {
        let lambda_scale = continuation_scale(params.continuation, iter, params.maxiter);
        debug!("##lambda_scale = {lambda_scale}");

        residual(op, &mut r, x, b);
        let rsnew = norm(&r);
        monitor.report(iter, x, rsnew / rsnot);

        if rsnew < params.epsilon {
            return IterReport::converged(iter + 1);
        }

        if params.hogwild && hogwild.tick() {
            tau /= 2.0;
            debug!("hogwild: step reduced to {tau}");
        }

        axpy(x, tau, &r);
        prox.apply(lambda_scale * tau, &mut tmp, x);

        let ra_new = (1.0 + (1.0 + 4.0 * ra * ra).sqrt()) / 2.0;
        let beta = (ra - 1.0) / ra_new;
        for ((xi, &ti), oi) in x.iter_mut().zip(&tmp).zip(o.iter_mut()) {
            *xi = ti + beta * (ti - *oi);
            *oi = ti;
        }
        ra = ra_new;
    }

    x.copy_from_slice(&o);
    IterReport::max_iter_reached(params.maxiter)
}
