//! Projection onto convex sets.
//!
//! Cycles through the projections in order, once per iteration, for a fixed
//! number of iterations. There is no data term and therefore no tolerance;
//! the change between consecutive iterates is reported as the residual.
use log::debug;

use crate::{
    iter::{kernels::vecops::dist, monitor::IterMonitor, types::IterReport},
    prox::ProxOperator,
};

pub fn pocs(
    maxiter: usize, projections: &[&dyn ProxOperator], x: &mut [f64], monitor: &IterMonitor<'_>,
) -> IterReport {
    let mut tmp = vec![0.0; x.len()];
    let mut prev = vec![0.0; x.len()];

    for iter in 0..maxiter {
        prev.copy_from_slice(x);
        for proj in projections {
            proj.apply(1.0, &mut tmp, x);
            x.copy_from_slice(&tmp);
        }
        monitor.report(iter, x, dist(x, &prev));
    }

    debug!("pocs finished after {maxiter} iterations over {} sets", projections.len());
    IterReport::max_iter_reached(maxiter)
}
