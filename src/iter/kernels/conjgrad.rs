//! Conjugate gradient on the regularized normal equations.
//!
//! Solves `(A + λ·I) x = b` for a self-adjoint, positive semi-definite `A`
//! given only as an [`Operator`] on interleaved vectors. The recursion itself
//! is `argmin`'s `ConjugateGradient`; this module wraps the operator as an
//! `argmin` problem, wires the iteration cap and residual target into the
//! executor, and maps the termination status onto an [`IterReport`].
//!
//! `argmin` reports `‖r‖²` as the cost of each iterate, so a residual
//! tolerance `ε` becomes the target cost `ε²`. The initial residual is
//! checked before the executor starts: an exact zero residual would
//! otherwise produce a `0/0` step length.
use std::borrow::Cow;

use argmin::{
    core::{
        Error, Executor, IterState, Operator as ArgminOperator, State, TerminationReason,
        TerminationStatus,
    },
    solver::conjugategradient::ConjugateGradient,
};
use log::debug;

use crate::{
    iter::{
        errors::{IterError, IterResult},
        kernels::vecops::norm,
        monitor::IterMonitor,
        types::{IterReport, Vector},
    },
    linops::traits::Operator,
};

/// `(A + l2lambda·I)` as an `argmin` operator problem.
#[derive(Clone, Copy)]
struct NormalEqProblem<'a> {
    op: &'a dyn Operator,
    l2lambda: f64,
}

impl NormalEqProblem<'_> {
    fn apply_slice(&self, dst: &mut [f64], src: &[f64]) {
        self.op.apply(dst, src);
        if self.l2lambda != 0.0 {
            dst.iter_mut().zip(src).for_each(|(d, &s)| *d += self.l2lambda * s);
        }
    }

    /// `‖b − (A + λ·I) x‖`
    fn residual_norm(&self, x: &[f64], b: &[f64]) -> f64 {
        let mut r = vec![0.0; x.len()];
        self.apply_slice(&mut r, x);
        r.iter_mut().zip(b).for_each(|(ri, &bi)| *ri = bi - *ri);
        norm(&r)
    }
}

impl ArgminOperator for NormalEqProblem<'_> {
    type Param = Vector;
    type Output = Vector;

    fn apply(&self, p: &Self::Param) -> Result<Self::Output, Error> {
        let src: Cow<'_, [f64]> = match p.as_slice() {
            Some(s) => Cow::Borrowed(s),
            None => Cow::Owned(p.to_vec()),
        };
        let mut out = vec![0.0; src.len()];
        self.apply_slice(&mut out, &src);
        Ok(Vector::from(out))
    }
}

/// Solve `(A + l2lambda·I) x = b` in place, starting from the current `x`.
///
/// Stops after `maxiter` iterations or once `‖r‖ <= epsilon`. A zero
/// `epsilon` still stops on an exact zero residual.
///
/// # Errors
/// Backend failures from `argmin`, or [`IterError::MissingSolution`] if the
/// executor returns without a parameter vector.
pub fn cg_solve(
    maxiter: usize, l2lambda: f64, epsilon: f64, op: &dyn Operator, x: &mut [f64], b: &[f64],
) -> IterResult<IterReport> {
    assert_eq!(x.len(), b.len(), "image and right-hand side differ in length");
    let problem = NormalEqProblem { op, l2lambda };

    if problem.residual_norm(x, b) <= epsilon {
        return Ok(IterReport::converged(0));
    }
    if maxiter == 0 {
        return Ok(IterReport::max_iter_reached(0));
    }

    let x0 = Vector::from(x.to_vec());
    let solver = ConjugateGradient::new(Vector::from(b.to_vec()));
    let executor: Executor<_, _, IterState<Vector, (), (), (), Vector, f64>> =
        Executor::new(problem, solver).configure(|state| {
            state.param(x0).max_iters(maxiter as u64).target_cost(epsilon * epsilon)
        });

    let mut result = executor.run()?.state().clone();
    let iterations = result.get_iter() as usize;
    let status = result.get_termination_status().clone();
    let param = match result.take_param() {
        Some(p) => p,
        None => result.take_best_param().ok_or(IterError::MissingSolution)?,
    };
    x.iter_mut().zip(param.iter()).for_each(|(xi, &pi)| *xi = pi);

    Ok(match status {
        TerminationStatus::Terminated(TerminationReason::MaxItersReached)
        | TerminationStatus::NotTerminated => IterReport::max_iter_reached(iterations),
        TerminationStatus::Terminated(_) => IterReport::converged(iterations),
    })
}

/// Conjugate-gradient kernel: [`cg_solve`] plus progress reporting.
///
/// The objective and truth error are reported once, for the final iterate.
///
/// # Errors
/// See [`cg_solve`].
pub fn conjgrad(
    maxiter: usize, l2lambda: f64, epsilon: f64, op: &dyn Operator, image: &mut [f64],
    image_adj: &[f64], monitor: &IterMonitor<'_>,
) -> IterResult<IterReport> {
    let report = cg_solve(maxiter, l2lambda, epsilon, op, image, image_adj)?;
    let residual = NormalEqProblem { op, l2lambda }.residual_norm(image, image_adj);
    monitor.report(report.iterations, image, residual);
    debug!("conjgrad finished after {} iterations: {:?}", report.iterations, report.status);
    Ok(report)
}
