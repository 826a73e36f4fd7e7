//! ADMM execution plan.
//!
//! Purpose
//! -------
//! Assemble, once per `iter2_admm` call, everything the ADMM kernel needs for
//! an arbitrary number `D` of regularization terms: a private copy of every
//! tunable parameter, one [`LinopIter`] per transform operator, the aligned
//! proximal operators, the optional x-update operator, and the ground truth.
//!
//! Invariants & assumptions
//! ------------------------
//! - `ops` and `prox_ops` have the same length `D` (asserted at build time).
//! - Term `i` uses split variables of length `2 · calc_size(codomain_i)`,
//!   independent of every other term.
//! - The plan is dropped when the call returns; the kernel may retune
//!   `rho` on the plan without touching the caller's configuration.
use crate::{
    iter::conf::AdmmConf,
    linops::{adapters::LinopIter, traits::LinearOperator},
    prox::ProxOperator,
};

pub struct AdmmPlan<'a> {
    pub maxiter: usize,
    pub maxitercg: usize,
    pub rho: f64,
    pub do_warmstart: bool,
    pub dynamic_rho: bool,
    pub hogwild: bool,
    pub abstol: f64,
    pub reltol: f64,
    pub alpha: f64,
    pub tau: f64,
    pub mu: f64,
    pub fast: bool,
    pub image_truth: Option<&'a [f64]>,
    pub ops: Vec<LinopIter<'a>>,
    pub prox_ops: Vec<&'a dyn ProxOperator>,
    pub xupdate: Option<&'a dyn ProxOperator>,
}

impl<'a> AdmmPlan<'a> {
    /// Build the plan for `D = prox_ops.len()` terms.
    ///
    /// Panics if `ops` and `prox_ops` differ in length.
    pub fn new(
        conf: &AdmmConf, ops: &[&'a dyn LinearOperator], prox_ops: &[&'a dyn ProxOperator],
        xupdate: Option<&'a dyn ProxOperator>, image_truth: Option<&'a [f64]>,
    ) -> Self {
        assert_eq!(
            ops.len(),
            prox_ops.len(),
            "transform and proximal operator lists must have equal length"
        );

        Self {
            maxiter: conf.maxiter,
            maxitercg: conf.maxitercg,
            rho: conf.rho,
            do_warmstart: conf.do_warmstart,
            dynamic_rho: conf.dynamic_rho,
            hogwild: conf.hogwild,
            abstol: conf.abstol,
            reltol: conf.reltol,
            alpha: conf.alpha,
            tau: conf.tau,
            mu: conf.mu,
            fast: conf.fast,
            image_truth,
            ops: ops.iter().map(|&op| LinopIter::new(op)).collect(),
            prox_ops: prox_ops.to_vec(),
            xupdate,
        }
    }

    /// Number of regularization terms `D`.
    pub fn num_funs(&self) -> usize {
        self.ops.len()
    }

    /// Interleaved length of each term's split variable.
    pub fn z_dims(&self) -> Vec<usize> {
        self.ops.iter().map(LinopIter::codomain_len).collect()
    }
}

impl std::fmt::Debug for AdmmPlan<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmmPlan")
            .field("num_funs", &self.num_funs())
            .field("maxiter", &self.maxiter)
            .field("maxitercg", &self.maxitercg)
            .field("rho", &self.rho)
            .field("ops", &self.ops)
            .field("has_xupdate", &self.xupdate.is_some())
            .finish_non_exhaustive()
    }
}
