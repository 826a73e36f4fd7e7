//! iter::iter2: uniform dispatch surface over the iteration kernels.
//!
//! Purpose
//! -------
//! Expose one entry point per algorithm, all sharing the [`Iter2Fn`]
//! signature, so a reconstruction pipeline can pick an algorithm by tag and
//! call it with a single generic bundle of operators and buffers. Each
//! adapter checks the shape of that bundle, unpacks its own configuration
//! variant, guards the data scale and calls its kernel.
//!
//! Key behaviors
//! -------------
//! - Arity per algorithm (`D` = number of proximal operators): 0 for
//!   conjugate gradient, exactly 1 for IST/FISTA, at most 1 for a direct
//!   call, any number for ADMM and POCS.
//! - Data-driven algorithms classify `image_adj` first and return a skipped
//!   [`IterReport`] on empty or corrupted data, leaving `image` untouched.
//! - Relative tolerances are scaled by the norm of `image_adj`.
//! - [`iter2`] dispatches on the configuration's own tag; [`iter2_fn`] maps a
//!   tag to its entry point.
//!
//! Invariants & assumptions
//! ------------------------
//! - Wiring defects panic: wrong configuration variant, wrong arity,
//!   operators an algorithm does not accept, a missing required operator or
//!   buffer, continuation outside `[0, 1]`.
//! - `None` and an empty list are different for `ops`: POCS, conjugate
//!   gradient and direct calls require the list to be absent.
//! - Nothing is retained after a call returns; ADMM's plan is built and
//!   dropped inside `iter2_admm`.
use log::{debug, info};

use crate::{
    iter::{
        admm_plan::AdmmPlan,
        conf::{AlgoTag, IterCallArgs, IterConf},
        errors::IterResult,
        guard::{check_data, classify},
        kernels::{ThreshParams, admm, conjgrad, fista, ist, pocs},
        monitor::IterMonitor,
        types::{IterReport, ObjectiveFn},
        validation::continuation_in_range,
    },
    linops::traits::{LinearOperator, Operator},
    prox::ProxOperator,
};

/// Borrowed operator and buffer bundle shared by every entry point.
///
/// Everything except the configuration, the image and the objective
/// callback. Fields are public; the `with_*` methods are a convenience for
/// building a bundle from locals.
#[derive(Clone, Copy, Default)]
pub struct Iter2Args<'a> {
    /// Normal-equation measurement operator `A`.
    pub normaleq_op: Option<&'a dyn Operator>,
    /// One proximal operator per regularization term.
    pub prox_ops: Option<&'a [&'a dyn ProxOperator]>,
    /// One transform operator per regularization term, aligned with
    /// `prox_ops`.
    pub ops: Option<&'a [&'a dyn LinearOperator]>,
    /// ADMM only: replaces the inner conjugate-gradient x-update.
    pub xupdate_op: Option<&'a dyn ProxOperator>,
    /// Adjoint-applied measurement `b`.
    pub image_adj: Option<&'a [f64]>,
    /// Ground truth for progress reporting.
    pub image_truth: Option<&'a [f64]>,
}

impl<'a> Iter2Args<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_normaleq_op(mut self, op: &'a dyn Operator) -> Self {
        self.normaleq_op = Some(op);
        self
    }

    pub fn with_prox_ops(mut self, prox_ops: &'a [&'a dyn ProxOperator]) -> Self {
        self.prox_ops = Some(prox_ops);
        self
    }

    pub fn with_ops(mut self, ops: &'a [&'a dyn LinearOperator]) -> Self {
        self.ops = Some(ops);
        self
    }

    pub fn with_xupdate_op(mut self, op: &'a dyn ProxOperator) -> Self {
        self.xupdate_op = Some(op);
        self
    }

    pub fn with_image_adj(mut self, image_adj: &'a [f64]) -> Self {
        self.image_adj = Some(image_adj);
        self
    }

    pub fn with_image_truth(mut self, image_truth: &'a [f64]) -> Self {
        self.image_truth = Some(image_truth);
        self
    }

    /// Number of regularization terms `D`.
    ///
    /// Panics if both lists are present with different lengths.
    pub fn num_funs(&self) -> usize {
        let d = self.prox_ops.map_or(0, <[_]>::len);
        if let (Some(ops), Some(_)) = (self.ops, self.prox_ops) {
            assert_eq!(
                ops.len(),
                d,
                "transform and proximal operator lists must have equal length"
            );
        }
        d
    }
}

impl std::fmt::Debug for Iter2Args<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Iter2Args")
            .field("normaleq_op", &self.normaleq_op.is_some())
            .field("prox_ops", &self.prox_ops.map(<[_]>::len))
            .field("ops", &self.ops.map(<[_]>::len))
            .field("xupdate_op", &self.xupdate_op.is_some())
            .field("image_adj", &self.image_adj.map(<[_]>::len))
            .field("image_truth", &self.image_truth.map(<[_]>::len))
            .finish()
    }
}

/// Common signature of every entry point.
pub type Iter2Fn = fn(
    &IterConf,
    &Iter2Args<'_>,
    &mut [f64],
    Option<ObjectiveFn<'_>>,
) -> IterResult<IterReport>;

fn require_normaleq<'a>(args: &Iter2Args<'a>, algo: &str) -> &'a dyn Operator {
    match args.normaleq_op {
        Some(op) => op,
        None => panic!("{algo} requires a normal-equation operator"),
    }
}

fn require_image_adj<'a>(args: &Iter2Args<'a>, algo: &str) -> &'a [f64] {
    match args.image_adj {
        Some(adj) => adj,
        None => panic!("{algo} requires adjoint data"),
    }
}

/// Conjugate gradient on `(A + l2lambda·I) x = image_adj`.
///
/// Requires `D = 0` with both operator lists absent; `xupdate_op` is ignored.
///
/// # Errors
/// Backend failures of the conjugate-gradient solver.
pub fn iter2_conjgrad(
    conf: &IterConf, args: &Iter2Args<'_>, image: &mut [f64], obj_eval: Option<ObjectiveFn<'_>>,
) -> IterResult<IterReport> {
    let IterConf::ConjGrad(cg_conf) = conf else {
        panic!("iter2_conjgrad called with a {} configuration", conf.tag());
    };
    assert_eq!(args.num_funs(), 0, "conjgrad takes no regularization terms");
    assert!(args.prox_ops.is_none(), "conjgrad takes no proximal operators");
    assert!(args.ops.is_none(), "conjgrad takes no transform operators");
    let op = require_normaleq(args, "conjgrad");
    let image_adj = require_image_adj(args, "conjgrad");

    let epsilon = match classify(image_adj).scaled_tol(cg_conf.tol) {
        Ok(epsilon) => epsilon,
        Err(reason) => return Ok(IterReport::skipped(reason)),
    };

    info!(
        "conjgrad: maxiter {}, l2lambda {}, tol {}",
        cg_conf.maxiter, cg_conf.l2lambda, cg_conf.tol
    );
    let monitor = IterMonitor::new("conjgrad", args.image_truth, obj_eval);
    conjgrad(cg_conf.maxiter, cg_conf.l2lambda, epsilon, op, image, image_adj, &monitor)
}

/// Shared front half of IST and FISTA: arity, guard, continuation.
///
/// Returns `Err(report)` when the run is skipped.
fn thresholding_setup<'a>(
    args: &Iter2Args<'a>, algo: &'static str, maxiter: usize, step: f64, continuation: f64,
    hogwild: bool, tol: f64,
) -> Result<(ThreshParams, &'a dyn Operator, &'a dyn ProxOperator, &'a [f64]), IterReport> {
    assert_eq!(args.num_funs(), 1, "{algo} takes exactly one regularization term");
    let prox = match args.prox_ops {
        Some([prox]) => *prox,
        _ => unreachable!("exactly one proximal operator was checked above"),
    };
    let op = require_normaleq(args, algo);
    let image_adj = require_image_adj(args, algo);

    let epsilon = classify(image_adj).scaled_tol(tol).map_err(IterReport::skipped)?;

    assert!(
        continuation_in_range(continuation),
        "{algo}: continuation {continuation} outside [0, 1]"
    );
    info!(
        "{algo}: maxiter {maxiter}, step {step}, continuation {continuation}, hogwild {hogwild}, \
         tol {tol}"
    );
    let params = ThreshParams { maxiter, epsilon, step, continuation, hogwild };
    Ok((params, op, prox, image_adj))
}

/// Iterative soft thresholding with one regularizer.
///
/// Requires `D = 1`; `ops` and `xupdate_op` are ignored.
///
/// # Errors
/// Never fails at present; the `Result` keeps the common signature.
pub fn iter2_ist(
    conf: &IterConf, args: &Iter2Args<'_>, image: &mut [f64], obj_eval: Option<ObjectiveFn<'_>>,
) -> IterResult<IterReport> {
    let IterConf::Ist(c) = conf else {
        panic!("iter2_ist called with a {} configuration", conf.tag());
    };
    let (params, op, prox, image_adj) = match thresholding_setup(
        args,
        "ist",
        c.maxiter,
        c.step,
        c.continuation,
        c.hogwild,
        c.tol,
    ) {
        Ok(setup) => setup,
        Err(skipped) => return Ok(skipped),
    };
    let monitor = IterMonitor::new("ist", args.image_truth, obj_eval);
    Ok(ist(&params, op, prox, image, image_adj, &monitor))
}

/// FISTA with one regularizer; same contract as [`iter2_ist`].
///
/// # Errors
/// Never fails at present; the `Result` keeps the common signature.
pub fn iter2_fista(
    conf: &IterConf, args: &Iter2Args<'_>, image: &mut [f64], obj_eval: Option<ObjectiveFn<'_>>,
) -> IterResult<IterReport> {
    let IterConf::Fista(c) = conf else {
        panic!("iter2_fista called with a {} configuration", conf.tag());
    };
    let (params, op, prox, image_adj) = match thresholding_setup(
        args,
        "fista",
        c.maxiter,
        c.step,
        c.continuation,
        c.hogwild,
        c.tol,
    ) {
        Ok(setup) => setup,
        Err(skipped) => return Ok(skipped),
    };
    let monitor = IterMonitor::new("fista", args.image_truth, obj_eval);
    Ok(fista(&params, op, prox, image, image_adj, &monitor))
}

/// ADMM over any number of regularization terms.
///
/// `ops` is required whenever `D > 0`. The normal-equation operator and the
/// adjoint data are optional; the guard only runs when `image_adj` is
/// present.
///
/// # Errors
/// Backend failures of the inner conjugate-gradient solves.
pub fn iter2_admm(
    conf: &IterConf, args: &Iter2Args<'_>, image: &mut [f64], obj_eval: Option<ObjectiveFn<'_>>,
) -> IterResult<IterReport> {
    let IterConf::Admm(admm_conf) = conf else {
        panic!("iter2_admm called with a {} configuration", conf.tag());
    };
    let d = args.num_funs();
    let ops = args.ops.unwrap_or(&[]);
    let prox_ops = args.prox_ops.unwrap_or(&[]);
    assert_eq!(ops.len(), d, "admm requires one transform operator per regularization term");

    if let Some(image_adj) = args.image_adj {
        if let Err(reason) = check_data(image_adj) {
            return Ok(IterReport::skipped(reason));
        }
    }

    let mut plan = AdmmPlan::new(admm_conf, ops, prox_ops, args.xupdate_op, args.image_truth);
    info!(
        "admm: {d} terms, maxiter {}, maxitercg {}, rho {}, dynamic_rho {}, hogwild {}, fast {}",
        plan.maxiter, plan.maxitercg, plan.rho, plan.dynamic_rho, plan.hogwild, plan.fast
    );
    let monitor = IterMonitor::new("admm", plan.image_truth, obj_eval);
    let (report, history) = admm(&mut plan, args.normaleq_op, image, args.image_adj, &monitor)?;
    debug!(
        "admm: {} iterations, final rho {}, final primal residual {:?}",
        history.numiter,
        plan.rho,
        history.r_norm.last()
    );
    Ok(report)
}

/// Projection onto convex sets: every proximal operator is a projection.
///
/// Requires `normaleq_op`, `ops` and `image_adj` to be absent. No tolerance
/// applies; the run always goes to `maxiter`.
///
/// # Errors
/// Never fails at present; the `Result` keeps the common signature.
pub fn iter2_pocs(
    conf: &IterConf, args: &Iter2Args<'_>, image: &mut [f64], obj_eval: Option<ObjectiveFn<'_>>,
) -> IterResult<IterReport> {
    let IterConf::Pocs(pocs_conf) = conf else {
        panic!("iter2_pocs called with a {} configuration", conf.tag());
    };
    assert!(args.normaleq_op.is_none(), "pocs takes no normal-equation operator");
    assert!(args.ops.is_none(), "pocs takes no transform operators");
    assert!(args.image_adj.is_none(), "pocs takes no adjoint data");
    let projections = args.prox_ops.unwrap_or(&[]);

    info!("pocs: {} sets, maxiter {}", projections.len(), pocs_conf.maxiter);
    let monitor = IterMonitor::new("pocs", args.image_truth, obj_eval);
    Ok(pocs(pocs_conf.maxiter, projections, image, &monitor))
}

/// Hand the bundle to the caller-defined algorithm in [`IterCallConf`].
///
/// Requires `D <= 1` and `ops` absent. The single proximal operator, if any,
/// is passed through as `prox_op`.
///
/// [`IterCallConf`]: crate::iter::conf::IterCallConf
///
/// # Errors
/// Whatever the callback returns.
pub fn iter2_call_iter(
    conf: &IterConf, args: &Iter2Args<'_>, image: &mut [f64], obj_eval: Option<ObjectiveFn<'_>>,
) -> IterResult<IterReport> {
    let IterConf::Call(call) = conf else {
        panic!("iter2_call_iter called with a {} configuration", conf.tag());
    };
    assert!(args.num_funs() <= 1, "direct call takes at most one regularization term");
    assert!(args.ops.is_none(), "direct call takes no transform operators");

    let call_args = IterCallArgs {
        normaleq_op: args.normaleq_op,
        prox_op: args.prox_ops.and_then(|p| p.first().copied()),
        image_adj: args.image_adj,
        image_truth: args.image_truth,
    };
    (call.fun)(&call_args, image, obj_eval)
}

/// Entry point for `tag`.
pub fn iter2_fn(tag: AlgoTag) -> Iter2Fn {
    match tag {
        AlgoTag::ConjGrad => iter2_conjgrad,
        AlgoTag::Ist => iter2_ist,
        AlgoTag::Fista => iter2_fista,
        AlgoTag::Admm => iter2_admm,
        AlgoTag::Pocs => iter2_pocs,
        AlgoTag::Call => iter2_call_iter,
    }
}

/// Run the algorithm selected by `conf`.
///
/// # Errors
/// See the individual entry points.
pub fn iter2(
    conf: &IterConf, args: &Iter2Args<'_>, image: &mut [f64], obj_eval: Option<ObjectiveFn<'_>>,
) -> IterResult<IterReport> {
    iter2_fn(conf.tag())(conf, args, image, obj_eval)
}
