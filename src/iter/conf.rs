//! iter::conf: per-algorithm configuration and the algorithm tag.
//!
//! Purpose
//! -------
//! Describe how each algorithm is configured, as one closed sum type
//! ([`IterConf`]) over the six concrete configuration shapes, plus the
//! [`AlgoTag`] a pipeline driver uses to pick an entry point.
//!
//! Key behaviors
//! -------------
//! - Every configuration struct has a validated constructor returning
//!   [`IterResult`] and a `Default` with the established defaults.
//! - `validate()` re-runs the same checks on a struct built by hand (all
//!   fields are public).
//! - [`AlgoTag`] parses case-insensitively from strings.
//!
//! Invariants & assumptions
//! ------------------------
//! - Configurations are owned by the caller and only read by the dispatch
//!   layer. ADMM's adaptive penalty works on the execution plan's copy.
//! - The dispatch layer trusts nothing but the variant: the continuation
//!   range is asserted again before IST/FISTA run.
//!
//! Conventions
//! -----------
//! - `tol` is *relative* to the data scale; the adapters multiply it by the
//!   norm of the adjoint-applied data. ADMM's `abstol` / `reltol` enter the
//!   primal/dual stopping test unscaled.
//! - A tolerance of zero means "run to the iteration cap".
use std::{fmt, rc::Rc, str::FromStr};

use crate::{
    iter::{
        errors::{IterError, IterResult},
        types::{IterReport, ObjectiveFn},
        validation::{
            verify_continuation, verify_max_iter, verify_non_negative, verify_positive, verify_tol,
        },
    },
    linops::traits::Operator,
    prox::ProxOperator,
};

/// Algorithm selector used by pipeline drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgoTag {
    ConjGrad,
    Ist,
    Fista,
    Admm,
    Pocs,
    Call,
}

impl AlgoTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlgoTag::ConjGrad => "conjgrad",
            AlgoTag::Ist => "ist",
            AlgoTag::Fista => "fista",
            AlgoTag::Admm => "admm",
            AlgoTag::Pocs => "pocs",
            AlgoTag::Call => "call",
        }
    }
}

impl fmt::Display for AlgoTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgoTag {
    type Err = IterError;

    /// Parse an algorithm name (case-insensitive).
    ///
    /// Accepts `"cg"` / `"conjgrad"`, `"ist"`, `"fista"`, `"admm"`, `"pocs"`
    /// and `"call"`. Anything else returns [`IterError::InvalidAlgorithm`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cg" | "conjgrad" => Ok(AlgoTag::ConjGrad),
            "ist" => Ok(AlgoTag::Ist),
            "fista" => Ok(AlgoTag::Fista),
            "admm" => Ok(AlgoTag::Admm),
            "pocs" => Ok(AlgoTag::Pocs),
            "call" => Ok(AlgoTag::Call),
            _ => Err(IterError::InvalidAlgorithm {
                name: s.to_string(),
                reason: "Valid options are 'cg', 'ist', 'fista', 'admm', 'pocs' or 'call'.",
            }),
        }
    }
}

/// Conjugate gradient on `(A + l2lambda·I) x = b`.
///
/// Default: `maxiter = 50`, `l2lambda = 0`, `tol = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConjGradConf {
    pub maxiter: usize,
    pub l2lambda: f64,
    pub tol: f64,
}

impl ConjGradConf {
    /// # Errors
    /// - [`IterError::InvalidMaxIter`] for `maxiter == 0`.
    /// - [`IterError::InvalidParameter`] for a negative or non-finite `l2lambda`.
    /// - [`IterError::InvalidTolerance`] for a negative or non-finite `tol`.
    pub fn new(maxiter: usize, l2lambda: f64, tol: f64) -> IterResult<Self> {
        let conf = Self { maxiter, l2lambda, tol };
        conf.validate()?;
        Ok(conf)
    }

    pub fn validate(&self) -> IterResult<()> {
        verify_max_iter(self.maxiter)?;
        verify_non_negative("l2lambda", self.l2lambda)?;
        verify_tol("tol", self.tol)
    }
}

impl Default for ConjGradConf {
    fn default() -> Self {
        Self { maxiter: 50, l2lambda: 0.0, tol: 0.0 }
    }
}

/// Iterative soft thresholding.
///
/// - `step`: gradient step size τ.
/// - `continuation`: final threshold scale, reached geometrically at
///   `maxiter` (1 disables continuation).
/// - `hogwild`: halve the step on a doubling schedule.
///
/// Default: `maxiter = 50`, `step = 0.95`, `continuation = 1`,
/// `hogwild = false`, `tol = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IstConf {
    pub maxiter: usize,
    pub step: f64,
    pub continuation: f64,
    pub hogwild: bool,
    pub tol: f64,
}

impl IstConf {
    /// # Errors
    /// - [`IterError::InvalidMaxIter`] for `maxiter == 0`.
    /// - [`IterError::InvalidParameter`] for a non-positive `step`.
    /// - [`IterError::InvalidContinuation`] outside `[0, 1]`.
    /// - [`IterError::InvalidTolerance`] for a negative or non-finite `tol`.
    pub fn new(
        maxiter: usize, step: f64, continuation: f64, hogwild: bool, tol: f64,
    ) -> IterResult<Self> {
        let conf = Self { maxiter, step, continuation, hogwild, tol };
        conf.validate()?;
        Ok(conf)
    }

    pub fn validate(&self) -> IterResult<()> {
        validate_thresholding(self.maxiter, self.step, self.continuation, self.tol)
    }
}

impl Default for IstConf {
    fn default() -> Self {
        Self { maxiter: 50, step: 0.95, continuation: 1.0, hogwild: false, tol: 0.0 }
    }
}

/// Fast iterative soft thresholding; same parameters as [`IstConf`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FistaConf {
    pub maxiter: usize,
    pub step: f64,
    pub continuation: f64,
    pub hogwild: bool,
    pub tol: f64,
}

impl FistaConf {
    /// # Errors
    /// Same as [`IstConf::new`].
    pub fn new(
        maxiter: usize, step: f64, continuation: f64, hogwild: bool, tol: f64,
    ) -> IterResult<Self> {
        let conf = Self { maxiter, step, continuation, hogwild, tol };
        conf.validate()?;
        Ok(conf)
    }

    pub fn validate(&self) -> IterResult<()> {
        validate_thresholding(self.maxiter, self.step, self.continuation, self.tol)
    }
}

impl Default for FistaConf {
    fn default() -> Self {
        Self { maxiter: 50, step: 0.95, continuation: 1.0, hogwild: false, tol: 0.0 }
    }
}

fn validate_thresholding(maxiter: usize, step: f64, continuation: f64, tol: f64) -> IterResult<()> {
    verify_max_iter(maxiter)?;
    verify_positive("step", step)?;
    verify_continuation(continuation)?;
    verify_tol("tol", tol)
}

/// Alternating direction method of multipliers.
///
/// Fields:
/// - `maxiter` / `maxitercg`: outer iterations / inner CG iterations of the
///   x-update.
/// - `rho`: initial penalty parameter.
/// - `do_warmstart`: initialize the split variables from the current image
///   instead of zero.
/// - `dynamic_rho`: residual-balancing penalty adaptation with `mu`, `tau`.
/// - `hogwild`: double the penalty on a doubling schedule.
/// - `abstol` / `reltol`: absolute / relative stopping tolerances.
/// - `alpha`: over-relaxation factor.
/// - `fast`: accelerated variant with restart.
///
/// The three flags `do_warmstart`, `dynamic_rho` and `hogwild` are
/// independent; no interaction between them is assumed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdmmConf {
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
}

impl AdmmConf {
    /// Iteration caps and penalty; every other field takes its default.
    ///
    /// # Errors
    /// See [`AdmmConf::validate`].
    pub fn new(maxiter: usize, maxitercg: usize, rho: f64) -> IterResult<Self> {
        let conf = Self { maxiter, maxitercg, rho, ..Self::default() };
        conf.validate()?;
        Ok(conf)
    }

    /// # Errors
    /// - [`IterError::InvalidMaxIter`] for a zero `maxiter` or `maxitercg`.
    /// - [`IterError::InvalidParameter`] for a non-positive `rho`, `alpha`,
    ///   `tau` or `mu`.
    /// - [`IterError::InvalidTolerance`] for bad `abstol` / `reltol`.
    pub fn validate(&self) -> IterResult<()> {
        verify_max_iter(self.maxiter)?;
        verify_max_iter(self.maxitercg)?;
        verify_positive("rho", self.rho)?;
        verify_tol("abstol", self.abstol)?;
        verify_tol("reltol", self.reltol)?;
        verify_positive("alpha", self.alpha)?;
        verify_positive("tau", self.tau)?;
        verify_positive("mu", self.mu)
    }
}

impl Default for AdmmConf {
    fn default() -> Self {
        Self {
            maxiter: 50,
            maxitercg: 10,
            rho: 0.5,
            do_warmstart: false,
            dynamic_rho: false,
            hogwild: false,
            abstol: 1e-4,
            reltol: 1e-3,
            alpha: 1.6,
            tau: 2.0,
            mu: 100.0,
            fast: false,
        }
    }
}

/// Projection onto convex sets. Default: `maxiter = 50`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PocsConf {
    pub maxiter: usize,
}

impl PocsConf {
    /// # Errors
    /// [`IterError::InvalidMaxIter`] for `maxiter == 0`.
    pub fn new(maxiter: usize) -> IterResult<Self> {
        verify_max_iter(maxiter)?;
        Ok(Self { maxiter })
    }
}

impl Default for PocsConf {
    fn default() -> Self {
        Self { maxiter: 50 }
    }
}

/// Arguments handed to a direct-call algorithm.
pub struct IterCallArgs<'a> {
    pub normaleq_op: Option<&'a dyn Operator>,
    pub prox_op: Option<&'a dyn ProxOperator>,
    pub image_adj: Option<&'a [f64]>,
    pub image_truth: Option<&'a [f64]>,
}

/// Signature of a caller-defined algorithm.
pub type IterCallFn =
    dyn Fn(&IterCallArgs<'_>, &mut [f64], Option<ObjectiveFn<'_>>) -> IterResult<IterReport>;

/// Caller-defined algorithm behind the common dispatch signature.
///
/// Any configuration the algorithm needs is captured by the closure.
#[derive(Clone)]
pub struct IterCallConf {
    pub fun: Rc<IterCallFn>,
}

impl IterCallConf {
    pub fn new<F>(fun: F) -> Self
    where
        F: Fn(&IterCallArgs<'_>, &mut [f64], Option<ObjectiveFn<'_>>) -> IterResult<IterReport>
            + 'static,
    {
        Self { fun: Rc::new(fun) }
    }
}

impl fmt::Debug for IterCallConf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterCallConf").finish_non_exhaustive()
    }
}

/// Configuration of one solver run, tagged by algorithm.
#[derive(Debug, Clone)]
pub enum IterConf {
    ConjGrad(ConjGradConf),
    Ist(IstConf),
    Fista(FistaConf),
    Admm(AdmmConf),
    Pocs(PocsConf),
    Call(IterCallConf),
}

impl IterConf {
    /// The algorithm this configuration belongs to.
    pub fn tag(&self) -> AlgoTag {
        match self {
            IterConf::ConjGrad(_) => AlgoTag::ConjGrad,
            IterConf::Ist(_) => AlgoTag::Ist,
            IterConf::Fista(_) => AlgoTag::Fista,
            IterConf::Admm(_) => AlgoTag::Admm,
            IterConf::Pocs(_) => AlgoTag::Pocs,
            IterConf::Call(_) => AlgoTag::Call,
        }
    }

    /// Default configuration for `tag`.
    ///
    /// Returns `None` for [`AlgoTag::Call`], which has no default algorithm.
    pub fn default_for(tag: AlgoTag) -> Option<Self> {
        match tag {
            AlgoTag::ConjGrad => Some(IterConf::ConjGrad(ConjGradConf::default())),
            AlgoTag::Ist => Some(IterConf::Ist(IstConf::default())),
            AlgoTag::Fista => Some(IterConf::Fista(FistaConf::default())),
            AlgoTag::Admm => Some(IterConf::Admm(AdmmConf::default())),
            AlgoTag::Pocs => Some(IterConf::Pocs(PocsConf::default())),
            AlgoTag::Call => None,
        }
    }

    /// Run the variant's validation.
    pub fn validate(&self) -> IterResult<()> {
        match self {
            IterConf::ConjGrad(conf) => conf.validate(),
            IterConf::Ist(conf) => conf.validate(),
            IterConf::Fista(conf) => conf.validate(),
            IterConf::Admm(conf) => conf.validate(),
            IterConf::Pocs(conf) => verify_max_iter(conf.maxiter),
            IterConf::Call(_) => Ok(()),
        }
    }
}
