//! iter: algorithm configuration, dispatch and iteration kernels.
//!
//! Purpose
//! -------
//! Turn a generic operator bundle plus one algorithm configuration into a
//! reconstruction. The layer is organized bottom-up:
//!
//! - [`errors`] / [`validation`]: recoverable configuration errors.
//! - [`types`]: run reports and shared aliases.
//! - [`conf`]: per-algorithm configuration, [`IterConf`] and [`AlgoTag`].
//! - [`guard`]: data-scale classification ahead of every data-driven run.
//! - [`monitor`]: per-iteration progress logging.
//! - [`kernels`]: the loops themselves (CG, IST, FISTA, ADMM, POCS).
//! - [`admm_plan`]: the per-call ADMM execution plan.
//! - [`iter2`]: the uniform entry points and tag dispatch.
//!
//! Conventions
//! -----------
//! - All vectors are real interleaved `f64` slices.
//! - Wiring defects panic; configuration problems are [`IterError`];
//!   degenerate data is a skipped [`IterReport`].

pub mod admm_plan;
pub mod conf;
pub mod errors;
pub mod guard;
pub mod iter2;
pub mod kernels;
pub mod monitor;
pub mod types;
pub mod validation;

pub use self::admm_plan::AdmmPlan;
pub use self::conf::{
    AdmmConf, AlgoTag, ConjGradConf, FistaConf, IstConf, IterCallArgs, IterCallConf, IterCallFn,
    IterConf, PocsConf,
};
pub use self::errors::{IterError, IterResult};
pub use self::guard::{DataState, check_data, classify};
pub use self::iter2::{
    Iter2Args, Iter2Fn, iter2, iter2_admm, iter2_call_iter, iter2_conjgrad, iter2_fista, iter2_fn,
    iter2_ist, iter2_pocs,
};
pub use self::kernels::AdmmHistory;
pub use self::monitor::IterMonitor;
pub use self::types::{Degeneracy, IterReport, IterStatus, ObjectiveFn};
