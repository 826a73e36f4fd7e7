//! iter::kernels: the iteration loops behind the dispatch adapters.
//!
//! Each kernel works on real interleaved `f64` buffers, takes already
//! scaled (absolute) tolerances, updates the image in place and reports
//! progress through an [`IterMonitor`](crate::iter::monitor::IterMonitor).
//! Kernels never classify data; the adapters guard before calling them.
//!
//! - [`conjgrad`]: `argmin` conjugate gradient on `(A + λI) x = b`.
//! - [`ist`] / [`fista`]: proximal gradient with continuation and hogwild.
//! - [`admm`]: scaled ADMM over an [`AdmmPlan`](crate::iter::admm_plan::AdmmPlan).
//! - [`pocs`]: cyclic projections.

pub mod admm;
pub mod conjgrad;
pub mod ist;
pub mod pocs;
pub mod vecops;

pub use self::admm::{AdmmHistory, admm};
pub use self::conjgrad::{cg_solve, conjgrad};
pub use self::ist::{Hogwild, ThreshParams, continuation_scale, fista, ist};
pub use self::pocs::pocs;
