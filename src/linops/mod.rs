//! linops: linear operator contracts and concrete operators.
//!
//! Purpose
//! -------
//! Define the operator boundary every measurement and transform operator
//! satisfies, the adapters that expose complex-array operators to the
//! real-vector iteration kernels, and a small set of concrete operators.
//!
//! Key behaviors
//! -------------
//! - [`LinearOperator`]: forward / adjoint / normal on complex N-D arrays
//!   with fixed domain and codomain dimensions.
//! - [`Operator`]: square map on interleaved real vectors (the normal
//!   equation operator handed to solvers).
//! - [`LinopIter`] / [`NormalEq`]: zero-copy adapters between the two.
//! - [`SamplingOp`]: diagonal k-space sampling mask; [`IdentityOp`].
//!
//! Conventions
//! -----------
//! - Real interleaved vectors hold `(re, im)` pairs; their length is
//!   `2 * calc_size(dims)`.
//! - Construction errors are [`LinopError`]; application-time size
//!   mismatches are caller defects and panic.

pub mod adapters;
pub mod dims;
pub mod errors;
pub mod identity;
pub mod sampling;
pub mod traits;

pub use self::adapters::{LinopIter, NormalEq, as_complex, as_complex_mut, as_real};
pub use self::dims::{MAPS_DIM, calc_size, check_broadcast, select_kspace_dims};
pub use self::errors::{LinopError, LinopResult};
pub use self::identity::IdentityOp;
pub use self::sampling::SamplingOp;
pub use self::traits::{LinearOperator, Operator};
