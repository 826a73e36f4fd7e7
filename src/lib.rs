//! recon_iter: iterative reconstruction algorithms behind one dispatch surface.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and, with the `python-bindings`
//! feature, as the PyO3 bridge exposing a sampling-model reconstruction and
//! CFL file I/O through the `_recon_iter` extension module.
//!
//! Key behaviors
//! -------------
//! - [`linops`]: linear operators on complex N-dimensional arrays and the
//!   adapters that run them on real interleaved vectors.
//! - [`prox`]: the proximal-operator contract plus soft thresholding and
//!   projections.
//! - [`iter`]: algorithm configurations, the iteration kernels (conjugate
//!   gradient, IST, FISTA, ADMM, POCS) and the uniform `iter2_*` entry
//!   points.
//! - [`io`]: reading and writing CFL array files.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work happens in the inner modules; this file performs
//!   only FFI glue, input conversion and error mapping.
//! - Python inputs are copied into owned standard-layout arrays before any
//!   operator sees them.
//!
//! Conventions
//! -----------
//! - Rust-side errors convert to `ValueError` (configuration, operator
//!   shapes) or `IOError` (CFL files) at the boundary.
//! - Degenerate data is not an error: the returned status reads
//!   `skipped_empty` or `skipped_corrupted` and the image is all zeros.

pub mod io;
pub mod iter;
pub mod linops;
pub mod prox;
pub mod utils;

#[cfg(feature = "python-bindings")]
use std::path::PathBuf;

#[cfg(feature = "python-bindings")]
use ndarray::IxDyn;

#[cfg(feature = "python-bindings")]
use num_complex::Complex64;

#[cfg(feature = "python-bindings")]
use numpy::PyArrayDyn;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    iter::{AlgoTag, Iter2Args, iter2},
    linops::{IdentityOp, LinearOperator, NormalEq, SamplingOp, as_complex, as_real},
    prox::{ProjData, ProxOperator, SoftThresh},
    utils::{
        array_from_row_major, build_conf, complex_array_to_py, extract_complex_array,
        status_label,
    },
};

/// Reconstruct an image from sampled data `image_adj = P ⊙ y`.
///
/// Parameters
/// ----------
/// - `algorithm`: one of `conjgrad` (alias `cg`), `ist`, `fista`, `admm`,
///   `pocs`.
/// - `pattern`: sampling pattern, broadcastable to `image_adj`.
/// - `image_adj`: adjoint-applied measurement.
/// - `lambda_`: Tikhonov weight for `conjgrad`, soft-threshold weight for
///   the other data-driven algorithms. Unused by `pocs`.
/// - `maxiter`, `tol`, `step`: forwarded to the configuration where the
///   algorithm has such a field.
///
/// Returns
/// -------
/// `(image, status, iterations)` with `image` shaped like `image_adj`.
///
/// Errors
/// ------
/// - `ValueError` for an unknown algorithm, an invalid configuration value
///   or a pattern that does not broadcast.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    text_signature = "(algorithm, pattern, image_adj, /, lambda_=0.0, maxiter=50, tol=0.0, \
                      step=0.95)",
    signature = (algorithm, pattern, image_adj, lambda_ = 0.0, maxiter = 50, tol = 0.0, step = 0.95)
)]
#[allow(clippy::too_many_arguments)]
fn reconstruct_sampling<'py>(
    py: Python<'py>, algorithm: &str, pattern: &Bound<'py, PyAny>, image_adj: &Bound<'py, PyAny>,
    lambda_: f64, maxiter: usize, tol: f64, step: f64,
) -> PyResult<(Bound<'py, PyArrayDyn<Complex64>>, &'static str, usize)> {
    let tag: AlgoTag = algorithm.parse()?;
    let conf = build_conf(tag, maxiter, lambda_, tol, step)?;

    let pattern = extract_complex_array(pattern, "pattern")?;
    let adj = extract_complex_array(image_adj, "image_adj")?;
    let dims = adj.shape().to_vec();
    let pat_dims = pattern.shape().to_vec();

    let mask: Vec<bool> = pattern
        .broadcast(IxDyn(&dims))
        .ok_or_else(|| {
            PyValueError::new_err(format!("pattern {pat_dims:?} does not broadcast to {dims:?}"))
        })?
        .iter()
        .map(|p| p.norm() != 0.0)
        .collect();
    let op = SamplingOp::new(&dims, &pat_dims, pattern)?;
    if op.domain() != dims.as_slice() {
        return Err(PyValueError::new_err(format!(
            "image_adj {dims:?} must have a singleton maps axis, sampling acts on {:?}",
            op.domain()
        )));
    }

    let adj_vec: Vec<Complex64> = adj.iter().copied().collect();
    let adj_real = as_real(&adj_vec);
    let mut image = vec![0.0; adj_real.len()];

    let normal = NormalEq::new(op);
    let thresh = SoftThresh::new(lambda_);
    let identity = IdentityOp::new(&dims);
    let data_proj = ProjData::new(mask, adj_vec.clone());
    let prox: [&dyn ProxOperator; 1] = [&thresh];
    let ops: [&dyn LinearOperator; 1] = [&identity];
    let projections: [&dyn ProxOperator; 1] = [&data_proj];

    let data_args = Iter2Args::new().with_normaleq_op(&normal).with_image_adj(adj_real);
    let args = match tag {
        AlgoTag::ConjGrad => data_args,
        AlgoTag::Ist | AlgoTag::Fista => data_args.with_prox_ops(&prox),
        AlgoTag::Admm => data_args.with_prox_ops(&prox).with_ops(&ops),
        AlgoTag::Pocs => Iter2Args::new().with_prox_ops(&projections),
        AlgoTag::Call => {
            return Err(PyValueError::new_err("algorithm 'call' is not available from Python"));
        }
    };

    let report = iter2(&conf, &args, &mut image, None)?;

    let out = array_from_row_major(&dims, as_complex(&image).to_vec())
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok((complex_array_to_py(py, &out)?, status_label(report.status), report.iterations))
}

/// Read `<basename>.hdr` / `<basename>.cfl` into a complex128 array.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "read_cfl", text_signature = "(basename, /)")]
fn py_read_cfl<'py>(
    py: Python<'py>, basename: PathBuf,
) -> PyResult<Bound<'py, PyArrayDyn<Complex64>>> {
    complex_array_to_py(py, &io::read_cfl(basename)?)
}

/// Write a complex (or real) array to `<basename>.hdr` / `<basename>.cfl`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "write_cfl", text_signature = "(basename, array, /)")]
fn py_write_cfl<'py>(basename: PathBuf, array: &Bound<'py, PyAny>) -> PyResult<()> {
    let array = extract_complex_array(array, "array")?;
    io::write_cfl(basename, &array)?;
    Ok(())
}

/// `_recon_iter`: PyO3 module initializer.
///
/// Registers the reconstruction entry point and the CFL helpers at the top
/// level of the extension module.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _recon_iter<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(reconstruct_sampling, m)?)?;
    m.add_function(wrap_pyfunction!(py_read_cfl, m)?)?;
    m.add_function(wrap_pyfunction!(py_write_cfl, m)?)?;
    Ok(())
}
