use ndarray::{ArrayD, IxDyn, ShapeError};
use num_complex::Complex64;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::{PyArray1, PyArrayDyn, PyArrayMethods, PyReadonlyArrayDyn, PyUntypedArrayMethods};

#[cfg(feature = "python-bindings")]
use crate::iter::{
    AdmmConf, AlgoTag, ConjGradConf, FistaConf, IstConf, IterConf, PocsConf,
    types::{Degeneracy, IterStatus},
};

/// Owned array of `shape` from elements listed in row-major order.
///
/// # Errors
/// `ShapeError` when `data.len()` is not the product of `shape`.
pub fn array_from_row_major(
    shape: &[usize], data: Vec<Complex64>,
) -> Result<ArrayD<Complex64>, ShapeError> {
    ArrayD::from_shape_vec(IxDyn(shape), data)
}

/// Shape and row-major elements of `array`, whatever its memory layout.
pub fn row_major_parts(array: &ArrayD<Complex64>) -> (Vec<usize>, Vec<Complex64>) {
    (array.shape().to_vec(), array.iter().copied().collect())
}

/// Copy a numpy array (complex128, or float64 promoted to complex) into an
/// owned standard-layout array.
///
/// Only the shape and a flat element list cross the boundary, so the
/// crate's `ndarray` need not match the one `numpy` is built against.
#[cfg(feature = "python-bindings")]
pub fn extract_complex_array<'py>(
    raw_data: &Bound<'py, PyAny>, name: &str,
) -> PyResult<ArrayD<Complex64>> {
    let (shape, data): (Vec<usize>, Vec<Complex64>) =
        if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArrayDyn<Complex64>>() {
            (arr_ro.shape().to_vec(), arr_ro.as_array().iter().copied().collect())
        } else if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArrayDyn<f64>>() {
            let data = arr_ro.as_array().iter().map(|&v| Complex64::new(v, 0.0)).collect();
            (arr_ro.shape().to_vec(), data)
        } else {
            return Err(pyo3::exceptions::PyTypeError::new_err(format!(
                "{name} must be a numpy.ndarray of complex128 or float64"
            )));
        };
    array_from_row_major(&shape, data).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Hand `array` to Python as a C-ordered complex128 numpy array.
#[cfg(feature = "python-bindings")]
pub fn complex_array_to_py<'py>(
    py: Python<'py>, array: &ArrayD<Complex64>,
) -> PyResult<Bound<'py, PyArrayDyn<Complex64>>> {
    let (shape, data) = row_major_parts(array);
    PyArray1::from_vec(py, data).reshape(shape)
}

/// Configuration for `tag` built from the keyword arguments of the Python
/// entry point. Direct calls have no Python form.
#[cfg(feature = "python-bindings")]
pub fn build_conf(
    tag: AlgoTag, maxiter: usize, lambda: f64, tol: f64, step: f64,
) -> PyResult<IterConf> {
    let conf = match tag {
        AlgoTag::ConjGrad => IterConf::ConjGrad(ConjGradConf::new(maxiter, lambda, tol)?),
        AlgoTag::Ist => IterConf::Ist(IstConf::new(maxiter, step, 1.0, false, tol)?),
        AlgoTag::Fista => IterConf::Fista(FistaConf::new(maxiter, step, 1.0, false, tol)?),
        AlgoTag::Admm => {
            let conf = AdmmConf { maxiter, ..AdmmConf::default() };
            conf.validate()?;
            IterConf::Admm(conf)
        }
        AlgoTag::Pocs => IterConf::Pocs(PocsConf::new(maxiter)?),
        AlgoTag::Call => {
            return Err(PyValueError::new_err("algorithm 'call' is not available from Python"));
        }
    };
    Ok(conf)
}

/// Short label for a run status as returned to Python.
#[cfg(feature = "python-bindings")]
pub fn status_label(status: IterStatus) -> &'static str {
    match status {
        IterStatus::Converged => "converged",
        IterStatus::MaxIterReached => "max_iter_reached",
        IterStatus::Skipped(Degeneracy::Empty) => "skipped_empty",
        IterStatus::Skipped(Degeneracy::Corrupted) => "skipped_corrupted",
    }
}
