//! Errors for CFL array file I/O.
use std::path::{Path, PathBuf};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyIOError, prelude::*};

/// Result alias for CFL I/O.
pub type CflResult<T> = Result<T, CflError>;

#[derive(Debug, Clone, PartialEq)]
pub enum CflError {
    /// Underlying filesystem failure.
    Io { path: PathBuf, text: String },

    /// The `.hdr` file has no parsable dimension line.
    InvalidHeader { path: PathBuf, reason: String },

    /// The `.cfl` file holds fewer bytes than the header promises.
    Truncated { path: PathBuf, expected: usize, found: usize },

    /// Data could not be arranged into the header's shape.
    Shape { dims: Vec<usize>, text: String },
}

impl CflError {
    pub(crate) fn io(path: &Path, err: std::io::Error) -> Self {
        CflError::Io { path: path.to_path_buf(), text: err.to_string() }
    }
}

impl std::error::Error for CflError {}

impl std::fmt::Display for CflError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CflError::Io { path, text } => write!(f, "I/O error on {}: {text}", path.display()),
            CflError::InvalidHeader { path, reason } => {
                write!(f, "Invalid header {}: {reason}", path.display())
            }
            CflError::Truncated { path, expected, found } => write!(
                f,
                "Truncated data file {}: expected {expected} bytes, found {found}",
                path.display()
            ),
            CflError::Shape { dims, text } => write!(f, "Cannot shape data as {dims:?}: {text}"),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl std::convert::From<CflError> for PyErr {
    fn from(err: CflError) -> PyErr {
        PyIOError::new_err(err.to_string())
    }
}
