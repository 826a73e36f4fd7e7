//! Dimension helpers shared by operators and the dispatch layer.
//!
//! Dimension vectors are plain `&[usize]` slices in row-major (C) axis order.
//! An empty vector describes a scalar (element count 1).
use crate::linops::errors::{LinopError, LinopResult};

/// Axis that holds sensitivity maps in multi-coil data.
///
/// Sampling happens in k-space, which has no maps axis; operators built on
/// full dimension vectors collapse it to 1 (see [`select_kspace_dims`]).
pub const MAPS_DIM: usize = 4;

/// Number of elements described by `dims`.
pub fn calc_size(dims: &[usize]) -> usize {
    dims.iter().product()
}

/// Copy of `dims` with the maps axis collapsed to 1 (if the rank reaches it).
pub fn select_kspace_dims(dims: &[usize]) -> Vec<usize> {
    let mut out = dims.to_vec();
    if out.len() > MAPS_DIM {
        out[MAPS_DIM] = 1;
    }
    out
}

/// Check that a pattern with `pat_dims` broadcasts against data with `dims`.
///
/// Every pattern axis must be either 1 (broadcast) or equal to the data
/// axis, and both vectors must have the same rank.
///
/// # Errors
/// - [`LinopError::RankMismatch`] when the ranks differ.
/// - [`LinopError::EmptyDimension`] when any data axis is zero.
/// - [`LinopError::NotBroadcastable`] for the first offending axis.
pub fn check_broadcast(dims: &[usize], pat_dims: &[usize]) -> LinopResult<()> {
    if dims.len() != pat_dims.len() {
        return Err(LinopError::RankMismatch { expected: dims.len(), found: pat_dims.len() });
    }
    for (axis, (&dim, &pat_dim)) in dims.iter().zip(pat_dims.iter()).enumerate() {
        if dim == 0 {
            return Err(LinopError::EmptyDimension { axis });
        }
        if pat_dim != 1 && pat_dim != dim {
            return Err(LinopError::NotBroadcastable { axis, dim, pat_dim });
        }
    }
    Ok(())
}
