//! CFL array files: a text header `<name>.hdr` and raw data `<name>.cfl`.
//!
//! Format
//! ------
//! - Header: a comment line (`# Dimensions`), then the dimensions separated
//!   by whitespace.
//! - Data: `prod(dims)` complex values as little-endian `f32` pairs
//!   `(re, im)`, first dimension fastest (column-major).
//!
//! Trailing singleton dimensions are dropped on read, so a file written with
//! shape `[4, 3, 1, 1]` reads back as `[4, 3]`. Values are widened to
//! `Complex64` on read and narrowed to `f32` on write.
use std::{
    ffi::OsString,
    fs::File,
    io::{BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use log::debug;
use ndarray::{ArrayD, IxDyn, ShapeBuilder};
use num_complex::Complex64;

use crate::io::errors::{CflError, CflResult};

const ELEM_BYTES: usize = 8;

/// `basename` + `ext`, appended rather than replacing any extension.
fn with_suffix(basename: &Path, ext: &str) -> PathBuf {
    let mut s: OsString = basename.as_os_str().to_os_string();
    s.push(ext);
    PathBuf::from(s)
}

fn parse_header(path: &Path, text: &str) -> CflResult<Vec<usize>> {
    let line = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with('#'))
        .ok_or_else(|| CflError::InvalidHeader {
            path: path.to_path_buf(),
            reason: "no dimension line".to_string(),
        })?;

    let mut dims = line
        .split_whitespace()
        .map(|tok| {
            tok.parse::<usize>().map_err(|e| CflError::InvalidHeader {
                path: path.to_path_buf(),
                reason: format!("bad dimension '{tok}': {e}"),
            })
        })
        .collect::<CflResult<Vec<usize>>>()?;

    while dims.len() > 1 && dims.last() == Some(&1) {
        dims.pop();
    }
    Ok(dims)
}

/// Read the array stored under `basename` (`.hdr` and `.cfl`).
///
/// # Errors
/// - [`CflError::Io`] if either file cannot be read.
/// - [`CflError::InvalidHeader`] for a missing or malformed dimension line.
/// - [`CflError::Truncated`] if the data file is too short.
pub fn read_cfl(basename: impl AsRef<Path>) -> CflResult<ArrayD<Complex64>> {
    let hdr_path = with_suffix(basename.as_ref(), ".hdr");
    let cfl_path = with_suffix(basename.as_ref(), ".cfl");

    let header = std::fs::read_to_string(&hdr_path).map_err(|e| CflError::io(&hdr_path, e))?;
    let dims = parse_header(&hdr_path, &header)?;
    let count: usize = dims.iter().product();

    let mut bytes = Vec::with_capacity(count * ELEM_BYTES);
    File::open(&cfl_path)
        .and_then(|mut f| f.read_to_end(&mut bytes))
        .map_err(|e| CflError::io(&cfl_path, e))?;
    if bytes.len() < count * ELEM_BYTES {
        return Err(CflError::Truncated {
            path: cfl_path,
            expected: count * ELEM_BYTES,
            found: bytes.len(),
        });
    }

    let data: Vec<Complex64> = bytes[..count * ELEM_BYTES]
        .chunks_exact(ELEM_BYTES)
        .map(|c| {
            let re = f32::from_le_bytes([c[0], c[1], c[2], c[3]]);
            let im = f32::from_le_bytes([c[4], c[5], c[6], c[7]]);
            Complex64::new(f64::from(re), f64::from(im))
        })
        .collect();

    debug!("read {} with dims {dims:?}", cfl_path.display());
    ArrayD::from_shape_vec(IxDyn(&dims).f(), data)
        .map_err(|e| CflError::Shape { dims, text: e.to_string() })
}

/// Write `array` under `basename` (`.hdr` and `.cfl`), replacing any
/// existing files.
///
/// # Errors
/// [`CflError::Io`] if either file cannot be written.
pub fn write_cfl(basename: impl AsRef<Path>, array: &ArrayD<Complex64>) -> CflResult<()> {
    let hdr_path = with_suffix(basename.as_ref(), ".hdr");
    let cfl_path = with_suffix(basename.as_ref(), ".cfl");

    let dims: Vec<String> = if array.ndim() == 0 {
        vec!["1".to_string()]
    } else {
        array.shape().iter().map(usize::to_string).collect()
    };
    std::fs::write(&hdr_path, format!("# Dimensions\n{}\n", dims.join(" ")))
        .map_err(|e| CflError::io(&hdr_path, e))?;

    let file = File::create(&cfl_path).map_err(|e| CflError::io(&cfl_path, e))?;
    let mut out = BufWriter::new(file);
    // Reversed axes iterate the original array first-axis fastest.
    for z in array.t().iter() {
        out.write_all(&(z.re as f32).to_le_bytes())
            .and_then(|()| out.write_all(&(z.im as f32).to_le_bytes()))
            .map_err(|e| CflError::io(&cfl_path, e))?;
    }
    out.flush().map_err(|e| CflError::io(&cfl_path, e))?;

    debug!("wrote {} with dims {:?}", cfl_path.display(), array.shape());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, IxDyn};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Write/read agreement including the dropped trailing singletons.
    // - Column-major layout of the data file.
    // - Header and truncation errors.
    //
    // Files are written under the system temp directory with per-test names.
    // -------------------------------------------------------------------------

    fn temp_base(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("recon_iter_cfl_{}_{name}", std::process::id()))
    }

    #[test]
    // Purpose
    // -------
    // A written array reads back with the same values; trailing singleton
    // dimensions disappear.
    //
    // Given
    // -----
    // - A [2, 3, 1] array with distinct complex values exactly representable
    //   in f32.
    //
    // Expect
    // ------
    // - Read shape [2, 3]; every element equal.
    fn write_then_read_keeps_values_and_drops_singletons() {
        // Arrange
        let base = temp_base("roundtrip");
        let a = Array::from_shape_fn(IxDyn(&[2, 3, 1]), |idx| {
            Complex64::new(idx[0] as f64 + 10.0 * idx[1] as f64, -(idx[1] as f64) * 0.5)
        });

        // Act
        write_cfl(&base, &a).expect("write should succeed");
        let b = read_cfl(&base).expect("read should succeed");

        // Assert
        assert_eq!(b.shape(), &[2, 3]);
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(b[[i, j].as_slice()], a[[i, j, 0].as_slice()]);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // The first dimension runs fastest in the data file.
    fn data_file_is_column_major() {
        let base = temp_base("layout");
        let a = Array::from_shape_vec(
            IxDyn(&[2, 2]),
            vec![
                Complex64::new(0.0, 0.0), // (0, 0)
                Complex64::new(1.0, 0.0), // (0, 1)
                Complex64::new(2.0, 0.0), // (1, 0)
                Complex64::new(3.0, 0.0), // (1, 1)
            ],
        )
        .expect("valid shape");

        write_cfl(&base, &a).expect("write should succeed");
        let bytes = std::fs::read(with_suffix(&base, ".cfl")).expect("data file exists");
        let re: Vec<f32> = bytes
            .chunks_exact(8)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        assert_eq!(re, vec![0.0, 2.0, 1.0, 3.0]);
        let header = std::fs::read_to_string(with_suffix(&base, ".hdr")).expect("header exists");
        assert_eq!(header, "# Dimensions\n2 2\n");
    }

    #[test]
    // Purpose
    // -------
    // Malformed headers and short data files are reported, not panicked on.
    fn malformed_files_are_errors() {
        let base = temp_base("broken");
        std::fs::write(with_suffix(&base, ".hdr"), "# Dimensions\n2 x\n").expect("write header");
        assert!(matches!(read_cfl(&base), Err(CflError::InvalidHeader { .. })));

        std::fs::write(with_suffix(&base, ".hdr"), "# Dimensions\n4\n").expect("write header");
        std::fs::write(with_suffix(&base, ".cfl"), [0u8; 16]).expect("write data");
        match read_cfl(&base) {
            Err(CflError::Truncated { expected, found, .. }) => {
                assert_eq!(expected, 32);
                assert_eq!(found, 16);
            }
            other => panic!("expected Truncated, got {other:?}"),
        }

        assert!(matches!(read_cfl(temp_base("missing")), Err(CflError::Io { .. })));
    }

    #[test]
    // Purpose
    // -------
    // The suffix is appended, so dotted base names keep their dots.
    fn suffix_is_appended_not_replaced() {
        assert_eq!(with_suffix(Path::new("scan.v2"), ".cfl"), PathBuf::from("scan.v2.cfl"));
    }
}
