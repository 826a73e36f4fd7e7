//! io: reading and writing complex arrays in the CFL file format.

pub mod cfl;
pub mod errors;

pub use self::cfl::{read_cfl, write_cfl};
pub use self::errors::{CflError, CflResult};
