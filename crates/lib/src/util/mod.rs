//! Shared utilities.
//!
//! Filesystem primitives used by the script and packaging stages, plus test helpers.

pub mod fs;
