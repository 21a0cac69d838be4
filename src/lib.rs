//! Tiled stress fibre scoring for fluorescence microscopy images
//!
//! Each image is band-pass filtered, divided into overlapping square tiles,
//! and every tile is probed with the eight Kirsch compass kernels. The spread
//! of the directional responses gives an anisotropy score and the strongest
//! kernel a principal fibre orientation.

#![forbid(unsafe_code)]

/// Band-pass filtering, directional estimation, tile scoring and result aggregation
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Convolution kernels and angle arithmetic
pub mod math;
/// Calibrated images, stacks and tile layouts
pub mod spatial;

pub use io::error::{AnalysisError, Result};
