//! Spatial data structures: calibrated images, stacks and tile layouts

/// Calibrated intensity images and multi-slice stacks
pub mod image;
/// Overlapping square tile layout
pub mod tiles;

pub use image::{Calibration, ImageStack, IntensityImage};
pub use tiles::{Tile, TileGrid};
