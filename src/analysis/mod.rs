//! Stress fibre analysis: preprocessing, directional estimation, scoring and aggregation

/// Difference-of-Gaussians band-pass filter
pub mod bandpass;
/// Kirsch compass directional gradient estimator
pub mod directions;
/// Annotation primitives for display overlays
pub mod overlay;
/// Tile records, results table and run context
pub mod results;
/// Per-tile anisotropy score and principal direction
pub mod scoring;
/// Representative slice selection
pub mod slices;
/// Tiled analysis of one image and the per-image pipeline
pub mod tiled;

pub use results::{ResultsTable, RunContext, TileRecord};
pub use tiled::{AnalysisSettings, ImageReport, TiledAnalysis, analyse_stack};
