//! Numerical building blocks shared by the analysis stages

/// Axial angle folding and comparison
pub mod angle;
/// Gaussian kernels and border-replicating convolution
pub mod convolution;
