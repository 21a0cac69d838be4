//! Difference-of-Gaussians band-pass preprocessing
//!
//! Subtracting a wide blur from a narrow one removes both flat background
//! and pixel noise, leaving structures near the fibre width.

use crate::io::configuration::{DEFAULT_SIGMA, SIGMA_RATIO};
use crate::io::error::{Result, invalid_parameter};
use crate::math::convolution::gaussian_blur;
use ndarray::Array2;

/// Band-pass filter built from two Gaussian blurs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandPassFilter {
    sigma: f64,
    ratio: f64,
}

impl Default for BandPassFilter {
    fn default() -> Self {
        Self {
            sigma: DEFAULT_SIGMA,
            ratio: SIGMA_RATIO,
        }
    }
}

impl BandPassFilter {
    /// Filter with narrow standard deviation `sigma` pixels
    ///
    /// # Errors
    ///
    /// Returns an error if `sigma` is not finite or not strictly positive
    pub fn new(sigma: f64) -> Result<Self> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(invalid_parameter(
                "sigma",
                &sigma,
                &"must be finite and greater than zero",
            ));
        }
        Ok(Self {
            sigma,
            ratio: SIGMA_RATIO,
        })
    }

    /// Narrow standard deviation in pixels
    pub const fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Wide standard deviation in pixels
    pub fn wide_sigma(&self) -> f64 {
        self.sigma * self.ratio
    }

    /// `blur(grid, σ) - blur(grid, ratio·σ)`, negative values kept
    pub fn apply(&self, grid: &Array2<f64>) -> Array2<f64> {
        let narrow = gaussian_blur(grid, self.sigma);
        let wide = gaussian_blur(grid, self.wide_sigma());
        narrow - wide
    }
}
