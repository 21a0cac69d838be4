//! Gaussian kernels and border-replicating convolution on `f64` grids
//!
//! Out-of-range neighbours are clamped to the nearest edge pixel, so every
//! output pixel of a constant grid is computed from identical inputs in the
//! same order and the result stays exactly constant.

use crate::io::configuration::GAUSSIAN_TRUNCATION;
use ndarray::Array2;

/// A 3x3 weight matrix, row 0 applied to the row above the centre pixel
pub type Kernel3 = [[f64; 3]; 3];

/// Normalised 1D Gaussian kernel of odd length `2 * radius + 1`
///
/// The radius is `ceil(GAUSSIAN_TRUNCATION * sigma)` and at least 1.
/// Callers validate `sigma > 0`.
pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = ((GAUSSIAN_TRUNCATION * sigma).ceil() as usize).max(1);
    let two_sigma_sq = 2.0 * sigma * sigma;

    let mut kernel: Vec<f64> = (0..=2 * radius)
        .map(|i| {
            let x = i as f64 - radius as f64;
            (-(x * x) / two_sigma_sq).exp()
        })
        .collect();

    let total: f64 = kernel.iter().sum();
    for weight in &mut kernel {
        *weight /= total;
    }
    kernel
}

#[inline]
fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

/// Convolve every row, then every column, with the same symmetric kernel
pub fn convolve_separable(src: &Array2<f64>, kernel: &[f64]) -> Array2<f64> {
    let (rows, cols) = src.dim();
    if rows == 0 || cols == 0 {
        return src.clone();
    }
    let half = (kernel.len() / 2) as isize;

    let horizontal = Array2::from_shape_fn((rows, cols), |(r, c)| {
        kernel.iter().enumerate().fold(0.0, |acc, (k, &w)| {
            let sc = clamp_index(c as isize + k as isize - half, cols);
            acc + w * src.get((r, sc)).copied().unwrap_or(0.0)
        })
    });

    Array2::from_shape_fn((rows, cols), |(r, c)| {
        kernel.iter().enumerate().fold(0.0, |acc, (k, &w)| {
            let sr = clamp_index(r as isize + k as isize - half, rows);
            acc + w * horizontal.get((sr, c)).copied().unwrap_or(0.0)
        })
    })
}

/// Gaussian blur with standard deviation `sigma`
pub fn gaussian_blur(src: &Array2<f64>, sigma: f64) -> Array2<f64> {
    convolve_separable(src, &gaussian_kernel(sigma))
}

/// Apply a 3x3 kernel as written (correlation) with replicated borders
///
/// Neighbours are taken relative to the centre pixel and the centre term is
/// added back through the kernel sum, so zero-sum kernels give exactly zero
/// on flat input.
pub fn correlate_3x3(src: &Array2<f64>, kernel: &Kernel3) -> Array2<f64> {
    let (rows, cols) = src.dim();
    if rows == 0 || cols == 0 {
        return src.clone();
    }
    let kernel_sum: f64 = kernel.iter().flatten().sum();

    Array2::from_shape_fn((rows, cols), |(r, c)| {
        let centre = src.get((r, c)).copied().unwrap_or(0.0);
        let mut acc = 0.0;
        for (dr, kernel_row) in kernel.iter().enumerate() {
            let sr = clamp_index(r as isize + dr as isize - 1, rows);
            for (dc, &weight) in kernel_row.iter().enumerate() {
                let sc = clamp_index(c as isize + dc as isize - 1, cols);
                let value = src.get((sr, sc)).copied().unwrap_or(centre);
                acc += weight * (value - centre);
            }
        }
        acc + kernel_sum * centre
    })
}
