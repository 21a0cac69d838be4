//! Calibrated intensity images and multi-slice, multi-channel stacks

use crate::io::error::{Result, invalid_source};
use ndarray::{Array2, Array4, ArrayView2, Axis, Slice};
use serde::Serialize;

/// Physical size of one pixel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calibration {
    /// Width of a pixel in `unit`
    pub pixel_width: f64,
    /// Height of a pixel in `unit`
    pub pixel_height: f64,
    /// Name of the physical unit
    pub unit: String,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            pixel_width: 1.0,
            pixel_height: 1.0,
            unit: "pixel".to_string(),
        }
    }
}

impl Calibration {
    /// Convert a pixel-space point to physical units
    pub fn to_physical(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.pixel_width, y * self.pixel_height)
    }
}

/// Immutable 2D intensity grid with a title and calibration
///
/// Pixels are stored as (row, col), so `height` is the first dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityImage {
    title: String,
    pixels: Array2<f64>,
    calibration: Calibration,
}

impl IntensityImage {
    /// Wrap a pixel grid
    pub fn new(title: impl Into<String>, pixels: Array2<f64>, calibration: Calibration) -> Self {
        Self {
            title: title.into(),
            pixels,
            calibration,
        }
    }

    /// Image title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Pixel grid, indexed (row, col)
    pub const fn pixels(&self) -> &Array2<f64> {
        &self.pixels
    }

    /// Physical calibration
    pub const fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    /// Whether width equals height
    pub fn is_square(&self) -> bool {
        self.width() == self.height()
    }

    /// Mean intensity, 0 for an empty image
    pub fn mean(&self) -> f64 {
        self.pixels.mean().unwrap_or(0.0)
    }

    /// Copy of the rectangle `[x, x + width) x [y, y + height)` clipped to the image
    ///
    /// Returns `None` when the clipped rectangle is empty.
    pub fn crop(&self, x: usize, y: usize, width: usize, height: usize) -> Option<Array2<f64>> {
        crop_clipped(&self.pixels, x, y, width, height)
    }
}

/// Clip a rectangle to `grid` and copy the covered pixels
pub fn crop_clipped(
    grid: &Array2<f64>,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> Option<Array2<f64>> {
    let (rows, cols) = grid.dim();
    let x0 = x.min(cols);
    let y0 = y.min(rows);
    let x1 = x.saturating_add(width).min(cols);
    let y1 = y.saturating_add(height).min(rows);

    (x1 > x0 && y1 > y0).then(|| {
        grid.slice_axis(Axis(0), Slice::from(y0..y1))
            .slice_axis(Axis(1), Slice::from(x0..x1))
            .to_owned()
    })
}

/// Z stack of multi-channel planes
///
/// Planes are indexed (slice, channel, row, col).
#[derive(Debug, Clone)]
pub struct ImageStack {
    title: String,
    planes: Array4<f64>,
    calibration: Calibration,
}

impl ImageStack {
    /// Build a stack from a 4D plane array
    ///
    /// # Errors
    ///
    /// Returns an error if any dimension of `planes` is zero
    pub fn new(
        title: impl Into<String>,
        planes: Array4<f64>,
        calibration: Calibration,
    ) -> Result<Self> {
        let (slices, channels, rows, cols) = planes.dim();
        if slices == 0 || channels == 0 || rows == 0 || cols == 0 {
            return Err(invalid_source(&format!(
                "stack must have at least one slice, channel and pixel (got {slices}x{channels}x{rows}x{cols})"
            )));
        }
        Ok(Self {
            title: title.into(),
            planes,
            calibration,
        })
    }

    /// Single-slice, single-channel stack holding `image`
    ///
    /// # Errors
    ///
    /// Returns an error if the image has no pixels
    pub fn from_image(image: IntensityImage) -> Result<Self> {
        let IntensityImage {
            title,
            pixels,
            calibration,
        } = image;
        // Any memory layout is accepted, transposed views included
        let planes = pixels.insert_axis(Axis(0)).insert_axis(Axis(0));
        Self::new(title, planes, calibration)
    }

    /// Stack title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Physical calibration shared by every plane
    pub const fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Number of Z slices
    pub fn slices(&self) -> usize {
        self.planes.len_of(Axis(0))
    }

    /// Number of channels per slice
    pub fn channels(&self) -> usize {
        self.planes.len_of(Axis(1))
    }

    /// Plane width in pixels
    pub fn width(&self) -> usize {
        self.planes.len_of(Axis(3))
    }

    /// Plane height in pixels
    pub fn height(&self) -> usize {
        self.planes.len_of(Axis(2))
    }

    /// View of one plane, `None` when either index is out of range
    pub fn plane(&self, slice: usize, channel: usize) -> Option<ArrayView2<'_, f64>> {
        (slice < self.slices() && channel < self.channels())
            .then(|| {
                self.planes
                    .index_axis(Axis(0), slice)
                    .index_axis_move(Axis(0), channel)
            })
    }
}
