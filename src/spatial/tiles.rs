//! Overlapping square tile layout over a square image
//!
//! Tiles are anchored on a regular grid starting at `overlap` with stride
//! `step`, scanned in raster order (rows outer, columns inner). Each tile
//! extends `overlap` pixels beyond its anchor cell on every side so that
//! neighbouring tiles share a border band.

use crate::io::configuration::OVERLAP_DIVISOR;
use crate::io::error::{AnalysisError, Result, invalid_parameter};

/// One square analysis tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Position in generation order within its grid
    pub index: usize,
    /// Column of the anchor cell's top-left pixel
    pub x: usize,
    /// Row of the anchor cell's top-left pixel
    pub y: usize,
    /// Left edge of the tile bounds
    pub left: usize,
    /// Top edge of the tile bounds
    pub top: usize,
    /// Side length of the tile bounds, `step + 2 * overlap`
    pub size: usize,
    /// Centre column
    pub centre_x: usize,
    /// Centre row
    pub centre_y: usize,
}

/// Deterministic tile layout for one image
#[derive(Debug, Clone)]
pub struct TileGrid {
    width: usize,
    height: usize,
    step: usize,
    overlap: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Lay out tiles over a `width` x `height` image split into `rows` rows and columns
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The image is not square (`NonSquareImage`, titled by the caller)
    /// - `rows` is zero or larger than the image height
    pub fn new(width: usize, height: usize, rows: usize) -> Result<Self> {
        if width != height {
            return Err(AnalysisError::NonSquareImage {
                title: String::new(),
                width,
                height,
            });
        }
        if rows == 0 {
            return Err(invalid_parameter("rows", &rows, &"must be at least 1"));
        }
        if height < rows {
            return Err(invalid_parameter(
                "rows",
                &rows,
                &format!("exceeds image height {height}"),
            ));
        }

        let step = height / rows;
        let overlap = step / OVERLAP_DIVISOR;
        let half_step = step / 2;
        let limit = height.saturating_sub(1);

        let mut tiles = Vec::with_capacity(rows * rows);
        for y in (overlap..limit).step_by(step) {
            for x in (overlap..width.saturating_sub(1)).step_by(step) {
                let centre_x = x + half_step;
                let centre_y = y + half_step;
                // Tiles whose centre falls outside the image are dropped, not clipped
                if centre_x > width - 1 || centre_y > height - 1 {
                    continue;
                }
                tiles.push(Tile {
                    index: tiles.len(),
                    x,
                    y,
                    left: x - overlap,
                    top: y - overlap,
                    size: step + 2 * overlap,
                    centre_x,
                    centre_y,
                });
            }
        }

        Ok(Self {
            width,
            height,
            step,
            overlap,
            tiles,
        })
    }

    /// Distance between neighbouring tile anchors
    pub const fn step(&self) -> usize {
        self.step
    }

    /// Border band shared with neighbouring tiles
    pub const fn overlap(&self) -> usize {
        self.overlap
    }

    /// Image width the grid was laid out for
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Image height the grid was laid out for
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Tiles in raster order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Number of tiles
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether no tile survived the layout
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
