//! Tiled stress fibre analysis of one image and the per-image pipeline
//!
//! The raw slice is band-pass filtered once, then every tile of the grid is
//! cropped from the filtered copy, scored, and appended to the run's results
//! table together with its overlay annotations.

use crate::analysis::bandpass::BandPassFilter;
use crate::analysis::directions::estimate_directions;
use crate::analysis::overlay::{Annotation, ArrowStyle, Colour, Overlay, Point};
use crate::analysis::results::{RunContext, TileRecord};
use crate::analysis::scoring::{TileScore, score_tile};
use crate::analysis::slices::select_brightest_slice;
use crate::io::configuration::{
    ARROW_HALF_LENGTH, ARROW_HEAD_SIZE, ARROW_STROKE_WIDTH, DEFAULT_REFERENCE_CHANNEL,
    DEFAULT_SIGMA, DEFAULT_TILE_ROWS, LABEL_COLOUR, LABEL_OFFSET_X, LABEL_OFFSET_Y,
    TILE_REGION_COLOUR,
};
use crate::io::error::{AnalysisError, Result};
use crate::spatial::image::{ImageStack, IntensityImage, crop_clipped};
use crate::spatial::tiles::{Tile, TileGrid};
use ndarray::Array2;

/// Tunable parameters of the per-image pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisSettings {
    /// Narrow band-pass standard deviation in pixels
    pub sigma: f64,
    /// Tile rows (and columns) across the image
    pub tile_rows: usize,
    /// Channel whose brightest slice is analysed
    pub reference_channel: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            sigma: DEFAULT_SIGMA,
            tile_rows: DEFAULT_TILE_ROWS,
            reference_channel: DEFAULT_REFERENCE_CHANNEL,
        }
    }
}

/// A square image prepared for tile-by-tile scoring
pub struct TiledAnalysis<'a> {
    raw: &'a IntensityImage,
    filtered: Array2<f64>,
    grid: TileGrid,
}

impl<'a> TiledAnalysis<'a> {
    /// Filter `raw` and lay out its tiles
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The image is not square
    /// - `tile_rows` is zero or exceeds the image height
    pub fn new(raw: &'a IntensityImage, filter: &BandPassFilter, tile_rows: usize) -> Result<Self> {
        let grid = TileGrid::new(raw.width(), raw.height(), tile_rows).map_err(|e| match e {
            AnalysisError::NonSquareImage { width, height, .. } => {
                AnalysisError::NonSquareImage {
                    title: raw.title().to_string(),
                    width,
                    height,
                }
            }
            other => other,
        })?;
        let filtered = filter.apply(raw.pixels());

        Ok(Self {
            raw,
            filtered,
            grid,
        })
    }

    /// Tile layout of the image
    pub const fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Band-passed copy of the image
    pub const fn filtered(&self) -> &Array2<f64> {
        &self.filtered
    }

    /// Score one tile without recording it
    ///
    /// Tile pixels are the tile bounds clipped to the image.
    pub fn score(&self, tile: &Tile) -> TileScore {
        let filtered_tile = crop_clipped(&self.filtered, tile.left, tile.top, tile.size, tile.size)
            .unwrap_or_else(|| Array2::zeros((0, 0)));
        let raw_tile = self
            .raw
            .crop(tile.left, tile.top, tile.size, tile.size)
            .unwrap_or_else(|| Array2::zeros((0, 0)));

        score_tile(&estimate_directions(&filtered_tile), &raw_tile)
    }

    /// Score one tile and append its record and annotations
    pub fn process_tile(
        &self,
        context: &mut RunContext,
        overlay: &mut Overlay,
        tile: &Tile,
    ) -> TileRecord {
        let scored = self.score(tile);
        let (x, y) = self
            .raw
            .calibration()
            .to_physical(tile.centre_x as f64, tile.centre_y as f64);

        let record = TileRecord {
            image: self.raw.title().to_string(),
            tile: context.table().next_index(),
            x,
            y,
            fibre_intensity: scored.fibre_intensity,
            principal_direction: scored.principal_direction,
            score: scored.score,
        };

        for annotation in self.annotate(tile, &record) {
            overlay.add(annotation);
        }
        context.table_mut().push(record.clone());
        record
    }

    /// Score every tile in raster order, reporting `(tiles done, tiles total)` after each
    pub fn run(&self, context: &mut RunContext, mut on_tile: impl FnMut(usize, usize)) -> Overlay {
        let total = self.grid.len();
        let mut overlay = Overlay::new();
        for (done, tile) in self.grid.tiles().iter().enumerate() {
            self.process_tile(context, &mut overlay, tile);
            on_tile(done + 1, total);
        }
        overlay
    }

    fn annotate(&self, tile: &Tile, record: &TileRecord) -> [Annotation; 3] {
        let ox = tile.centre_x as f64;
        let oy = tile.centre_y as f64;
        let theta = record.principal_direction;
        let dx = theta.cos() * ARROW_HALF_LENGTH;
        let dy = theta.sin() * ARROW_HALF_LENGTH;

        // Image rows grow downwards, so the arrow's y component is mirrored
        [
            Annotation::Region {
                x: tile.left as f64,
                y: tile.top as f64,
                width: tile.size as f64,
                height: tile.size as f64,
                colour: TILE_REGION_COLOUR,
            },
            Annotation::Arrow {
                start: Point::new(ox - dx, oy + dy),
                end: Point::new(ox + dx, oy - dy),
                style: ArrowStyle::Open,
                double_headed: true,
                stroke_width: ARROW_STROKE_WIDTH,
                head_size: ARROW_HEAD_SIZE,
                colour: Colour::for_score(record.score),
            },
            Annotation::Label {
                text: record.tile.to_string(),
                position: Point::new(
                    (tile.x + self.grid.step() / 2) as f64 + LABEL_OFFSET_X,
                    tile.y as f64 + LABEL_OFFSET_Y,
                ),
                colour: LABEL_COLOUR,
            },
        ]
    }
}

/// Outcome of analysing one stack
#[derive(Debug, Clone)]
pub struct ImageReport {
    /// Title of the analysed slice, `{stack}-Z{index}`
    pub title: String,
    /// Z index of the analysed slice
    pub slice_index: usize,
    /// Unfiltered slice to display under the overlay
    pub display: IntensityImage,
    /// Annotations of every tile
    pub overlay: Overlay,
    /// Number of records appended to the results table
    pub tile_count: usize,
}

/// Analyse one stack, see [`analyse_stack_with`]
///
/// # Errors
///
/// Returns an error if slice selection, filtering or tiling fails
pub fn analyse_stack(
    context: &mut RunContext,
    stack: &ImageStack,
    settings: &AnalysisSettings,
) -> Result<ImageReport> {
    analyse_stack_with(context, stack, settings, |_, _| {})
}

/// Analyse one stack, reporting `(tiles done, tiles total)` after each tile
///
/// On failure nothing is appended to the results table; the failure is
/// recorded in `context` and also returned so the caller skips display.
///
/// # Errors
///
/// Returns an error if:
/// - The reference channel doesn't exist in the stack
/// - The band-pass sigma is invalid
/// - The selected slice is not square or too small for the tile rows
pub fn analyse_stack_with(
    context: &mut RunContext,
    stack: &ImageStack,
    settings: &AnalysisSettings,
    on_tile: impl FnMut(usize, usize),
) -> Result<ImageReport> {
    let prepared = select_brightest_slice(stack, settings.reference_channel).and_then(|slice| {
        let filter = BandPassFilter::new(settings.sigma)?;
        Ok((slice, filter))
    });
    let (slice, filter) = match prepared {
        Ok(prepared) => prepared,
        Err(error) => return Err(fail(context, stack.title(), error)),
    };

    let analysis = match TiledAnalysis::new(&slice.image, &filter, settings.tile_rows) {
        Ok(analysis) => analysis,
        Err(error) => return Err(fail(context, slice.image.title(), error)),
    };

    let overlay = analysis.run(context, on_tile);
    let total = analysis.grid().len();
    log::debug!(
        "{}: scored {total} tiles (step {}, overlap {})",
        slice.image.title(),
        analysis.grid().step(),
        analysis.grid().overlap()
    );

    Ok(ImageReport {
        title: slice.image.title().to_string(),
        slice_index: slice.index,
        tile_count: total,
        overlay,
        display: slice.image,
    })
}

fn fail(context: &mut RunContext, image: &str, error: AnalysisError) -> AnalysisError {
    context.record_failure(image, &error);
    error
}
