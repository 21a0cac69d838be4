//! Analysis constants and runtime configuration defaults

use crate::analysis::overlay::Colour;

// Band-pass preprocessing
/// Standard deviation of the narrow Gaussian, in pixels (not scaled by calibration)
pub const DEFAULT_SIGMA: f64 = 2.0;
/// Ratio between the wide and narrow Gaussian standard deviations
pub const SIGMA_RATIO: f64 = 1.4;
/// Gaussian kernels are truncated at this many standard deviations
pub const GAUSSIAN_TRUNCATION: f64 = 3.5;

// Tile layout
/// Number of tile rows (and columns) across a square image
pub const DEFAULT_TILE_ROWS: usize = 24;
/// Tile overlap is the step divided by this
pub const OVERLAP_DIVISOR: usize = 5;

// Slice selection
/// Reference channel used when the caller doesn't name one (second channel)
pub const DEFAULT_REFERENCE_CHANNEL: usize = 1;

// Overlay geometry, in pixels
/// Half-length of the direction arrow drawn at each tile centre
pub const ARROW_HALF_LENGTH: f64 = 20.0;
/// Stroke width of direction arrows
pub const ARROW_STROKE_WIDTH: f64 = 4.0;
/// Head size of direction arrows
pub const ARROW_HEAD_SIZE: f64 = 4.0;
/// Horizontal offset of the tile label from the tile centre column
pub const LABEL_OFFSET_X: f64 = -10.0;
/// Vertical offset of the tile label from the tile anchor row
pub const LABEL_OFFSET_Y: f64 = 6.0;

// Overlay colours
/// Translucent yellow drawn at tile bounds
pub const TILE_REGION_COLOUR: Colour = Colour::new(1.0, 1.0, 0.0, 0.25);
/// Colour of tile index labels
pub const LABEL_COLOUR: Colour = Colour::new(0.0, 1.0, 1.0, 1.0);

// Import
/// File extensions accepted during import (compared case-insensitively)
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["png", "tif", "tiff", "gif", "jpg", "jpeg", "bmp"];

// Output settings
/// Prefix of the results table title; the analysed target follows it
pub const TABLE_TITLE_PREFIX: &str = "Stress Fibres : ";
/// Directory created for outputs when none is given
pub const OUTPUT_DIR_NAME: &str = "stress_fibres";
/// File name of the CSV results table
pub const TABLE_CSV_NAME: &str = "stress_fibres.csv";
/// File name of the JSON results table
pub const TABLE_JSON_NAME: &str = "stress_fibres.json";
/// Infix joining the source title and the selected slice index
pub const SLICE_TITLE_INFIX: &str = "-Z";

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
