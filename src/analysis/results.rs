//! Per-tile records, the shared results table and the run context

use crate::io::error::AnalysisError;
use serde::Serialize;

/// Scores of one tile, created once and never modified
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileRecord {
    /// Title of the analysed slice
    #[serde(rename = "Image")]
    pub image: String,
    /// Run-wide tile index, equal to the row position in the table
    #[serde(rename = "Tile")]
    pub tile: usize,
    /// Tile centre column in physical units
    #[serde(rename = "X")]
    pub x: f64,
    /// Tile centre row in physical units
    #[serde(rename = "Y")]
    pub y: f64,
    /// Mean raw intensity of the tile
    #[serde(rename = "Fibre Intensity")]
    pub fibre_intensity: f64,
    /// Dominant gradient orientation in radians, within `[0, π)`
    #[serde(rename = "Principal Direction")]
    pub principal_direction: f64,
    /// Anisotropy score
    #[serde(rename = "Stress Fibre Score")]
    pub score: f64,
}

/// Column headings of the results table, in record field order
pub const COLUMNS: [&str; 7] = [
    "Image",
    "Tile",
    "X",
    "Y",
    "Fibre Intensity",
    "Principal Direction",
    "Stress Fibre Score",
];

/// Append-only table of tile records accumulated over a run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultsTable {
    title: String,
    rows: Vec<TileRecord>,
}

impl ResultsTable {
    /// Empty table with a display title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    /// Display title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Index the next appended record receives
    pub fn next_index(&self) -> usize {
        self.rows.len()
    }

    /// Append a record
    pub fn push(&mut self, record: TileRecord) {
        self.rows.push(record);
    }

    /// All records in insertion order
    pub fn rows(&self) -> &[TileRecord] {
        &self.rows
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no records
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// An image that could not be analysed, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageFailure {
    /// Title or path of the image
    pub image: String,
    /// Whether the image was rejected for not being square
    pub non_square: bool,
    /// Error message
    pub reason: String,
}

/// State threaded through every image of a run
#[derive(Debug, Default)]
pub struct RunContext {
    table: ResultsTable,
    failures: Vec<ImageFailure>,
}

impl RunContext {
    /// Start a run whose table carries `title`
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            table: ResultsTable::new(title),
            failures: Vec::new(),
        }
    }

    /// Shared results table
    pub const fn table(&self) -> &ResultsTable {
        &self.table
    }

    /// Mutable access for appending records
    pub const fn table_mut(&mut self) -> &mut ResultsTable {
        &mut self.table
    }

    /// Remember that `image` failed
    pub fn record_failure(&mut self, image: impl Into<String>, error: &AnalysisError) {
        self.failures.push(ImageFailure {
            image: image.into(),
            non_square: matches!(error, AnalysisError::NonSquareImage { .. }),
            reason: error.to_string(),
        });
    }

    /// Images that failed so far
    pub fn failures(&self) -> &[ImageFailure] {
        &self.failures
    }
}
