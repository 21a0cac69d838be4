//! Command-line interface for batch stress fibre scoring of image files

use crate::analysis::results::RunContext;
use crate::analysis::tiled::{AnalysisSettings, ImageReport, analyse_stack_with};
use crate::io::configuration::{
    DEFAULT_REFERENCE_CHANNEL, DEFAULT_SIGMA, DEFAULT_TILE_ROWS, OUTPUT_DIR_NAME, TABLE_CSV_NAME,
    TABLE_JSON_NAME, TABLE_TITLE_PREFIX,
};
use crate::io::error::{AnalysisError, Result, WithContext};
use crate::io::image::{is_supported, load_stack};
use crate::io::progress::ProgressManager;
use crate::io::table::{export_csv, export_json};
use crate::io::visualization::export_display_png;
use crate::spatial::image::{Calibration, ImageStack};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "fibrescore")]
#[command(
    author,
    version,
    about = "Score stress fibre anisotropy in tiles of fluorescence images"
)]
/// Command-line arguments for the stress fibre scoring tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input image file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Output directory for the results table and display images
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Tile rows (and columns) across each image
    #[arg(short, long, default_value_t = DEFAULT_TILE_ROWS)]
    pub rows: usize,

    /// Standard deviation of the narrow band-pass Gaussian, in pixels
    #[arg(short, long, default_value_t = DEFAULT_SIGMA)]
    pub sigma: f64,

    /// Reference channel used to pick the brightest slice (0-based)
    #[arg(short, long)]
    pub channel: Option<usize>,

    /// Physical width of one pixel
    #[arg(long, default_value_t = 1.0)]
    pub pixel_width: f64,

    /// Physical height of one pixel (defaults to the width)
    #[arg(long)]
    pub pixel_height: Option<f64>,

    /// Unit of the pixel size
    #[arg(long, default_value = "pixel")]
    pub unit: String,

    /// Also write the results table as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Skip rendering display images
    #[arg(short, long)]
    pub no_display: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase logging verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Default log filter for the quiet and verbose flags
    pub const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Warn;
        }
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Pixel calibration applied to every imported image
    pub fn calibration(&self) -> Calibration {
        Calibration {
            pixel_width: self.pixel_width,
            pixel_height: self.pixel_height.unwrap_or(self.pixel_width),
            unit: self.unit.clone(),
        }
    }

    /// Pipeline settings for `stack`
    ///
    /// Without an explicit channel, single-channel stacks use channel 0.
    pub fn settings_for(&self, stack: &ImageStack) -> AnalysisSettings {
        let fallback = if stack.channels() > DEFAULT_REFERENCE_CHANNEL {
            DEFAULT_REFERENCE_CHANNEL
        } else {
            0
        };

        AnalysisSettings {
            sigma: self.sigma,
            tile_rows: self.rows,
            reference_channel: self.channel.unwrap_or(fallback),
        }
    }

    /// Directory receiving the table and display images
    pub fn output_dir(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            if self.target.is_dir() {
                self.target.join(OUTPUT_DIR_NAME)
            } else {
                self.target
                    .parent()
                    .unwrap_or_else(|| Path::new(""))
                    .join(OUTPUT_DIR_NAME)
            }
        })
    }
}

/// Orchestrates batch analysis of image files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
    context: RunContext,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);
        let context = RunContext::new(format!("{TABLE_TITLE_PREFIX}{}", cli.target.display()));

        Self {
            cli,
            progress_manager,
            context,
        }
    }

    /// Run state accumulated so far
    pub const fn context(&self) -> &RunContext {
        &self.context
    }

    /// Process files according to CLI arguments
    ///
    /// Images that fail to load or analyse are logged and recorded in the run
    /// context; the batch carries on with the next file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The target doesn't exist, or is a file with an unsupported extension
    /// - A directory cannot be read during traversal
    /// - The results table cannot be written
    pub fn process(&mut self) -> Result<()> {
        let files = self.collect_files()?;

        if files.is_empty() {
            log::warn!("No supported images found in {}", self.cli.target.display());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for file in &files {
            self.process_file(file);
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        let failures = self.context.failures();
        if !failures.is_empty() {
            log::warn!("{} of {} images could not be analysed", failures.len(), files.len());
        }

        self.export_table()
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.cli.target;

        if target.is_file() {
            if is_supported(target) {
                Ok(vec![target.clone()])
            } else {
                Err(AnalysisError::UnsupportedFile {
                    path: target.clone(),
                })
            }
        } else if target.is_dir() {
            self.walk_directory(target)
        } else {
            Err(AnalysisError::FileSystem {
                path: target.clone(),
                operation: "read target",
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "target must be an image file or directory",
                ),
            })
        }
    }

    // Depth-first over sorted entries; the output directory is never entered
    fn walk_directory(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let output_dir = self.cli.output_dir();
        let mut files = Vec::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(path) = pending.pop() {
            if path.is_dir() {
                if path != root && path == output_dir {
                    continue;
                }
                let mut entries = std::fs::read_dir(&path)
                    .with_operation(&path, "read directory")?
                    .map(|entry| entry.map(|e| e.path()))
                    .collect::<std::io::Result<Vec<_>>>()
                    .with_operation(&path, "read directory")?;
                entries.sort();
                pending.extend(entries.into_iter().rev());
            } else if is_supported(&path) {
                files.push(path);
            } else {
                log::debug!("Skipping unsupported file {}", path.display());
            }
        }

        Ok(files)
    }

    fn process_file(&mut self, input_path: &Path) {
        let start_time = Instant::now();

        if let Some(ref pm) = self.progress_manager {
            pm.start_file(input_path);
        }

        match self.analyse_file(input_path) {
            Ok(report) => log::info!(
                "{}: analysed slice {} as {} ({} tiles)",
                input_path.display(),
                report.slice_index,
                report.title,
                report.tile_count
            ),
            Err(error) => log::warn!("Skipping {}: {error}", input_path.display()),
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(start_time.elapsed());
        }
    }

    fn analyse_file(&mut self, input_path: &Path) -> Result<ImageReport> {
        let stack = match load_stack(input_path, &self.cli.calibration()) {
            Ok(stack) => stack,
            Err(error) => {
                self.context
                    .record_failure(input_path.display().to_string(), &error);
                return Err(error);
            }
        };
        let settings = self.cli.settings_for(&stack);

        let progress = self.progress_manager.as_ref();
        let report = analyse_stack_with(&mut self.context, &stack, &settings, |done, total| {
            if let Some(pm) = progress {
                pm.update_tiles(done, total);
            }
        })?;

        // Rows are already recorded, so a failed display only loses the picture
        if !self.cli.no_display {
            let display_path = self.cli.output_dir().join(format!("{}.png", report.title));
            if let Err(error) = export_display_png(&report.display, &report.overlay, &display_path)
            {
                log::warn!("No display written for {}: {error}", report.title);
            }
        }

        Ok(report)
    }

    fn export_table(&self) -> Result<()> {
        let output_dir = self.cli.output_dir();
        let table = self.context.table();

        let csv_path = output_dir.join(TABLE_CSV_NAME);
        export_csv(table, &csv_path)?;
        log::info!("Wrote {} records to {}", table.len(), csv_path.display());

        if self.cli.json {
            let json_path = output_dir.join(TABLE_JSON_NAME);
            export_json(table, &json_path)?;
            log::info!("Wrote {}", json_path.display());
        }

        Ok(())
    }
}
