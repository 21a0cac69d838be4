//! Batch progress display: one bar over files, one over the current image's tiles

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static TILE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{prefix}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} tiles"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] Images: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

/// Coordinates progress display for a batch run
///
/// The batch bar only appears when more than one file is queued.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    tile_bar: Option<ProgressBar>,
    completed: usize,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            tile_bar: None,
            completed: 0,
        }
    }

    /// Prepare bars for `file_count` files
    pub fn initialize(&mut self, file_count: usize) {
        if file_count > 1 {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }
        let tile_bar = ProgressBar::new(0);
        tile_bar.set_style(TILE_STYLE.clone());
        self.tile_bar = Some(self.multi_progress.add(tile_bar));
    }

    /// Reset the tile bar for a new file
    pub fn start_file(&self, path: &Path) {
        let display_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if let Some(ref bar) = self.tile_bar {
            bar.set_length(0);
            bar.set_position(0);
            bar.set_prefix(display_name.clone());
        }
        if let Some(ref bar) = self.batch_bar {
            bar.set_message(display_name);
        }
    }

    /// Report tiles scored so far in the current image
    pub fn update_tiles(&self, done: usize, total: usize) {
        if let Some(ref bar) = self.tile_bar {
            bar.set_length(total as u64);
            bar.set_position(done as u64);
        }
    }

    /// Mark the current file as finished, successfully or not
    pub fn complete_file(&mut self, _elapsed: Duration) {
        self.completed += 1;
        if let Some(ref bar) = self.batch_bar {
            bar.inc(1);
        }
    }

    /// Number of files marked complete
    pub const fn completed(&self) -> usize {
        self.completed
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref bar) = self.batch_bar {
            bar.finish_with_message("all images processed");
        }
        if let Some(ref bar) = self.tile_bar {
            bar.finish_and_clear();
        }
        let _ = self.multi_progress.clear();
    }

    /// Handle for printing log lines without tearing the bars
    pub const fn multi_progress(&self) -> &MultiProgress {
        &self.multi_progress
    }
}
