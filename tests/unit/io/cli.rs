//! Tests for command-line parsing and batch file processing

#[cfg(test)]
mod tests {
    use clap::Parser;
    use fibrescore::AnalysisError;
    use fibrescore::io::cli::{Cli, FileProcessor};
    use fibrescore::io::configuration::{DEFAULT_SIGMA, DEFAULT_TILE_ROWS, OUTPUT_DIR_NAME};
    use fibrescore::spatial::image::{Calibration, ImageStack};
    use image::{GrayImage, Luma};
    use log::LevelFilter;
    use ndarray::Array4;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn write_striped_png(path: &Path, width: u32, height: u32) {
        let img = GrayImage::from_fn(width, height, |x, y| {
            Luma([if (x + 2 * y) % 9 < 3 { 220 } else { 30 }])
        });
        img.save(path).unwrap();
    }

    fn quiet_cli(target: &Path, extra: &[&str]) -> Cli {
        let mut args = vec!["fibrescore", "--quiet", "--rows", "4"];
        args.extend_from_slice(extra);
        let target = target.to_string_lossy().to_string();
        args.push(&target);
        Cli::parse_from(args)
    }

    // Tests CLI parsing with only the required target argument
    // Verified by changing default values to ensure defaults are used
    #[test]
    fn test_cli_parse_minimal_args() {
        let cli = Cli::parse_from(["fibrescore", "cells.tif"]);

        assert_eq!(cli.target, PathBuf::from("cells.tif"));
        assert_eq!(cli.rows, DEFAULT_TILE_ROWS);
        assert!((cli.sigma - DEFAULT_SIGMA).abs() < f64::EPSILON);
        assert_eq!(cli.channel, None);
        assert!(cli.output.is_none());
        assert!(!cli.json && !cli.no_display && !cli.quiet);
        assert_eq!(cli.calibration(), Calibration::default());
    }

    // Tests CLI parsing with all available arguments
    #[test]
    fn test_cli_parse_all_args() {
        let cli = Cli::parse_from([
            "fibrescore",
            "data",
            "--output",
            "out",
            "--rows",
            "12",
            "--sigma",
            "1.5",
            "--channel",
            "2",
            "--pixel-width",
            "0.2",
            "--pixel-height",
            "0.3",
            "--unit",
            "micron",
            "--json",
            "--no-display",
            "-vv",
        ]);

        assert_eq!(cli.output, Some(PathBuf::from("out")));
        assert_eq!(cli.rows, 12);
        assert!((cli.sigma - 1.5).abs() < f64::EPSILON);
        assert_eq!(cli.channel, Some(2));
        assert!(cli.json && cli.no_display);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_level(), LevelFilter::Trace);

        let calibration = cli.calibration();
        assert!((calibration.pixel_width - 0.2).abs() < f64::EPSILON);
        assert!((calibration.pixel_height - 0.3).abs() < f64::EPSILON);
        assert_eq!(calibration.unit, "micron");
        assert_eq!(cli.output_dir(), PathBuf::from("out"));
    }

    // Tests pixel height defaults to the pixel width
    #[test]
    fn test_square_pixels_by_default() {
        let cli = Cli::parse_from(["fibrescore", "a.png", "--pixel-width", "0.65"]);
        let calibration = cli.calibration();
        assert!((calibration.pixel_height - 0.65).abs() < f64::EPSILON);
    }

    // Tests log levels for the quiet and verbose flags
    #[test]
    fn test_log_level() {
        assert_eq!(Cli::parse_from(["p", "a.png"]).log_level(), LevelFilter::Info);
        assert_eq!(Cli::parse_from(["p", "a.png", "-v"]).log_level(), LevelFilter::Debug);
        assert_eq!(Cli::parse_from(["p", "a.png", "-q", "-v"]).log_level(), LevelFilter::Warn);
        assert!(!Cli::parse_from(["p", "a.png", "-q"]).should_show_progress());
    }

    // Tests the reference channel falls back to 0 for single-channel stacks
    // Verified by always using the default channel
    #[test]
    fn test_settings_channel_fallback() {
        let gray =
            ImageStack::new("g", Array4::zeros((1, 1, 8, 8)), Calibration::default()).unwrap();
        let rgb =
            ImageStack::new("c", Array4::zeros((1, 3, 8, 8)), Calibration::default()).unwrap();

        let cli = Cli::parse_from(["p", "a.png"]);
        assert_eq!(cli.settings_for(&gray).reference_channel, 0);
        assert_eq!(cli.settings_for(&rgb).reference_channel, 1);

        let explicit = Cli::parse_from(["p", "a.png", "-c", "2"]);
        assert_eq!(explicit.settings_for(&gray).reference_channel, 2);
        assert_eq!(explicit.settings_for(&rgb).reference_channel, 2);
    }

    // Tests the default output directory sits beside a file target and inside a directory target
    #[test]
    fn test_default_output_dir() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.png");
        write_striped_png(&file, 8, 8);

        assert_eq!(
            Cli::parse_from(["p", file.to_str().unwrap()]).output_dir(),
            dir.path().join(OUTPUT_DIR_NAME)
        );
        assert_eq!(
            Cli::parse_from(["p", dir.path().to_str().unwrap()]).output_dir(),
            dir.path().join(OUTPUT_DIR_NAME)
        );
    }

    // Tests a directory batch: recursion, skipping, failure isolation and outputs
    // Verified by aborting the batch on the first failing image
    #[test]
    fn test_process_directory_batch() {
        let dir = TempDir::new().unwrap();
        write_striped_png(&dir.path().join("a.png"), 64, 64);
        write_striped_png(&dir.path().join("b.png"), 64, 48);
        fs::write(dir.path().join("notes.txt"), "not an image").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        write_striped_png(&dir.path().join("sub").join("c.png"), 64, 64);

        let mut processor = FileProcessor::new(quiet_cli(dir.path(), &["--json"]));
        processor.process().unwrap();

        let context = processor.context();
        let rows = context.table().rows();
        assert_eq!(rows.len(), 32);
        assert_eq!(rows[0].image, "a.png-Z0");
        assert_eq!(rows[16].image, "c.png-Z0");
        assert_eq!(rows[31].tile, 31);
        assert_eq!(context.failures().len(), 1);
        assert!(context.failures()[0].non_square);
        assert!(
            context
                .table()
                .title()
                .starts_with("Stress Fibres : ")
        );

        let output = dir.path().join(OUTPUT_DIR_NAME);
        let csv = fs::read_to_string(output.join("stress_fibres.csv")).unwrap();
        assert_eq!(csv.lines().count(), 33);
        assert!(output.join("stress_fibres.json").exists());
        assert!(output.join("a.png-Z0.png").exists());
        assert!(output.join("c.png-Z0.png").exists());
        assert!(!output.join("b.png-Z0.png").exists());
    }

    // Tests re-running over the same directory ignores previous outputs
    #[test]
    fn test_rerun_is_idempotent() {
        let dir = TempDir::new().unwrap();
        write_striped_png(&dir.path().join("a.png"), 48, 48);
        let csv_path = dir.path().join(OUTPUT_DIR_NAME).join("stress_fibres.csv");

        FileProcessor::new(quiet_cli(dir.path(), &[])).process().unwrap();
        let first = fs::read_to_string(&csv_path).unwrap();

        let mut second_run = FileProcessor::new(quiet_cli(dir.path(), &[]));
        second_run.process().unwrap();
        let second = fs::read_to_string(&csv_path).unwrap();

        assert_eq!(first, second);
        assert_eq!(second_run.context().table().len(), 16);
    }

    // Tests a single-file target with display rendering disabled
    #[test]
    fn test_process_single_file_no_display() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("cells.png");
        write_striped_png(&file, 32, 32);
        let output = dir.path().join("results");

        let mut processor = FileProcessor::new(quiet_cli(
            &file,
            &["--no-display", "--output", output.to_str().unwrap()],
        ));
        processor.process().unwrap();

        assert_eq!(processor.context().table().len(), 16);
        assert!(output.join("stress_fibres.csv").exists());
        assert!(!output.join("cells.png-Z0.png").exists());
    }

    // Tests a display that cannot be written keeps the rows and is not a failure
    // Verified by propagating the display export error out of the image
    #[test]
    fn test_display_export_failure_keeps_rows() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("cells.png");
        write_striped_png(&file, 32, 32);
        let output = dir.path().join("results");
        // A directory where the display PNG should go makes the save fail
        fs::create_dir_all(output.join("cells.png-Z0.png")).unwrap();

        let mut processor =
            FileProcessor::new(quiet_cli(&file, &["--output", output.to_str().unwrap()]));
        processor.process().unwrap();

        assert_eq!(processor.context().table().len(), 16);
        assert!(processor.context().failures().is_empty());
        let csv = fs::read_to_string(output.join("stress_fibres.csv")).unwrap();
        assert_eq!(csv.lines().count(), 17);
    }

    // Tests unsupported and missing targets are errors
    #[test]
    fn test_invalid_targets() {
        let dir = TempDir::new().unwrap();
        let text = dir.path().join("notes.txt");
        fs::write(&text, "x").unwrap();

        let result = FileProcessor::new(quiet_cli(&text, &[])).process();
        assert!(matches!(result, Err(AnalysisError::UnsupportedFile { .. })));

        let missing = dir.path().join("missing.png");
        let result = FileProcessor::new(quiet_cli(&missing, &[])).process();
        assert!(matches!(result, Err(AnalysisError::FileSystem { .. })));
    }
}
