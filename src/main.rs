//! CLI entry point for tiled stress fibre scoring

use clap::Parser;
use fibrescore::io::cli::{Cli, FileProcessor};

fn main() -> fibrescore::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let mut processor = FileProcessor::new(cli);
    processor.process()
}
