//! File import, table and display export, command-line driver and error types

/// Command-line interface and batch driver
pub mod cli;
/// Analysis constants and defaults
pub mod configuration;
/// Error types and result alias
pub mod error;
/// Image file import
pub mod image;
/// Progress bar management
pub mod progress;
/// Results table export
pub mod table;
/// Display image rendering
pub mod visualization;
