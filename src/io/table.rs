//! Results table export as CSV and JSON

use crate::analysis::results::{COLUMNS, ResultsTable, TileRecord};
use crate::io::error::{AnalysisError, Result, WithContext};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn csv_row(record: &TileRecord) -> String {
    format!(
        "{},{},{},{},{},{},{}",
        quote(&record.image),
        record.tile,
        record.x,
        record.y,
        record.fibre_intensity,
        record.principal_direction,
        record.score
    )
}

fn create_file(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AnalysisError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }
    let file = File::create(path).with_operation(path, "create file")?;
    Ok(BufWriter::new(file))
}

/// Write the table as CSV with a header row and no row numbers
///
/// # Errors
///
/// Returns an error if writing to `writer` fails
pub fn write_csv<W: Write>(table: &ResultsTable, writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "{}", COLUMNS.join(","))?;
    for record in table.rows() {
        writeln!(writer, "{}", csv_row(record))?;
    }
    writer.flush()
}

/// Export the table as CSV to `path`
///
/// # Errors
///
/// Returns an error if the parent directory or file cannot be created or written
pub fn export_csv(table: &ResultsTable, path: &Path) -> Result<()> {
    let mut writer = create_file(path)?;
    write_csv(table, &mut writer).with_operation(path, "write table")
}

/// Export the table, including its title, as pretty-printed JSON to `path`
///
/// # Errors
///
/// Returns an error if the file cannot be created or serialisation fails
pub fn export_json(table: &ResultsTable, path: &Path) -> Result<()> {
    let mut writer = create_file(path)?;
    serde_json::to_writer_pretty(&mut writer, table).with_path(path)?;
    writer.flush().with_operation(path, "write table")
}
