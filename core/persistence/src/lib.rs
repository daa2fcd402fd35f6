//! FILENAME: core/persistence/src/lib.rs
//! Superstore Persistence Module
//!
//! Loads the order table from a spreadsheet or CSV file into a `Dataset`,
//! and writes filtered record sets back out as CSV or XLSX.

mod csv_reader;
mod csv_writer;
mod error;
mod schema;
mod xlsx_reader;
mod xlsx_writer;

pub use csv_reader::load_csv;
pub use csv_writer::{export_csv, save_csv};
pub use error::PersistenceError;
pub use xlsx_reader::load_xlsx;
pub use xlsx_writer::{save_xlsx, EXPORT_SHEET_NAME};

use engine::{Dataset, Record};
use std::path::Path;

// ============================================================================
// SOURCE FORMATS
// ============================================================================

/// File formats the loader understands, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Spreadsheet,
    Csv,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self, PersistenceError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SourceFormat::Spreadsheet),
            "csv" => Ok(SourceFormat::Csv),
            "" => Err(PersistenceError::UnsupportedFormat(path.display().to_string())),
            other => Err(PersistenceError::UnsupportedFormat(format!(".{}", other))),
        }
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// Reads the file at `path` into an immutable dataset.
///
/// Any failure is wrapped in `PersistenceError::Source` so the message
/// names the file that could not be loaded.
pub fn load_dataset(path: &Path) -> Result<Dataset, PersistenceError> {
    load_records(path)
        .and_then(|records| Dataset::new(records).map_err(PersistenceError::from))
        .map_err(|source| {
            log::error!("failed to load {}: {}", path.display(), source);
            PersistenceError::Source {
                path: path.to_path_buf(),
                source: Box::new(source),
            }
        })
}

fn load_records(path: &Path) -> Result<Vec<Record>, PersistenceError> {
    if !path.exists() {
        return Err(PersistenceError::NotFound(path.to_path_buf()));
    }
    match SourceFormat::from_path(path)? {
        SourceFormat::Spreadsheet => load_xlsx(path),
        SourceFormat::Csv => load_csv(path),
    }
}
