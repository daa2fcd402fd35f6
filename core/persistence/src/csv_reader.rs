//! FILENAME: core/persistence/src/csv_reader.rs

use crate::schema::{build_record, ColumnMap, RawCell};
use crate::PersistenceError;
use engine::Record;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Reads the order table from a comma-separated file with a header row.
/// Bytes that are not valid UTF-8 (the public Superstore CSV ships as
/// Windows-1252) are replaced rather than rejected.
pub fn load_csv(path: &Path) -> Result<Vec<Record>, PersistenceError> {
    let bytes = std::fs::read(path)?;
    let records = parse_csv(&bytes)?;
    log::info!("loaded {} rows from {}", records.len(), path.display());
    Ok(records)
}

pub(crate) fn parse_csv(bytes: &[u8]) -> Result<Vec<Record>, PersistenceError> {
    let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(PersistenceError::InvalidFormat("CSV has no header row".to_string()));
    }
    let columns = ColumnMap::from_headers(&headers)?;

    let mut records = Vec::new();
    for (offset, row) in reader.byte_records().enumerate() {
        let row = row?;
        if row.iter().all(|field| field.iter().all(u8::is_ascii_whitespace)) {
            continue;
        }
        let record = build_record(&columns, offset + 2, |i| match row.get(i) {
            Some(field) if !field.is_empty() => {
                RawCell::Text(String::from_utf8_lossy(field).into_owned())
            }
            _ => RawCell::Empty,
        })?;
        records.push(record);
    }
    Ok(records)
}
