//! FILENAME: core/persistence/src/xlsx_reader.rs

use crate::schema::{build_record, ColumnMap, RawCell};
use crate::PersistenceError;
use calamine::{open_workbook_auto, Data, Reader};
use engine::Record;
use std::path::Path;

/// Reads the order table from the first sheet of a workbook
/// (xlsx, xlsm, xlsb, xls or ods). Row 1 holds the headers.
pub fn load_xlsx(path: &Path) -> Result<Vec<Record>, PersistenceError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| PersistenceError::InvalidFormat("Workbook contains no sheets".to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PersistenceError::InvalidFormat("Workbook contains no sheets".to_string()))??;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(|cell| cell.to_string()).collect(),
        None => {
            return Err(PersistenceError::InvalidFormat(format!(
                "Sheet '{}' is empty",
                sheet_name
            )))
        }
    };
    let columns = ColumnMap::from_headers(&headers)?;

    let mut records = Vec::with_capacity(range.height().saturating_sub(1));
    for (offset, row) in rows.enumerate() {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        let record = build_record(&columns, offset + 2, |i| {
            row.get(i).map(to_raw).unwrap_or(RawCell::Empty)
        })?;
        records.push(record);
    }

    log::info!(
        "loaded {} rows from sheet '{}' of {}",
        records.len(),
        sheet_name,
        path.display()
    );
    Ok(records)
}

fn to_raw(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Float(f) => RawCell::Number(*f),
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Bool(b) => RawCell::Text(b.to_string()),
        Data::Error(e) => RawCell::Text(format!("{:?}", e)),
        Data::DateTime(dt) => RawCell::Serial(dt.as_f64()),
        Data::DateTimeIso(s) => RawCell::Text(s.clone()),
        Data::DurationIso(s) => RawCell::Text(s.clone()),
    }
}
