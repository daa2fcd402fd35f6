//! FILENAME: core/persistence/src/schema.rs
//! Header matching and cell conversion shared by the XLSX and CSV readers.

use crate::PersistenceError;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use engine::{Record, RECORD_COLUMNS, RECORD_FIELDS};

/// Text date layouts accepted in the Order Date column.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Serial of 9999-12-31, the last date a spreadsheet can hold.
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// A source cell before it is typed into a `Record` field.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    /// Spreadsheet date serial (days since 1899-12-30).
    Serial(f64),
}

impl RawCell {
    fn as_display(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Text(s) => s.clone(),
            RawCell::Number(n) | RawCell::Serial(n) => n.to_string(),
        }
    }
}

// ============================================================================
// COLUMN MAP
// ============================================================================

/// Source column index for each entry of `RECORD_COLUMNS`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ColumnMap {
    indices: [usize; RECORD_COLUMNS.len()],
}

impl ColumnMap {
    /// Locates every required column by its sheet header or its record field
    /// name (so exported CSV loads back). Matching ignores case and
    /// surrounding whitespace. Extra columns are ignored.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Result<Self, PersistenceError> {
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| h.as_ref().trim().trim_start_matches('\u{feff}').to_lowercase())
            .collect();

        let mut indices = [0usize; RECORD_COLUMNS.len()];
        for (slot, (column, field)) in RECORD_COLUMNS.iter().zip(RECORD_FIELDS).enumerate() {
            let column_name = column.to_lowercase();
            let field_name = field.to_lowercase();
            indices[slot] = normalized
                .iter()
                .position(|h| *h == column_name || *h == field_name)
                .ok_or_else(|| PersistenceError::MissingColumn(column.to_string()))?;
        }
        Ok(Self { indices })
    }

    pub fn index(&self, slot: usize) -> usize {
        self.indices[slot]
    }
}

// ============================================================================
// ROW CONVERSION
// ============================================================================

/// Builds a record from one source row. `row_number` is the 1-based
/// row in the source file, used only for error messages.
pub(crate) fn build_record<F>(
    columns: &ColumnMap,
    row_number: usize,
    cell_at: F,
) -> Result<Record, PersistenceError>
where
    F: Fn(usize) -> RawCell,
{
    let cell = |slot: usize| cell_at(columns.index(slot));
    let invalid = |slot: usize, raw: &RawCell| PersistenceError::InvalidValue {
        row: row_number,
        column: RECORD_COLUMNS[slot].to_string(),
        value: raw.as_display(),
    };

    let date_cell = cell(0);
    let order_date = parse_date(&date_cell).ok_or_else(|| invalid(0, &date_cell))?;

    let sales_cell = cell(7);
    let sales = parse_number(&sales_cell).ok_or_else(|| invalid(7, &sales_cell))?;

    let quantity_cell = cell(8);
    let quantity = parse_count(&quantity_cell).ok_or_else(|| invalid(8, &quantity_cell))?;

    let profit_cell = cell(9);
    let profit = parse_number(&profit_cell).ok_or_else(|| invalid(9, &profit_cell))?;

    Ok(Record {
        order_date,
        region: text(&cell(1)),
        state: text(&cell(2)),
        city: text(&cell(3)),
        category: text(&cell(4)),
        sub_category: text(&cell(5)),
        product_name: text(&cell(6)),
        sales,
        quantity,
        profit,
    })
}

/// Categorical text; numbers written into text columns keep their digits.
fn text(cell: &RawCell) -> String {
    match cell {
        RawCell::Empty => String::new(),
        RawCell::Text(s) => s.trim().to_string(),
        RawCell::Number(n) | RawCell::Serial(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                n.to_string()
            }
        }
    }
}

pub(crate) fn parse_date(cell: &RawCell) -> Option<NaiveDate> {
    match cell {
        RawCell::Serial(n) | RawCell::Number(n) => excel_serial_to_date(*n),
        RawCell::Text(s) => parse_date_text(s.trim()),
        RawCell::Empty => None,
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Converts a spreadsheet serial to a calendar date, ignoring the time part.
/// Serials below 61 predate the phantom 1900-02-29 and use the 1899-12-31 base.
pub(crate) fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    let days = serial.floor() as i64;
    let base = if days >= 61 {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    };
    base.checked_add_signed(Duration::days(days))
}

fn parse_number(cell: &RawCell) -> Option<f64> {
    match cell {
        RawCell::Number(n) => Some(*n),
        RawCell::Text(s) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| *c != ',' && *c != '$')
                .collect();
            cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        RawCell::Serial(_) | RawCell::Empty => None,
    }
}

fn parse_count(cell: &RawCell) -> Option<u64> {
    let n = parse_number(cell)?;
    if n < 0.0 || n.fract() != 0.0 {
        return None;
    }
    Some(n as u64)
}
