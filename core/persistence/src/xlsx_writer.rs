//! FILENAME: core/persistence/src/xlsx_writer.rs

use crate::PersistenceError;
use chrono::Datelike;
use engine::{Record, RECORD_COLUMNS};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook as XlsxWorkbook};
use std::path::Path;

/// Sheet name used for exported order tables.
pub const EXPORT_SHEET_NAME: &str = "Orders";

const DATE_NUM_FORMAT: &str = "yyyy-mm-dd";
const MONEY_NUM_FORMAT: &str = "#,##0.00";

// Column widths in Excel character units.
const COLUMN_WIDTHS: [f64; 10] = [12.0, 10.0, 16.0, 18.0, 16.0, 14.0, 48.0, 12.0, 10.0, 12.0];

/// Writes records to a single-sheet workbook with a bold header row.
/// Order dates are stored as real Excel dates; measures as numbers.
pub fn save_xlsx<'r, I>(records: I, path: &Path) -> Result<(), PersistenceError>
where
    I: IntoIterator<Item = &'r Record>,
{
    let mut xlsx = XlsxWorkbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format(DATE_NUM_FORMAT);
    let money_format = Format::new().set_num_format(MONEY_NUM_FORMAT);

    let worksheet = xlsx.add_worksheet();
    worksheet.set_name(EXPORT_SHEET_NAME)?;

    for (col, (header, width)) in RECORD_COLUMNS.iter().zip(COLUMN_WIDTHS).enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        worksheet.set_column_width(col as u16, width)?;
    }

    let mut row: u32 = 0;
    for record in records {
        row += 1;
        let date = &record.order_date;
        let excel_date =
            ExcelDateTime::from_ymd(date.year() as u16, date.month() as u8, date.day() as u8)?;

        worksheet.write_datetime_with_format(row, 0, &excel_date, &date_format)?;
        worksheet.write_string(row, 1, &record.region)?;
        worksheet.write_string(row, 2, &record.state)?;
        worksheet.write_string(row, 3, &record.city)?;
        worksheet.write_string(row, 4, &record.category)?;
        worksheet.write_string(row, 5, &record.sub_category)?;
        worksheet.write_string(row, 6, &record.product_name)?;
        worksheet.write_number_with_format(row, 7, record.sales, &money_format)?;
        worksheet.write_number(row, 8, record.quantity as f64)?;
        worksheet.write_number_with_format(row, 9, record.profit, &money_format)?;
    }

    xlsx.save(path)?;
    log::info!("exported {} rows to {}", row, path.display());
    Ok(())
}
