//! FILENAME: core/persistence/src/csv_writer.rs

use crate::PersistenceError;
use engine::{Record, RECORD_FIELDS};
use std::path::Path;

/// Serializes records as CSV: one header line with the record field names,
/// then one line per record in the order given. Dates are `YYYY-MM-DD`.
pub fn export_csv<'r, I>(records: I) -> Result<Vec<u8>, PersistenceError>
where
    I: IntoIterator<Item = &'r Record>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(RECORD_FIELDS)?;

    let mut count = 0usize;
    for record in records {
        writer.write_record(&record.to_row())?;
        count += 1;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PersistenceError::Io(e.into_error()))?;
    log::debug!("exported {} rows as CSV ({} bytes)", count, bytes.len());
    Ok(bytes)
}

/// Writes `export_csv` output to `path`.
pub fn save_csv<'r, I>(records: I, path: &Path) -> Result<(), PersistenceError>
where
    I: IntoIterator<Item = &'r Record>,
{
    let bytes = export_csv(records)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(day: u32, product: &str, sales: f64) -> Record {
        Record {
            order_date: NaiveDate::from_ymd_opt(2023, 3, day).unwrap(),
            region: "West".to_string(),
            state: "California".to_string(),
            city: "San Francisco".to_string(),
            category: "Office Supplies".to_string(),
            sub_category: "Binders".to_string(),
            product_name: product.to_string(),
            sales,
            quantity: 2,
            profit: 1.5,
        }
    }

    #[test]
    fn test_export_two_rows() {
        let records = vec![record(7, "Binder, Heavy Duty", 12.5), record(8, "Ring Binder", 4.0)];
        let bytes = export_csv(&records).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "orderDate,region,state,city,category,subCategory,productName,sales,quantity,profit"
        );
        assert_eq!(
            lines[1],
            "2023-03-07,West,California,San Francisco,Office Supplies,Binders,\"Binder, Heavy Duty\",12.5,2,1.5"
        );
        assert!(lines[2].starts_with("2023-03-08,"));
    }

    #[test]
    fn test_export_empty_is_header_only() {
        let bytes = export_csv(std::iter::empty::<&Record>()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
