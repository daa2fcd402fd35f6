//! FILENAME: core/engine/src/dataset.rs
//! PURPOSE: The loaded base table plus the columns derived from it at load time.
//! CONTEXT: A Dataset is built once per session and shared read-only.
//! Derived data:
//! - week and month period keys for every record (day keys are the order date)
//! - sorted distinct values per dimension, serving unconstrained dropdowns
//! - the min/max order date, used as the default date range

use crate::error::EngineError;
use crate::period::{PeriodKey, TimeBucket};
use crate::record::{Dimension, Record};
use crate::selection::DateRange;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Index of a record inside its dataset.
pub type RowId = u32;

#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    week_keys: Vec<PeriodKey>,
    month_keys: Vec<PeriodKey>,
    /// Sorted distinct non-empty values, indexed by `Dimension::index`.
    distinct: [Vec<String>; 5],
    min_date: NaiveDate,
    max_date: NaiveDate,
}

impl Dataset {
    /// Builds the dataset and its derived columns. An empty table is rejected
    /// because the default date range would be undefined.
    pub fn new(records: Vec<Record>) -> Result<Self, EngineError> {
        let first = records.first().ok_or(EngineError::EmptyDataset)?;
        let mut min_date = first.order_date;
        let mut max_date = first.order_date;

        let mut week_keys = Vec::with_capacity(records.len());
        let mut month_keys = Vec::with_capacity(records.len());
        let mut distinct: [BTreeSet<&str>; 5] = Default::default();

        for record in &records {
            min_date = min_date.min(record.order_date);
            max_date = max_date.max(record.order_date);
            week_keys.push(PeriodKey::for_date(record.order_date, TimeBucket::Weekly));
            month_keys.push(PeriodKey::for_date(record.order_date, TimeBucket::Monthly));

            for dimension in Dimension::ALL {
                if let Some(value) = record.dimension(dimension) {
                    distinct[dimension.index()].insert(value);
                }
            }
        }

        let distinct: [Vec<String>; 5] = distinct.map(|set| set.into_iter().map(str::to_string).collect());

        log::debug!(
            "dataset built: {} records, {} .. {}",
            records.len(),
            min_date,
            max_date
        );

        Ok(Dataset {
            records,
            week_keys,
            month_keys,
            distinct,
            min_date,
            max_date,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, row: RowId) -> &Record {
        &self.records[row as usize]
    }

    /// All row ids, in load order.
    pub fn row_ids(&self) -> impl Iterator<Item = RowId> {
        0..self.records.len() as RowId
    }

    /// Derived period key of a record for the given bucket.
    pub fn period(&self, row: RowId, bucket: TimeBucket) -> PeriodKey {
        let idx = row as usize;
        match bucket {
            TimeBucket::Daily => PeriodKey::Day(self.records[idx].order_date),
            TimeBucket::Weekly => self.week_keys[idx],
            TimeBucket::Monthly => self.month_keys[idx],
        }
    }

    /// Sorted distinct non-empty values of a dimension over the whole table.
    pub fn distinct_values(&self, dimension: Dimension) -> &[String] {
        &self.distinct[dimension.index()]
    }

    pub fn date_span(&self) -> (NaiveDate, NaiveDate) {
        (self.min_date, self.max_date)
    }

    /// The range covering every record (the dashboard's initial date inputs).
    pub fn full_range(&self) -> DateRange {
        // min <= max by construction
        DateRange::ordered(self.min_date, self.max_date)
    }
}
