//! FILENAME: core/engine/src/period.rs
//! PURPOSE: Time buckets and the period keys derived from an order date.
//! CONTEXT: The dataset derives one key per bucket for every record at load
//! time. Keys order chronologically within a bucket, so sorting a set of
//! keys of the same bucket yields the trend chart's x-axis order.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Granularity of the trend chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeBucket {
    Daily,
    Weekly,
    #[default]
    Monthly,
}

impl TimeBucket {
    pub fn from_name(name: &str) -> Option<TimeBucket> {
        match name.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Some(TimeBucket::Daily),
            "weekly" | "week" => Some(TimeBucket::Weekly),
            "monthly" | "month" => Some(TimeBucket::Monthly),
            _ => None,
        }
    }
}

/// A bucket-derived grouping key.
///
/// Variant order matters only across buckets; aggregation never mixes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PeriodKey {
    Day(NaiveDate),
    /// ISO week: ISO year plus week number (1..=53).
    Week { year: i32, week: u32 },
    Month { year: i32, month: u32 },
}

impl PeriodKey {
    pub fn for_date(date: NaiveDate, bucket: TimeBucket) -> PeriodKey {
        match bucket {
            TimeBucket::Daily => PeriodKey::Day(date),
            TimeBucket::Weekly => {
                let iso = date.iso_week();
                PeriodKey::Week {
                    year: iso.year(),
                    week: iso.week(),
                }
            }
            TimeBucket::Monthly => PeriodKey::Month {
                year: date.year(),
                month: date.month(),
            },
        }
    }

    /// Chart label: `2023-01-05`, `2023-W01` or `2023-01`.
    pub fn label(&self) -> String {
        match self {
            PeriodKey::Day(date) => date.format("%Y-%m-%d").to_string(),
            PeriodKey::Week { year, week } => format!("{:04}-W{:02}", year, week),
            PeriodKey::Month { year, month } => format!("{:04}-{:02}", year, month),
        }
    }
}

impl std::fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_labels() {
        let d = date(2023, 3, 7);
        assert_eq!(PeriodKey::for_date(d, TimeBucket::Daily).label(), "2023-03-07");
        assert_eq!(PeriodKey::for_date(d, TimeBucket::Monthly).label(), "2023-03");
        assert_eq!(PeriodKey::for_date(d, TimeBucket::Weekly).label(), "2023-W10");
    }

    #[test]
    fn test_iso_week_crosses_year_boundary() {
        // Jan 1st 2021 is a Friday and belongs to week 53 of ISO year 2020
        let key = PeriodKey::for_date(date(2021, 1, 1), TimeBucket::Weekly);
        assert_eq!(key, PeriodKey::Week { year: 2020, week: 53 });
        assert_eq!(key.label(), "2020-W53");
    }

    #[test]
    fn test_keys_sort_chronologically() {
        let mut keys = vec![
            PeriodKey::for_date(date(2023, 11, 2), TimeBucket::Monthly),
            PeriodKey::for_date(date(2022, 12, 30), TimeBucket::Monthly),
            PeriodKey::for_date(date(2023, 2, 1), TimeBucket::Monthly),
        ];
        keys.sort();
        let labels: Vec<String> = keys.iter().map(|k| k.label()).collect();
        assert_eq!(labels, vec!["2022-12", "2023-02", "2023-11"]);
    }

    #[test]
    fn test_bucket_from_name() {
        assert_eq!(TimeBucket::from_name("Weekly"), Some(TimeBucket::Weekly));
        assert_eq!(TimeBucket::from_name("day"), Some(TimeBucket::Daily));
        assert_eq!(TimeBucket::from_name("quarterly"), None);
    }
}
