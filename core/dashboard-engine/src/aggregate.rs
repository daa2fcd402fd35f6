//! FILENAME: core/dashboard-engine/src/aggregate.rs
//! Grouping and reduction of a filtered view.
//!
//! - `aggregate_by_time`: one row per period, ascending chronological order
//! - `aggregate_by_product`: top-N products by a metric, ties by name
//! - `summarize`: grand totals for the KPI cards
//!
//! All three are deterministic: the output order never depends on hash
//! iteration order.

use crate::definition::RankingMetric;
use crate::filter::FilteredView;
use crate::view::{AggregateRow, KpiSummary};
use engine::{PeriodKey, Record, TimeBucket};
use rustc_hash::FxHashMap;

/// profit / sales, defined as 0 when sales is exactly 0.
pub fn margin_rate(profit: f64, sales: f64) -> f64 {
    if sales == 0.0 {
        0.0
    } else {
        profit / sales
    }
}

// ============================================================================
// ACCUMULATOR
// ============================================================================

/// Running sums for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricAccumulator {
    pub sales: f64,
    pub quantity: u64,
    pub profit: f64,
    pub row_count: usize,
}

impl MetricAccumulator {
    pub fn add(&mut self, record: &Record) {
        self.sales += record.sales;
        self.quantity += record.quantity;
        self.profit += record.profit;
        self.row_count += 1;
    }

    pub fn margin_rate(&self) -> f64 {
        margin_rate(self.profit, self.sales)
    }

    pub fn into_row(self, group_key: String) -> AggregateRow {
        AggregateRow {
            group_key,
            sales: self.sales,
            quantity: self.quantity,
            profit: self.profit,
            margin_rate: self.margin_rate(),
            row_count: self.row_count,
        }
    }
}

// ============================================================================
// GROUPINGS
// ============================================================================

/// Groups the view by the bucket's period key, oldest period first.
pub fn aggregate_by_time(view: &FilteredView<'_>, bucket: TimeBucket) -> Vec<AggregateRow> {
    let dataset = view.dataset();
    let mut groups: FxHashMap<PeriodKey, MetricAccumulator> = FxHashMap::default();

    for (row, record) in view.rows() {
        groups
            .entry(dataset.period(row, bucket))
            .or_default()
            .add(record);
    }

    let mut keyed: Vec<(PeriodKey, MetricAccumulator)> = groups.into_iter().collect();
    keyed.sort_unstable_by_key(|(key, _)| *key);

    log::debug!("time aggregation ({:?}): {} groups", bucket, keyed.len());

    keyed
        .into_iter()
        .map(|(key, acc)| acc.into_row(key.label()))
        .collect()
}

/// Groups the view by product name and keeps the `top_n` best by `metric`.
///
/// Ordering: metric descending, then product name ascending.
pub fn aggregate_by_product(
    view: &FilteredView<'_>,
    top_n: usize,
    metric: RankingMetric,
) -> Vec<AggregateRow> {
    let mut groups: FxHashMap<&str, MetricAccumulator> = FxHashMap::default();

    for record in view.records() {
        groups
            .entry(record.product_name.as_str())
            .or_default()
            .add(record);
    }

    let mut rows: Vec<AggregateRow> = groups
        .into_iter()
        .map(|(name, acc)| acc.into_row(name.to_string()))
        .collect();

    rows.sort_by(|a, b| {
        b.metric(metric)
            .total_cmp(&a.metric(metric))
            .then_with(|| a.group_key.cmp(&b.group_key))
    });
    rows.truncate(top_n);

    log::debug!("product ranking by {:?}: {} rows", metric, rows.len());
    rows
}

/// Totals over the whole view.
pub fn summarize(view: &FilteredView<'_>) -> KpiSummary {
    let mut acc = MetricAccumulator::default();
    for record in view.records() {
        acc.add(record);
    }
    KpiSummary {
        sales: acc.sales,
        quantity: acc.quantity,
        profit: acc.profit,
        margin_rate: acc.margin_rate(),
        row_count: acc.row_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use engine::Dataset;

    fn record(day: (i32, u32, u32), product: &str, sales: f64, quantity: u64, profit: f64) -> Record {
        Record {
            order_date: NaiveDate::from_ymd_opt(day.0, day.1, day.2).unwrap(),
            region: "East".to_string(),
            state: "New York".to_string(),
            city: "New York City".to_string(),
            category: "Office Supplies".to_string(),
            sub_category: "Art".to_string(),
            product_name: product.to_string(),
            sales,
            quantity,
            profit,
        }
    }

    fn create_test_dataset() -> Dataset {
        Dataset::new(vec![
            record((2023, 1, 3), "Pens", 30.0, 3, 6.0),
            record((2023, 1, 3), "Paper", 50.0, 5, 10.0),
            record((2023, 1, 9), "Pens", 20.0, 2, 4.0),
            record((2023, 2, 14), "Binder", 0.0, 1, 0.0),
            record((2022, 12, 30), "Paper", 100.0, 4, -5.0),
            record((2023, 2, 20), "Stapler", 80.0, 1, 8.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_margin_rate_zero_sales() {
        assert_eq!(margin_rate(10.0, 0.0), 0.0);
        assert_eq!(margin_rate(0.0, 0.0), 0.0);
        assert_eq!(margin_rate(20.0, 100.0), 0.2);
    }

    #[test]
    fn test_monthly_groups_are_chronological() {
        let dataset = create_test_dataset();
        let view = FilteredView::all(&dataset);
        let rows = aggregate_by_time(&view, TimeBucket::Monthly);

        let keys: Vec<&str> = rows.iter().map(|r| r.group_key.as_str()).collect();
        assert_eq!(keys, vec!["2022-12", "2023-01", "2023-02"]);

        let jan = &rows[1];
        assert_eq!(jan.sales, 100.0);
        assert_eq!(jan.quantity, 10);
        assert_eq!(jan.profit, 20.0);
        assert_eq!(jan.margin_rate, 0.2);
        assert_eq!(jan.row_count, 3);
    }

    #[test]
    fn test_daily_and_weekly_keys() {
        let dataset = create_test_dataset();
        let view = FilteredView::all(&dataset);

        let daily = aggregate_by_time(&view, TimeBucket::Daily);
        assert_eq!(daily.len(), 5);
        assert_eq!(daily[0].group_key, "2022-12-30");
        assert_eq!(daily[1].row_count, 2);

        let weekly = aggregate_by_time(&view, TimeBucket::Weekly);
        let keys: Vec<&str> = weekly.iter().map(|r| r.group_key.as_str()).collect();
        assert_eq!(keys, vec!["2022-W52", "2023-W01", "2023-W02", "2023-W07", "2023-W08"]);
    }

    #[test]
    fn test_time_groups_partition_the_view() {
        let dataset = create_test_dataset();
        let view = FilteredView::all(&dataset);
        for bucket in [TimeBucket::Daily, TimeBucket::Weekly, TimeBucket::Monthly] {
            let rows = aggregate_by_time(&view, bucket);
            let total: usize = rows.iter().map(|r| r.row_count).sum();
            assert_eq!(total, view.len(), "{:?}", bucket);
            let quantity: u64 = rows.iter().map(|r| r.quantity).sum();
            assert_eq!(quantity, 16);
        }
    }

    #[test]
    fn test_zero_sales_group_has_zero_margin() {
        let dataset = create_test_dataset();
        let view = FilteredView::all(&dataset);

        let by_day = aggregate_by_time(&view, TimeBucket::Daily);
        let binder_day = by_day.iter().find(|r| r.group_key == "2023-02-14").unwrap();
        assert_eq!(binder_day.margin_rate, 0.0);

        let by_product = aggregate_by_product(&view, 10, RankingMetric::MarginRate);
        let binder = by_product.iter().find(|r| r.group_key == "Binder").unwrap();
        assert_eq!(binder.margin_rate, 0.0);
        assert!(by_product.iter().all(|r| r.margin_rate.is_finite()));
    }

    #[test]
    fn test_product_ranking_by_sales() {
        let dataset = create_test_dataset();
        let view = FilteredView::all(&dataset);
        let rows = aggregate_by_product(&view, 10, RankingMetric::Sales);

        let names: Vec<&str> = rows.iter().map(|r| r.group_key.as_str()).collect();
        assert_eq!(names, vec!["Paper", "Stapler", "Pens", "Binder"]);
        assert_eq!(rows[0].sales, 150.0);
        assert_eq!(rows[0].profit, 5.0);
    }

    #[test]
    fn test_product_ranking_respects_top_n() {
        let dataset = create_test_dataset();
        let view = FilteredView::all(&dataset);

        let rows = aggregate_by_product(&view, 2, RankingMetric::Quantity);
        let names: Vec<&str> = rows.iter().map(|r| r.group_key.as_str()).collect();
        assert_eq!(names, vec!["Paper", "Pens"]);

        assert!(aggregate_by_product(&view, 0, RankingMetric::Sales).is_empty());
    }

    #[test]
    fn test_product_ties_break_by_name() {
        let dataset = create_test_dataset();
        let view = FilteredView::all(&dataset);

        // Binder and Stapler both sold quantity 1
        let rows = aggregate_by_product(&view, 10, RankingMetric::Quantity);
        let names: Vec<&str> = rows.iter().map(|r| r.group_key.as_str()).collect();
        assert_eq!(names, vec!["Paper", "Pens", "Binder", "Stapler"]);
    }

    #[test]
    fn test_product_ranking_is_sorted_descending() {
        let dataset = create_test_dataset();
        let view = FilteredView::all(&dataset);
        for metric in [
            RankingMetric::Sales,
            RankingMetric::Quantity,
            RankingMetric::Profit,
            RankingMetric::MarginRate,
        ] {
            let rows = aggregate_by_product(&view, 3, metric);
            assert!(rows.len() <= 3);
            for pair in rows.windows(2) {
                assert!(pair[0].metric(metric) >= pair[1].metric(metric), "{:?}", metric);
            }
        }
    }

    #[test]
    fn test_summarize() {
        let dataset = create_test_dataset();
        let summary = summarize(&FilteredView::all(&dataset));
        assert_eq!(summary.sales, 280.0);
        assert_eq!(summary.quantity, 16);
        assert_eq!(summary.profit, 23.0);
        assert_eq!(summary.row_count, 6);
        assert!((summary.margin_rate - 23.0 / 280.0).abs() < 1e-12);
    }
}
