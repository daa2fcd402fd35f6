//! FILENAME: core/dashboard-engine/src/view.rs
//! Dashboard View - Renderable output for the presentation layer.
//!
//! Everything here is plain data: the presentation layer draws dropdowns,
//! KPI cards and charts from it without calling back into the engine.

use crate::definition::RankingMetric;
use chrono::NaiveDate;
use engine::{format_kpi, Dimension, FilterSelection, KpiKind, TimeBucket};
use serde::{Deserialize, Serialize};

/// Notice shown in place of the charts when the filters match nothing.
pub const NO_DATA_MESSAGE: &str = "No data available. Please adjust your filters.";

// ============================================================================
// FILTER OPTIONS
// ============================================================================

/// Resolved dropdown for one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionOptions {
    pub dimension: Dimension,
    pub depends_on: Option<Dimension>,
    /// `All` first, then the sorted distinct values.
    pub options: Vec<String>,
    /// Label of the (reconciled) current selection.
    pub selected: String,
}

// ============================================================================
// AGGREGATES
// ============================================================================

/// One group's reduced metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRow {
    /// Period label or product name.
    pub group_key: String,
    pub sales: f64,
    pub quantity: u64,
    pub profit: f64,
    /// profit / sales, 0 when sales is 0.
    pub margin_rate: f64,
    /// Number of records folded into this group.
    pub row_count: usize,
}

impl AggregateRow {
    pub fn metric(&self, metric: RankingMetric) -> f64 {
        match metric {
            RankingMetric::Sales => self.sales,
            RankingMetric::Quantity => self.quantity as f64,
            RankingMetric::Profit => self.profit,
            RankingMetric::MarginRate => self.margin_rate,
        }
    }
}

/// Grand totals over a whole filtered view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    pub sales: f64,
    pub quantity: u64,
    pub profit: f64,
    pub margin_rate: f64,
    pub row_count: usize,
}

/// A display-ready metric card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiCard {
    pub label: String,
    pub kind: KpiKind,
    pub value: f64,
    pub display: String,
}

impl KpiCard {
    pub fn new(label: &str, kind: KpiKind, value: f64) -> Self {
        KpiCard {
            label: label.to_string(),
            kind,
            value,
            display: format_kpi(kind, value),
        }
    }
}

impl KpiSummary {
    /// The four cards across the top of the dashboard.
    pub fn cards(&self) -> Vec<KpiCard> {
        vec![
            KpiCard::new("Sales", KpiKind::Currency, self.sales),
            KpiCard::new("Quantity Sold", KpiKind::Count, self.quantity as f64),
            KpiCard::new("Profit", KpiKind::Currency, self.profit),
            KpiCard::new("Margin Rate", KpiKind::Percentage, self.margin_rate),
        ]
    }
}

// ============================================================================
// DASHBOARD VIEW
// ============================================================================

/// Outcome of one recompute pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DashboardStatus {
    /// KPIs and charts are populated.
    Ready,
    /// Filters matched nothing; charts are skipped.
    NoData,
    /// From date is after To date; filtering and aggregation were skipped.
    InvalidDateRange,
}

/// The complete output of a recompute pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub status: DashboardStatus,
    /// Warning or notice for the user, absent when `status` is `Ready`.
    pub message: Option<String>,
    pub options: Vec<DimensionOptions>,
    /// Selection actually applied, after stale choices were reset.
    pub selection: FilterSelection,
    /// Dimensions whose stale selection was reset to `All` during this pass.
    pub resets: Vec<Dimension>,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub bucket: TimeBucket,
    pub metric: RankingMetric,
    /// Records passing the filters (0 when the range was invalid).
    pub row_count: usize,
    pub summary: Option<KpiSummary>,
    pub kpis: Vec<KpiCard>,
    pub trend: Vec<AggregateRow>,
    pub ranking: Vec<AggregateRow>,
}

impl DashboardView {
    pub fn is_ready(&self) -> bool {
        self.status == DashboardStatus::Ready
    }
}

// ============================================================================
// DETAIL ROWS
// ============================================================================

/// The "show detailed data" table: source rows behind the current view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailResult {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Rows in the view, including those beyond `max_rows`.
    pub total_count: usize,
    pub is_truncated: bool,
    pub max_rows: usize,
}
