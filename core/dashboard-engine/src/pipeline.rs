//! FILENAME: core/dashboard-engine/src/pipeline.rs
//! Dashboard recompute pipeline.
//!
//! One pass per interaction:
//! 1. resolve the cascading dropdowns (resetting stale selections)
//! 2. validate the date range; a reversed range stops the pass here
//! 3. filter the base table
//! 4. on a non-empty view, aggregate KPIs, trend and ranking

use crate::aggregate::{aggregate_by_product, aggregate_by_time, summarize};
use crate::cascade::{resolve_options, ResolvedFilters};
use crate::definition::{DashboardRequest, DimensionChain};
use crate::filter::{apply_filters, FilteredView};
use crate::view::{DashboardStatus, DashboardView, NO_DATA_MESSAGE};
use engine::{Dataset, DateRange, EngineError};
use rustc_hash::FxHashMap;

// ============================================================================
// CALCULATOR
// ============================================================================

pub struct DashboardCalculator<'a> {
    dataset: &'a Dataset,
    chain: &'a DimensionChain,
    request: &'a DashboardRequest,
}

impl<'a> DashboardCalculator<'a> {
    pub fn new(dataset: &'a Dataset, chain: &'a DimensionChain, request: &'a DashboardRequest) -> Self {
        DashboardCalculator {
            dataset,
            chain,
            request,
        }
    }

    pub fn calculate(&self) -> DashboardView {
        let resolved = resolve_options(self.dataset, self.chain, &self.request.selection);
        let mut view = self.empty_view(resolved);

        let range = match DateRange::new(self.request.from, self.request.to) {
            Ok(range) => range,
            Err(err) => {
                view.status = DashboardStatus::InvalidDateRange;
                view.message = Some(err.to_string());
                return view;
            }
        };

        let filtered = apply_filters(self.dataset, &view.selection, &range);
        view.row_count = filtered.len();

        if filtered.is_empty() {
            log::info!("no records match the current filters");
            view.status = DashboardStatus::NoData;
            view.message = Some(NO_DATA_MESSAGE.to_string());
            return view;
        }

        let summary = summarize(&filtered);
        view.kpis = summary.cards();
        view.summary = Some(summary);
        view.trend = aggregate_by_time(&filtered, self.request.bucket);
        view.ranking = aggregate_by_product(&filtered, self.request.top_n, self.request.metric);
        view.status = DashboardStatus::Ready;
        view
    }

    fn empty_view(&self, resolved: ResolvedFilters) -> DashboardView {
        DashboardView {
            status: DashboardStatus::Ready,
            message: None,
            options: resolved.options,
            selection: resolved.selection,
            resets: resolved.resets,
            from: self.request.from,
            to: self.request.to,
            bucket: self.request.bucket,
            metric: self.request.metric,
            row_count: 0,
            summary: None,
            kpis: Vec::new(),
            trend: Vec::new(),
            ranking: Vec::new(),
        }
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Runs one full recompute pass.
/// This is the main entry point for the presentation layer.
pub fn compute_dashboard(
    dataset: &Dataset,
    chain: &DimensionChain,
    request: &DashboardRequest,
) -> DashboardView {
    DashboardCalculator::new(dataset, chain, request).calculate()
}

/// The filtered view a request selects, for export and detail tables.
///
/// Stale selections are reset exactly as in `compute_dashboard`, so the rows
/// exported always match the charts on screen.
pub fn filtered_view<'a>(
    dataset: &'a Dataset,
    chain: &DimensionChain,
    request: &DashboardRequest,
) -> Result<FilteredView<'a>, EngineError> {
    let range = DateRange::new(request.from, request.to)?;
    let resolved = resolve_options(dataset, chain, &request.selection);
    Ok(apply_filters(dataset, &resolved.selection, &range))
}

// ============================================================================
// RECOMPUTE CACHE
// ============================================================================

/// Memo of recent passes, keyed strictly on the request.
///
/// Only valid for a single dataset and chain; the owner drops it when either
/// changes. When full, the whole memo is cleared.
#[derive(Debug)]
pub struct RecomputeCache {
    entries: FxHashMap<DashboardRequest, DashboardView>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl RecomputeCache {
    pub fn new(capacity: usize) -> Self {
        RecomputeCache {
            entries: FxHashMap::default(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Returns the cached view for `request`, computing and storing it on a miss.
    pub fn get_or_compute(
        &mut self,
        dataset: &Dataset,
        chain: &DimensionChain,
        request: &DashboardRequest,
    ) -> &DashboardView {
        if self.entries.contains_key(request) {
            self.hits += 1;
        } else {
            self.misses += 1;
            if self.entries.len() >= self.capacity {
                self.entries.clear();
            }
            let view = compute_dashboard(dataset, chain, request);
            self.entries.insert(request.clone(), view);
        }
        &self.entries[request]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (hits, misses) since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

impl Default for RecomputeCache {
    fn default() -> Self {
        Self::new(32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::RankingMetric;
    use chrono::NaiveDate;
    use engine::{Dimension, FilterSelection, Record, TimeBucket};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(day: NaiveDate, region: &str, state: &str, product: &str, sales: f64, profit: f64) -> Record {
        Record {
            order_date: day,
            region: region.to_string(),
            state: state.to_string(),
            city: "Anytown".to_string(),
            category: "Furniture".to_string(),
            sub_category: "Tables".to_string(),
            product_name: product.to_string(),
            sales,
            quantity: 2,
            profit,
        }
    }

    fn create_test_dataset() -> Dataset {
        Dataset::new(vec![
            record(date(2023, 1, 5), "East", "New York", "Table A", 100.0, 20.0),
            record(date(2023, 1, 20), "East", "Ohio", "Table B", 0.0, 0.0),
            record(date(2023, 2, 2), "West", "Oregon", "Table A", 300.0, -30.0),
            record(date(2023, 3, 15), "Central", "Texas", "Table C", 50.0, 5.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_default_request_is_ready() {
        let dataset = create_test_dataset();
        let request = DashboardRequest::for_dataset(&dataset);
        let view = compute_dashboard(&dataset, &DimensionChain::default(), &request);

        assert!(view.is_ready());
        assert!(view.message.is_none());
        assert_eq!(view.row_count, 4);
        assert_eq!(view.options.len(), 5);
        assert_eq!(view.kpis.len(), 4);
        assert_eq!(view.kpis[0].display, "$450.00");
        let months: Vec<&str> = view.trend.iter().map(|r| r.group_key.as_str()).collect();
        assert_eq!(months, vec!["2023-01", "2023-02", "2023-03"]);
        assert_eq!(view.ranking[0].group_key, "Table A");
    }

    #[test]
    fn test_invalid_range_skips_aggregation() {
        let dataset = create_test_dataset();
        let mut request = DashboardRequest::for_dataset(&dataset);
        request.from = date(2023, 3, 1);
        request.to = date(2023, 1, 1);

        let view = compute_dashboard(&dataset, &DimensionChain::default(), &request);
        assert_eq!(view.status, DashboardStatus::InvalidDateRange);
        assert!(view.message.as_deref().unwrap().contains("must be earlier"));
        assert!(view.summary.is_none());
        assert!(view.trend.is_empty());
        assert!(view.ranking.is_empty());
        assert_eq!(view.row_count, 0);
        // Dropdowns are still served so the user can fix the range
        assert_eq!(view.options.len(), 5);
        // The reversed range is reported, not swapped
        assert_eq!(view.from, date(2023, 3, 1));

        assert!(matches!(
            filtered_view(&dataset, &DimensionChain::default(), &request),
            Err(EngineError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_no_data_status() {
        let dataset = create_test_dataset();
        let mut request = DashboardRequest::for_dataset(&dataset);
        request.from = date(2024, 1, 1);
        request.to = date(2024, 12, 31);

        let view = compute_dashboard(&dataset, &DimensionChain::default(), &request);
        assert_eq!(view.status, DashboardStatus::NoData);
        assert_eq!(view.message.as_deref(), Some(NO_DATA_MESSAGE));
        assert!(view.kpis.is_empty());
        assert!(view.trend.is_empty());
    }

    #[test]
    fn test_stale_selection_is_reset_before_filtering() {
        let dataset = create_test_dataset();
        let mut request = DashboardRequest::for_dataset(&dataset);
        request.selection = FilterSelection::new()
            .with(Dimension::Region, "West")
            .with(Dimension::State, "New York");

        let view = compute_dashboard(&dataset, &DimensionChain::default(), &request);
        assert_eq!(view.resets, vec![Dimension::State]);
        // Without the reset this would be an empty result
        assert!(view.is_ready());
        assert_eq!(view.row_count, 1);

        let rows = filtered_view(&dataset, &DimensionChain::default(), &request).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_margin_ranking_with_zero_sales() {
        let dataset = create_test_dataset();
        let mut request = DashboardRequest::for_dataset(&dataset);
        request.selection = FilterSelection::new().with(Dimension::Region, "East");
        request.metric = RankingMetric::MarginRate;
        request.bucket = TimeBucket::Daily;

        let view = compute_dashboard(&dataset, &DimensionChain::default(), &request);
        let names: Vec<&str> = view.ranking.iter().map(|r| r.group_key.as_str()).collect();
        assert_eq!(names, vec!["Table A", "Table B"]);
        assert_eq!(view.ranking[0].margin_rate, 0.2);
        assert_eq!(view.ranking[1].margin_rate, 0.0);
        assert_eq!(view.trend.len(), 2);
    }

    #[test]
    fn test_recompute_cache_keys_on_request() {
        let dataset = create_test_dataset();
        let chain = DimensionChain::default();
        let mut cache = RecomputeCache::new(4);
        let request = DashboardRequest::for_dataset(&dataset);

        let first = cache.get_or_compute(&dataset, &chain, &request).clone();
        let second = cache.get_or_compute(&dataset, &chain, &request).clone();
        assert_eq!(first, second);
        assert_eq!(cache.stats(), (1, 1));

        let mut weekly = request.clone();
        weekly.bucket = TimeBucket::Weekly;
        let third = cache.get_or_compute(&dataset, &chain, &weekly).clone();
        assert_ne!(first.trend, third.trend);
        assert_eq!(cache.stats(), (1, 2));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_recompute_cache_clears_when_full() {
        let dataset = create_test_dataset();
        let chain = DimensionChain::default();
        let mut cache = RecomputeCache::new(1);
        let request = DashboardRequest::for_dataset(&dataset);
        let mut other = request.clone();
        other.top_n = 1;

        cache.get_or_compute(&dataset, &chain, &request);
        cache.get_or_compute(&dataset, &chain, &other);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_or_compute(&dataset, &chain, &other).ranking.len(), 1);
    }
}
