//! FILENAME: app/src/commands.rs
//! PURPOSE: Dashboard commands exposed to the presentation layer.
//! CONTEXT: Every command takes the session state and returns `Result<T, String>`;
//! errors are user-facing messages.

use crate::api_types::SessionInfo;
use crate::config::parse_date;
use crate::state::AppState;
use crate::{log_debug, log_enter, log_exit, log_info, log_warn};
use dashboard_engine::{
    detail_rows, filtered_view, resolve_options, DashboardRequest, DashboardView, DetailResult,
    DimensionOptions, RankingMetric,
};
use engine::{Dimension, EngineError, Selection, TimeBucket};
use persistence::{export_csv, save_xlsx};
use std::path::Path;
use std::time::Instant;

// ============================================================================
// DASHBOARD
// ============================================================================

/// Recomputes (or recalls) the dashboard for the current parameters.
pub fn get_dashboard(state: &AppState) -> Result<DashboardView, String> {
    let mut request = state.request.lock().map_err(|e| e.to_string())?;
    let mut cache = state.cache.lock().map_err(|e| e.to_string())?;

    let started = Instant::now();
    let view = cache
        .get_or_compute(&state.dataset, &state.chain, &request)
        .clone();

    if !view.resets.is_empty() {
        log_info!("FILTER", "reset stale selections: {:?}", view.resets);
        request.selection = view.selection.clone();
    }
    if let Some(message) = view.message.as_deref() {
        log_warn!("DASH", "{:?}: {}", view.status, message);
    }

    log_debug!(
        "DASH",
        "status={:?} rows={} trend={} ranking={} in {:?}",
        view.status,
        view.row_count,
        view.trend.len(),
        view.ranking.len(),
        started.elapsed()
    );
    Ok(view)
}

/// Replaces all parameters at once and recomputes.
pub fn apply_request(state: &AppState, request: DashboardRequest) -> Result<DashboardView, String> {
    log_enter!("CMD", "apply_request", "{:?}", request);
    {
        let mut current = state.request.lock().map_err(|e| e.to_string())?;
        *current = request;
    }
    let view = get_dashboard(state)?;
    log_exit!("CMD", "apply_request", "status={:?}", view.status);
    Ok(view)
}

// ============================================================================
// FILTERS
// ============================================================================

/// Dropdown options for the current selection, in chain order.
pub fn get_filter_options(state: &AppState) -> Result<Vec<DimensionOptions>, String> {
    let mut request = state.request.lock().map_err(|e| e.to_string())?;
    let resolved = resolve_options(&state.dataset, &state.chain, &request.selection);
    if !resolved.resets.is_empty() {
        request.selection = resolved.selection;
    }
    Ok(resolved.options)
}

/// Sets one dropdown by dimension name ("Region", "subCategory", ...).
pub fn set_filter(state: &AppState, dimension: &str, value: &str) -> Result<DashboardView, String> {
    log_enter!("CMD", "set_filter", "{}={}", dimension, value);
    let dimension = Dimension::from_name(dimension)
        .ok_or_else(|| EngineError::UnknownDimension(dimension.to_string()).to_string())?;
    {
        let mut request = state.request.lock().map_err(|e| e.to_string())?;
        request.selection.set(dimension, Selection::from_label(value));
    }
    get_dashboard(state)
}

/// Sets every dropdown back to "All".
pub fn reset_filters(state: &AppState) -> Result<DashboardView, String> {
    {
        let mut request = state.request.lock().map_err(|e| e.to_string())?;
        for dimension in Dimension::ALL {
            request.selection.reset(dimension);
        }
    }
    get_dashboard(state)
}

/// Sets the date bounds (`YYYY-MM-DD`). A reversed range is accepted here
/// and reported through the view's status.
pub fn set_date_range(state: &AppState, from: &str, to: &str) -> Result<DashboardView, String> {
    let from = parse_date(from)?;
    let to = parse_date(to)?;
    {
        let mut request = state.request.lock().map_err(|e| e.to_string())?;
        request.from = from;
        request.to = to;
    }
    get_dashboard(state)
}

pub fn set_time_bucket(state: &AppState, bucket: &str) -> Result<DashboardView, String> {
    let bucket = TimeBucket::from_name(bucket)
        .ok_or_else(|| format!("Unknown time bucket: {}", bucket))?;
    {
        let mut request = state.request.lock().map_err(|e| e.to_string())?;
        request.bucket = bucket;
    }
    get_dashboard(state)
}

pub fn set_ranking(state: &AppState, metric: &str, top_n: usize) -> Result<DashboardView, String> {
    let metric = RankingMetric::from_name(metric)
        .ok_or_else(|| format!("Unknown ranking metric: {}", metric))?;
    {
        let mut request = state.request.lock().map_err(|e| e.to_string())?;
        request.metric = metric;
        request.top_n = top_n;
    }
    get_dashboard(state)
}

// ============================================================================
// DETAILS & EXPORT
// ============================================================================

fn current_request(state: &AppState) -> Result<DashboardRequest, String> {
    state
        .request
        .lock()
        .map(|request| request.clone())
        .map_err(|e| e.to_string())
}

/// Source rows behind the current view, at most `max_rows` of them.
pub fn get_details(state: &AppState, max_rows: usize) -> Result<DetailResult, String> {
    let request = current_request(state)?;
    let view = filtered_view(&state.dataset, &state.chain, &request).map_err(|e| e.to_string())?;
    Ok(detail_rows(&view, max_rows))
}

/// The current view's records as CSV bytes.
pub fn export_view_csv(state: &AppState) -> Result<Vec<u8>, String> {
    log_enter!("CMD", "export_view_csv");
    let request = current_request(state)?;
    let view = filtered_view(&state.dataset, &state.chain, &request).map_err(|e| e.to_string())?;
    let bytes = export_csv(view.records()).map_err(|e| e.to_string())?;
    log_exit!("CMD", "export_view_csv", "rows={} bytes={}", view.len(), bytes.len());
    Ok(bytes)
}

/// Writes the current view's records to an XLSX workbook at `path`.
pub fn export_view_xlsx(state: &AppState, path: &Path) -> Result<usize, String> {
    log_enter!("CMD", "export_view_xlsx", "path={}", path.display());
    let request = current_request(state)?;
    let view = filtered_view(&state.dataset, &state.chain, &request).map_err(|e| e.to_string())?;
    save_xlsx(view.records(), path).map_err(|e| e.to_string())?;
    log_exit!("CMD", "export_view_xlsx", "rows={}", view.len());
    Ok(view.len())
}

// ============================================================================
// SESSION
// ============================================================================

pub fn get_session_info(state: &AppState) -> Result<SessionInfo, String> {
    let cache = state.cache.lock().map_err(|e| e.to_string())?;
    let (hits, misses) = cache.stats();
    let (data_from, data_to) = state.dataset.date_span();
    Ok(SessionInfo {
        session_id: state.session_id.to_string(),
        row_count: state.dataset.len(),
        data_from,
        data_to,
        chain: state.chain.links().to_vec(),
        cache_entries: cache.len(),
        cache_hits: hits,
        cache_misses: misses,
    })
}
