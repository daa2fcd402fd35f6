//! FILENAME: core/dashboard-engine/src/detail.rs
//! Detail rows behind the current view ("show detailed data").

use crate::filter::FilteredView;
use crate::view::DetailResult;
use engine::RECORD_COLUMNS;

/// Returns up to `max_rows` source rows of the view as text, in load order.
pub fn detail_rows(view: &FilteredView<'_>, max_rows: usize) -> DetailResult {
    let rows: Vec<Vec<String>> = view
        .records()
        .take(max_rows)
        .map(|record| record.to_row().to_vec())
        .collect();

    DetailResult {
        headers: RECORD_COLUMNS.iter().map(|h| h.to_string()).collect(),
        rows,
        total_count: view.len(),
        is_truncated: view.len() > max_rows,
        max_rows,
    }
}
