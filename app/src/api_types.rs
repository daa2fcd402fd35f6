//! FILENAME: app/src/api_types.rs
// PURPOSE: Response types owned by the app layer (engine views are re-used as-is).

use chrono::NaiveDate;
use dashboard_engine::ChainLink;
use serde::{Deserialize, Serialize};

/// Facts about the running session, for the status bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub session_id: String,
    pub row_count: usize,
    /// Earliest and latest order date in the loaded data.
    pub data_from: NaiveDate,
    pub data_to: NaiveDate,
    pub chain: Vec<ChainLink>,
    pub cache_entries: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
}
