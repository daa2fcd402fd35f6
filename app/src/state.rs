//! FILENAME: app/src/state.rs
// PURPOSE: Process-wide dataset and per-session dashboard state.
// CONTEXT: The dataset is read once and shared read-only; everything that
// changes between interactions lives in `AppState` behind its own lock.

use crate::{log_info, log_warn};
use dashboard_engine::{DashboardRequest, DimensionChain, RecomputeCache};
use engine::Dataset;
use once_cell::sync::OnceCell;
use persistence::load_dataset;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// ============================================================================
// DATASET STORE
// ============================================================================

/// Single-initialization holder for the loaded order table.
pub struct DatasetStore {
    cell: OnceCell<(PathBuf, Arc<Dataset>)>,
}

impl DatasetStore {
    pub const fn new() -> Self {
        DatasetStore {
            cell: OnceCell::new(),
        }
    }

    /// Returns the loaded dataset, reading `path` only on the first call.
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<Dataset>, String> {
        if let Some((loaded_from, dataset)) = self.cell.get() {
            if loaded_from != path {
                log_warn!(
                    "DATA",
                    "dataset already loaded from {}; ignoring {}",
                    loaded_from.display(),
                    path.display()
                );
            }
            return Ok(Arc::clone(dataset));
        }

        let (_, dataset) = self.cell.get_or_try_init(|| {
            let dataset = load_dataset(path).map_err(|e| e.to_string())?;
            log_info!(
                "DATA",
                "loaded {} rows from {}",
                dataset.len(),
                path.display()
            );
            Ok::<_, String>((path.to_path_buf(), Arc::new(dataset)))
        })?;
        Ok(Arc::clone(dataset))
    }

    pub fn get(&self) -> Option<Arc<Dataset>> {
        self.cell.get().map(|(_, dataset)| Arc::clone(dataset))
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl Default for DatasetStore {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide store used by the binary.
pub static DATASET_STORE: DatasetStore = DatasetStore::new();

// ============================================================================
// APPLICATION STATE
// ============================================================================

pub struct AppState {
    pub session_id: Uuid,
    pub dataset: Arc<Dataset>,
    pub chain: DimensionChain,
    /// Current parameters; selection is kept reconciled after each pass.
    pub request: Mutex<DashboardRequest>,
    pub cache: Mutex<RecomputeCache>,
}

/// Session over `dataset` with the linear Region to Sub-Category cascade.
pub fn create_app_state(dataset: Arc<Dataset>) -> AppState {
    create_app_state_with_chain(dataset, DimensionChain::default())
}

pub fn create_app_state_with_chain(dataset: Arc<Dataset>, chain: DimensionChain) -> AppState {
    let request = DashboardRequest::for_dataset(&dataset);
    let session_id = Uuid::new_v4();
    log_info!(
        "SESSION",
        "session {} over {} rows, {} filter levels",
        session_id,
        dataset.len(),
        chain.len()
    );
    AppState {
        session_id,
        dataset,
        chain,
        request: Mutex::new(request),
        cache: Mutex::new(RecomputeCache::default()),
    }
}
