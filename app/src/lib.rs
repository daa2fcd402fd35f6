//! FILENAME: app/src/lib.rs
// PURPOSE: Main library entry point for the Superstore dashboard host.
// CONTEXT: The binary and the integration tests drive the same command layer.

pub mod api_types;
pub mod commands;
pub mod config;
pub mod logging;
pub mod state;

pub use api_types::SessionInfo;
pub use commands::{
    apply_request, export_view_csv, export_view_xlsx, get_dashboard, get_details,
    get_filter_options, get_session_info, reset_filters, set_date_range, set_filter,
    set_ranking, set_time_bucket,
};
pub use config::{Args, ChainMode, OutputMode};
pub use logging::{init_log_file, init_logging, write_log};
pub use state::{create_app_state, create_app_state_with_chain, AppState, DatasetStore, DATASET_STORE};

use serde::Serialize;
use std::io::Write;
use std::path::Path;

// ============================================================================
// ENTRY POINT
// ============================================================================

/// Runs one command-line invocation against the process-wide dataset.
pub fn run(args: Args) -> Result<(), String> {
    run_with_store(args, &DATASET_STORE)
}

/// Runs one invocation with an explicit dataset store.
pub fn run_with_store(args: Args, store: &DatasetStore) -> Result<(), String> {
    let log_path = init_logging(args.log_level, args.log_file.as_deref())?;
    log_enter!("APP", "run", "data={} mode={:?}", args.data.display(), args.mode);

    let dataset = store.get_or_load(&args.data)?;
    let state = create_app_state_with_chain(dataset, args.chain.dimension_chain());
    let request = args.to_request(&state.dataset);
    let view = apply_request(&state, request)?;

    let output = args.output.as_deref();
    match args.mode {
        OutputMode::Dashboard => emit_json(&view, output)?,
        OutputMode::Options => emit_json(&get_filter_options(&state)?, output)?,
        OutputMode::Details => emit_json(&get_details(&state, args.max_rows)?, output)?,
        OutputMode::Csv => emit_bytes(&export_view_csv(&state)?, output)?,
        OutputMode::Xlsx => {
            let path = output.ok_or("--mode xlsx requires --output <FILE>")?;
            let rows = export_view_xlsx(&state, path)?;
            log_info!("APP", "wrote {} rows to {}", rows, path.display());
        }
    }

    log_exit!("APP", "run", "status={:?} rows={}", view.status, view.row_count);
    if log_path.is_some() {
        logging::sort_log_file()?;
    }
    Ok(())
}

fn emit_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<(), String> {
    let mut json = serde_json::to_vec_pretty(value).map_err(|e| e.to_string())?;
    json.push(b'\n');
    emit_bytes(&json, output)
}

fn emit_bytes(bytes: &[u8], output: Option<&Path>) -> Result<(), String> {
    match output {
        Some(path) => std::fs::write(path, bytes)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e)),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(bytes)
                .and_then(|()| stdout.flush())
                .map_err(|e| format!("Failed to write output: {}", e))
        }
    }
}
