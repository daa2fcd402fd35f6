//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the dashboard data model.
//! CONTEXT: Re-exports public types and modules for use by other crates.

pub mod dataset;
pub mod error;
pub mod number_format;
pub mod period;
pub mod record;
pub mod selection;

// Re-export commonly used types at the crate root
pub use dataset::{Dataset, RowId};
pub use error::EngineError;
pub use number_format::{format_kpi, KpiKind};
pub use period::{PeriodKey, TimeBucket};
pub use record::{Dimension, Record, RECORD_COLUMNS, RECORD_FIELDS};
pub use selection::{DateRange, FilterSelection, Selection, ALL_OPTION};
