//! FILENAME: core/engine/src/error.rs

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("From Date ({from}) must be earlier than To Date ({to})")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },

    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),

    #[error("Invalid dimension chain: {0}")]
    InvalidChain(String),

    #[error("Dataset contains no records")]
    EmptyDataset,
}
