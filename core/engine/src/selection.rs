//! FILENAME: core/engine/src/selection.rs
//! PURPOSE: User-chosen filter parameters: per-dimension selections and the date range.
//! CONTEXT: Both are rebuilt by the caller on every interaction and passed by
//! reference into the pipeline. Neither is stored as ambient state.

use crate::error::EngineError;
use crate::record::Dimension;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Literal shown for the unconstrained option in every dropdown.
pub const ALL_OPTION: &str = "All";

// ============================================================================
// SELECTION
// ============================================================================

/// The current choice for one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum Selection {
    /// No restriction on this dimension.
    #[default]
    All,
    Value(String),
}

impl Selection {
    /// Parses a dropdown label; the literal `All` maps to the unconstrained sentinel.
    pub fn from_label(label: &str) -> Selection {
        if label == ALL_OPTION {
            Selection::All
        } else {
            Selection::Value(label.to_string())
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Selection::All => None,
            Selection::Value(v) => Some(v.as_str()),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    pub fn label(&self) -> &str {
        match self {
            Selection::All => ALL_OPTION,
            Selection::Value(v) => v.as_str(),
        }
    }
}

// ============================================================================
// FILTER SELECTION
// ============================================================================

/// Mapping from every dimension to its current selection.
///
/// Stored as a fixed array indexed by `Dimension::index`, so a missing entry
/// is impossible and equality/hashing is cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FilterSelection {
    selections: [Selection; 5],
}

impl FilterSelection {
    /// Everything unconstrained.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, dimension: Dimension) -> &Selection {
        &self.selections[dimension.index()]
    }

    pub fn set(&mut self, dimension: Dimension, selection: Selection) {
        self.selections[dimension.index()] = selection;
    }

    /// Builder-style setter for a concrete value.
    pub fn with(mut self, dimension: Dimension, value: &str) -> Self {
        self.set(dimension, Selection::from_label(value));
        self
    }

    pub fn reset(&mut self, dimension: Dimension) {
        self.set(dimension, Selection::All);
    }

    /// Constrained dimensions and their values, in `Dimension::ALL` order.
    pub fn constraints(&self) -> impl Iterator<Item = (Dimension, &str)> + '_ {
        Dimension::ALL
            .into_iter()
            .filter_map(move |d| self.get(d).value().map(|v| (d, v)))
    }

    pub fn is_unconstrained(&self) -> bool {
        self.selections.iter().all(Selection::is_all)
    }
}

// ============================================================================
// DATE RANGE
// ============================================================================

/// Inclusive `[from, to]` bound over the order date.
///
/// The only constructor validates `from <= to`; a reversed range is reported
/// to the caller, never swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, EngineError> {
        if from > to {
            log::warn!("rejected date range {} > {}", from, to);
            return Err(EngineError::InvalidDateRange { from, to });
        }
        Ok(DateRange { from, to })
    }

    pub(crate) fn ordered(from: NaiveDate, to: NaiveDate) -> Self {
        debug_assert!(from <= to);
        DateRange { from, to }
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }
}
