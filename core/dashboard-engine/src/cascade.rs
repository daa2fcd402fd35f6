//! FILENAME: core/dashboard-engine/src/cascade.rs
//! Cascading filter resolution.
//!
//! Walks the dimension chain in order. Each link's options come from the
//! whole table when its parent is unconstrained (or it has no parent), and
//! from the rows matching the parent's selection otherwise. A selection that
//! is no longer among its freshly computed options is reset to `All` before
//! any later link reads it, so a parent change can never leave a dangling
//! child choice behind.

use crate::definition::DimensionChain;
use crate::view::DimensionOptions;
use engine::{Dataset, Dimension, FilterSelection, Selection, ALL_OPTION};
use std::collections::BTreeSet;

/// Result of resolving the chain against a selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFilters {
    /// One entry per chain link, in chain order.
    pub options: Vec<DimensionOptions>,
    /// The input selection with stale choices reset.
    pub selection: FilterSelection,
    /// Dimensions that were reset, in chain order.
    pub resets: Vec<Dimension>,
}

impl ResolvedFilters {
    pub fn options_for(&self, dimension: Dimension) -> Option<&[String]> {
        self.options
            .iter()
            .find(|o| o.dimension == dimension)
            .map(|o| o.options.as_slice())
    }
}

/// Computes the option list for every link in `chain`.
pub fn resolve_options(
    dataset: &Dataset,
    chain: &DimensionChain,
    selection: &FilterSelection,
) -> ResolvedFilters {
    let mut reconciled = selection.clone();
    let mut options = Vec::with_capacity(chain.len());
    let mut resets = Vec::new();

    for link in chain.links() {
        let parent = link.depends_on.and_then(|parent| {
            reconciled
                .get(parent)
                .value()
                .map(|value| (parent, value.to_string()))
        });

        let values: Vec<String> = match parent {
            None => dataset.distinct_values(link.dimension).to_vec(),
            Some((parent, ref value)) => distinct_where(dataset, link.dimension, parent, value),
        };

        // `values` is sorted, so membership is a binary search
        let stale = match reconciled.get(link.dimension) {
            Selection::Value(current) if values.binary_search(current).is_err() => {
                Some(current.clone())
            }
            _ => None,
        };
        if let Some(current) = stale {
            log::warn!(
                "{} selection {:?} is not available under its parent; resetting to {}",
                link.dimension,
                current,
                ALL_OPTION
            );
            reconciled.reset(link.dimension);
            resets.push(link.dimension);
        }

        let mut list = Vec::with_capacity(values.len() + 1);
        list.push(ALL_OPTION.to_string());
        list.extend(values);

        options.push(DimensionOptions {
            dimension: link.dimension,
            depends_on: link.depends_on,
            options: list,
            selected: reconciled.get(link.dimension).label().to_string(),
        });
    }

    log::debug!(
        "resolved {} dropdowns, {} reset(s)",
        options.len(),
        resets.len()
    );

    ResolvedFilters {
        options,
        selection: reconciled,
        resets,
    }
}

/// Sorted distinct non-empty values of `dimension` over rows where `parent == value`.
fn distinct_where(dataset: &Dataset, dimension: Dimension, parent: Dimension, value: &str) -> Vec<String> {
    dataset
        .records()
        .iter()
        .filter(|record| record.dimension(parent) == Some(value))
        .filter_map(|record| record.dimension(dimension))
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
