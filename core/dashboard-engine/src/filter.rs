//! FILENAME: core/dashboard-engine/src/filter.rs
//! Predicate filtering of the base table.
//!
//! A `FilteredView` is a list of row ids into a borrowed `Dataset`. Views are
//! never mutated; every filter step produces a new one. Predicates are
//! independent equality/range checks, so the order they run in does not
//! change the resulting rows.

use engine::{Dataset, DateRange, Dimension, FilterSelection, Record, RowId};

// ============================================================================
// PREDICATES
// ============================================================================

/// A single row test.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// The dimension's value equals `value` (an empty cell never matches).
    Equals { dimension: Dimension, value: String },
    /// `from <= order_date <= to`.
    DateWithin(DateRange),
}

impl Predicate {
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Predicate::Equals { dimension, value } => record.dimension(*dimension) == Some(value.as_str()),
            Predicate::DateWithin(range) => range.contains(record.order_date),
        }
    }
}

/// One equality predicate per constrained dimension, then the date range.
pub fn build_predicates(selection: &FilterSelection, range: &DateRange) -> Vec<Predicate> {
    let mut predicates: Vec<Predicate> = selection
        .constraints()
        .map(|(dimension, value)| Predicate::Equals {
            dimension,
            value: value.to_string(),
        })
        .collect();
    predicates.push(Predicate::DateWithin(*range));
    predicates
}

// ============================================================================
// FILTERED VIEW
// ============================================================================

#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    rows: Vec<RowId>,
}

impl<'a> FilteredView<'a> {
    /// A view over every record.
    pub fn all(dataset: &'a Dataset) -> Self {
        FilteredView {
            dataset,
            rows: dataset.row_ids().collect(),
        }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn row_ids(&self) -> &[RowId] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Records in the view, in load order.
    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let dataset = self.dataset;
        self.rows.iter().map(move |&row| dataset.record(row))
    }

    /// Rows paired with their ids, for lookups of derived columns.
    pub fn rows(&self) -> impl Iterator<Item = (RowId, &'a Record)> + '_ {
        let dataset = self.dataset;
        self.rows.iter().map(move |&row| (row, dataset.record(row)))
    }

    /// Keeps the rows matching one predicate.
    pub fn filter_by(&self, predicate: &Predicate) -> FilteredView<'a> {
        let rows = self
            .rows
            .iter()
            .copied()
            .filter(|&row| predicate.matches(self.dataset.record(row)))
            .collect();
        FilteredView {
            dataset: self.dataset,
            rows,
        }
    }

    /// Applies every predicate in turn, stopping as soon as nothing is left.
    pub fn apply(&self, predicates: &[Predicate]) -> FilteredView<'a> {
        let mut view = self.clone();
        for predicate in predicates {
            if view.is_empty() {
                break;
            }
            view = view.filter_by(predicate);
        }
        view
    }

    /// Re-filters this view with a selection and range.
    pub fn refine(&self, selection: &FilterSelection, range: &DateRange) -> FilteredView<'a> {
        self.apply(&build_predicates(selection, range))
    }
}

impl PartialEq for FilteredView<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.dataset, other.dataset) && self.rows == other.rows
    }
}

/// Applies the constrained dimensions and the inclusive date range to the base table.
pub fn apply_filters<'a>(
    dataset: &'a Dataset,
    selection: &FilterSelection,
    range: &DateRange,
) -> FilteredView<'a> {
    let view = FilteredView::all(dataset).refine(selection, range);
    log::debug!(
        "filtered {} of {} records ({} .. {})",
        view.len(),
        dataset.len(),
        range.from(),
        range.to()
    );
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(day: NaiveDate, region: &str, category: &str) -> Record {
        Record {
            order_date: day,
            region: region.to_string(),
            state: "State".to_string(),
            city: "City".to_string(),
            category: category.to_string(),
            sub_category: "Sub".to_string(),
            product_name: "Product".to_string(),
            sales: 1.0,
            quantity: 1,
            profit: 0.5,
        }
    }

    fn create_test_dataset() -> Dataset {
        Dataset::new(vec![
            record(date(2023, 1, 1), "East", "Furniture"),
            record(date(2023, 1, 15), "West", "Furniture"),
            record(date(2023, 2, 1), "East", "Technology"),
            record(date(2023, 2, 28), "East", "Furniture"),
            record(date(2023, 3, 1), "Central", ""),
        ])
        .unwrap()
    }

    #[test]
    fn test_unconstrained_selection_keeps_range_only() {
        let dataset = create_test_dataset();
        let range = DateRange::new(date(2023, 1, 1), date(2023, 2, 28)).unwrap();
        let view = apply_filters(&dataset, &FilterSelection::new(), &range);
        assert_eq!(view.row_ids(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let dataset = create_test_dataset();
        let range = DateRange::new(date(2023, 1, 15), date(2023, 2, 1)).unwrap();
        let view = apply_filters(&dataset, &FilterSelection::new(), &range);
        assert_eq!(view.row_ids(), &[1, 2]);
    }

    #[test]
    fn test_categorical_predicates_are_anded() {
        let dataset = create_test_dataset();
        let selection = FilterSelection::new()
            .with(Dimension::Region, "East")
            .with(Dimension::Category, "Furniture");
        let view = apply_filters(&dataset, &selection, &dataset.full_range());
        assert_eq!(view.row_ids(), &[0, 3]);
        assert!(view.records().all(|r| r.region == "East" && r.category == "Furniture"));
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let dataset = create_test_dataset();
        let selection = FilterSelection::new().with(Dimension::Region, "South");
        let view = apply_filters(&dataset, &selection, &dataset.full_range());
        assert!(view.is_empty());
        assert_eq!(view.len(), 0);
    }

    #[test]
    fn test_predicate_order_does_not_matter() {
        let dataset = create_test_dataset();
        let selection = FilterSelection::new()
            .with(Dimension::Region, "East")
            .with(Dimension::Category, "Furniture");
        let range = DateRange::new(date(2023, 1, 1), date(2023, 2, 28)).unwrap();
        let predicates = build_predicates(&selection, &range);
        assert_eq!(predicates.len(), 3);

        let base = FilteredView::all(&dataset);
        let expected = base.apply(&predicates);
        let orders: [[usize; 3]; 6] = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];
        for order in orders {
            let permuted: Vec<Predicate> = order.iter().map(|&i| predicates[i].clone()).collect();
            assert_eq!(base.apply(&permuted), expected, "order {:?}", order);
        }
    }

    #[test]
    fn test_refiltering_is_idempotent() {
        let dataset = create_test_dataset();
        let selection = FilterSelection::new().with(Dimension::Region, "East");
        let range = DateRange::new(date(2023, 1, 1), date(2023, 2, 1)).unwrap();

        let once = apply_filters(&dataset, &selection, &range);
        let twice = once.refine(&selection, &range);
        assert_eq!(once, twice);
        assert_eq!(twice.row_ids(), &[0, 2]);
    }

    #[test]
    fn test_empty_cell_never_matches() {
        let dataset = create_test_dataset();
        let predicate = Predicate::Equals {
            dimension: Dimension::Category,
            value: String::new(),
        };
        assert!(FilteredView::all(&dataset).filter_by(&predicate).is_empty());
    }
}
