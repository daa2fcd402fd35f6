//! FILENAME: app/tests/common/mod.rs
//! Test harness and fixtures for dashboard app integration tests.

#![allow(dead_code)]

use app_lib::{create_app_state, AppState};
use chrono::NaiveDate;
use dashboard_engine::DashboardView;
use engine::{Dataset, Record};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Test harness for creating and managing a dashboard session.
pub struct TestHarness {
    pub state: AppState,
}

impl TestHarness {
    /// Create a harness over the eight-order fixture.
    pub fn new() -> Self {
        app_lib::logging::set_console_enabled(false);
        TestHarness {
            state: create_app_state(Arc::new(fixture_dataset())),
        }
    }

    pub fn set(&self, dimension: &str, value: &str) -> DashboardView {
        app_lib::set_filter(&self.state, dimension, value).unwrap()
    }

    pub fn csv_lines(&self) -> Vec<String> {
        let bytes = app_lib::export_view_csv(&self.state).unwrap();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|l| l.to_string())
            .collect()
    }
}

fn record(
    date: (i32, u32, u32),
    geo: (&str, &str, &str),
    category: (&str, &str),
    product: &str,
    sales: f64,
    quantity: u64,
    profit: f64,
) -> Record {
    Record {
        order_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        region: geo.0.to_string(),
        state: geo.1.to_string(),
        city: geo.2.to_string(),
        category: category.0.to_string(),
        sub_category: category.1.to_string(),
        product_name: product.to_string(),
        sales,
        quantity,
        profit,
    }
}

/// Eight orders over four regions, January to April 2023.
///
/// Totals: sales 1436.96, quantity 17, profit 161.91.
pub fn fixture_records() -> Vec<Record> {
    vec![
        record((2023, 1, 5), ("East", "New York", "New York City"), ("Technology", "Phones"), "Phone A", 100.0, 2, 20.0),
        record((2023, 1, 20), ("East", "New York", "Buffalo"), ("Office Supplies", "Paper"), "Paper Ream", 50.0, 5, 10.0),
        record((2023, 2, 10), ("East", "Pennsylvania", "Philadelphia"), ("Furniture", "Chairs"), "Desk Chair", 300.0, 1, -30.0),
        record((2023, 2, 15), ("West", "California", "Los Angeles"), ("Technology", "Phones"), "Phone B", 200.0, 1, 40.0),
        record((2023, 3, 1), ("West", "California", "San Francisco"), ("Office Supplies", "Binders"), "Binder", 0.0, 3, 0.0),
        record((2023, 3, 20), ("West", "Washington", "Seattle"), ("Furniture", "Tables"), "Oak Table", 500.0, 1, 75.0),
        record((2023, 4, 2), ("Central", "Texas", "Houston"), ("Office Supplies", "Paper"), "Paper Ream", 25.0, 2, 5.0),
        record((2023, 4, 18), ("South", "Kentucky", "Henderson"), ("Furniture", "Bookcases"), "Bookcase", 261.96, 2, 41.91),
    ]
}

pub fn fixture_dataset() -> Dataset {
    Dataset::new(fixture_records()).unwrap()
}

/// Writes the fixture as a CSV file inside `dir` and returns its path.
pub fn write_fixture_csv(dir: &Path) -> PathBuf {
    let path = dir.join("superstore.csv");
    persistence::save_csv(&fixture_records(), &path).unwrap();
    path
}
