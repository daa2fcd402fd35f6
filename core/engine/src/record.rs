//! FILENAME: core/engine/src/record.rs
//! PURPOSE: Defines a single order line and the categorical dimensions over it.
//! CONTEXT: Records are built once by the loader and never mutated afterwards.
//! Everything downstream (filters, aggregates, exports) borrows them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// SOURCE COLUMNS
// ============================================================================

/// Header names of the source sheet, in export order.
pub const COL_ORDER_DATE: &str = "Order Date";
pub const COL_REGION: &str = "Region";
pub const COL_STATE: &str = "State";
pub const COL_CITY: &str = "City";
pub const COL_CATEGORY: &str = "Category";
pub const COL_SUB_CATEGORY: &str = "Sub-Category";
pub const COL_PRODUCT_NAME: &str = "Product Name";
pub const COL_SALES: &str = "Sales";
pub const COL_QUANTITY: &str = "Quantity";
pub const COL_PROFIT: &str = "Profit";

/// All required columns, in the order used for XLSX export and detail rows.
pub const RECORD_COLUMNS: [&str; 10] = [
    COL_ORDER_DATE,
    COL_REGION,
    COL_STATE,
    COL_CITY,
    COL_CATEGORY,
    COL_SUB_CATEGORY,
    COL_PRODUCT_NAME,
    COL_SALES,
    COL_QUANTITY,
    COL_PROFIT,
];

/// `Record` field names as serialized, in the same order as `RECORD_COLUMNS`.
pub const RECORD_FIELDS: [&str; 10] = [
    "orderDate",
    "region",
    "state",
    "city",
    "category",
    "subCategory",
    "productName",
    "sales",
    "quantity",
    "profit",
];

// ============================================================================
// DIMENSION
// ============================================================================

/// A categorical column the user can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Region,
    State,
    City,
    Category,
    SubCategory,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Region,
        Dimension::State,
        Dimension::City,
        Dimension::Category,
        Dimension::SubCategory,
    ];

    /// Source column header for this dimension.
    pub fn column_name(self) -> &'static str {
        match self {
            Dimension::Region => COL_REGION,
            Dimension::State => COL_STATE,
            Dimension::City => COL_CITY,
            Dimension::Category => COL_CATEGORY,
            Dimension::SubCategory => COL_SUB_CATEGORY,
        }
    }

    /// Position in `Dimension::ALL`, used to index per-dimension tables.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Looks a dimension up by its column header or its camelCase name.
    pub fn from_name(name: &str) -> Option<Dimension> {
        let name = name.trim();
        Dimension::ALL.into_iter().find(|d| {
            d.column_name().eq_ignore_ascii_case(name) || d.key().eq_ignore_ascii_case(name)
        })
    }

    /// camelCase key, matching the serde representation.
    pub fn key(self) -> &'static str {
        match self {
            Dimension::Region => "region",
            Dimension::State => "state",
            Dimension::City => "city",
            Dimension::Category => "category",
            Dimension::SubCategory => "subCategory",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column_name())
    }
}

// ============================================================================
// RECORD
// ============================================================================

/// One order line from the source sheet.
///
/// An empty categorical string stands for a missing cell. It is never offered
/// as a filter option and never equals a concrete selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub order_date: NaiveDate,
    pub region: String,
    pub state: String,
    pub city: String,
    pub category: String,
    pub sub_category: String,
    pub product_name: String,
    pub sales: f64,
    pub quantity: u64,
    pub profit: f64,
}

impl Record {
    /// Returns the value of a categorical dimension, `None` when the cell was empty.
    pub fn dimension(&self, dimension: Dimension) -> Option<&str> {
        let value = match dimension {
            Dimension::Region => &self.region,
            Dimension::State => &self.state,
            Dimension::City => &self.city,
            Dimension::Category => &self.category,
            Dimension::SubCategory => &self.sub_category,
        };
        if value.is_empty() {
            None
        } else {
            Some(value.as_str())
        }
    }

    /// Text form of every field in `RECORD_COLUMNS` order.
    /// Dates render as `YYYY-MM-DD`; numbers keep full precision.
    pub fn to_row(&self) -> [String; 10] {
        [
            self.order_date.format("%Y-%m-%d").to_string(),
            self.region.clone(),
            self.state.clone(),
            self.city.clone(),
            self.category.clone(),
            self.sub_category.clone(),
            self.product_name.clone(),
            self.sales.to_string(),
            self.quantity.to_string(),
            self.profit.to_string(),
        ]
    }
}
