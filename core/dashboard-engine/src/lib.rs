//! FILENAME: core/dashboard-engine/src/lib.rs
//! Filter-and-aggregate pipeline for the Superstore dashboard.
//!
//! This crate turns the loaded `Dataset` (from `engine`) into everything the
//! presentation layer draws: dropdown options, KPI cards, the trend series
//! and the product ranking.
//!
//! Layers:
//! - `definition`: Request configuration (what the user ASKED for)
//! - `cascade`: Dependent dropdown resolution
//! - `filter`: Predicate filtering into views
//! - `aggregate`: Grouping and reduction (HOW we compute)
//! - `view`: Renderable output for the frontend (WHAT we display)
//! - `pipeline`: The recompute pass and its memo

pub mod aggregate;
pub mod cascade;
pub mod definition;
pub mod detail;
pub mod filter;
pub mod pipeline;
pub mod view;

pub use aggregate::{aggregate_by_product, aggregate_by_time, margin_rate, summarize, MetricAccumulator};
pub use cascade::{resolve_options, ResolvedFilters};
pub use definition::*;
pub use detail::detail_rows;
pub use pipeline::{compute_dashboard, filtered_view, DashboardCalculator, RecomputeCache};
pub use filter::{apply_filters, build_predicates, FilteredView, Predicate};
pub use view::*;
